pub mod handler;
pub mod session;

pub use crate::domain::model::{
    CountryGuess, CycleOutcome, Notice, PredictionResult, Query, RenderedList,
};
pub use crate::domain::ports::{ConfigProvider, PredictionSource, ResultsView};
pub use crate::utils::error::Result;
