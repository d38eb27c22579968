use crate::domain::model::{Notice, PredictionResult, Query};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Remote source of name-to-country predictions.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Issues exactly one request for `query`.
    async fn predict(&self, query: &Query) -> Result<PredictionResult>;
}

/// The results section and notification surface a cycle writes to.
pub trait ResultsView: Send + Sync {
    fn clear_results(&self);
    fn hide_results(&self);
    fn show_results(&self, query: &Query, count: Option<u64>);
    fn append_result(&self, text: &str);
    fn notify(&self, notice: Notice);
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn endpoint_path(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn supersede_in_flight(&self) -> bool;
    fn json_logs(&self) -> bool;
}
