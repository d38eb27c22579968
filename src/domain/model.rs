use crate::utils::error::{ErrorCategory, NationalizeError, Result};
use serde::Deserialize;
use std::fmt;

/// Trimmed, non-empty name submitted for lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NationalizeError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rendered in place of a field an entry leaves out.
const MISSING_FIELD: &str = "unknown";

/// One `(country_id, probability)` pair. Entries with a field missing are
/// still rendered rather than failing the whole list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryGuess {
    #[serde(default)]
    pub country_id: Option<String>,
    #[serde(default)]
    pub probability: Option<f64>,
}

impl CountryGuess {
    pub fn new(country_id: impl Into<String>, probability: f64) -> Self {
        Self {
            country_id: Some(country_id.into()),
            probability: Some(probability),
        }
    }
}

impl fmt::Display for CountryGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country_id {
            Some(id) => write!(f, "{}: ", id)?,
            None => write!(f, "{}: ", MISSING_FIELD)?,
        }
        match self.probability {
            Some(p) => write!(f, "{}", p),
            None => f.write_str(MISSING_FIELD),
        }
    }
}

/// Decoded body of the names endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub country: Option<Vec<CountryGuess>>,
}

impl PredictionResult {
    /// Decodes a response body.
    ///
    /// Only objects carry a `country` key; any other JSON value except `null`
    /// decodes to an empty result. A falsy `country` (`null`, `false`, `0`,
    /// `""`) counts as absent. `null` bodies and any other non-list `country`
    /// are malformed payloads.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        match value {
            serde_json::Value::Null => Err(NationalizeError::MalformedPayload {
                message: "body is null".to_string(),
            }),
            serde_json::Value::Object(mut fields) => {
                if fields.get("country").is_some_and(is_falsy) {
                    fields.remove("country");
                }
                serde_json::from_value(serde_json::Value::Object(fields)).map_err(|e| {
                    NationalizeError::MalformedPayload {
                        message: e.to_string(),
                    }
                })
            }
            _ => Ok(Self::default()),
        }
    }

    /// Country guesses in server order, or `None` when there are none.
    pub fn guesses(&self) -> Option<&[CountryGuess]> {
        match self.country.as_deref() {
            Some(list) if !list.is_empty() => Some(list),
            _ => None,
        }
    }
}

fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Blocking notifications raised towards the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyName,
    NotFound,
    FetchFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::EmptyName => "Please enter a name.",
            Notice::NotFound => "No data found.",
            Notice::FetchFailed => "An error occurred while fetching data.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How one submit-request-render cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Rendered { entries: usize },
    Rejected,
    NotFound,
    Failed(ErrorCategory),
    Superseded,
}

impl CycleOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            CycleOutcome::Rendered { .. } | CycleOutcome::NotFound | CycleOutcome::Superseded => 0,
            CycleOutcome::Rejected => 1,
            CycleOutcome::Failed(_) => 2,
        }
    }
}

/// State of the results section: visibility plus rendered lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedList {
    pub visible: bool,
    pub items: Vec<String>,
}
