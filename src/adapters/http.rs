use crate::core::{ConfigProvider, PredictionResult, PredictionSource, Query};
use crate::utils::error::{NationalizeError, Result};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use url::Url;

/// Characters left untouched when encoding a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes `value` for use inside a query parameter.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Looks names up against the `/api/v1/names/` endpoint.
#[derive(Debug, Clone)]
pub struct HttpPredictionSource {
    client: Client,
    endpoint: Url,
}

impl HttpPredictionSource {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoint = Url::parse(config.base_url())?.join(config.endpoint_path())?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&format!("name={}", encode_component(query.as_str()))));
        url
    }
}

#[async_trait]
impl PredictionSource for HttpPredictionSource {
    async fn predict(&self, query: &Query) -> Result<PredictionResult> {
        let url = self.request_url(query);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(NationalizeError::StatusError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        PredictionResult::from_json(&body)
    }
}
