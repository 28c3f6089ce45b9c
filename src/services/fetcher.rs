use crate::models::FEED_MODULES_KEY;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Raw HTTP response as seen by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub status: u16,
    pub body: String,
}

/// Failure below the HTTP layer: DNS, connection, TLS, body decoding.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Unreachable(String),
}

/// Reasons a fetch produced no usable module array.
///
/// All of them are recovered by the caller: the refresh attempt ends and the
/// previous data is kept.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Website {url} responded with error: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Website {url} responded with code: {status}")]
    Status { url: String, status: u16 },

    #[error("Website {url} did not respond with a JSON array at \"{key}\" key: {detail}")]
    Shape {
        url: String,
        key: &'static str,
        detail: String,
    },
}

/// Issues the GET request for the feed.
///
/// The seam between the fetcher and the network, so the refresh flow can run
/// against scripted responses.
pub trait FeedTransport: Send + Sync + 'static {
    fn get(&self, url: &str) -> impl Future<Output = Result<FeedResponse, TransportError>> + Send;
}

/// [`FeedTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport, optionally bounding each request.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl FeedTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<FeedResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FeedResponse { status, body })
    }
}

/// Fetch the feed and return its module array, unfiltered.
pub async fn fetch_modules<T: FeedTransport>(
    transport: &T,
    url: &str,
) -> Result<Vec<Value>, FetchError> {
    let response = transport
        .get(url)
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    if response.status != 200 {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    extract_modules(url, &response.body)
}

/// Pull the array at [`FEED_MODULES_KEY`] out of a feed document.
pub fn extract_modules(url: &str, body: &str) -> Result<Vec<Value>, FetchError> {
    let shape_error = |detail: String| FetchError::Shape {
        url: url.to_string(),
        key: FEED_MODULES_KEY,
        detail,
    };

    let mut document: Value =
        serde_json::from_str(body).map_err(|e| shape_error(format!("invalid JSON: {}", e)))?;

    match document.get_mut(FEED_MODULES_KEY).map(Value::take) {
        Some(Value::Array(modules)) => Ok(modules),
        Some(other) => Err(shape_error(format!("found {}", json_kind(&other)))),
        None => Err(shape_error("key is missing".to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
