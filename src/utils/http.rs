use std::time::Duration;

use log::info;
use reqwest::blocking::Client;
use thiserror::Error;

/// Default timeout for subscription requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads a subscription body.
///
/// A single attempt is made; any transport failure or non-success status is
/// returned as an error rather than partial content.
///
/// # Arguments
/// * `url` - The subscription URL
/// * `timeout_secs` - Request timeout covering connect and body transfer
/// * `user_agent` - Value of the `User-Agent` header
pub fn fetch_subscription(
    url: &str,
    timeout_secs: u64,
    user_agent: &str,
) -> Result<String, FetchError> {
    info!("Fetching subscription: {}", url);

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent)
        .build()
        .map_err(FetchError::Client)?;

    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    Ok(response.text()?)
}

/// Reads a subscription from a local file.
pub fn read_subscription_file(path: &str) -> Result<String, FetchError> {
    info!("Reading subscription file: {}", path);
    std::fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_string(),
        source,
    })
}
