use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{Result, YandexError};

const DEFAULT_USER_AGENT: &str = "Yandex-Music-API";

/// Build the HTTP client shared by every request of one extractor
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?;
    Ok(client)
}

/// Get default headers for requests
fn get_default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Create custom headers with additional values
fn create_custom_headers(additional_headers: Option<HeaderMap>) -> HeaderMap {
    let mut headers = get_default_headers();

    if let Some(custom) = additional_headers {
        headers.extend(custom);
    }

    headers
}

/// Execute HTTP request with error handling
async fn execute_request(
    client: &reqwest::Client,
    method: reqwest::Method,
    url: &str,
    headers: Option<HeaderMap>,
) -> Result<reqwest::Response> {
    let request_headers = create_custom_headers(headers);
    let request = client.request(method, url).headers(request_headers);

    log::debug!("GET {}", url);
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            YandexError::RequestTimeout(url.to_string())
        } else {
            YandexError::NetworkError(e)
        }
    })?;

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(YandexError::HttpError {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Download and parse JSON response with custom headers
pub async fn download_json_with_headers<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
) -> Result<T> {
    let response =
        execute_request(client, reqwest::Method::GET, url, Some(headers)).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(YandexError::from)
}

/// Download text content from URL with custom headers
pub async fn download_text_with_headers(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
) -> Result<String> {
    let response =
        execute_request(client, reqwest::Method::GET, url, Some(headers)).await?;
    response.text().await.map_err(YandexError::from)
}
