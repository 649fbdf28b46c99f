use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{Result, TunegrabError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Initialize HTTP client with default configuration
pub fn get_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
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

fn map_send_error(e: reqwest::Error, url: &str) -> TunegrabError {
    if e.is_timeout() {
        TunegrabError::RequestTimeout(url.to_string())
    } else {
        TunegrabError::Network(e)
    }
}

/// Execute HTTP request with error handling
async fn execute_request(
    client: reqwest::Client,
    method: reqwest::Method,
    url: &str,
    headers: Option<HeaderMap>,
) -> Result<reqwest::Response> {
    let request_headers = create_custom_headers(headers);
    let request = client.request(method, url).headers(request_headers);

    let response = request.send().await.map_err(|e| map_send_error(e, url))?;

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TunegrabError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Download and parse JSON response from URL
pub async fn download_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let client = get_http_client();
    let response = execute_request(client, reqwest::Method::GET, url, None).await?;
    response.json::<T>().await.map_err(TunegrabError::from)
}

/// Execute GET returning the raw response without a status check
pub async fn get_raw(url: &str, headers: HeaderMap) -> Result<reqwest::Response> {
    let client = get_http_client();
    client
        .get(url)
        .headers(create_custom_headers(Some(headers)))
        .send()
        .await
        .map_err(|e| map_send_error(e, url))
}

/// Lightweight existence check, HEAD request reporting only success or failure
pub async fn probe(url: &str) -> bool {
    let client = get_http_client();
    match client
        .head(url)
        .headers(get_default_headers())
        .send()
        .await
    {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// Execute POST with a JSON body, returning the raw response without a status check.
/// The download protocol encodes outcomes in non-2xx responses too, so callers
/// interpret status and content type themselves.
pub async fn post_json_raw<B: Serialize>(
    url: &str,
    body: &B,
    headers: HeaderMap,
) -> Result<reqwest::Response> {
    let client = get_http_client();
    let request_headers = create_custom_headers(Some(headers));
    client
        .post(url)
        .headers(request_headers)
        .json(body)
        .send()
        .await
        .map_err(|e| map_send_error(e, url))
}
