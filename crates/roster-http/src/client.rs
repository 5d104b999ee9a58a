//! REST HTTP client.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use roster_core::error::{ApiError, InvalidInputError, TransportError};
use roster_core::{ApiUrl, Error, Result};

use crate::endpoints::ErrorResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the REST API.
///
/// Every call returns the decoded JSON body; an empty body decodes to
/// `Value::Null`. Any 2xx status is success.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl RestClient {
    /// Create a new client for the given API.
    pub fn new(api: ApiUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("roster/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, api })
    }

    /// Returns the API URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// GET `url`.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Value> {
        debug!("GET");
        let request = self.request(Method::GET, url, token)?;
        self.send(request).await
    }

    /// POST a JSON body to `url`.
    #[instrument(skip(self, body, token), fields(api = %self.api))]
    pub async fn post_json<B>(&self, url: &str, body: &B, token: Option<&str>) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        debug!("POST");
        let request = self.request(Method::POST, url, token)?.json(body);
        self.send(request).await
    }

    /// PUT a JSON body to `url`.
    #[instrument(skip(self, body, token), fields(api = %self.api))]
    pub async fn put_json<B>(&self, url: &str, body: &B, token: Option<&str>) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        debug!("PUT");
        let request = self.request(Method::PUT, url, token)?.json(body);
        self.send(request).await
    }

    /// DELETE `url`.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub async fn delete(&self, url: &str, token: Option<&str>) -> Result<Value> {
        debug!("DELETE");
        let request = self.request(Method::DELETE, url, token)?;
        self.send(request).await
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> Result<RequestBuilder> {
        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.headers(auth_headers(token)?);
        }
        Ok(request.header(ACCEPT, "application/json"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        trace!(%status, "Response");

        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(ErrorResponse::into_message);
            return Err(ApiError::new(status.as_u16(), message).into());
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| {
            TransportError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Map a reqwest failure onto the transport error it represents.
fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    err.into()
}

fn auth_headers(token: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        InvalidInputError::Other {
            message: "access token contains invalid header characters".to_string(),
        }
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let api = ApiUrl::new("https://hr.example.com/api").unwrap();
        let client = RestClient::new(api.clone()).unwrap();
        assert_eq!(client.api().as_str(), api.as_str());
    }

    #[test]
    fn auth_header_is_bearer() {
        let headers = auth_headers("abc").unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn rejects_tokens_with_newlines() {
        assert!(auth_headers("abc\ndef").is_err());
    }
}
