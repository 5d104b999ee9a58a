//! REST-backed API backend.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use roster_core::error::{AuthError, Error};
use roster_core::traits::Backend;
use roster_core::{AccessToken, ApiUrl, Credentials, RefreshToken, Result};

use crate::client::RestClient;
use crate::endpoints::{LOGIN, LoginRequest, LoginResponse};
use crate::session::HttpSession;

/// A network-backed API reached over REST.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    api: ApiUrl,
    client: RestClient,
}

impl HttpBackend {
    /// Create a new backend for the given API URL.
    pub fn new(api: ApiUrl) -> Result<Self> {
        let client = RestClient::new(api.clone())?;
        Ok(Self { api, client })
    }

    pub(crate) fn client(&self) -> &RestClient {
        &self.client
    }
}

#[async_trait]
impl Backend for HttpBackend {
    type Session = HttpSession;

    fn url(&self) -> &ApiUrl {
        &self.api
    }

    #[instrument(skip(self, credentials), fields(api = %self.api, email = credentials.email()))]
    async fn login(&self, credentials: Credentials) -> Result<Self::Session> {
        debug!("Logging in");

        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let body = match self
            .client
            .post_json(&self.api.endpoint_url(LOGIN), &request, None)
            .await
        {
            Ok(body) => body,
            Err(Error::Api(e)) if matches!(e.status, 400 | 401 | 403) => {
                debug!(status = e.status, "Login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let response: LoginResponse =
            serde_json::from_value(body).map_err(|e| AuthError::MalformedLogin {
                reason: e.to_string(),
            })?;

        if response.access_token.is_empty() {
            return Err(AuthError::MalformedLogin {
                reason: "empty access token".to_string(),
            }
            .into());
        }

        info!("Logged in");
        Ok(HttpSession::new(
            self.clone(),
            AccessToken::new(response.access_token),
            response.refresh_token.map(RefreshToken::new),
            response.user,
        ))
    }
}
