use crate::config::TorontoHydroConfig;
use crate::error::{PortalError, RequestError};
use crate::portal::endpoints::{Endpoints, EMAIL_FIELD, LOGIN_FORM_ID, PASSWORD_FIELD};
use crate::portal::login_form::extract_form_action;
use crate::portal::session::{read_ok, PortalSession};
use reqwest::Client as HttpClient;

/// Portal account credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl From<&TorontoHydroConfig> for Credentials {
    fn from(config: &TorontoHydroConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// Logged-out entry point to the portal.
pub struct PortalClient {
    endpoints: Endpoints,
}

impl PortalClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    pub fn from_config(config: &TorontoHydroConfig) -> Result<Self, PortalError> {
        Ok(Self::new(Endpoints::from_config(config)?))
    }

    /// Logs into the portal and returns the authenticated session.
    ///
    /// Fetches the login page, reads the credential form's action, and posts
    /// the credentials to it. Each login starts from an empty cookie jar.
    pub async fn login(&self, credentials: &Credentials) -> Result<PortalSession, PortalError> {
        tracing::info!("Logging into Toronto Hydro...");
        let http_client = HttpClient::builder()
            .cookie_store(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PortalError::LoginFailed(e.into()))?;

        let login_page = http_client
            .get(self.endpoints.login_page()?)
            .send()
            .await
            .map_err(|e| PortalError::LoginFailed(e.into()))?;
        let page = read_ok(login_page)
            .await
            .map_err(PortalError::LoginFailed)?;

        let action = extract_form_action(&page, LOGIN_FORM_ID)?;
        let target = self.endpoints.login_target(&action)?;
        tracing::debug!("Submitting credentials to {}", target);

        let response = http_client
            .post(target)
            .form(&[
                (EMAIL_FIELD, credentials.username.as_str()),
                (PASSWORD_FIELD, credentials.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PortalError::LoginFailed(RequestError::Transport(e)))?;
        read_ok(response)
            .await
            .map_err(PortalError::LoginFailed)?;

        Ok(PortalSession::new(http_client, self.endpoints.clone()))
    }
}
