use crate::error::{PortalError, RequestError};
use crate::portal::endpoints::Endpoints;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Response, StatusCode, Url};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// An authenticated portal session.
///
/// Only [`PortalClient::login`](crate::portal::PortalClient::login) creates
/// one, so holding a `PortalSession` means the login succeeded. The session
/// owns the cookie-bearing HTTP client; [`PortalSession::logout`] consumes it
/// and dropping it releases the connection pool.
#[derive(Debug)]
pub struct PortalSession {
    http_client: HttpClient,
    endpoints: Endpoints,
}

impl PortalSession {
    pub(crate) fn new(http_client: HttpClient, endpoints: Endpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// POSTs a URL-encoded form and returns the body of a 200 response.
    pub(crate) async fn post_form(
        &self,
        url: Url,
        form: &[(&str, &str)],
    ) -> Result<String, RequestError> {
        let response = self.http_client.post(url).form(form).send().await?;
        read_ok(response).await
    }

    /// POSTs an empty form body and returns the body of a 200 response.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<String, RequestError> {
        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .send()
            .await?;
        read_ok(response).await
    }

    /// Logs out of the portal, ending the session.
    ///
    /// The session is consumed whether or not the portal acknowledges the
    /// logout; requests already made with it are unaffected.
    pub async fn logout(self) -> Result<(), PortalError> {
        tracing::info!("Logging out of Toronto Hydro...");
        let url = self.endpoints.logout()?;
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PortalError::LogoutFailed(e.into()))?;
        read_ok(response)
            .await
            .map(|_| ())
            .map_err(PortalError::LogoutFailed)
    }
}

/// Returns the response body when the status is exactly 200.
pub(crate) async fn read_ok(response: Response) -> Result<String, RequestError> {
    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!("Portal answered {} for {}", status, response.url());
        return Err(RequestError::status(status));
    }
    Ok(response.text().await?)
}
