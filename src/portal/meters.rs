use crate::error::{PortalError, RequestError};
use crate::model::Meter;
use crate::portal::session::PortalSession;

/// Lists the meters on the logged-in account with their valid date ranges.
pub async fn list_meters(session: &PortalSession) -> Result<Vec<Meter>, PortalError> {
    tracing::info!("Getting meter list");
    let url = session.endpoints().meter_list()?;
    let body = session
        .post_empty(url)
        .await
        .map_err(PortalError::MeterListUnavailable)?;

    let meters: Vec<Meter> = serde_json::from_str(&body)
        .map_err(|e| PortalError::MeterListUnavailable(RequestError::Decode(e)))?;
    tracing::debug!("Portal lists {} meter(s)", meters.len());
    Ok(meters)
}
