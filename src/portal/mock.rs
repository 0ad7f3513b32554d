//! In-process stand-in for the portal, served when `TORONTO_HYDRO_MOCK` is set.
//!
//! It answers the mock endpoint set with a single meter (`1234`, internal id
//! `4321`) whose data ends today, and a fixed tiered-tariff day for every
//! hourly request.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::{Days, Utc};
use chrono_tz::Tz;
use serde_derive::Deserialize;
use std::net::SocketAddr;
use tokio::net::{TcpListener, ToSocketAddrs};

const LOGIN_PAGE: &str = r#"<form action="https://www.torontohydro.com/log-in?p_p_id=th_module_authentication_ThModuleAuthenticationPortlet&amp;p_p_lifecycle=1&amp;p_p_state=normal&amp;p_p_mode=view&amp;_th_module_authentication_ThModuleAuthenticationPortlet_javax.portlet.action=%2Flogin&amp;p_auth=PlXHUFya" id="_th_module_authentication_ThModuleAuthenticationPortlet_authentication" method="post"></form>"#;

const HOURLY_DAY: &str = "# Your hourly usage (2000-01-01)
Time,Usage off-peak (kWh),Usage mid-peak (kWh),Usage on-peak (kWh),Usage low-tier (kWh),Usage high-tier (kWh),Cost off-peak ($),Cost mid-peak ($),Cost on-peak ($),Cost low-tier ($),Cost high-tier ($)
12  a.m.,,,,0.21,0.00,,,,0.02,0.00
1  a.m.,,,,0.22,0.00,,,,0.02,0.00
2  a.m.,,,,0.33,0.00,,,,0.03,0.00
3  a.m.,,,,0.30,0.00,,,,0.03,0.00
4  a.m.,,,,0.22,0.00,,,,0.02,0.00
5  a.m.,,,,0.24,0.00,,,,0.02,0.00
6  a.m.,,,,0.29,0.00,,,,0.03,0.00
7  a.m.,,,,0.27,0.00,,,,0.02,0.00
8  a.m.,,,,0.26,0.00,,,,0.02,0.00
9  a.m.,,,,0.21,0.00,,,,0.02,0.00
10  a.m.,,,,0.11,0.00,,,,0.01,0.00
11  a.m.,,,,0.18,0.00,,,,0.02,0.00
12  p.m.,,,,0.11,0.00,,,,0.01,0.00
1  p.m.,,,,0.22,0.00,,,,0.02,0.00
2  p.m.,,,,0.23,0.00,,,,0.02,0.00
3  p.m.,,,,0.27,0.00,,,,0.02,0.00
4  p.m.,,,,0.17,0.00,,,,0.01,0.00
5  p.m.,,,,0.68,0.00,,,,0.06,0.00
6  p.m.,,,,0.70,0.00,,,,0.06,0.00
7  p.m.,,,,0.76,0.00,,,,0.07,0.00
8  p.m.,,,,0.29,0.00,,,,0.03,0.00
9  p.m.,,,,0.32,0.00,,,,0.03,0.00
10  p.m.,,,,0.24,0.00,,,,0.02,0.00
11  p.m.,,,,0.31,0.00,,,,0.03,0.00";

#[derive(Clone)]
struct MockState {
    timezone: Tz,
}

#[derive(Deserialize)]
struct UsageQuery {
    p_p_resource_id: Option<String>,
}

pub fn router(timezone: Tz) -> Router {
    Router::new()
        .route("/log-in", get(login_page).post(login))
        .route("/logout", get(logout))
        .route("/my-usage", any(my_usage))
        .with_state(MockState { timezone })
}

/// Binds `addr` and serves the mock portal in the background, returning the
/// bound address.
pub async fn spawn(addr: impl ToSocketAddrs, timezone: Tz) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::warn!("Mocking Toronto Hydro on {}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(timezone)).await {
            tracing::error!("Mock portal stopped: {}", e);
        }
    });
    Ok(local_addr)
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

async fn login() -> Response {
    text("Logged in!")
}

async fn logout() -> Response {
    text("Logged out!")
}

async fn my_usage(State(state): State<MockState>, Query(query): Query<UsageQuery>) -> Response {
    match query.p_p_resource_id.as_deref() {
        Some("fetchMeterList") => {
            let today = Utc::now().with_timezone(&state.timezone).date_naive();
            let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
            Json(serde_json::json!([{
                "endDate": today.format("%Y-%m-%d").to_string(),
                "meterNum": "1234",
                "id": "4321",
                "startDate": yesterday.format("%Y-%m-%d").to_string(),
            }]))
            .into_response()
        }
        Some("getHourlyChartData") => text(HOURLY_DAY),
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

fn text(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "application/text")], body).into_response()
}
