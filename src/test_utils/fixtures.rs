//! Test fixtures: dates, portal pages and payloads, and hourly CSV bodies.

/// Test date and time generators.
pub mod dates {
    use chrono::{DateTime, TimeZone};
    use chrono_tz::America::Toronto;
    use chrono_tz::Tz;

    /// The top of `hour` on the given day in the account timezone.
    pub fn hour_on(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Tz> {
        Toronto
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .unwrap()
    }
}

/// Portal pages and JSON payloads.
pub mod portal {
    use crate::model::Meter;
    use crate::portal::endpoints::LOGIN_FORM_ID;
    use crate::portal::Credentials;
    use chrono::NaiveDate;

    /// Login form action as served by the production page.
    pub const LOGIN_ACTION: &str = "https://www.torontohydro.com/log-in?p_p_id=th_module_authentication_ThModuleAuthenticationPortlet&p_p_lifecycle=1&p_p_state=normal&p_p_mode=view&_th_module_authentication_ThModuleAuthenticationPortlet_javax.portlet.action=%2Flogin&p_auth=PlXHUFya";

    /// A login page carrying the credential form with `action`.
    pub fn login_page(action: &str) -> String {
        format!(
            r#"<html>
                <head><title>Log in | Toronto Hydro</title></head>
                <body>
                    <form action="/search" id="search" method="get"></form>
                    <form action="{}" id="{}" method="post">
                        <input type="email" name="email"/>
                        <input type="password" name="password"/>
                    </form>
                </body>
            </html>"#,
            action.replace('&', "&amp;"),
            LOGIN_FORM_ID
        )
    }

    pub fn test_credentials() -> Credentials {
        Credentials {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    pub fn test_meter() -> Meter {
        Meter {
            meter_number: "1234".to_string(),
            internal_id: "4321".to_string(),
            valid_from: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            valid_to: NaiveDate::from_ymd_opt(2000, 1, 2).unwrap(),
        }
    }

    /// A `fetchMeterList` response for `(meterNum, id, startDate, endDate)`.
    pub fn meter_list_json(meters: &[(&str, &str, NaiveDate, NaiveDate)]) -> String {
        let entries = meters
            .iter()
            .map(|(number, id, start, end)| {
                serde_json::json!({
                    "endDate": end.format("%Y-%m-%d").to_string(),
                    "meterNum": number,
                    "id": id,
                    "startDate": start.format("%Y-%m-%d").to_string(),
                })
            })
            .collect::<Vec<_>>();
        serde_json::Value::Array(entries).to_string()
    }
}

/// `getHourlyChartData` bodies for each tariff.
pub mod csv {
    const BANNER: &str = "# Your hourly usage (2000-01-01)";

    pub const TIERED_HEADER: &str = "Time,Usage off-peak (kWh),Usage mid-peak (kWh),Usage on-peak (kWh),Usage low-tier (kWh),Usage high-tier (kWh),Cost off-peak ($),Cost mid-peak ($),Cost on-peak ($),Cost low-tier ($),Cost high-tier ($)";

    const TIME_OF_USE_HEADER: &str = "Time,Usage TOU off-peak (kWh),Usage TOU mid-peak (kWh),Usage TOU on-peak (kWh),Usage tier 1 (kWh),Usage tier 2 (kWh),Cost TOU off-peak ($),Cost TOU mid-peak ($),Cost TOU on-peak ($),Cost tier 1 ($),Cost tier 2 ($)";

    const ULTRA_LOW_OVERNIGHT_HEADER: &str = "Time,Usage ULO overnight (kWh),Usage ULO off-peak (kWh),Usage ULO mid-peak (kWh),Usage ULO on-peak (kWh),Cost ULO overnight ($),Cost ULO off-peak ($),Cost ULO mid-peak ($),Cost ULO on-peak ($)";

    // (low-tier usage, low-tier cost) per hour
    const TIERED_VALUES: [(&str, &str); 24] = [
        ("0.21", "0.02"),
        ("0.22", "0.02"),
        ("0.33", "0.03"),
        ("0.30", "0.03"),
        ("0.22", "0.02"),
        ("0.24", "0.02"),
        ("0.29", "0.03"),
        ("0.27", "0.02"),
        ("0.26", "0.02"),
        ("0.21", "0.02"),
        ("0.11", "0.01"),
        ("0.18", "0.02"),
        ("0.11", "0.01"),
        ("0.22", "0.02"),
        ("0.23", "0.02"),
        ("0.27", "0.02"),
        ("0.17", "0.01"),
        ("0.68", "0.06"),
        ("0.70", "0.06"),
        ("0.76", "0.07"),
        ("0.29", "0.03"),
        ("0.32", "0.03"),
        ("0.24", "0.02"),
        ("0.31", "0.03"),
    ];

    /// The portal's double-spaced label for `hour`, e.g. "12  a.m.".
    fn label(hour: usize) -> String {
        let suffix = if hour < 12 { "a.m." } else { "p.m." };
        let twelve_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}  {}", twelve_hour, suffix)
    }

    fn body(header: &str, rows: impl Iterator<Item = String>) -> String {
        let mut lines = vec![BANNER.to_string(), header.to_string()];
        lines.extend(rows);
        lines.join("\n")
    }

    /// A tiered-tariff day as served by the portal.
    pub fn tiered_day() -> String {
        body(
            TIERED_HEADER,
            TIERED_VALUES
                .iter()
                .enumerate()
                .map(|(hour, (usage, cost))| {
                    format!("{},,,,{},0.00,,,,{},0.00", label(hour), usage, cost)
                }),
        )
    }

    /// A time-of-use day, using the "TOU" and "tier" header wording.
    pub fn time_of_use_day() -> String {
        body(
            TIME_OF_USE_HEADER,
            (0..24).map(|hour| {
                let (usage, cost) = match hour {
                    7..=10 | 17..=18 => ("", ""),
                    _ => ("0.50", "0.04"),
                };
                let (peak_usage, peak_cost) = match hour {
                    7..=10 | 17..=18 => ("0.90", "0.16"),
                    _ => ("", ""),
                };
                format!(
                    "{},{},,{},,,{},,{},,",
                    label(hour),
                    usage,
                    peak_usage,
                    cost,
                    peak_cost
                )
            }),
        )
    }

    /// An ultra-low-overnight day; overnight hours are 11 p.m. to 7 a.m.
    pub fn ultra_low_overnight_day() -> String {
        body(
            ULTRA_LOW_OVERNIGHT_HEADER,
            (0..24).map(|hour| {
                if hour < 7 || hour == 23 {
                    format!("{},1.20,,,,0.03,,,", label(hour))
                } else {
                    format!("{},,0.40,,,,0.04,,", label(hour))
                }
            }),
        )
    }
}
