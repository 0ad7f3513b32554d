//! Configuration builders for tests.

use crate::config::{InfluxConfig, TorontoHydroConfig};

/// Builder for portal configurations pointing at a local test double.
#[derive(Debug)]
pub struct TestTorontoHydroConfigBuilder {
    username: String,
    password: String,
    url: String,
    meter: Option<String>,
    mock: bool,
    mock_url: String,
}

impl TestTorontoHydroConfigBuilder {
    pub fn new() -> Self {
        Self {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
            url: "https://www.torontohydro.com".to_string(),
            meter: None,
            mock: false,
            mock_url: "http://localhost:9999".to_string(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_meter(mut self, meter: impl Into<String>) -> Self {
        self.meter = Some(meter.into());
        self
    }

    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    pub fn with_mock_url(mut self, mock_url: impl Into<String>) -> Self {
        self.mock_url = mock_url.into();
        self
    }

    pub fn build(self) -> TorontoHydroConfig {
        TorontoHydroConfig {
            username: self.username,
            password: self.password,
            url: self.url,
            meter: self.meter,
            mock: self.mock,
            mock_url: self.mock_url,
        }
    }
}

/// Builder for creating test InfluxDB configurations.
#[derive(Debug)]
pub struct TestInfluxConfigBuilder {
    url: String,
    org: String,
    token: String,
    bucket: String,
}

impl TestInfluxConfigBuilder {
    /// Creates a new test config builder with default values.
    pub fn new() -> Self {
        Self {
            url: "http://localhost:8086".to_string(),
            org: "test-org".to_string(),
            token: "test-token".to_string(),
            bucket: "test-bucket".to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn build(self) -> InfluxConfig {
        InfluxConfig {
            url: self.url,
            org: self.org,
            token: self.token,
            bucket: self.bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toronto_hydro_config_builder() {
        let config = TestTorontoHydroConfigBuilder::new()
            .with_username("someone@example.com")
            .with_password("secret")
            .with_url("https://portal.example.com")
            .with_meter("5678")
            .build();

        assert_eq!(config.username, "someone@example.com");
        assert_eq!(config.password, "secret");
        assert_eq!(config.meter.as_deref(), Some("5678"));
        assert_eq!(config.base_url(), "https://portal.example.com");
    }

    #[test]
    fn test_toronto_hydro_config_builder_mock() {
        let config = TestTorontoHydroConfigBuilder::new()
            .with_mock(true)
            .with_mock_url("http://127.0.0.1:1234")
            .build();

        assert_eq!(config.base_url(), "http://127.0.0.1:1234");
    }

    #[test]
    fn test_influx_config_builder() {
        let config = TestInfluxConfigBuilder::new()
            .with_url("http://influx.local")
            .with_bucket("my-bucket")
            .build();

        assert_eq!(config.url, "http://influx.local");
        assert_eq!(config.org, "test-org");
        assert_eq!(config.token, "test-token");
        assert_eq!(config.bucket, "my-bucket");
    }
}
