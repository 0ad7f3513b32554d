use crate::config::TorontoHydroConfig;
use crate::error::PortalError;
use reqwest::Url;

/// Element id of the login form whose `action` is the credential target.
pub const LOGIN_FORM_ID: &str = "_th_module_authentication_ThModuleAuthenticationPortlet_authentication";
pub const EMAIL_FIELD: &str = "_th_module_authentication_ThModuleAuthenticationPortlet_email";
pub const PASSWORD_FIELD: &str = "_th_module_authentication_ThModuleAuthenticationPortlet_password";

const USAGE_PATH: &str = "/my-account/my-usage?p_p_id=thmoduletou&p_p_lifecycle=2&p_p_state=normal&p_p_mode=view&p_p_cacheability=cacheLevelPage&p_p_resource_id=";
const MOCK_USAGE_PATH: &str = "/my-usage?p_p_resource_id=";

/// Portal URLs for one deployment (production or the local test double).
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    logout_path: &'static str,
    usage_path: &'static str,
    // The mock's login page still embeds the production form action.
    rebase_login_action: bool,
}

impl Endpoints {
    pub fn production(base: &str) -> Result<Self, PortalError> {
        Ok(Self {
            base: parse_base(base)?,
            logout_path: "/c/portal/logout",
            usage_path: USAGE_PATH,
            rebase_login_action: false,
        })
    }

    pub fn mock(base: &str) -> Result<Self, PortalError> {
        Ok(Self {
            base: parse_base(base)?,
            logout_path: "/logout",
            usage_path: MOCK_USAGE_PATH,
            rebase_login_action: true,
        })
    }

    pub fn from_config(config: &TorontoHydroConfig) -> Result<Self, PortalError> {
        if config.mock {
            Self::mock(&config.mock_url)
        } else {
            Self::production(&config.url)
        }
    }

    pub fn login_page(&self) -> Result<Url, PortalError> {
        self.join("/log-in")
    }

    pub fn logout(&self) -> Result<Url, PortalError> {
        self.join(self.logout_path)
    }

    pub fn meter_list(&self) -> Result<Url, PortalError> {
        self.join(&format!("{}fetchMeterList", self.usage_path))
    }

    pub fn hourly_data(&self) -> Result<Url, PortalError> {
        self.join(&format!("{}getHourlyChartData", self.usage_path))
    }

    /// Resolves the login form's `action` attribute into the URL credentials
    /// are posted to.
    pub fn login_target(&self, action: &str) -> Result<Url, PortalError> {
        let resolved = self.join(action)?;
        if !self.rebase_login_action {
            return Ok(resolved);
        }

        let mut rebased = self.base.clone();
        rebased.set_path(resolved.path());
        rebased.set_query(resolved.query());
        Ok(rebased)
    }

    fn join(&self, path: &str) -> Result<Url, PortalError> {
        self.base
            .join(path)
            .map_err(|e| PortalError::invalid_url(path, e))
    }
}

fn parse_base(base: &str) -> Result<Url, PortalError> {
    Url::parse(base).map_err(|e| PortalError::invalid_url(base, e))
}
