use std::any::Any;
use std::fmt::Display;

use backoffice_states::State;
use log::info;
use serde::Deserialize;
use ustr::Ustr;

/// Deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Env {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "prod")]
    Prod,
}

impl Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Prod => write!(f, "prod"),
        }
    }
}

/// What the password step hands to the authentication provider as the secret
/// when reauthenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ReauthMode {
    /// The user types their current password.
    #[default]
    #[serde(rename = "current-password")]
    CurrentPassword,
    /// The session uid doubles as the password. Only valid for accounts that were
    /// provisioned with their uid as the initial password.
    #[serde(rename = "session-id")]
    SessionIdentifier,
}

/// Where the password-reset email sends the user afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRedirect {
    pub url: String,
    pub handle_code_in_app: bool,
}

const PROD_BASE_URL: &str = "https://www.alt-prime.com";
const LOCAL_BASE_URL: &str = "http://localhost:3000";
const IDENTITY_API_URL: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Base URL of the Identity Toolkit REST API.
    pub identity_api_url: String,
    pub identity_api_key: String,
    pub reset_redirect_url: String,
    pub reauth_mode: ReauthMode,
}

impl BusinessConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
            ..Self::default()
        }
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(format!("{}/api", self.api_base_url.trim_end_matches('/')).as_str())
        }
    }

    pub fn reset_redirect(&self) -> ResetRedirect {
        ResetRedirect {
            url: self.reset_redirect_url.clone(),
            handle_code_in_app: false,
        }
    }

    /// Read configuration from environment variables.
    pub fn init() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment variables");
        let raw: RawConfig = serde_env::from_iter(std::env::vars())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            env,
            api_base_url,
            identity_api_url,
            identity_api_key,
            reset_redirect_url,
            reauth_mode,
        } = raw;

        let api_base_url = api_base_url.unwrap_or_else(|| {
            let url = match env {
                Env::Local => LOCAL_BASE_URL,
                Env::Prod => PROD_BASE_URL,
            };
            info!("API_BASE_URL not set, defaulting to {url} for {env} environment");
            url.to_owned()
        });

        let identity_api_key = match identity_api_key {
            Some(key) if !key.trim().is_empty() => key,
            _ if env == Env::Local => String::new(),
            _ => return Err(ConfigError::Missing("IDENTITY_API_KEY", env)),
        };

        let reset_redirect_url =
            reset_redirect_url.unwrap_or_else(|| format!("{api_base_url}/signin"));

        Ok(Self {
            api_base_url,
            identity_api_url: identity_api_url.unwrap_or_else(|| IDENTITY_API_URL.to_owned()),
            identity_api_key,
            reset_redirect_url,
            reauth_mode: reauth_mode.unwrap_or_default(),
        })
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        let api_base_url = if cfg!(feature = "env_local") {
            LOCAL_BASE_URL
        } else {
            PROD_BASE_URL
        };
        Self {
            api_base_url: api_base_url.to_owned(),
            identity_api_url: IDENTITY_API_URL.to_owned(),
            identity_api_key: String::new(),
            reset_redirect_url: format!("{PROD_BASE_URL}/signin"),
            reauth_mode: ReauthMode::default(),
        }
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

// Intermediate struct: everything optional, defaults applied in `from_raw`.
#[derive(Deserialize)]
struct RawConfig {
    env: Env,
    api_base_url: Option<String>,
    identity_api_url: Option<String>,
    identity_api_key: Option<String>,
    reset_redirect_url: Option<String>,
    reauth_mode: Option<ReauthMode>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Parse(String),
    #[error("{0} must be set for {1} environment")]
    Missing(&'static str, Env),
}
