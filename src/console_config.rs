//! Console configuration.
//!
//! Settings come from `.brand-console/console.toml`, then the environment,
//! then CLI flags, with later layers winning.
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:8000"
//! timeout_secs = 30
//!
//! [session]
//! session_cookie = "..."
//! csrf_token = "..."
//!
//! [client]
//! timezone = "Europe/Berlin"
//! utc_offset = "+02:00"
//! ```

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::{HttpGateway, SessionCredentials};
use crate::lifecycle::ClientTimezone;

pub const CONFIG_DIR: &str = ".brand-console";
pub const CONFIG_FILE: &str = "console.toml";

pub const ENV_BASE_URL: &str = "BRAND_CONSOLE_BASE_URL";
pub const ENV_SESSION: &str = "BRAND_CONSOLE_SESSION";
pub const ENV_CSRF: &str = "BRAND_CONSOLE_CSRF";
pub const ENV_TIMEZONE: &str = "BRAND_CONSOLE_TIMEZONE";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Admin session obtained by logging in through the web console.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSection {
    /// Value of the `admin_session` cookie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
    /// Value of the `admin_csrf` cookie, echoed as `x-csrf-token`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

/// How this machine reports its timezone when scheduling posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSection {
    /// Timezone label sent with schedules (defaults to the OS zone name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Fixed UTC offset such as "+05:30"; overrides the OS clock when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
}

/// The complete console.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub client: ClientSection,
}

impl ConsoleToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse console.toml")
    }

    /// Load `path`, or defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize console.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let url = self.server.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!(
                "server.base_url '{}' should start with http:// or https://",
                url
            ));
        }
        if self.server.timeout_secs == 0 {
            warnings.push("server.timeout_secs is 0; every request would time out".to_string());
        }
        if self.session.session_cookie.is_none() {
            warnings.push(
                "session.session_cookie is not set; the backend will answer 401".to_string(),
            );
        }
        if self.session.csrf_token.is_none() {
            warnings.push(
                "session.csrf_token is not set; changes will be rejected with 403".to_string(),
            );
        }
        if let Some(offset) = &self.client.utc_offset
            && parse_offset(offset).is_none()
        {
            warnings.push(format!(
                "client.utc_offset '{}' is not an offset like +05:30",
                offset
            ));
        }
        warnings
    }
}

/// Parse `+HH:MM`, `-HH:MM` or `+HHMM`.
fn parse_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    let (sign, rest) = match text.chars().next()? {
        '+' => (1, &text[1..]),
        '-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Default config path: `./.brand-console/console.toml` when present,
/// otherwise the per-user config directory.
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join("brand-console").join(CONFIG_FILE))
        .unwrap_or(local)
}

/// Effective settings after layering file, environment and CLI.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub path: PathBuf,
    pub toml: ConsoleToml,
    pub base_url: String,
    pub session: SessionCredentials,
    pub timezone_label: Option<String>,
}

impl ConsoleConfig {
    pub fn load(path: Option<PathBuf>, cli_base_url: Option<String>) -> Result<Self> {
        let path = path.unwrap_or_else(default_config_path);
        let toml = ConsoleToml::load_or_default(&path)?;
        Ok(Self::from_layers(path, toml, cli_base_url))
    }

    /// Apply environment and CLI overrides on top of `toml`.
    pub fn from_layers(path: PathBuf, toml: ConsoleToml, cli_base_url: Option<String>) -> Self {
        let base_url = cli_base_url
            .or_else(|| env_value(ENV_BASE_URL))
            .unwrap_or_else(|| toml.server.base_url.clone());
        let session = SessionCredentials {
            session_cookie: env_value(ENV_SESSION).or_else(|| toml.session.session_cookie.clone()),
            csrf_token: env_value(ENV_CSRF).or_else(|| toml.session.csrf_token.clone()),
        };
        let timezone_label = env_value(ENV_TIMEZONE).or_else(|| toml.client.timezone.clone());
        Self {
            path,
            toml,
            base_url,
            session,
            timezone_label,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.server.timeout_secs)
    }

    /// Timezone used to convert schedule input.
    ///
    /// An unparsable `utc_offset` falls back to the system zone with a
    /// warning.
    pub fn client_timezone(&self) -> ClientTimezone {
        let offset = match self.toml.client.utc_offset.as_deref() {
            Some(raw) => {
                let parsed = parse_offset(raw);
                if parsed.is_none() {
                    tracing::warn!(
                        utc_offset = raw,
                        path = %self.path.display(),
                        "client.utc_offset is not an offset like +05:30; using the system timezone"
                    );
                }
                parsed
            }
            None => None,
        };
        match offset {
            Some(offset) => ClientTimezone::Fixed {
                label: self
                    .timezone_label
                    .clone()
                    .unwrap_or_else(|| offset.to_string()),
                offset,
            },
            None => ClientTimezone::System {
                label_override: self.timezone_label.clone(),
            },
        }
    }

    pub fn gateway(&self) -> Result<HttpGateway> {
        HttpGateway::new(&self.base_url, self.session.clone(), self.timeout())
            .context("Failed to set up the backend client")
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
