//! Configuration management
//!
//! App settings live in a TOML file (`config.toml` by default): scheduling
//! target, session cookie, proxy string, user profile, and the booking
//! request rows. [`AppConfig::run_config`] resolves the raw settings into the
//! validated, read-only [`RunConfig`] the core consumes.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default booking theme submitted with every request
pub const DEFAULT_THEME: &str = "练琴";

/// One booking request row, as entered by the user.
///
/// Times are stored as strings and validated at run start; see
/// [`crate::booking::build_chunks`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Room display name; must match the facility table exactly
    pub place: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Start of day time, `HH:MM`
    pub start: String,
    /// End of day time, `HH:MM`
    pub end: String,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Wall-clock instant to fire the batch, `YYYY-MM-DD HH:MM:SS`
    pub target_time: String,

    /// Skip the timer and fire immediately
    #[serde(default)]
    pub start_immediately: bool,

    /// Raw proxy string: JSON object or bare `host:port`; empty = direct
    #[serde(default)]
    pub proxies: String,

    /// Pre-authenticated session cookie, supplied by an external login flow
    #[serde(default)]
    pub cookie: String,

    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_phone: String,

    /// Booking theme
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Booking request rows
    #[serde(default)]
    pub requests: Vec<BookingRequest>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&raw)?)
    }

    /// Validate and resolve into the read-only run configuration.
    ///
    /// The cookie and the id/name/email profile fields must be non-empty;
    /// the proxy string must parse. Request rows are validated separately
    /// when chunks are built.
    pub fn run_config(&self) -> Result<RunConfig> {
        for (field, value) in [
            ("cookie", &self.cookie),
            ("user_id", &self.user_id),
            ("user_name", &self.user_name),
            ("user_email", &self.user_email),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{field} must not be empty")));
            }
        }

        Ok(RunConfig {
            cookie: self.cookie.clone(),
            proxy: ProxyConfig::parse(&self.proxies)?,
            profile: UserProfile {
                id: self.user_id.clone(),
                name: self.user_name.clone(),
                email: self.user_email.clone(),
                phone: self.user_phone.clone(),
            },
            theme: if self.theme.trim().is_empty() {
                DEFAULT_THEME.to_string()
            } else {
                self.theme.clone()
            },
        })
    }
}

/// User identity submitted with every booking
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Proxy endpoints per scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Parse a raw proxy string.
    ///
    /// Accepts a JSON object mapping scheme to `host:port`, or a bare
    /// `host:port` applied to both schemes. Empty/whitespace yields `None`
    /// (direct connection).
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        if raw.starts_with('{') {
            let map: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| Error::config(format!("bad proxy string {raw:?}: {e}")))?;
            if map.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Self {
                http: map.get("http").cloned(),
                https: map.get("https").cloned(),
            }));
        }

        // Bare "host:port" shorthand, mapped to both schemes
        if raw.contains(':') && !raw.contains(char::is_whitespace) {
            return Ok(Some(Self {
                http: Some(raw.to_string()),
                https: Some(raw.to_string()),
            }));
        }

        Err(Error::config(format!("unrecognized proxy string {raw:?}")))
    }
}

/// Resolved, read-only configuration for one run.
///
/// Shared across all concurrent retry loops; never mutated mid-run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub cookie: String,
    pub proxy: Option<ProxyConfig>,
    pub profile: UserProfile,
    pub theme: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_config() -> AppConfig {
        AppConfig {
            target_time: "2025-09-16 21:00:00".to_string(),
            start_immediately: false,
            proxies: String::new(),
            cookie: "JSESSIONID=abc".to_string(),
            user_id: "124060073".to_string(),
            user_name: "张三".to_string(),
            user_email: "124060073@link.cuhk.edu.cn".to_string(),
            user_phone: "13800000000".to_string(),
            theme: DEFAULT_THEME.to_string(),
            requests: vec![],
        }
    }

    #[test]
    fn test_parse_proxies_empty_is_direct() {
        assert_eq!(ProxyConfig::parse("").unwrap(), None);
        assert_eq!(ProxyConfig::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_proxies_json() {
        let p = ProxyConfig::parse(r#"{"http": "127.0.0.1:9000"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(p.http.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(p.https, None);
    }

    #[test]
    fn test_parse_proxies_empty_json_is_direct() {
        assert_eq!(ProxyConfig::parse("{}").unwrap(), None);
    }

    #[test]
    fn test_parse_proxies_hostport_shorthand() {
        let p = ProxyConfig::parse("10.101.28.225:9000").unwrap().unwrap();
        assert_eq!(p.http.as_deref(), Some("10.101.28.225:9000"));
        assert_eq!(p.https.as_deref(), Some("10.101.28.225:9000"));
    }

    #[test]
    fn test_parse_proxies_garbage_rejected() {
        assert!(ProxyConfig::parse("not a proxy").is_err());
        assert!(ProxyConfig::parse(r#"{"http": 9000}"#).is_err());
    }

    #[test]
    fn test_run_config_requires_profile_fields() {
        let mut cfg = base_config();
        cfg.user_name = String::new();
        let err = cfg.run_config().unwrap_err();
        assert!(err.to_string().contains("user_name"));

        let mut cfg = base_config();
        cfg.cookie = "  ".to_string();
        assert!(cfg.run_config().is_err());
    }

    #[test]
    fn test_run_config_defaults_theme() {
        let mut cfg = base_config();
        cfg.theme = String::new();
        let run = cfg.run_config().unwrap();
        assert_eq!(run.theme, DEFAULT_THEME);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
target_time = "2025-09-16 21:00:00"
cookie = "JSESSIONID=abc"
user_id = "124060073"
user_name = "张三"
user_email = "124060073@link.cuhk.edu.cn"
user_phone = "13800000000"

[[requests]]
place = "MPC327 管弦乐学部琴房（UP）"
date = "2025-09-17"
start = "20:00"
end = "22:00"
"#
        )
        .unwrap();

        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.target_time, "2025-09-16 21:00:00");
        assert!(!cfg.start_immediately);
        assert_eq!(cfg.theme, DEFAULT_THEME);
        assert_eq!(cfg.requests.len(), 1);
        assert_eq!(cfg.requests[0].place, "MPC327 管弦乐学部琴房（UP）");
        assert!(cfg.run_config().is_ok());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(AppConfig::load("/definitely/not/here.toml").is_err());
    }
}
