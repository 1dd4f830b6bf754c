//! Runtime settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Which handler style serves the canonical `/users/` and `/snippets/` paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiStyle {
    Function,
    ApiView,
    Mixin,
    Generic,
    ViewSet,
    #[default]
    Router,
}

impl ApiStyle {
    pub const ALL: [ApiStyle; 6] = [
        ApiStyle::Function,
        ApiStyle::ApiView,
        ApiStyle::Mixin,
        ApiStyle::Generic,
        ApiStyle::ViewSet,
        ApiStyle::Router,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiStyle::Function => "function",
            ApiStyle::ApiView => "api_view",
            ApiStyle::Mixin => "mixin",
            ApiStyle::Generic => "generic",
            ApiStyle::ViewSet => "viewset",
            ApiStyle::Router => "router",
        }
    }
}

impl fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ApiStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "API_STYLE",
                message: format!("unknown style {:?}", s),
            })
    }
}

/// An account provisioned at startup when missing.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parse `name:password,name2:password2`. Blank entries are skipped.
pub fn parse_seed_accounts(raw: &str) -> Result<Vec<SeedAccount>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (username, password) = entry
                .split_once(':')
                .ok_or_else(|| ConfigError::SeedAccount(format!("{:?} is not name:password", entry)))?;
            let username = username.trim();
            if username.is_empty() || password.is_empty() {
                return Err(ConfigError::SeedAccount(format!("{:?} has an empty name or password", entry)));
            }
            Ok(SeedAccount {
                username: username.to_string(),
                password: password.to_string(),
            })
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub api_style: ApiStyle,
    pub seed_accounts: Vec<SeedAccount>,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            api_style: ApiStyle::default(),
            seed_accounts: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset and blank values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(Settings {
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                Some(DEFAULT_MAX_CONNECTIONS),
            )?,
            api_style: match get("API_STYLE") {
                Some(raw) => raw.parse()?,
                None => ApiStyle::default(),
            },
            seed_accounts: match get("SEED_ACCOUNTS") {
                Some(raw) => parse_seed_accounts(&raw)?,
                None => Vec::new(),
            },
            max_body_bytes: parse_or("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), Some(DEFAULT_MAX_BODY_BYTES))?,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: format!("{:?}: {}", raw, e),
        }),
        None => default.ok_or_else(|| ConfigError::InvalidValue {
            key,
            message: "no default".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(s.database_url.is_none());
        assert_eq!(s.database_max_connections, 5);
        assert_eq!(s.api_style, ApiStyle::Router);
        assert!(s.seed_accounts.is_empty());
        assert_eq!(s.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn reads_every_key() {
        let s = settings(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DATABASE_URL", "postgres://localhost/snippets"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("API_STYLE", "Mixin"),
            ("SEED_ACCOUNTS", "alice:secret, bob:hunter2"),
            ("MAX_BODY_BYTES", "2048"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr.port(), 8080);
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/snippets"));
        assert_eq!(s.database_max_connections, 12);
        assert_eq!(s.api_style, ApiStyle::Mixin);
        assert_eq!(s.seed_accounts.len(), 2);
        assert_eq!(s.seed_accounts[1].username, "bob");
        assert_eq!(s.seed_accounts[1].password, "hunter2");
        assert_eq!(s.max_body_bytes, 2048);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        assert!(settings(&[("DATABASE_URL", "  ")]).unwrap().database_url.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            settings(&[("API_STYLE", "soap")]),
            Err(ConfigError::InvalidValue { key: "API_STYLE", .. })
        ));
        assert!(matches!(
            settings(&[("DATABASE_MAX_CONNECTIONS", "many")]),
            Err(ConfigError::InvalidValue { key: "DATABASE_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(
            settings(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::InvalidValue { key: "BIND_ADDR", .. })
        ));
        assert!(matches!(settings(&[("SEED_ACCOUNTS", "alice")]), Err(ConfigError::SeedAccount(_))));
    }

    #[test]
    fn seed_accounts_skip_blanks_and_keep_colons_in_passwords() {
        let accounts = parse_seed_accounts("alice:a:b,, ").unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].password, "a:b");
        assert!(parse_seed_accounts(":pw").is_err());
        assert!(!format!("{:?}", accounts[0]).contains("a:b"));
    }

    #[test]
    fn style_names_round_trip() {
        for style in ApiStyle::ALL {
            assert_eq!(style.as_str().parse::<ApiStyle>().unwrap(), style);
        }
    }
}
