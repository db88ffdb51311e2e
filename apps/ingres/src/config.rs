//! # Configuration Module
//!
//! Runtime settings for the INGRES server and CLI.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults (port 4000, demo accounts)
//! 2. TOML file given by `--config` or `INGRES_CONFIG`
//! 3. Environment variables
//!
//! ## Environment Variables
//!
//! - `HOST`, `PORT`: bind address
//! - `NODE_ENV` / `INGRES_ENV`: environment name reported by `/health`
//! - `SESSION_EXPIRY_HOURS`: session lifetime (default 24)
//! - `INGRES_DATA_DIR`: directory holding the data files
//! - `INGRES_RATE_LIMIT`: requests per minute (default 60, 0 to disable)
//! - `INGRES_CORS_ORIGINS`: comma-separated origins, or `*`
//! - `ADMIN_*`, `STAFF_*`, `USER_*` with `NAME`, `EMAIL`, `PASSWORD`

use ingres_core::IngresError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_SESSION_EXPIRY_HOURS: u64 = 24;
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 60;

// =============================================================================
// ROLES AND ACCOUNTS
// =============================================================================

/// Access level of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Common,
    Guest,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Common => "common",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A login account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub tagline: String,
}

// Passwords stay out of logs.
impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

fn account(
    id: &str,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
    tagline: &str,
) -> UserAccount {
    UserAccount {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
        tagline: tagline.to_string(),
    }
}

/// The three demo accounts.
#[must_use]
pub fn default_users() -> Vec<UserAccount> {
    vec![
        account(
            "admin-001",
            "INGRES Administrator",
            "admin@ingres.gov",
            "Admin@123",
            Role::Admin,
            "Full system access",
        ),
        account(
            "staff-014",
            "Hydro Staff Desk",
            "staff@ingres.gov",
            "Staff@123",
            Role::Staff,
            "Monitoring & limited edits",
        ),
        account(
            "user-101",
            "Field Observer",
            "observer@ingres.gov",
            "User@123",
            Role::Common,
            "Read-only conversational access",
        ),
    ]
}

// =============================================================================
// CONFIG
// =============================================================================

/// Server and CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub session_expiry_hours: u64,
    pub data_dir: PathBuf,
    /// Requests per minute across all clients; 0 disables limiting.
    pub rate_limit_per_minute: u32,
    /// `*`, a comma-separated origin list, or `None` for localhost only.
    pub cors_origins: Option<String>,
    pub users: Vec<UserAccount>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            session_expiry_hours: DEFAULT_SESSION_EXPIRY_HOURS,
            data_dir: PathBuf::from("data"),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            cors_origins: None,
            users: default_users(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, IngresError> {
        toml::from_str(text).map_err(|e| IngresError::InvalidInput(format!("Invalid config: {e}")))
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, IngresError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            IngresError::IoError(format!("Cannot read config {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Defaults, then the TOML file (explicit path or `INGRES_CONFIG`), then
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, IngresError> {
        let from_env = std::env::var("INGRES_CONFIG").ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(port) = try_parse::<u16>(&get, "PORT") {
            self.port = port;
        }
        if let Some(env) = get("INGRES_ENV").or_else(|| get("NODE_ENV")) {
            self.environment = env;
        }
        match try_parse::<u64>(&get, "SESSION_EXPIRY_HOURS") {
            Some(0) => tracing::warn!(
                "SESSION_EXPIRY_HOURS=0 ignored, keeping {}",
                self.session_expiry_hours
            ),
            Some(hours) => self.session_expiry_hours = hours,
            None => {}
        }
        if let Some(dir) = get("INGRES_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(limit) = try_parse::<u32>(&get, "INGRES_RATE_LIMIT") {
            self.rate_limit_per_minute = limit;
        }
        if let Some(origins) = get("INGRES_CORS_ORIGINS") {
            self.cors_origins = Some(origins);
        }

        let accounts = [
            ("ADMIN", Role::Admin),
            ("STAFF", Role::Staff),
            ("USER", Role::Common),
        ];
        for (prefix, role) in accounts {
            let Some(user) = self.users.iter_mut().find(|u| u.role == role) else {
                continue;
            };
            if let Some(name) = get(&format!("{prefix}_NAME")) {
                user.name = name;
            }
            if let Some(email) = get(&format!("{prefix}_EMAIL")) {
                user.email = email;
            }
            if let Some(password) = get(&format!("{prefix}_PASSWORD")) {
                user.password = password;
            }
        }
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Session lifetime in milliseconds.
    #[must_use]
    pub fn session_expiry_ms(&self) -> i64 {
        let hours = i64::try_from(self.session_expiry_hours).unwrap_or(i64::MAX / 3_600_000);
        hours.saturating_mul(3_600_000)
    }
}

/// Parse `key` through `get`; unparsable values are logged and ignored.
fn try_parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let raw = get(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => {
            tracing::info!("{key} set from environment");
            Some(value)
        }
        Err(e) => {
            tracing::warn!("Ignoring {key}={raw}: {e}");
            None
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
