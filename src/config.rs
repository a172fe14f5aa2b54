//! Connection settings for a Db2 REST endpoint and the database behind it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Db2RestError, DbParms, Result};

/// URL scheme of the REST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// Everything needed to reach the REST service and authenticate against the database.
///
/// Deserialisable from any serde format; omitted fields take the defaults below.
///
/// Example:
/// ```rust
/// use db2_rest_client::{ConnectionSettings, Scheme};
///
/// let settings = ConnectionSettings {
///     scheme: Scheme::Http,
///     host: "db2.internal".into(),
///     database: "SAMPLE".into(),
///     username: "db2inst1".into(),
///     password: "secret".into(),
///     ..Default::default()
/// };
/// assert_eq!(settings.base_url(), "http://db2.internal:50050");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub scheme: Scheme,
    /// Host of the REST service. The database is assumed to live on the same host.
    pub host: String,
    pub rest_port: u16,
    pub database: String,
    pub db_port: u16,
    /// Whether the REST service talks to the database over SSL.
    pub db_ssl: bool,
    pub username: String,
    pub password: String,
    /// Requested token lifetime, in the service's notation ("30m", "1h", ...).
    pub expiry_time: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            scheme: Scheme::Https,
            host: String::new(),
            rest_port: 50050,
            database: String::new(),
            db_port: 50000,
            db_ssl: false,
            username: String::new(),
            password: String::new(),
            expiry_time: "1h".to_string(),
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("rest_port", &self.rest_port)
            .field("database", &self.database)
            .field("db_port", &self.db_port)
            .field("db_ssl", &self.db_ssl)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("expiry_time", &self.expiry_time)
            .finish()
    }
}

impl ConnectionSettings {
    /// `scheme://host:port`, with no trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.rest_port)
    }

    /// Load settings from `DB2REST_*` / `DB2_*` environment variables.
    ///
    /// | Variable | Field | Required |
    /// |----------|-------|----------|
    /// | `DB2REST_HOST` | `host` | yes |
    /// | `DB2REST_PORT` | `rest_port` | no |
    /// | `DB2REST_HTTPS` | `scheme` (`true` → https) | no |
    /// | `DB2REST_EXPIRY` | `expiry_time` | no |
    /// | `DB2_DATABASE` | `database` | yes |
    /// | `DB2_PORT` | `db_port` | no |
    /// | `DB2_SSL` | `db_ssl` | no |
    /// | `DB2_USERNAME` | `username` | yes |
    /// | `DB2_PASSWORD` | `password` | yes |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Db2RestError::Configuration(format!("{} is not set", key)))
        };

        let mut settings = Self {
            host: required("DB2REST_HOST")?,
            database: required("DB2_DATABASE")?,
            username: required("DB2_USERNAME")?,
            password: required("DB2_PASSWORD")?,
            ..Default::default()
        };

        if let Some(port) = parse_var(&lookup, "DB2REST_PORT")? {
            settings.rest_port = port;
        }
        if let Some(https) = parse_var::<bool, _>(&lookup, "DB2REST_HTTPS")? {
            settings.scheme = if https { Scheme::Https } else { Scheme::Http };
        }
        if let Some(expiry) = lookup("DB2REST_EXPIRY").filter(|value| !value.is_empty()) {
            settings.expiry_time = expiry;
        }
        if let Some(port) = parse_var(&lookup, "DB2_PORT")? {
            settings.db_port = port;
        }
        if let Some(ssl) = parse_var(&lookup, "DB2_SSL")? {
            settings.db_ssl = ssl;
        }

        Ok(settings)
    }

    pub(crate) fn db_parms(&self) -> DbParms {
        DbParms {
            db_host: self.host.clone(),
            db_name: self.database.clone(),
            db_port: self.db_port,
            is_ssl_connection: self.db_ssl,
            password: self.password.clone(),
            username: self.username.clone(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Db2RestError::Configuration(format!("{}={:?}: {}", key, raw, e))),
        _ => Ok(None),
    }
}
