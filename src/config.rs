//! Server configuration read from the process environment.

use std::env;

use actix_web::cookie::Key;
use thiserror::Error;

/// Minimum number of bytes the cookie signing key requires.
const COOKIE_KEY_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{name}` must be a valid {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Credentials used to create the first administrator on an empty database.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub mobile_no: String,
    pub password: String,
}

/// Runtime settings shared with the request handlers through `web::Data`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Secret used to sign session tokens.
    pub secret: Vec<u8>,
    pub token_ttl_hours: i64,
    pub domain: String,
    pub cookie_secure: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Read the configuration from environment variables, applying defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "app.db".to_string());
        let address = env::var("ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("PORT", "port number", 8080u16)?;
        let token_ttl_hours = parse_var("TOKEN_TTL_HOURS", "number of hours", 12i64)?;
        let domain = env::var("DOMAIN").unwrap_or_else(|_| "localhost".to_string());
        let cookie_secure = parse_var("COOKIE_SECURE", "boolean", false)?;

        let secret = match env::var("SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => secret.into_bytes(),
            _ => {
                log::warn!("SECRET_KEY is not set; sessions will not survive a restart");
                Key::generate().master().to_vec()
            }
        };

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_MOBILE"),
            env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(mobile_no), Ok(password)) if !mobile_no.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin {
                    mobile_no,
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            address,
            port,
            secret,
            token_ttl_hours,
            domain,
            cookie_secure,
            bootstrap_admin,
        })
    }

    /// Key used to sign the session cookie.
    ///
    /// Secrets shorter than 64 bytes cannot sign cookies directly, so a fresh
    /// key is generated instead and cookie sessions reset on restart.
    pub fn cookie_key(&self) -> Key {
        if self.secret.len() >= COOKIE_KEY_LEN {
            Key::from(self.secret.as_slice())
        } else {
            log::warn!(
                "SECRET_KEY is shorter than {COOKIE_KEY_LEN} bytes; using a generated cookie key"
            );
            Key::generate()
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}
