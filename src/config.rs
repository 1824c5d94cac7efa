//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// SMTP settings for confirmation emails and donation receipts.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP relay host
    pub host: String,
    /// SMTP port (STARTTLS)
    pub port: u16,
    /// SMTP username
    pub user: String,
    /// SMTP password, empty disables sending
    pub password: String,
    /// From address on outgoing mail
    pub sender: String,
    /// Upper bound on a single send attempt, in seconds
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// Returns true when enough settings are present to attempt delivery.
    pub fn is_configured(&self) -> bool {
        !self.password.is_empty()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            user: "noreply@livepay.org".to_string(),
            password: String::new(),
            sender: "support@livepay.org".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Directory holding `signatures.json` and `donations.json`
    pub data_dir: PathBuf,
    /// Country whose signatures are broken down by state in `/api/stats`
    pub stats_country: String,
    /// Outgoing mail settings
    pub email: EmailConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `DATA_DIR` - Record directory (default: `data`)
    /// - `STATS_COUNTRY` - Country broken down by state (default: `United States`)
    /// - `EMAIL_HOST` / `EMAIL_PORT` / `EMAIL_USER` / `EMAIL_PASSWORD` / `SENDER_EMAIL`
    /// - `EMAIL_TIMEOUT_SECS` - Bound on a send attempt (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let email = defaults.email;

        Self {
            server_port: parsed("PORT").unwrap_or(defaults.server_port),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            stats_country: env::var("STATS_COUNTRY").unwrap_or(defaults.stats_country),
            email: EmailConfig {
                host: env::var("EMAIL_HOST").unwrap_or(email.host),
                port: parsed("EMAIL_PORT").unwrap_or(email.port),
                user: env::var("EMAIL_USER").unwrap_or(email.user),
                password: env::var("EMAIL_PASSWORD").unwrap_or(email.password),
                sender: env::var("SENDER_EMAIL").unwrap_or(email.sender),
                timeout_secs: parsed("EMAIL_TIMEOUT_SECS").unwrap_or(email.timeout_secs),
            },
        }
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            data_dir: PathBuf::from("data"),
            stats_country: "United States".to_string(),
            email: EmailConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.stats_country, "United States");
        assert_eq!(config.email.port, 587);
        assert!(!config.email.is_configured());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("PORT");
        env::remove_var("DATA_DIR");
        env::remove_var("EMAIL_PASSWORD");
        env::remove_var("EMAIL_TIMEOUT_SECS");

        let config = Config::from_env();
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.email.timeout_secs, 10);
        assert!(!config.email.is_configured());
    }

    #[test]
    fn test_email_configured_with_password() {
        let email = EmailConfig {
            password: "hunter2".to_string(),
            ..EmailConfig::default()
        };
        assert!(email.is_configured());
    }
}
