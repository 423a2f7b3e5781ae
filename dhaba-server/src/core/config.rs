//! Server configuration from environment variables

use chrono_tz::Tz;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the database file and logs
    pub work_dir: String,
    pub http_port: u16,
    /// Timezone used for business-day boundaries and takeaway numbering
    pub business_timezone: Tz,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string());
        let http_port = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8081);
        let business_timezone = std::env::var("BUSINESS_TIMEZONE")
            .ok()
            .and_then(|v| match v.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    warn!("invalid BUSINESS_TIMEZONE '{}', falling back to UTC", v);
                    None
                }
            })
            .unwrap_or(chrono_tz::UTC);
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Self {
            work_dir,
            http_port,
            business_timezone,
            environment,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        // Uses defaults when env vars are unset or unparseable
        let config = Config::from_env();
        assert!(config.http_port > 0);
        assert!(!config.work_dir.is_empty());
    }
}
