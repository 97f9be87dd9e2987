use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// FinMind API token (anonymous access when absent).
    pub finmind_api_token: Option<String>,
    /// Directory chart files are written to and served from.
    pub static_dir: PathBuf,
    /// Major-shareholder table, also the code/name directory source.
    pub shareholder_csv: PathBuf,
    /// Calendar days of price history fetched per analysis.
    pub analysis_days: i64,
    /// Minimum 10-day average volume for the concentration screen.
    pub min_volume: f64,
    /// Timeout for every outbound request.
    pub http_timeout: Duration,
    /// Leading points dropped from technical charts.
    pub chart_warmup: usize,
    /// Logged-in session cookie for the saved Goodinfo screen.
    pub goodinfo_cookie: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            finmind_api_token: None,
            static_dir: PathBuf::from("static"),
            shareholder_csv: PathBuf::from("major_shareholders.csv"),
            analysis_days: 300,
            min_volume: 2000.0,
            http_timeout: Duration::from_secs(20),
            chart_warmup: 101,
            goodinfo_cookie: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            finmind_api_token: env::var("FINMIND_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            shareholder_csv: env::var("SHAREHOLDER_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.shareholder_csv),
            analysis_days: env::var("ANALYSIS_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.analysis_days),
            min_volume: env::var("MIN_VOLUME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_volume),
            http_timeout: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            chart_warmup: env::var("CHART_WARMUP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.chart_warmup),
            goodinfo_cookie: env::var("GOODINFO_COOKIE")
                .ok()
                .filter(|c| !c.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.min_volume, 2000.0);
        assert_eq!(config.http_timeout, Duration::from_secs(20));
        assert_eq!(config.chart_warmup, 101);
        assert!(config.finmind_api_token.is_none());
    }
}
