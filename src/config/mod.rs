use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub admin: AdminConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Fixed site constants: the demo geo-fences every report to one campus
/// coordinate pair and signs reports for one ward office.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub app_name: String,
    pub ward_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

/// Artificial latencies used purely for effect: the "cloud vision model"
/// spinner and the "SMS gateway handshake". Set to 0 in tests.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub analysis_delay_ms: u64,
    pub sms_delay_ms: u64,
}

fn get_str(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            server: ServerConfig {
                host: get_str("SERVER_HOST", "127.0.0.1"),
                port: get_parsed("SERVER_PORT", 8080),
            },
            site: SiteConfig {
                app_name: get_str("APP_NAME", "Namma Report"),
                ward_name: get_str("WARD_NAME", "Rajarajeshwari Nagar"),
                latitude: get_parsed("SITE_LATITUDE", 12.9240),
                longitude: get_parsed("SITE_LONGITUDE", 77.4990),
            },
            admin: AdminConfig {
                username: get_str("ADMIN_USERNAME", "admin"),
                password: get_str("ADMIN_PASSWORD", "admin"),
            },
            simulation: SimulationConfig {
                analysis_delay_ms: get_parsed("ANALYSIS_DELAY_MS", 1500),
                sms_delay_ms: get_parsed("SMS_DELAY_MS", 1200),
            },
        }
    }

    /// Config with zero artificial latency, used by tests.
    pub fn for_tests() -> Self {
        let mut cfg = Self::from_env();
        cfg.simulation.analysis_delay_ms = 0;
        cfg.simulation.sms_delay_ms = 0;
        cfg
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
