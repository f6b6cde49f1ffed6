use std::net::IpAddr;
use std::path::PathBuf;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_path: PathBuf,
    pub sync: SyncPolicy,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub cors_origins: CorsOrigins,
    pub require_consent: bool,
    pub log_level: String,
}

/// How hard the persister pushes each frame towards the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Hand the frame to the OS and return.
    Flush,
    /// `sync_data` after every frame.
    Fsync,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("SURVEY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SURVEY_HOST: {e}"))?;

        let port: u16 = env_or("SURVEY_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid SURVEY_PORT: {e}"))?;

        let log_path = PathBuf::from(env_or("SURVEY_LOG_PATH", "data/survey.ndjson"));

        let sync = match env_or("SURVEY_LOG_SYNC", "flush").as_str() {
            "flush" => SyncPolicy::Flush,
            "fsync" => SyncPolicy::Fsync,
            other => {
                return Err(format!(
                    "Invalid SURVEY_LOG_SYNC '{other}': expected 'flush' or 'fsync'"
                ));
            }
        };

        let max_body_size: usize = env_or("SURVEY_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid SURVEY_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("SURVEY_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid SURVEY_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors_origins = parse_origins(&env_or("SURVEY_CORS_ORIGINS", "*"));

        let require_consent = match env_or("SURVEY_REQUIRE_CONSENT", "true").as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => return Err(format!("Invalid SURVEY_REQUIRE_CONSENT '{other}'")),
        };

        let log_level = env_or("SURVEY_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            log_path,
            sync,
            max_body_size,
            trusted_proxies,
            cors_origins,
            require_consent,
            log_level,
        })
    }
}

fn parse_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
