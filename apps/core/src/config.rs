use crate::error::AppError;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("unknown log format '{}'", other))),
        }
    }
}

/// Runtime configuration, read once at startup from `MOODCHAT_*` environment variables.
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Classifier weights exported as JSON.
    pub model_path: PathBuf,
    /// Tokenizer vocabulary.
    pub tokenizer_path: PathBuf,
    /// Ordered label list matching the classifier outputs.
    pub labels_path: PathBuf,
    /// Optional replacement for the built-in reply table.
    pub responses_path: Option<PathBuf>,
    /// Fixed sequence length fed to the classifier.
    #[validate(range(min = 1, max = 512))]
    pub max_len: usize,
    /// Upper bound for a single `/chat` request.
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    /// Extra attempts when loading artifacts at startup.
    #[validate(range(max = 10))]
    pub load_retries: u32,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("models/emotion_model.json"),
            tokenizer_path: PathBuf::from("models/tokenizer.json"),
            labels_path: PathBuf::from("models/labels.json"),
            responses_path: None,
            max_len: 40,
            request_timeout_secs: 10,
            load_retries: 2,
            log_format: LogFormat::Pretty,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("invalid value for {}: '{}'", name, value))),
        _ => Ok(None),
    }
}

impl AppConfig {
    /// Reads the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let log_format = match env::var("MOODCHAT_LOG_FORMAT") {
            Ok(value) if !value.trim().is_empty() => value.trim().parse()?,
            _ => defaults.log_format,
        };

        let config = Self {
            host: parse_var("MOODCHAT_HOST")?.unwrap_or(defaults.host),
            port: parse_var("MOODCHAT_PORT")?.unwrap_or(defaults.port),
            model_path: parse_var("MOODCHAT_MODEL_PATH")?.unwrap_or(defaults.model_path),
            tokenizer_path: parse_var("MOODCHAT_TOKENIZER_PATH")?
                .unwrap_or(defaults.tokenizer_path),
            labels_path: parse_var("MOODCHAT_LABELS_PATH")?.unwrap_or(defaults.labels_path),
            responses_path: parse_var("MOODCHAT_RESPONSES_PATH")?,
            max_len: parse_var("MOODCHAT_MAX_LEN")?.unwrap_or(defaults.max_len),
            request_timeout_secs: parse_var("MOODCHAT_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            load_retries: parse_var("MOODCHAT_LOAD_RETRIES")?.unwrap_or(defaults.load_retries),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid bind address: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: &[&str] = &[
        "MOODCHAT_HOST",
        "MOODCHAT_PORT",
        "MOODCHAT_MODEL_PATH",
        "MOODCHAT_TOKENIZER_PATH",
        "MOODCHAT_LABELS_PATH",
        "MOODCHAT_RESPONSES_PATH",
        "MOODCHAT_MAX_LEN",
        "MOODCHAT_REQUEST_TIMEOUT_SECS",
        "MOODCHAT_LOAD_RETRIES",
        "MOODCHAT_LOG_FORMAT",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter().map(|v| (*v, None)).collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars(cleared(), || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config.port, 5000);
            assert_eq!(config.max_len, 40);
            assert_eq!(config.labels_path, PathBuf::from("models/labels.json"));
            assert!(config.responses_path.is_none());
            assert_eq!(config.log_format, LogFormat::Pretty);
        });
    }

    #[test]
    fn test_reads_overrides() {
        let mut vars = cleared();
        vars.retain(|(k, _)| {
            !matches!(*k, "MOODCHAT_PORT" | "MOODCHAT_MAX_LEN" | "MOODCHAT_LOG_FORMAT")
        });
        vars.push(("MOODCHAT_PORT", Some("8080")));
        vars.push(("MOODCHAT_MAX_LEN", Some("64")));
        vars.push(("MOODCHAT_LOG_FORMAT", Some("JSON")));
        temp_env::with_vars(vars, || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.max_len, 64);
            assert_eq!(config.log_format, LogFormat::Json);
            assert_eq!(config.bind_addr().unwrap().port(), 8080);
        });
    }

    #[test]
    fn test_rejects_unparseable_value() {
        let mut vars = cleared();
        vars.retain(|(k, _)| *k != "MOODCHAT_PORT");
        vars.push(("MOODCHAT_PORT", Some("not-a-port")));
        temp_env::with_vars(vars, || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
    }

    #[test]
    fn test_rejects_out_of_range_value() {
        let mut vars = cleared();
        vars.retain(|(k, _)| *k != "MOODCHAT_MAX_LEN");
        vars.push(("MOODCHAT_MAX_LEN", Some("0")));
        temp_env::with_vars(vars, || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
    }
}
