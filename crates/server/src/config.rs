use anyhow::Context;
use preprocess::ChannelOrder;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use common::Environment;

#[derive(Clone)]
pub struct ServerConfig {
    pub environment: Environment,
    pub addr: String,
    pub model_path: String,
    pub uploads_dir: PathBuf,
    pub session_secret: Option<String>,
    pub admin_username: String,
    pub admin_password: String,
    pub prediction_threshold: f32,
    pub channel_order: ChannelOrder,
    pub max_upload_bytes: usize,
    pub otel_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            addr: "0.0.0.0:5000".to_string(),
            model_path: "models/covid_cnn_model.onnx".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            session_secret: None,
            admin_username: "admin".to_string(),
            admin_password: "123".to_string(),
            prediction_threshold: inference::DEFAULT_THRESHOLD,
            channel_order: ChannelOrder::default(),
            max_upload_bytes: 16 * 1024 * 1024,
            otel_endpoint: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value.parse().unwrap_or(Environment::Development),
            None => defaults.environment,
        };

        let config = Self {
            environment,
            addr: lookup("SERVER_ADDR").unwrap_or(defaults.addr),
            model_path: lookup("MODEL_PATH").unwrap_or(defaults.model_path),
            uploads_dir: lookup("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            session_secret: lookup("SESSION_SECRET").filter(|s| !s.is_empty()),
            admin_username: lookup("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            prediction_threshold: parse_or(
                &lookup,
                "PREDICTION_THRESHOLD",
                defaults.prediction_threshold,
            )?,
            channel_order: parse_or(&lookup, "CHANNEL_ORDER", defaults.channel_order)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            otel_endpoint: lookup("OTEL_ENDPOINT").filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.prediction_threshold) {
            anyhow::bail!(
                "PREDICTION_THRESHOLD must be within [0, 1], got {}",
                self.prediction_threshold
            );
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if let Some(secret) = &self.session_secret {
            if secret.len() < crate::session::MIN_SECRET_LEN {
                anyhow::bail!(
                    "SESSION_SECRET must be at least {} bytes long",
                    crate::session::MIN_SECRET_LEN
                );
            }
        }
        Ok(())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

// Credentials and the cookie secret stay out of the logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("environment", &self.environment.as_str())
            .field("addr", &self.addr)
            .field("model_path", &self.model_path)
            .field("uploads_dir", &self.uploads_dir)
            .field(
                "session_secret",
                &self.session_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .field("prediction_threshold", &self.prediction_threshold)
            .field("channel_order", &self.channel_order.as_str())
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("otel_endpoint", &self.otel_endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.addr, "0.0.0.0:5000");
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password, "123");
        assert_eq!(config.prediction_threshold, 0.5);
        assert_eq!(config.channel_order, ChannelOrder::Bgr);
        assert!(config.session_secret.is_none());
        assert!(config.otel_endpoint.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("SERVER_ADDR", "127.0.0.1:8080"),
            ("MODEL_PATH", "/srv/model.onnx"),
            ("UPLOADS_DIR", "/tmp/scans"),
            ("ADMIN_USERNAME", "radiology"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("PREDICTION_THRESHOLD", "0.7"),
            ("CHANNEL_ORDER", "RGB"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
            ("OTEL_ENDPOINT", "http://localhost:4317"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.model_path, "/srv/model.onnx");
        assert_eq!(config.uploads_dir, PathBuf::from("/tmp/scans"));
        assert_eq!(config.admin_username, "radiology");
        assert_eq!(config.admin_password, "s3cret");
        assert_eq!(config.prediction_threshold, 0.7);
        assert_eq!(config.channel_order, ChannelOrder::Rgb);
        assert_eq!(config.max_upload_bytes, 1024);
        assert!(config.session_secret.is_some());
        assert_eq!(config.otel_endpoint.as_deref(), Some("http://localhost:4317"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("PREDICTION_THRESHOLD", "1.5"),
            ("PREDICTION_THRESHOLD", "high"),
            ("CHANNEL_ORDER", "rgba"),
            ("MAX_UPLOAD_BYTES", "0"),
            ("MAX_UPLOAD_BYTES", "-1"),
            ("SESSION_SECRET", "too-short"),
        ] {
            let result = ServerConfig::from_lookup(lookup_from(&[(key, value)]));
            assert!(result.is_err(), "{}={} should be rejected", key, value);
        }
    }

    #[test]
    fn test_error_names_the_variable() {
        let err = ServerConfig::from_lookup(lookup_from(&[("CHANNEL_ORDER", "yuv")])).unwrap_err();
        assert!(format!("{err:#}").contains("CHANNEL_ORDER"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServerConfig {
            session_secret: Some("a-very-long-session-secret-value-123".to_string()),
            admin_password: "hunter2".to_string(),
            ..ServerConfig::default()
        };

        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("a-very-long-session-secret-value-123"));
        assert!(printed.contains("<redacted>"));
    }
}
