use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::field::FieldPolicy;
use crate::logging::LogFormat;

const PREFIX: &str = "propagation";
const ENV_PREFIX: &str = "PROPAGATION_";

/// Configuration for trace propagation.
#[derive(Debug, Clone)]
pub struct PropagationConfig {
    /// Generate missing or invalid trace/span/request ids (default: true).
    pub auto_generate: bool,
    /// Log discarded inbound fields at `WARN` rather than `DEBUG` (default: true).
    pub log_discards: bool,
    /// Echo the resolved request id on HTTP responses (default: false).
    pub echo_request_id: bool,
    /// Log output format used by [`crate::logging::init_tracing`].
    pub log_format: LogFormat,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagationConfig {
    pub fn new() -> Self {
        Self {
            auto_generate: true,
            log_discards: true,
            echo_request_id: false,
            log_format: LogFormat::Pretty,
        }
    }

    pub fn with_auto_generate(mut self, enabled: bool) -> Self {
        self.auto_generate = enabled;
        self
    }

    pub fn with_log_discards(mut self, enabled: bool) -> Self {
        self.log_discards = enabled;
        self
    }

    pub fn with_echo_request_id(mut self, enabled: bool) -> Self {
        self.echo_request_id = enabled;
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Build the shared inbound policy.
    pub fn policy(&self) -> Arc<FieldPolicy> {
        Arc::new(FieldPolicy::new(self.auto_generate).with_log_discards(self.log_discards))
    }

    /// Read `propagation.*` keys from a YAML document.
    ///
    /// Reads keys like:
    /// - `propagation.auto-generate`
    /// - `propagation.log-discards`
    /// - `propagation.echo-request-id`
    /// - `propagation.log-format`
    ///
    /// Missing keys keep their defaults; unknown keys are ignored.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let values = load_yaml_str(yaml)?;
        Self::from_values(&values)
    }

    /// Like [`from_yaml_str`](Self::from_yaml_str), reading `path`, then
    /// overlaying `PROPAGATION_*` environment variables
    /// (`PROPAGATION_AUTO_GENERATE=false` sets `propagation.auto-generate`).
    ///
    /// A missing file is not an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut values = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
            load_yaml_str(&content)?
        } else {
            HashMap::new()
        };

        for (env_key, env_val) in std::env::vars() {
            if let Some(rest) = env_key.strip_prefix(ENV_PREFIX) {
                let key = format!("{PREFIX}.{}", rest.to_lowercase().replace('_', "-"));
                values.insert(key, serde_yaml::Value::String(env_val));
            }
        }
        Self::from_values(&values)
    }

    fn from_values(values: &HashMap<String, serde_yaml::Value>) -> Result<Self, ConfigError> {
        let mut cfg = Self::new();
        if let Some(v) = get_bool(values, "auto-generate")? {
            cfg.auto_generate = v;
        }
        if let Some(v) = get_bool(values, "log-discards")? {
            cfg.log_discards = v;
        }
        if let Some(v) = get_bool(values, "echo-request-id")? {
            cfg.echo_request_id = v;
        }
        if let Some(v) = get_string(values, "log-format")? {
            cfg.log_format = LogFormat::from_name(&v);
        }
        Ok(cfg)
    }
}

fn get_bool(
    values: &HashMap<String, serde_yaml::Value>,
    name: &str,
) -> Result<Option<bool>, ConfigError> {
    let key = format!("{PREFIX}.{name}");
    match values.get(&key) {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(*b)),
        Some(serde_yaml::Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::TypeMismatch { key, expected: "bool" }),
        },
        Some(_) => Err(ConfigError::TypeMismatch { key, expected: "bool" }),
    }
}

fn get_string(
    values: &HashMap<String, serde_yaml::Value>,
    name: &str,
) -> Result<Option<String>, ConfigError> {
    let key = format!("{PREFIX}.{name}");
    match values.get(&key) {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::TypeMismatch { key, expected: "string" }),
    }
}

fn load_yaml_str(content: &str) -> Result<HashMap<String, serde_yaml::Value>, ConfigError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    let mut out = HashMap::new();
    flatten_yaml("", &yaml, &mut out);
    Ok(out)
}

/// Flatten a YAML tree into dot-separated keys.
fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, out: &mut HashMap<String, serde_yaml::Value>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key_str = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                let full_key = if prefix.is_empty() {
                    key_str
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(&full_key, v, out);
            }
        }
        leaf => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), leaf.clone());
            }
        }
    }
}
