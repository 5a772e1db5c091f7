//! Server configuration.
//!
//! Layers, lowest to highest precedence:
//! 1. built-in defaults ([`DEFAULT_CONFIG`])
//! 2. `careplan.toml` in the working directory, or the `--config` path
//! 3. `CAREPLAN_*` environment variables (e.g. `CAREPLAN_OPENAI_MODEL`)
//! 4. `PORT` and `OPENAI_API_KEY`

use std::path::Path;

use careplan_llm::{OpenAiConfig, PlanSchema};
use serde::Deserialize;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_CONFIG: &str = r#"
bind                 = "0.0.0.0"
port                 = 3000
openai_base_url      = "https://api.openai.com/v1"
openai_model         = "gpt-4o-mini"
temperature          = 0.2
request_timeout_secs = 60
default_schema       = "rows"
"#;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "careplan_core=info,careplan_llm=info,tower_http=info"
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub temperature: f64,
    pub request_timeout_secs: u64,
    pub default_schema: PlanSchema,
}

impl Settings {
    /// Load all layers. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("careplan").required(false),
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(config::Environment::with_prefix("CAREPLAN").try_parsing(true))
            .set_override_option("port", std::env::var("PORT").ok())?
            .set_override_option("openai_api_key", std::env::var("OPENAI_API_KEY").ok())?
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults layered under the given TOML, without touching the
    /// environment or filesystem.
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn defaults() -> Self {
        Self::from_toml("").expect("built-in default config must deserialize correctly")
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    pub fn openai(&self) -> OpenAiConfig {
        OpenAiConfig {
            base_url: self.openai_base_url.clone(),
            api_key: self.openai_api_key.clone(),
            model: self.openai_model.clone(),
            temperature: self.temperature,
            timeout_secs: self.request_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let settings = Settings::defaults();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.bind, "0.0.0.0");
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert_eq!(settings.default_schema, PlanSchema::Rows);
        assert!((settings.temperature - 0.2).abs() < f64::EPSILON);
        assert!(!settings.has_api_key());
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml(
            r#"
            port = 8080
            default_schema = "plan"
            openai_api_key = "sk-test"
            "#,
        )
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.default_schema, PlanSchema::Plan);
        assert!(settings.has_api_key());
        assert_eq!(settings.openai_model, "gpt-4o-mini");
    }

    #[test]
    fn invalid_schema_rejected() {
        assert!(Settings::from_toml(r#"default_schema = "table""#).is_err());
    }

    #[test]
    fn openai_config_mirrors_settings() {
        let settings = Settings::from_toml(r#"request_timeout_secs = 5"#).unwrap();
        let openai = settings.openai();
        assert_eq!(openai.base_url, "https://api.openai.com/v1");
        assert_eq!(openai.timeout_secs, 5);
        assert!(openai.api_key.is_none());
    }
}
