use std::path::{Path, PathBuf};

use tracing::debug;
use tutor_common::{Error, Result};

use crate::model::AppConfig;

/// Loads [`AppConfig`] from YAML, `.env` and the process environment.
///
/// Precedence, lowest first: built-in defaults, config file, environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit config file. Unlike the default location, it must exist.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".tutor").join("config.yml"))
    }

    pub fn load(&self) -> Result<AppConfig> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("loaded environment from {}", path.display());
        }

        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        validate(&config)?;
        Ok(config)
    }

    /// The file [`load_file`](Self::load_file) reads, or `None` when only
    /// defaults apply.
    pub fn source(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(path.clone()),
            None => Self::default_path().filter(|path| path.exists()),
        }
    }

    /// Read the config file without environment overrides.
    pub fn load_file(&self) -> Result<AppConfig> {
        match self.source() {
            Some(path) => read_config(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
    let config: AppConfig = serde_yaml::from_str(&contents)?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Apply environment overrides using `lookup` to resolve variables.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.llm.api_key = Some(key);
    }
    if let Some(url) = lookup("OPENAI_BASE_URL") {
        config.llm.base_url = Some(url);
    }
    if let Some(model) = lookup("LLM_MODEL") {
        config.llm.model = model;
    }
    if let Some(temp) = lookup("LLM_TEMPERATURE") {
        config.llm.temperature = parse_var("LLM_TEMPERATURE", &temp)?;
    }
    if let Some(url) = lookup("NOTE_MAKER_API_URL") {
        config.tools.note_maker_url = url;
    }
    if let Some(url) = lookup("FLASHCARD_API_URL") {
        config.tools.flashcard_url = url;
    }
    if let Some(url) = lookup("CONCEPT_API_URL") {
        config.tools.concept_explainer_url = url;
    }
    if let Some(flag) = lookup("USE_MOCK_TOOLS") {
        config.tools.use_mock = flag.eq_ignore_ascii_case("true");
    }
    if let Some(host) = lookup("HOST") {
        config.gateway.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.gateway.port = parse_var("PORT", &port)?;
    }
    if let Some(level) = lookup("TUTOR_LOG") {
        config.log.level = level;
    }
    Ok(())
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{name} has an invalid value: {value:?}")))
}

/// Reject configurations that would only fail later at request time.
pub fn validate(config: &AppConfig) -> Result<()> {
    if config.gateway.port == 0 {
        return Err(Error::Config("gateway.port must be non-zero".to_string()));
    }
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(Error::Config(format!(
            "llm.temperature must be between 0 and 2, got {}",
            config.llm.temperature
        )));
    }
    if config.gateway.max_message_chars == 0 {
        return Err(Error::Config(
            "gateway.max_message_chars must be non-zero".to_string(),
        ));
    }

    let tools = &config.tools;
    for (name, value) in [
        ("tools.note_maker_url", &tools.note_maker_url),
        ("tools.flashcard_url", &tools.flashcard_url),
        ("tools.concept_explainer_url", &tools.concept_explainer_url),
    ] {
        if !is_http_url(value) {
            return Err(Error::Config(format!(
                "{name} must be an absolute http(s) URL, got {value:?}"
            )));
        }
    }
    if let Some(base) = &config.llm.base_url {
        if !is_http_url(base) {
            return Err(Error::Config(format!(
                "llm.base_url must be an absolute http(s) URL, got {base:?}"
            )));
        }
    }
    Ok(())
}

fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value.trim()) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}
