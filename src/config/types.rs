use serde::{Deserialize, Serialize};
use super::credentials::resolve_credential;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_LIFESTYLE_GUIDANCE: &str = "Where applicable, suggest Indian lifestyle remedies \
(diet and yoga). Name specific items such as karela juice or Bhujangasana when they fit the findings. \
Keep the tone positive and professional, but be clear about abnormalities.";

pub const PROVIDERS: &[&str] = &["openai", "anthropic", "local"];

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LabsightConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    pub analysis: AnalysisConfig,
}

impl LabsightConfig {
    /// Copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.llm.api_key.as_deref().is_some_and(|k| !k.starts_with('$')) {
            copy.llm.api_key = Some("[REDACTED]".to_string());
        }
        copy
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prebuilt client bundle served for non-API paths.
    pub static_dir: Option<String>,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub seed_sample: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "./data/labsight.db".to_string(), seed_sample: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            base_url: None,
            max_tokens: 4096,
        }
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl LLMConfig {
    /// Configured key (with `$VAR` references resolved), else the provider's
    /// conventional environment variables.
    pub fn resolved_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            let resolved = resolve_credential(key);
            if !resolved.is_empty() && !resolved.starts_with('$') {
                return Some(resolved);
            }
        }
        let vars: &[&str] = match self.provider.as_str() {
            "anthropic" => &["ANTHROPIC_API_KEY"],
            _ => &["AI_INTEGRATIONS_OPENAI_API_KEY", "OPENAI_API_KEY"],
        };
        vars.iter().find_map(|v| env_non_empty(v))
    }

    pub fn resolved_base_url(&self) -> Option<String> {
        if let Some(url) = &self.base_url {
            return Some(resolve_credential(url));
        }
        match self.provider.as_str() {
            "openai" => env_non_empty("AI_INTEGRATIONS_OPENAI_BASE_URL"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub max_upload_bytes: usize,
    /// Appended to the system instruction. Empty disables it.
    pub lifestyle_guidance: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            lifestyle_guidance: DEFAULT_LIFESTYLE_GUIDANCE.to_string(),
        }
    }
}
