use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_SMTP_PORT, DEFAULT_TEMPERATURE};

const EXAMPLE_CONFIG: &str = r#"[ai]
endpoint = "https://my-resource.openai.azure.com"
api_version = "2024-02-15-preview"
deployment = "gpt-4o"

[mail]
address = "you@example.com"
smtp_server = "smtp.example.com"
smtp_port = 465"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat completion backend used to draft emails
    pub ai: AiConfig,
    /// Outbound relay and sender identity
    pub mail: MailConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Azure OpenAI style completion backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Resource endpoint, e.g. https://my-resource.openai.azure.com
    pub endpoint: String,
    /// API version query parameter
    pub api_version: String,
    /// Deployment (model) name
    pub deployment: String,
    /// API key (optional here; the credential store is preferred)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Maximum tokens for the generated draft
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address, also used as the SMTP login unless `username` is set
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub smtp_server: String,
    /// Implicit-TLS port (not STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

impl MailConfig {
    /// Login name for the relay
    pub fn login(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.address)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeVariant,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    #[serde(rename = "high-contrast")]
    HighContrast,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mailscribe");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at {}\n\
                 Run 'mailscribe setup' or create it by hand. Example:\n\n{}",
                path.display(),
                EXAMPLE_CONFIG
            );
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate config text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("ai.endpoint", &self.ai.endpoint),
            ("ai.api_version", &self.ai.api_version),
            ("ai.deployment", &self.ai.deployment),
            ("mail.address", &self.mail.address),
            ("mail.smtp_server", &self.mail.smtp_server),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", key);
            }
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            anyhow::bail!(
                "ai.temperature must be between 0.0 and 2.0 (got {})",
                self.ai.temperature
            );
        }
        if self.ai.max_tokens == 0 {
            anyhow::bail!("ai.max_tokens must be greater than zero");
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_defaults() {
        let config = Config::parse(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.ai.deployment, "gpt-4o");
        assert_eq!(config.ai.max_tokens, 1000);
        assert!((config.ai.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.ai.api_key, None);
        assert_eq!(config.mail.smtp_port, 465);
        assert_eq!(config.mail.login(), "you@example.com");
        assert_eq!(config.ui.theme, ThemeVariant::Dark);
    }

    #[test]
    fn test_parse_overrides() {
        let toml = r#"
            [ai]
            endpoint = "https://res.openai.azure.com/"
            api_version = "2024-06-01"
            deployment = "mini"
            api_key = "secret"
            max_tokens = 400
            temperature = 0.2

            [mail]
            address = "me@example.com"
            username = "login-name"
            smtp_server = "smtp.example.com"
            smtp_port = 2465

            [ui]
            theme = "high-contrast"
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(config.ai.max_tokens, 400);
        assert_eq!(config.mail.smtp_port, 2465);
        assert_eq!(config.mail.login(), "login-name");
        assert_eq!(config.ui.theme, ThemeVariant::HighContrast);
    }

    #[test]
    fn test_missing_section_rejected() {
        let toml = r#"
            [mail]
            address = "me@example.com"
            smtp_server = "smtp.example.com"
        "#;
        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn test_empty_required_field_rejected() {
        let toml = EXAMPLE_CONFIG.replace("smtp.example.com", " ");
        let err = Config::parse(&toml).unwrap_err();
        assert!(format!("{:#}", err).contains("mail.smtp_server"));
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let toml = EXAMPLE_CONFIG.replace(
            "deployment = \"gpt-4o\"",
            "deployment = \"gpt-4o\"\ntemperature = 3.5",
        );
        let err = Config::parse(&toml).unwrap_err();
        assert!(format!("{:#}", err).contains("temperature"));
    }

    #[test]
    fn test_round_trip_keeps_secret_out_when_unset() {
        let config = Config::parse(EXAMPLE_CONFIG).unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("api_key"));
        assert!(!text.contains("username"));
        assert_eq!(Config::parse(&text).unwrap().mail.address, "you@example.com");
    }
}
