//! Configuration commands for managing gatedesk settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{API_URL_ENV, CONFIG_KEYS, Config};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;
    let effective_url = config.api_url()?;

    let json_output = json!({
        "api_url": config.api_url,
        "effective_api_url": effective_url.as_str(),
        "request_timeout": config.request_timeout,
        "page_size": config.page_size,
        "default_fiat": config.default_fiat,
        "config_file": path.to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    for key in CONFIG_KEYS {
        text_output.push_str(&format!("{}: {}\n", key.cyan(), config.get(key)?));
    }
    if effective_url.as_str().trim_end_matches('/') != config.api_url.trim_end_matches('/') {
        text_output.push_str(&format!(
            "{}\n",
            format!("api_url overridden by {API_URL_ENV}: {effective_url}").yellow()
        ));
    }
    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", path.display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}

pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(value)
        .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    let stored = config.get(key)?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), stored))
    .print(output_json)
}
