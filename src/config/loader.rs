// Configuration loader
// Loads settings from ~/.teddy/config.toml or environment variables

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

use super::settings::Config;

/// Load configuration from the Teddy config file or environment
pub fn load_config() -> Result<Config> {
    if let Some(config) = try_load_from_teddy_config()? {
        return Ok(config);
    }

    // Fall back to environment variable
    if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
        if !api_key.is_empty() {
            return Ok(Config::new(api_key));
        }
    }

    bail!(
        "No configuration found.\n\n\
        Create ~/.teddy/config.toml with at least:\n\n\
        \x1b[36mapi_key = \"sk-...\"\x1b[0m\n\n\
        Optional keys: model, base_url, data_dir, bind_address, prune_after_days.\n\n\
        Alternatively, set an environment variable:\n\
        export OPENAI_API_KEY=\"sk-...\""
    );
}

fn try_load_from_teddy_config() -> Result<Option<Config>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home.join(".teddy/config.toml");

    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    #[derive(serde::Deserialize)]
    struct TomlConfig {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        data_dir: Option<PathBuf>,
        #[serde(default)]
        bind_address: Option<String>,
        #[serde(default)]
        prune_after_days: Option<i64>,
    }

    let toml_config: TomlConfig =
        toml::from_str(&contents).context("Failed to parse config.toml")?;

    if toml_config.api_key.is_empty() {
        bail!("Config is missing api_key. Add it to ~/.teddy/config.toml.");
    }

    let mut config = Config::new(toml_config.api_key);
    if let Some(model) = toml_config.model {
        config.model = model;
    }
    if let Some(base_url) = toml_config.base_url {
        config.base_url = base_url;
    }
    if let Some(data_dir) = toml_config.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(bind_address) = toml_config.bind_address {
        config.bind_address = bind_address;
    }
    if let Some(days) = toml_config.prune_after_days {
        config.prune_after_days = days;
    }

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new("test-key".to_string());
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.bind_address, "127.0.0.1:8088");
        assert!(config.db_path().ends_with("journal.db"));
    }
}
