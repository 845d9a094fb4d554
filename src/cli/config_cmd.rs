//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    // Validate value based on key type
    validate_config_value(key, value)?;

    // Load existing config
    let mut config = store.load().await?;

    // Update the appropriate field
    match key {
        "stt_api_key" => config.stt_api_key = Some(value.to_string()),
        "llm_api_key" => config.llm_api_key = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        "llm_model" => config.llm_model = Some(value.to_string()),
        "sample_rate" => {
            config.sample_rate = Some(value.parse().map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be a sample rate in Hz".to_string(),
            })?)
        }
        "db_path" => config.db_path = Some(value.to_string()),
        "wav_path" => config.wav_path = Some(value.to_string()),
        _ => unreachable!(), // Already validated
    }

    // Save config
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "stt_api_key" => config.stt_api_key.map(|s| mask_api_key(&s)),
        "llm_api_key" => config.llm_api_key.map(|s| mask_api_key(&s)),
        "language" => config.language,
        "llm_model" => config.llm_model,
        "sample_rate" => config.sample_rate.map(|r| r.to_string()),
        "db_path" => config.db_path,
        "wav_path" => config.wav_path,
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "stt_api_key",
        &config
            .stt_api_key
            .map(|s| mask_api_key(&s))
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "llm_api_key",
        &config
            .llm_api_key
            .map(|s| mask_api_key(&s))
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value("language", config.language.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "llm_model",
        config.llm_model.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "sample_rate",
        &config
            .sample_rate
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value("db_path", config.db_path.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "wav_path",
        config.wav_path.as_deref().unwrap_or("(not set)"),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "sample_rate" => {
            let rate: u32 = value.parse().map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be a sample rate in Hz".to_string(),
            })?;
            if rate == 0 {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Sample rate must be greater than zero".to_string(),
                });
            }
        }
        "language" | "llm_model" => {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must not be empty".to_string(),
                });
            }
        }
        _ => {} // Keys and paths accept any string
    }
    Ok(())
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        "*".repeat(key.len())
    } else {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_api_key_long() {
        let masked = mask_api_key("abcdefghijklmnop");
        assert_eq!(masked, "abcd...mnop");
    }

    #[test]
    fn mask_api_key_short() {
        let masked = mask_api_key("short");
        assert_eq!(masked, "*****");
    }

    #[test]
    fn validate_sample_rate_valid() {
        assert!(validate_config_value("sample_rate", "16000").is_ok());
        assert!(validate_config_value("sample_rate", "48000").is_ok());
    }

    #[test]
    fn validate_sample_rate_invalid() {
        assert!(validate_config_value("sample_rate", "fast").is_err());
        assert!(validate_config_value("sample_rate", "0").is_err());
        assert!(validate_config_value("sample_rate", "-1").is_err());
    }

    #[test]
    fn validate_language_rejects_empty() {
        assert!(validate_config_value("language", "ja-JP").is_ok());
        assert!(validate_config_value("language", "  ").is_err());
    }

    #[test]
    fn validate_model_rejects_empty() {
        assert!(validate_config_value("llm_model", "gpt-3.5-turbo").is_ok());
        assert!(validate_config_value("llm_model", "").is_err());
    }

    #[test]
    fn validate_paths_accept_any_string() {
        assert!(validate_config_value("db_path", "/tmp/anything.db").is_ok());
        assert!(validate_config_value("wav_path", "clip.wav").is_ok());
        assert!(validate_config_value("stt_api_key", "whatever").is_ok());
    }
}
