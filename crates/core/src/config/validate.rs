use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Page sizes are not 0
/// - Dashboard port is not 0
/// - Jackett has at least one indexer and no duplicate ids
/// - Telegram bot token is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.navigation.results_per_page == 0 || config.navigation.episodes_per_page == 0 {
        return Err(ConfigError::ValidationError(
            "navigation page sizes cannot be 0".to_string(),
        ));
    }

    if config.dashboard.port == 0 {
        return Err(ConfigError::ValidationError(
            "dashboard.port cannot be 0".to_string(),
        ));
    }

    if let Some(jackett) = &config.jackett {
        if jackett.indexers.is_empty() {
            return Err(ConfigError::ValidationError(
                "jackett.indexers must list at least one indexer".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for indexer in &jackett.indexers {
            if !seen.insert(indexer.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate jackett indexer id: {}",
                    indexer.id
                )));
            }
        }
    }

    if let Some(telegram) = &config.telegram {
        if telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "telegram.bot_token cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
