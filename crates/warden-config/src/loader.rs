//! Configuration loading with environment overrides.

use crate::schema::Config;
use std::env;
use std::path::Path;
use tracing::debug;
use warden_common::{Result, WardenError};

/// Environment variable overriding `twitch.token`.
pub const TOKEN_ENV: &str = "WARDEN_TWITCH_TOKEN";
/// Environment variable overriding `twitch.nickname`.
pub const NICKNAME_ENV: &str = "WARDEN_TWITCH_NICKNAME";

/// Loads, overrides, and validates configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        WardenError::config(format!("cannot read {}: {e}", path.display()))
    })?;
    let mut config: Config = toml::from_str(&raw)
        .map_err(|e| WardenError::config(format!("cannot parse {}: {e}", path.display())))?;

    apply_env_overrides(&mut config);
    config.validate()?;
    debug!("configuration loaded from {}", path.display());
    Ok(config)
}

/// Applies environment overrides for secrets, so tokens can stay out of
/// the config file.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(token) = env::var(TOKEN_ENV) {
        config.twitch.token = token;
    }
    if let Ok(nickname) = env::var(NICKNAME_ENV) {
        config.twitch.nickname = nickname;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[twitch]
nickname = "warden_bot"
token = "oauth:secret"

[bot]
prefix = "!"
owners = ["sep"]
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.twitch.nickname, "warden_bot");
        assert_eq!(config.twitch.host, "irc.chat.twitch.tv");
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.owners, vec!["sep"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = load_config(Path::new("/nonexistent/warden.toml")).unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut config = Config::default();
        config.twitch.token = "from-file".to_string();

        env::set_var(TOKEN_ENV, "from-env");
        apply_env_overrides(&mut config);
        env::remove_var(TOKEN_ENV);

        assert_eq!(config.twitch.token, "from-env");
    }
}
