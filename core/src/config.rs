// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use isyourday_client::ApiConfig;
use tokio::fs;

/// The name of the application.
pub const APP_NAME: &str = "isyourday";

const CONFIG_ENV: &str = "ISYOURDAY_CONFIG";
const API_URL_ENV: &str = "ISYOURDAY_API_URL";
const CREDENTIALS_FILE: &str = "credentials.json";

/// Configuration of the isyourday application.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// API server settings.
    pub client: ApiConfig,

    /// Local state settings.
    #[serde(default)]
    pub state: StateConfig,
}

/// Where local state such as the login token lives.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct StateConfig {
    /// Directory for storing application state.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration.
    ///
    /// The file is taken from `path`, then from `$ISYOURDAY_CONFIG`, then from
    /// `$XDG_CONFIG_HOME/isyourday/config.toml`. `$ISYOURDAY_API_URL`
    /// overrides the base URL found in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if no file is found or it cannot be parsed.
    #[tracing::instrument]
    pub async fn parse(path: Option<PathBuf>) -> Result<Self, Box<dyn Error>> {
        let path = if let Some(path) = path {
            path
        } else if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            PathBuf::from(env_path)
        } else {
            let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
            if !config.exists() {
                return Err(format!("No config found at: {}", config.display()).into());
            }
            config
        };

        let mut config: Self = fs::read_to_string(&path)
            .await
            .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
            .parse()?;

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                tracing::debug!(url, "base URL overridden from environment");
                config.client.base_url = url;
            }
        }

        config.normalize()?;
        Ok(config)
    }

    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be expanded.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        match &self.state.dir {
            Some(a) => {
                self.state.dir = Some(
                    expand_path(a)
                        .map_err(|e| format!("Failed to expand state directory path: {e}"))?,
                );
            }

            None => match get_state_dir() {
                Ok(a) => self.state.dir = Some(a.join(APP_NAME)),
                Err(e) => tracing::warn!("Failed to get state directory: {e}"),
            },
        }

        Ok(())
    }

    /// Path of the file holding the login token, if a state directory is known.
    #[must_use]
    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.state.dir.as_ref().map(|a| a.join(CREDENTIALS_FILE))
    }
}

impl FromStr for Config {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".into())
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or_else(|| "User-specific state directory not found".into())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use std::sync::OnceLock;

    use tempfile::TempDir;
    use tokio::sync::Mutex;

    use super::*;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn write_config(dir: &TempDir, name: &str, base_url: &str) -> PathBuf {
        let path = dir.path().join(name);
        let state_dir = dir.path().join("state");
        let content = format!(
            r#"
[client]
base_url = "{base_url}"

[state]
dir = "{}"
"#,
            state_dir.to_str().unwrap().replace('\\', "/")
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parses_minimal_config() {
        let config: Config = r#"
[client]
base_url = "https://api.example.com"
"#
        .parse()
        .unwrap();
        assert_eq!(config.client.base_url, "https://api.example.com");
        assert_eq!(config.client.timeout_secs, 5);
        assert!(config.state.dir.is_none());
    }

    #[test]
    fn missing_base_url_is_an_error() {
        assert!("[client]\ntimeout_secs = 10\n".parse::<Config>().is_err());
    }

    #[tokio::test]
    async fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let flag_path = write_config(&temp_dir, "config.toml", "https://flag.example.com");
        let env_path = write_config(&temp_dir, "env.toml", "https://env.example.com");

        let _guard = env_lock().lock().await;
        unsafe {
            std::env::remove_var(API_URL_ENV);
            std::env::set_var(CONFIG_ENV, env_path.to_str().unwrap());
        }

        let config = Config::parse(Some(flag_path)).await.unwrap();
        assert_eq!(config.client.base_url, "https://flag.example.com");

        let config = Config::parse(None).await.unwrap();
        assert_eq!(config.client.base_url, "https://env.example.com");

        unsafe {
            std::env::remove_var(CONFIG_ENV);
        }
    }

    #[tokio::test]
    async fn api_url_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "config.toml", "https://file.example.com");

        let _guard = env_lock().lock().await;
        unsafe {
            std::env::set_var(API_URL_ENV, "http://localhost:8000");
        }

        let config = Config::parse(Some(path)).await.unwrap();
        assert_eq!(config.client.base_url, "http://localhost:8000");
        assert_eq!(
            config.credentials_path(),
            Some(temp_dir.path().join("state").join(CREDENTIALS_FILE))
        );

        unsafe {
            std::env::remove_var(API_URL_ENV);
        }
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::parse(Some(temp_dir.path().join("nope.toml")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_expand_path_home_env() {
        let home = get_home_dir().unwrap();
        let home_prefixes: &[&str] = if cfg!(unix) {
            &["~", "$HOME", "${HOME}"]
        } else {
            &[r"~", r"%UserProfile%"]
        };
        for prefix in home_prefixes {
            let result = expand_path(&PathBuf::from(format!("{prefix}/state"))).unwrap();
            assert_eq!(result, home.join("state"));
            assert!(result.is_absolute());
        }
    }

    #[test]
    fn test_expand_path_config() {
        let config_dir = get_config_dir().unwrap();
        let config_prefixes: &[&str] = if cfg!(unix) {
            &["$XDG_CONFIG_HOME", "${XDG_CONFIG_HOME}"]
        } else {
            &[r"%LOCALAPPDATA%"]
        };
        for prefix in config_prefixes {
            let result = expand_path(&PathBuf::from(format!("{prefix}/config.toml"))).unwrap();
            assert_eq!(result, config_dir.join("config.toml"));
        }
    }

    #[test]
    fn test_expand_path_relative() {
        let relative_path = PathBuf::from("relative/path");
        assert_eq!(expand_path(&relative_path).unwrap(), relative_path);
    }
}
