use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Connection settings the UI adapters inject into gateway implementations.
/// The core itself never dials the backend; it only carries these values so
/// base URLs and tokens are configuration, not module-level constants.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            auth_token: None,
            timeout_secs: 30,
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl ApiConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("motorpool.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.base_url = base_url;
            }
            if let Some(auth_token_value) = api.auth_token {
                self.auth_token = Some(secret_value(auth_token_value));
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.timeout_secs = timeout_secs;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MOTORPOOL_BASE_URL") {
            self.base_url = value;
        }
        if let Some(value) = read_env("MOTORPOOL_AUTH_TOKEN") {
            self.auth_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("MOTORPOOL_TIMEOUT_SECS") {
            self.timeout_secs = parse_u64("MOTORPOOL_TIMEOUT_SECS", &value)?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(auth_token) = overrides.auth_token {
            self.auth_token = Some(secret_value(auth_token));
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "api.base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be in range 1..=300".to_string(),
            ));
        }

        if let Some(token) = &self.auth_token {
            if token.expose_secret().trim().is_empty() {
                return Err(ConfigError::Validation(
                    "api.auth_token must not be blank when set".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("motorpool.toml"), PathBuf::from("config/motorpool.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{ApiConfig, ConfigError, ConfigOverrides, LoadOptions};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_apply_without_a_config_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["MOTORPOOL_BASE_URL", "MOTORPOOL_AUTH_TOKEN", "MOTORPOOL_TIMEOUT_SECS"]);

        let config = ApiConfig::load(LoadOptions {
            config_path: Some("does/not/exist.toml".into()),
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.base_url == "http://localhost:5000/api", "default base url")?;
        ensure(config.auth_token.is_none(), "no default auth token")?;
        ensure(config.timeout_secs == 30, "default timeout")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["MOTORPOOL_BASE_URL", "MOTORPOOL_AUTH_TOKEN", "MOTORPOOL_TIMEOUT_SECS"]);

        env::set_var("TEST_FLEET_TOKEN", "token-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("motorpool.toml");
            fs::write(
                &path,
                r#"
[api]
base_url = "https://fleet.example/api"
auth_token = "${TEST_FLEET_TOKEN}"
timeout_secs = 15
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                ApiConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.base_url == "https://fleet.example/api", "base url from file")?;
            ensure(
                config
                    .auth_token
                    .as_ref()
                    .map(|token| token.expose_secret() == "token-from-env")
                    .unwrap_or(false),
                "auth token should be interpolated from environment",
            )?;
            ensure(config.timeout_secs == 15, "timeout from file")
        })();

        clear_vars(&["TEST_FLEET_TOKEN"]);
        result
    }

    #[test]
    fn env_and_explicit_overrides_beat_the_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MOTORPOOL_BASE_URL", "https://staging.fleet.example/api");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("motorpool.toml");
            fs::write(&path, "[api]\nbase_url = \"https://prod.fleet.example/api\"\n")
                .map_err(|err| err.to_string())?;

            let config = ApiConfig::load(LoadOptions {
                config_path: Some(path),
                require_file: true,
                overrides: ConfigOverrides {
                    timeout_secs: Some(5),
                    ..ConfigOverrides::default()
                },
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.base_url == "https://staging.fleet.example/api",
                "env override should beat the file",
            )?;
            ensure(config.timeout_secs == 5, "explicit override should beat defaults")
        })();

        clear_vars(&["MOTORPOOL_BASE_URL"]);
        result
    }

    #[test]
    fn missing_required_file_is_an_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["MOTORPOOL_BASE_URL", "MOTORPOOL_AUTH_TOKEN", "MOTORPOOL_TIMEOUT_SECS"]);

        let error = ApiConfig::load(LoadOptions {
            config_path: Some("missing/motorpool.toml".into()),
            require_file: true,
            ..LoadOptions::default()
        })
        .expect_err("required file is absent");

        ensure(
            matches!(error, ConfigError::MissingConfigFile(_)),
            "expected MissingConfigFile",
        )
    }

    #[test]
    fn unresolvable_interpolation_is_an_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["MOTORPOOL_NO_SUCH_VAR"]);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("motorpool.toml");
        fs::write(&path, "[api]\nauth_token = \"${MOTORPOOL_NO_SUCH_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let error =
            ApiConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .expect_err("interpolation must fail");

        ensure(
            matches!(error, ConfigError::MissingEnvInterpolation { ref var } if var == "MOTORPOOL_NO_SUCH_VAR"),
            "expected MissingEnvInterpolation",
        )
    }

    #[test]
    fn invalid_base_url_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["MOTORPOOL_BASE_URL", "MOTORPOOL_AUTH_TOKEN", "MOTORPOOL_TIMEOUT_SECS"]);

        let error = ApiConfig::load(LoadOptions {
            config_path: Some("does/not/exist.toml".into()),
            overrides: ConfigOverrides {
                base_url: Some("ftp://fleet.example".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect_err("scheme must be http(s)");

        ensure(matches!(error, ConfigError::Validation(_)), "expected Validation error")
    }
}
