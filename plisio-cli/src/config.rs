//! CLI configuration.
//!
//! Loads a [`ClientConfig`] from a TOML file with support for environment
//! variable expansion in string values. Variables use `$VAR` or `${VAR}`
//! syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! secret_key = "$PLISIO_SHOP_KEY"
//! api_url = "https://plisio.net/api/v1"
//! timeout_secs = 30
//! ```
//!
//! # Environment Variables
//!
//! - `PLISIO_CONFIG`: path to the configuration file (default: `plisio.toml`)
//! - `PLISIO_SECRET_KEY`: overrides `secret_key`
//! - `PLISIO_API_URL`: overrides `api_url`

use std::path::Path;

use plisio::ClientConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "PLISIO_CONFIG";
/// Configuration file used when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "plisio.toml";
/// Environment override for the secret key.
pub const SECRET_KEY_VAR: &str = "PLISIO_SECRET_KEY";
/// Environment override for the API base URL.
pub const API_URL_VAR: &str = "PLISIO_API_URL";

/// Errors raised while loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for a [`ClientConfig`].
    #[error("Failed to parse config file {path}: {source}")]
    Toml {
        /// Path that failed.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Loads configuration from the path given by `PLISIO_CONFIG`, falling back
/// to `plisio.toml` in the current directory.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load() -> Result<ClientConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    load_from(&path)
}

/// Loads configuration from a specific file path.
///
/// A missing file yields the defaults. `$VAR` references are expanded from
/// the process environment, then `PLISIO_SECRET_KEY` and `PLISIO_API_URL`
/// override the file values.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_from(path: &str) -> Result<ClientConfig, ConfigError> {
    let lookup = |name: &str| std::env::var(name).ok();
    let content = if Path::new(path).exists() {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?
    } else {
        // No config file: rely on defaults and env overrides
        String::new()
    };
    let mut config = parse(path, &content, lookup)?;
    apply_overrides(&mut config, lookup);
    Ok(config)
}

fn parse(
    path: &str,
    content: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ConfigError> {
    let expanded = expand_env_vars(content, lookup);
    toml::from_str(&expanded).map_err(|source| ConfigError::Toml {
        path: path.to_owned(),
        source,
    })
}

fn apply_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(SECRET_KEY_VAR) {
        config.secret_key = key.into();
    }
    if let Some(url) = lookup(API_URL_VAR).filter(|url| !url.is_empty()) {
        config.api_url = url;
    }
}

/// Expands `$VAR` and `${VAR}` patterns using `lookup`.
///
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    closed = true;
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        match lookup(&var_name).filter(|_| !var_name.is_empty()) {
            Some(value) => result.push_str(&value),
            None => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn expands_plain_and_braced_vars() {
        let lookup = env(&[("KEY", "sk_live"), ("HOST", "plisio.net")]);
        assert_eq!(
            expand_env_vars("key=$KEY url=https://${HOST}/api", lookup),
            "key=sk_live url=https://plisio.net/api"
        );
    }

    #[test]
    fn leaves_unresolved_vars_untouched() {
        let lookup = env(&[]);
        assert_eq!(expand_env_vars("$MISSING ${ALSO} $ 5$", &lookup), "$MISSING ${ALSO} $ 5$");
        assert_eq!(expand_env_vars("${OPEN", &lookup), "${OPEN");
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("plisio.toml", "", env(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn file_values_are_expanded() {
        let content = r#"
secret_key = "$SHOP_KEY"
api_url = "http://localhost:9000/api/v1"
timeout_secs = 5
"#;
        let config = parse("plisio.toml", content, env(&[("SHOP_KEY", "sk_file")])).unwrap();
        assert_eq!(config.secret_key.expose(), "sk_file");
        assert_eq!(config.api_url, "http://localhost:9000/api/v1");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn env_overrides_win() {
        let mut config = parse("plisio.toml", r#"secret_key = "sk_file""#, env(&[])).unwrap();
        apply_overrides(
            &mut config,
            env(&[(SECRET_KEY_VAR, "sk_env"), (API_URL_VAR, "http://mock/api")]),
        );
        assert_eq!(config.secret_key.expose(), "sk_env");
        assert_eq!(config.api_url, "http://mock/api");
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let err = parse("broken.toml", "timeout_secs = \"soon\"", env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn load_from_reads_the_file() {
        let path = std::env::temp_dir().join(format!("plisio-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "timeout_secs = 7\n").unwrap();
        let config = load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_from("/nonexistent/plisio-cli/plisio.toml").unwrap();
        assert_eq!(config.timeout_secs, ClientConfig::default().timeout_secs);
    }
}
