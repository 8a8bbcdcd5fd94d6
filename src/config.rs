use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use thiserror::Error;

use crate::environment::{Environment, PATH_VAR};

const FALLBACK_SHELL: &str = "/bin/sh";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Launch path used by `sh` and for running scripts.
    pub shell: PathBuf,
    /// Replaces `PATH` for resolution and child processes when set.
    pub path: Option<String>,
    pub env_vars: HashMap<String, String>,
}

impl Config {
    /// Builds the environment children and resolvers see.
    pub fn apply(&self, env: &mut Environment) {
        if let Some(path) = &self.path {
            env.set_exported(PATH_VAR, path);
        }
        for (k, v) in &self.env_vars {
            env.set_exported(k, v);
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        let shell = std::env::var_os("SHELL")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_SHELL));
        Config {
            shell,
            path: None,
            env_vars: HashMap::new(),
        }
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let mut src = String::new();
        for line in BufReader::new(file).lines() {
            src.push_str(&line?);
            src.push('\n');
        }
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut shell = None;
        let mut path = None;
        let mut env_vars = HashMap::new();

        for (lineno, line) in src.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno + 1, line)));
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "shell" => {
                    if value.is_empty() {
                        return Err(ConfigError::Parse(format!("Line {}: Empty shell", lineno + 1)));
                    }
                    shell = Some(PathBuf::from(value));
                }
                "path" => path = Some(value.to_string()),
                k if k.starts_with("env.") => {
                    let var = k.trim_start_matches("env.");
                    if var.is_empty() {
                        return Err(ConfigError::Parse(format!("Line {}: Missing variable name", lineno + 1)));
                    }
                    env_vars.insert(var.to_string(), value.to_string());
                }
                _ => return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno + 1, key))),
            }
        }

        let default = ConfigLoader::default_config();
        Ok(Config {
            shell: shell.unwrap_or(default.shell),
            path,
            env_vars,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_all_keys() {
        let src = "# swish\n\nshell=/bin/bash\npath=/opt/bin:/usr/bin\nenv.LANG = C.UTF-8\n";
        let config = ConfigLoader::load_from_str(src).unwrap();
        assert_eq!(config.shell, PathBuf::from("/bin/bash"));
        assert_eq!(config.path.as_deref(), Some("/opt/bin:/usr/bin"));
        assert_eq!(config.env_vars.get("LANG").map(String::as_str), Some("C.UTF-8"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::load_from_str("").unwrap();
        assert_eq!(config, ConfigLoader::default_config());
        assert!(config.path.is_none());
    }

    #[test]
    fn rejects_unknown_key() {
        let err = ConfigLoader::load_from_str("shell=/bin/sh\ncolor=red\n").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: Line 2: Unknown key: color");
    }

    #[test]
    fn rejects_line_without_equals() {
        let err = ConfigLoader::load_from_str("shell").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.starts_with("Line 1")));
    }

    #[test]
    fn apply_exports_path_and_env() {
        let config = ConfigLoader::load_from_str("path=/opt/bin\nenv.FOO=bar\n").unwrap();
        let mut env = Environment::empty();
        config.apply(&mut env);
        let exported = env.exported_vars();
        assert!(exported.contains(&("PATH".to_string(), "/opt/bin".to_string())));
        assert!(exported.contains(&("FOO".to_string(), "bar".to_string())));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shell=/bin/zsh").unwrap();
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.shell, PathBuf::from("/bin/zsh"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ConfigLoader::load_from_file("/nonexistent/swishrc").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
