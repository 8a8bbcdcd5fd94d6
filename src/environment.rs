use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

pub const PATH_VAR: &str = "PATH";
const PATH_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq)]
struct Variable {
    value: String,
    exported: bool,
}

/// Snapshot of the variables handed to resolvers and child processes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    vars: HashMap<String, Variable>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::import(std::env::vars_os())
    }

    /// Exported snapshot of `vars`. Entries that are not valid UTF-8 are left
    /// out, so children never see them.
    pub fn import<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env = Environment::empty();

        for (k, v) in vars {
            match (k.into_string(), v.into_string()) {
                (Ok(k), Ok(v)) => {
                    env.vars.insert(
                        k,
                        Variable {
                            value: v,
                            exported: true,
                        },
                    );
                }
                (k, _) => {
                    let name = k.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                    log::debug!("dropping non-UTF-8 variable {}", name);
                }
            }
        }

        env
    }

    pub fn empty() -> Self {
        Environment {
            vars: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.value.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars
            .entry(key.to_string())
            .and_modify(|var| var.value = value.to_string())
            .or_insert(Variable {
                value: value.to_string(),
                exported: false,
            });
    }

    pub fn set_exported(&mut self, key: &str, value: &str) {
        self.set(key, value);
        self.export(key);
    }

    pub fn unset(&mut self, key: &str) {
        self.vars.remove(key);
    }

    pub fn export(&mut self, key: &str) {
        if let Some(var) = self.vars.get_mut(key) {
            var.exported = true;
        }
    }

    pub fn all(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    pub fn exported_vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .filter(|(_, v)| v.exported)
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    /// Ordered search directories from `PATH`. Empty when `PATH` is unset.
    pub fn search_path(&self) -> Vec<PathBuf> {
        self.get(PATH_VAR)
            .map(split_search_path)
            .unwrap_or_default()
    }
}

/// Splits a `PATH`-style value on `:`, keeping order and empty entries.
pub fn split_search_path(value: &str) -> Vec<PathBuf> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(PATH_SEPARATOR).map(PathBuf::from).collect()
}
