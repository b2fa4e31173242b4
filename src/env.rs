//! Minimal `.env` loader.
//!
//! One `KEY=VALUE` pair per line. Blank lines and lines starting with `#` are
//! ignored. There is no quoting, escaping or multi-line support. A key that is
//! already present is never replaced (first write wins), so values taken from
//! the process environment beat values read from the file.

use std::{collections::HashMap, env, fs, io, path::Path};

use crate::error::EnvError;

#[derive(Debug, Default, Clone)]
pub struct EnvMap {
    vars: HashMap<String, String>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the mapping with every variable already set on the process.
    /// Variables that are not valid unicode are left out.
    pub fn from_process() -> Self {
        let mut map = Self::new();
        for (key, value) in env::vars_os() {
            if let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) {
                map.set_if_absent(key, value);
            }
        }
        map
    }

    /// Returns `true` when the value was stored.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.vars.contains_key(&key) {
            return false;
        }
        self.vars.insert(key, value.into());
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_owned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Loads `path` into the mapping and returns how many keys were newly set.
    ///
    /// A missing file is not an error and leaves the mapping untouched.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, EnvError> {
        let path = path.as_ref();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no env file at {}", path.display());
                return Ok(0);
            }
            Err(source) => {
                return Err(EnvError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let stored = self.parse_lines(&contents, &path.display().to_string());
        tracing::debug!("loaded {stored} new variable(s) from {}", path.display());
        Ok(stored)
    }

    /// Applies the `.env` line rules to text already in memory.
    pub fn parse_str(&mut self, contents: &str) -> usize {
        self.parse_lines(contents, "<string>")
    }

    fn parse_lines(&mut self, contents: &str, origin: &str) -> usize {
        let mut stored = 0;

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Line content is not logged, it may hold a password.
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!("{origin}:{}: skipping line without `=`", idx + 1);
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                tracing::warn!("{origin}:{}: skipping line with empty key", idx + 1);
                continue;
            }

            if self.set_if_absent(key, value.trim()) {
                stored += 1;
            }
        }

        stored
    }
}
