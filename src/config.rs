use crate::error::{FixerError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub fixer: FixerConfig,
}

#[derive(Debug, Deserialize)]
pub struct FixerConfig {
    /// Issue prefixes recognized when none are supplied on the command line
    /// or via the environment.
    pub prefixes: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(path)
            .map_err(|e| FixerError::Config(format!("Failed to read config file '{}': {}", path, e)))?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_prefixes_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fixer]\nprefixes = [\"FOO\", \"BAR\"]").unwrap();

        let config = Config::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.fixer.prefixes, vec!["FOO", "BAR"]);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load_from("does-not-exist.toml").unwrap_err();
        assert!(matches!(err, FixerError::Config(_)));
    }
}
