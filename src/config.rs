use crate::render::DEFAULT_CONTAINER_ID;
use serde::Deserialize;
use std::fs::File;
use std::io::{ ErrorKind, Read };
use std::path::{ Path, PathBuf };
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "solnav.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read config '{}': {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("couldn't parse yaml in '{}': {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("bad base_url '{url}': {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("couldn't use the working directory as base_url: {0}")]
    WorkingDir(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listing endpoint, relative to `base_url` unless absolute.
    pub list_url: String,
    pub base_url: Option<String>,
    /// Prepended to every file link, e.g. `solution` when files are served
    /// under `/solution/`.
    pub link_prefix: String,
    pub container_id: String,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            list_url: "list".to_string(),
            base_url: None,
            link_prefix: String::new(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Base for relative endpoints. Without `base_url` this is the working
    /// directory, as if the page had been opened from disk.
    pub fn resolve_base(&self) -> Result<Url, ConfigError> {
        match &self.base_url {
            Some(url) =>
                Url::parse(url).map_err(|source| ConfigError::BaseUrl { url: url.clone(), source }),
            None => {
                let cwd = std::env
                    ::current_dir()
                    .map_err(|err| ConfigError::WorkingDir(err.to_string()))?;
                Url::from_directory_path(&cwd).map_err(|()| {
                    ConfigError::WorkingDir(format!("'{}' is not an absolute path", cwd.display()))
                })
            }
        }
    }
}

/// Loads the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Read { path: path.to_path_buf(), source });
        }
    };
    let mut contents = String::new();
    file
        .read_to_string(&mut contents)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    parse_config(&contents).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn parse_config(contents: &str) -> Result<Config, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("solnav.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.list_url, "list");
        assert_eq!(config.container_id, "solution_display");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solnav.yaml");
        std::fs::write(&path, "base_url: https://example.com/course/\nlog_json: true\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://example.com/course/"));
        assert!(config.log_json);
        assert_eq!(config.list_url, "list");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solnav.yaml");
        std::fs::write(&path, "bin_url: nope\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn base_defaults_to_working_directory() {
        let base = Config::default().resolve_base().unwrap();
        assert_eq!(base.scheme(), "file");
        assert!(base.path().ends_with('/'));
        assert_eq!(base.to_file_path().unwrap(), std::env::current_dir().unwrap());
    }

    #[test]
    fn explicit_base_is_parsed() {
        let config = Config {
            base_url: Some("https://example.com/course/".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_base().unwrap().as_str(), "https://example.com/course/");

        let bad = Config { base_url: Some("not a url".to_string()), ..Config::default() };
        assert!(matches!(bad.resolve_base(), Err(ConfigError::BaseUrl { .. })));
    }

    #[test]
    fn link_prefix_is_read() {
        let config = parse_config("link_prefix: solution\n").unwrap();
        assert_eq!(config.link_prefix, "solution");
        assert_eq!(Config::default().link_prefix, "");
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("\n").unwrap(), Config::default());
    }
}
