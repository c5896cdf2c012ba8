use pilcrow_engine::{EditorOptions, Kind, editing::DEFAULT_CHANGE_BUFFER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub documents_path: PathBuf,
    #[serde(default)]
    pub editor: EditorConfig,
}

/// `[editor]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Change notifications buffered per subscriber
    pub change_buffer: usize,
    /// Kind of the first block appended to an empty document
    pub default_kind: Kind,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            change_buffer: DEFAULT_CHANGE_BUFFER,
            default_kind: Kind::HEADING,
        }
    }
}

impl EditorConfig {
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            change_buffer: self.change_buffer,
            default_kind: self.default_kind.clone(),
            ..EditorOptions::default()
        }
    }
}

impl Config {
    pub fn new(documents_path: PathBuf) -> Self {
        Self {
            documents_path,
            editor: EditorConfig::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded documents path
        config.documents_path =
            Self::expand_path(&config.documents_path).unwrap_or(config.documents_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/pilcrow");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/pilcrow/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            documents_path: PathBuf::from("/tmp/test-documents"),
            editor: EditorConfig {
                change_buffer: 32,
                default_kind: Kind::PARAGRAPH,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original.documents_path, deserialized.documents_path);
        assert_eq!(original.editor, deserialized.editor);
    }

    #[test]
    fn test_editor_table_is_optional() {
        let config: Config = toml::from_str(r#"documents_path = "/docs""#).unwrap();

        assert_eq!(config.editor, EditorConfig::default());
        assert_eq!(config.editor.default_kind, Kind::HEADING);
    }

    #[test]
    fn test_partial_editor_table_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
documents_path = "/docs"

[editor]
default_kind = "todo"
"#,
        )
        .unwrap();

        assert_eq!(config.editor.default_kind, Kind::TODO);
        assert_eq!(config.editor.change_buffer, DEFAULT_CHANGE_BUFFER);

        let options = config.editor.editor_options();
        assert_eq!(options.default_kind, Kind::TODO);
        assert_eq!(options.change_buffer, DEFAULT_CHANGE_BUFFER);
    }

    #[test]
    fn test_empty_default_kind_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "documents_path = \"/docs\"\n[editor]\ndefault_kind = \"\"\n",
        )
        .unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("PILCROW_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$PILCROW_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("PILCROW_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        assert_eq!(Config::expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config::new(PathBuf::from("/tmp/test-documents"));

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config.documents_path, test_config.documents_path);
        assert_eq!(loaded_config.editor, test_config.editor);
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        unsafe {
            env::set_var("PILCROW_DOCS_ROOT", "/custom/docs");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "documents_path = \"$PILCROW_DOCS_ROOT/mine\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.documents_path, PathBuf::from("/custom/docs/mine"));

        unsafe {
            env::remove_var("PILCROW_DOCS_ROOT");
        }
    }
}
