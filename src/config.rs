use crate::markdown::images::DEFAULT_IMAGE_EXTENSIONS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub source_dir: Option<PathBuf>,

    #[serde(default)]
    pub format: FormatConfig,

    #[serde(default)]
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_true")]
    pub standardize_front_matter: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            standardize_front_matter: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// On-disk shape. Every key is optional so later layers only override what they set.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    source_dir: Option<PathBuf>,

    #[serde(default)]
    format: FormatFile,

    #[serde(default)]
    images: ImageFile,
}

#[derive(Debug, Default, Deserialize)]
struct FormatFile {
    standardize_front_matter: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageFile {
    extensions: Option<Vec<String>>,
}

impl Config {
    /// Layers, lowest priority first: global file, project file, `--config`
    /// file, environment, then the `source_dir` flag.
    pub fn load(config_path: Option<&PathBuf>, source_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            tracing::debug!("Loading global config: {:?}", global_path);
            config.merge(Self::load_from_file(&global_path)?);
        }

        // 2. Load project config
        if let Some(project_path) = Self::project_config_path() {
            tracing::debug!("Loading project config: {:?}", project_path);
            config.merge(Self::load_from_file(&project_path)?);
        }

        // 3. Load custom config file
        if let Some(path) = config_path {
            tracing::debug!("Loading custom config: {:?}", path);
            config.merge(Self::load_from_file(path)?);
        }

        // 4. Environment variables override
        if let Ok(val) = std::env::var("WX_ARTICLE_MD_DIR")
            && !val.trim().is_empty()
        {
            config.source_dir = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("MDWX_IMAGE_EXTENSIONS") {
            config.images.extensions = val
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .collect();
        }

        if let Ok(val) = std::env::var("MDWX_STANDARDIZE_FRONT_MATTER") {
            config.format.standardize_front_matter = val
                .parse()
                .context("Invalid MDWX_STANDARDIZE_FRONT_MATTER")?;
        }

        // 5. CLI flags override (highest priority)
        if source_dir.is_some() {
            config.source_dir = source_dir;
        }

        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<ConfigFile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn merge(&mut self, other: ConfigFile) {
        if other.source_dir.is_some() {
            self.source_dir = other.source_dir;
        }
        if let Some(standardize) = other.format.standardize_front_matter {
            self.format.standardize_front_matter = standardize;
        }
        if let Some(extensions) = other.images.extensions {
            self.images.extensions = extensions;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.images.extensions.is_empty() {
            anyhow::bail!("images.extensions must list at least one extension");
        }

        if let Some(ext) = self.images.extensions.iter().find(|e| e.contains(['.', '/'])) {
            anyhow::bail!("Invalid image extension {:?}: use bare names like \"png\"", ext);
        }

        Ok(())
    }

    /// The configured article directory.
    pub fn source_dir(&self) -> Result<&Path> {
        self.source_dir.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Source directory not configured. Set via:\n\
                 1. a path argument\n\
                 2. WX_ARTICLE_MD_DIR env var\n\
                 3. Config file: mdwx config init"
            )
        })
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config/mdwx/config.toml"))
    }

    pub fn project_config_path() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        let mut dir = current.as_path();

        loop {
            let candidate = dir.join(".mdwx.toml");
            if candidate.exists() {
                return Some(candidate);
            }

            dir = dir.parent()?;
        }
    }

    pub fn init_config(global: bool) -> Result<PathBuf> {
        let path = if global {
            Self::global_config_path().context("Failed to determine global config path")?
        } else {
            PathBuf::from(".mdwx.toml")
        };

        if path.exists() {
            anyhow::bail!("Config file already exists: {:?}", path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template = r#"# Directory holding the Markdown articles (or set WX_ARTICLE_MD_DIR)
# source_dir = "./articles"

[format]
# Rewrite `key: value` front matter lines as key="value"
standardize_front_matter = true

[images]
extensions = ["jpg", "jpeg", "png", "gif", "webp", "svg"]
"#;

        fs::write(&path, template)?;
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::field_reassign_with_default)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.format.standardize_front_matter);
        assert_eq!(config.images.extensions.len(), DEFAULT_IMAGE_EXTENSIONS.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_only_overrides_set_keys() {
        let mut config = Config::default();
        let file: ConfigFile = toml::from_str("source_dir = \"posts\"\n").unwrap();
        config.merge(file);
        assert_eq!(config.source_dir, Some(PathBuf::from("posts")));
        assert!(config.format.standardize_front_matter);

        let file: ConfigFile =
            toml::from_str("[format]\nstandardize_front_matter = false\n[images]\nextensions = [\"png\"]\n")
                .unwrap();
        config.merge(file);
        assert_eq!(config.source_dir, Some(PathBuf::from("posts")));
        assert!(!config.format.standardize_front_matter);
        assert_eq!(config.images.extensions, vec!["png"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[format]\nstandardize_front_matter = true\n\n[images]\nextensions = [\"png\"]\n",
        )
        .unwrap();
        let file = Config::load_from_file(&path).unwrap();
        assert_eq!(file.images.extensions, Some(vec!["png".to_string()]));
    }

    #[test]
    fn test_empty_extensions_fail() {
        let mut config = Config::default();
        config.images.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dotted_extension_fails() {
        let mut config = Config::default();
        config.images.extensions = vec![".png".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_source_dir() {
        let config = Config::default();
        assert!(config.source_dir().is_err());
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "source_dir = [").unwrap();
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
