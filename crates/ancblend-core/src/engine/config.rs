use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default prefix of the per-class reconstruction directories.
pub const DEFAULT_CLASS_DIR_PREFIX: &str = "class_";
/// Default output directory for the reconciled ancestors.
pub const DEFAULT_OUTPUT_DIR: &str = "final_anc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}", path = path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Parameters of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Alignment file carrying the `#=GR` structural annotations.
    pub alignment_path: PathBuf,
    /// Fit log with per-class rates/fractions and the global scalars.
    pub log_path: PathBuf,
    /// Directory containing one `<prefix><tag>/` reconstruction directory per
    /// structural class.
    pub class_root: PathBuf,
    /// Prefix of the per-class directories.
    pub class_dir_prefix: String,
    /// Destination for the reconciled per-node tables. Created if absent,
    /// reused if present.
    pub output_dir: PathBuf,
}

impl ReconcileConfig {
    /// The reconstruction directory of one class (`<root>/<prefix><tag>`).
    pub fn class_dir(&self, tag: &str) -> PathBuf {
        self.class_root
            .join(format!("{}{}", self.class_dir_prefix, tag))
    }
}

/// On-disk TOML layer of [`ReconcileConfig`]; every field optional so the
/// command line can fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileConfigFile {
    pub alignment: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub class_root: Option<PathBuf>,
    pub class_prefix: Option<String>,
    pub output: Option<PathBuf>,
}

impl ReconcileConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[derive(Default)]
pub struct ReconcileConfigBuilder {
    alignment_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    class_root: Option<PathBuf>,
    class_dir_prefix: Option<String>,
    output_dir: Option<PathBuf>,
}

impl ReconcileConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder from a config file; later builder calls override.
    pub fn from_file(file: ReconcileConfigFile) -> Self {
        Self {
            alignment_path: file.alignment,
            log_path: file.log,
            class_root: file.class_root,
            class_dir_prefix: file.class_prefix,
            output_dir: file.output,
        }
    }

    pub fn alignment_path(mut self, path: PathBuf) -> Self {
        self.alignment_path = Some(path);
        self
    }

    pub fn log_path(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }

    pub fn class_root(mut self, path: PathBuf) -> Self {
        self.class_root = Some(path);
        self
    }

    pub fn class_dir_prefix(mut self, prefix: String) -> Self {
        self.class_dir_prefix = Some(prefix);
        self
    }

    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] if the alignment or log path
    /// was provided neither by the file nor the builder.
    pub fn build(self) -> Result<ReconcileConfig, ConfigError> {
        Ok(ReconcileConfig {
            alignment_path: self
                .alignment_path
                .ok_or(ConfigError::MissingParameter("alignment_path"))?,
            log_path: self
                .log_path
                .ok_or(ConfigError::MissingParameter("log_path"))?,
            class_root: self.class_root.unwrap_or_else(|| PathBuf::from(".")),
            class_dir_prefix: self
                .class_dir_prefix
                .unwrap_or_else(|| DEFAULT_CLASS_DIR_PREFIX.to_string()),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_defaults_for_optional_fields() {
        let config = ReconcileConfigBuilder::new()
            .alignment_path(PathBuf::from("aln.phy"))
            .log_path(PathBuf::from("fit.log"))
            .build()
            .unwrap();
        assert_eq!(config.class_root, PathBuf::from("."));
        assert_eq!(config.class_dir_prefix, DEFAULT_CLASS_DIR_PREFIX);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn missing_required_paths_are_reported() {
        let err = ReconcileConfigBuilder::new()
            .log_path(PathBuf::from("fit.log"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter("alignment_path")
        ));
    }

    #[test]
    fn class_dirs_are_rooted_and_prefixed() {
        let config = ReconcileConfigBuilder::new()
            .alignment_path(PathBuf::from("aln.phy"))
            .log_path(PathBuf::from("fit.log"))
            .class_root(PathBuf::from("/data/run1"))
            .build()
            .unwrap();
        assert_eq!(config.class_dir("bh"), PathBuf::from("/data/run1/class_bh"));
    }

    #[test]
    fn file_values_seed_the_builder_and_calls_override() {
        let file: ReconcileConfigFile = toml::from_str(
            "alignment = \"a.phy\"\nlog = \"fit.log\"\noutput = \"out\"\n",
        )
        .unwrap();
        let config = ReconcileConfigBuilder::from_file(file)
            .output_dir(PathBuf::from("elsewhere"))
            .build()
            .unwrap();
        assert_eq!(config.alignment_path, PathBuf::from("a.phy"));
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let parsed: Result<ReconcileConfigFile, _> = toml::from_str("alignmnet = \"a.phy\"\n");
        assert!(parsed.is_err());
    }
}
