//! Configuration loading and management.

use crate::cli::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{IntoDiagnostic, Result, WrapErr};
use ng_codegen::DEFAULT_SELECTOR_PREFIX;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up next to the inputs.
pub const CONFIG_FILE_NAME: &str = "react2ng.json";

/// Default output directory.
pub const DEFAULT_OUT_DIR: &str = "output";

/// Extensions of component source files picked up from directories.
const EXTENSIONS: &[&str] = &["jsx", "tsx", "js"];

/// Contents of `react2ng.json`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FileConfig {
    pub out_dir: Option<PathBuf>,
    pub selector_prefix: Option<String>,
    pub emit_stylesheet: Option<bool>,
    pub strict_state_mapping: Option<bool>,
    pub ignore: Vec<String>,
}

impl FileConfig {
    /// Read and parse a configuration file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Look for `react2ng.json` in `start` and its ancestors.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }
}

/// Resolved configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The configuration file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    /// Directory the artifacts are written to.
    pub out_dir: PathBuf,
    /// Selector prefix for generated components.
    pub selector_prefix: String,
    /// Write the empty stylesheet placeholder.
    pub emit_stylesheet: bool,
    /// Treat unmapped setters in input bindings as errors.
    pub strict_state_mapping: bool,
    /// Ignore patterns.
    pub ignore_patterns: Vec<String>,
    ignore_set: GlobSet,
}

impl Config {
    /// Load configuration from CLI arguments and the optional config file.
    ///
    /// CLI flags take precedence over the file, defaults apply last.
    pub fn load(args: &Args) -> Result<Self> {
        let config_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => args.inputs.first().and_then(|input| {
                let dir = if input.is_dir() {
                    input.as_path()
                } else {
                    input.parent().unwrap_or(Path::new("."))
                };
                let dir = if dir.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    dir
                };
                FileConfig::find(&absolute(dir))
            }),
        };

        let file = match &config_path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file, config_path)
    }

    fn resolve(args: &Args, file: FileConfig, config_path: Option<PathBuf>) -> Result<Self> {
        // outDir in the file is relative to the file itself
        let file_out_dir = file.out_dir.map(|dir| match &config_path {
            Some(path) if dir.is_relative() => path
                .parent()
                .map(|parent| parent.join(&dir))
                .unwrap_or(dir),
            _ => dir,
        });

        let out_dir = args
            .out_dir
            .clone()
            .or(file_out_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

        let selector_prefix = args
            .selector_prefix
            .clone()
            .or(file.selector_prefix)
            .unwrap_or_else(|| DEFAULT_SELECTOR_PREFIX.to_string());

        let emit_stylesheet = !args.skip_stylesheet && file.emit_stylesheet.unwrap_or(true);
        let strict_state_mapping =
            args.strict_state_mapping || file.strict_state_mapping.unwrap_or(false);

        let mut ignore_patterns = file.ignore;
        ignore_patterns.extend(args.ignore.iter().cloned());

        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            let glob = Glob::new(pattern)
                .into_diagnostic()
                .wrap_err_with(|| format!("Invalid ignore pattern `{}`", pattern))?;
            builder.add(glob);
        }
        let ignore_set = builder.build().into_diagnostic()?;

        Ok(Self {
            config_path,
            out_dir,
            selector_prefix,
            emit_stylesheet,
            strict_state_mapping,
            ignore_patterns,
            ignore_set,
        })
    }

    /// Check if a file found while walking a directory should be converted.
    pub fn should_process(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if !has_extension {
            return false;
        }

        if path
            .components()
            .any(|c| c.as_os_str() == "node_modules")
        {
            return false;
        }

        !self.is_ignored(path)
    }

    /// Check a path against the ignore patterns.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_set.is_match(path)
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["react2ng", "src/App.jsx"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&args(&[]), FileConfig::default(), None).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("output"));
        assert_eq!(config.selector_prefix, "app");
        assert!(config.emit_stylesheet);
        assert!(!config.strict_state_mapping);
    }

    #[test]
    fn test_file_config_parses_camel_case() {
        let file: FileConfig = serde_json::from_str(
            r#"{
                "outDir": "generated",
                "selectorPrefix": "acme",
                "emitStylesheet": false,
                "strictStateMapping": true,
                "ignore": ["**/legacy/**"]
            }"#,
        )
        .unwrap();
        assert_eq!(file.out_dir, Some(PathBuf::from("generated")));
        assert_eq!(file.selector_prefix.as_deref(), Some("acme"));
        assert_eq!(file.emit_stylesheet, Some(false));
        assert_eq!(file.strict_state_mapping, Some(true));
        assert_eq!(file.ignore, vec!["**/legacy/**".to_string()]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<FileConfig>(r#"{ "outdir": "x" }"#).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            out_dir: Some(PathBuf::from("generated")),
            selector_prefix: Some("acme".to_string()),
            ..FileConfig::default()
        };
        let config = Config::resolve(
            &args(&["--out-dir", "dist", "--selector-prefix", "x"]),
            file,
            None,
        )
        .unwrap();
        assert_eq!(config.out_dir, PathBuf::from("dist"));
        assert_eq!(config.selector_prefix, "x");
    }

    #[test]
    fn test_out_dir_is_relative_to_config_file() {
        let file = FileConfig {
            out_dir: Some(PathBuf::from("generated")),
            ..FileConfig::default()
        };
        let config = Config::resolve(
            &args(&[]),
            file,
            Some(PathBuf::from("/project/react2ng.json")),
        )
        .unwrap();
        assert_eq!(config.out_dir, PathBuf::from("/project/generated"));
    }

    #[test]
    fn test_skip_stylesheet_wins_over_file() {
        let file = FileConfig {
            emit_stylesheet: Some(true),
            ..FileConfig::default()
        };
        let config = Config::resolve(&args(&["--skip-stylesheet"]), file, None).unwrap();
        assert!(!config.emit_stylesheet);
    }

    #[test]
    fn test_should_process() {
        let config = Config::resolve(
            &args(&["--ignore", "**/*.test.jsx"]),
            FileConfig::default(),
            None,
        )
        .unwrap();
        assert!(config.should_process(Path::new("src/TodoList.jsx")));
        assert!(config.should_process(Path::new("src/Form.tsx")));
        assert!(config.should_process(Path::new("src/Card.js")));
        assert!(!config.should_process(Path::new("src/styles.css")));
        assert!(!config.should_process(Path::new("node_modules/react/index.js")));
        assert!(!config.should_process(Path::new("src/TodoList.test.jsx")));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let result = Config::resolve(&args(&["--ignore", "a[b"]), FileConfig::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_walks_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src/components");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        assert_eq!(
            FileConfig::find(&nested),
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }
}
