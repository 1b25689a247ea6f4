//! Orchestrator for running conversions.

use crate::cli::Args;
use crate::config::Config;
use crate::output::OutputFormatter;
use crate::sink::{ArtifactSink, DirectorySink, MemorySink};
use jsx_parser::ParseError;
use miette::{Diagnostic, IntoDiagnostic, LabeledSpan, NamedSource, Report, Result, WrapErr};
use ng_codegen::{generate_component, ArtifactNames, CodegenOptions};
use ng_template_compiler::{translate_fragment, TemplateWarning, TranslateError, TranslateOptions};
use source_map::Span;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of a run over all inputs.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Number of input files.
    pub file_count: usize,
    /// Number of components generated.
    pub converted: usize,
    /// Number of inputs that failed.
    pub failed: usize,
    /// Number of template warnings.
    pub warning_count: usize,
    /// Time taken.
    pub duration_ms: u64,
}

/// Options for converting one component.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub codegen: CodegenOptions,
    pub translate: TranslateOptions,
    /// Write the empty stylesheet placeholder.
    pub emit_stylesheet: bool,
}

impl ConvertOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            codegen: CodegenOptions {
                selector_prefix: config.selector_prefix.clone(),
            },
            translate: TranslateOptions {
                strict_state_mapping: config.strict_state_mapping,
            },
            emit_stylesheet: config.emit_stylesheet,
        }
    }
}

/// A generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub contents: String,
}

/// Everything generated for one component.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Component identifier.
    pub component: String,
    /// Class, template and (optionally) stylesheet, in write order.
    pub artifacts: Vec<Artifact>,
    /// Template output needing manual review.
    pub warnings: Vec<TemplateWarning>,
}

impl Conversion {
    /// Write every artifact to a sink.
    ///
    /// If a write fails, the artifacts written before it are removed again so
    /// a component is never left half generated.
    pub fn emit(&self, sink: &mut dyn ArtifactSink) -> std::io::Result<()> {
        for (written, artifact) in self.artifacts.iter().enumerate() {
            if let Err(err) = sink.write(&artifact.name, &artifact.contents) {
                for done in &self.artifacts[..written] {
                    if let Err(remove_err) = sink.remove(&done.name) {
                        tracing::warn!(
                            artifact = %done.name,
                            error = %remove_err,
                            "failed to remove partially written artifact"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

/// A conversion failure pointing into the source file.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SourceDiagnostic {
    message: String,
    code: &'static str,
    label: &'static str,
    span: Span,
    src: NamedSource<String>,
}

impl SourceDiagnostic {
    fn new(
        name: &str,
        source: &str,
        message: String,
        code: &'static str,
        label: &'static str,
        span: Span,
    ) -> Self {
        Self {
            message,
            code,
            label,
            span,
            src: NamedSource::new(name, source.to_string()),
        }
    }

    fn from_parse_error(name: &str, source: &str, err: ParseError) -> Self {
        Self::new(name, source, err.message, err.code.as_str(), "here", err.span)
    }

    fn from_translate_error(name: &str, source: &str, err: TranslateError) -> Self {
        Self::new(
            name,
            source,
            err.message,
            err.code.as_str(),
            "input binding",
            err.span,
        )
    }
}

impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let range = self.span.to_range();
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label.to_string()),
            (range.start, range.end - range.start),
        ))))
    }
}

/// Convert one component source into its Angular artifacts.
///
/// `name` is only used to label diagnostics. Nothing is produced unless every
/// stage succeeds.
pub fn convert_source(
    name: &str,
    source: &str,
    options: &ConvertOptions,
) -> std::result::Result<Conversion, SourceDiagnostic> {
    let parsed = jsx_parser::parse(source)
        .map_err(|err| SourceDiagnostic::from_parse_error(name, source, err))?;
    let model = &parsed.model;

    let translated = translate_fragment(&parsed.fragment, &model.states, &options.translate)
        .map_err(|err| SourceDiagnostic::from_translate_error(name, source, err))?;
    let class = generate_component(model, &options.codegen);

    let names = ArtifactNames::new(&model.identifier);
    let mut artifacts = vec![
        Artifact {
            name: names.class_file,
            contents: format!("{}\n", class),
        },
        Artifact {
            name: names.template_file,
            contents: format!("{}\n", translated.template),
        },
    ];
    if options.emit_stylesheet {
        artifacts.push(Artifact {
            name: names.stylesheet_file,
            contents: String::new(),
        });
    }

    Ok(Conversion {
        component: model.identifier.to_string(),
        artifacts,
        warnings: translated.warnings,
    })
}

/// Orchestrator for running react2ng.
pub struct Orchestrator {
    /// Configuration.
    config: Config,
    /// CLI arguments.
    args: Args,
    /// Output formatter.
    formatter: OutputFormatter,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::load(&args)?;
        let formatter = OutputFormatter::new(args.output);

        if let Some(path) = &config.config_path {
            tracing::debug!(config = %path.display(), "loaded configuration");
        }
        tracing::debug!(
            out_dir = %config.out_dir.display(),
            ignore = ?config.ignore_patterns,
            "resolved configuration"
        );

        Ok(Self {
            config,
            args,
            formatter,
        })
    }

    /// Convert every input once.
    pub fn run_once(&self) -> Result<RunResult> {
        let files = self.find_component_files()?;
        tracing::debug!(count = files.len(), "found component files");
        Ok(self.run_files(&files))
    }

    /// Run in watch mode.
    pub fn run_watch_mode(&self) -> Result<()> {
        use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
        use std::sync::mpsc::{channel, RecvTimeoutError};
        use std::time::Duration;

        eprintln!("Starting watch mode...\n");

        // Initial run
        let _ = self.run_once();

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
        )
        .into_diagnostic()?;

        for input in &self.args.inputs {
            let mode = if input.is_dir() {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher
                .watch(input, mode)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to watch {}", input.display()))?;
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    let mut changed: Vec<PathBuf> = Vec::new();
                    let pending = std::iter::once(event).chain(rx.try_iter());
                    for path in pending.flat_map(|e| e.paths) {
                        if path.is_file() && self.config.should_process(&path)
                            && !changed.contains(&path)
                        {
                            changed.push(path);
                        }
                    }

                    if !changed.is_empty() {
                        eprintln!("File change detected. Rerunning...\n");
                        self.run_files(&changed);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(())
    }

    fn run_files(&self, files: &[PathBuf]) -> RunResult {
        let start = Instant::now();
        let options = ConvertOptions::from_config(&self.config);
        let mut result = RunResult {
            file_count: files.len(),
            ..RunResult::default()
        };

        for file in files {
            match self.convert_file(file, &options) {
                Ok(conversion) => {
                    result.converted += 1;
                    result.warning_count += conversion.warnings.len();
                }
                Err(report) => {
                    result.failed += 1;
                    self.formatter.print_failure(file, &report);
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        self.formatter.print_summary(&result);
        result
    }

    fn convert_file(&self, path: &Path, options: &ConvertOptions) -> Result<Conversion> {
        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

        let name = path.display().to_string();
        let conversion = convert_source(&name, &source, options).map_err(Report::new)?;

        for warning in &conversion.warnings {
            tracing::debug!(code = warning.code.as_str(), "{}", warning.message);
        }

        if self.args.dry_run {
            let mut sink = MemorySink::new();
            conversion.emit(&mut sink).into_diagnostic()?;
            self.formatter
                .print_conversion(path, &source, &conversion, None, Some(&sink));
        } else {
            let mut sink = DirectorySink::new(&self.config.out_dir);
            conversion
                .emit(&mut sink)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write to {}", sink.dir().display()))?;
            self.formatter
                .print_conversion(path, &source, &conversion, Some(sink.dir()), None);
        }

        Ok(conversion)
    }

    /// Expand the inputs into component files.
    ///
    /// Files named directly are always converted; directories are walked and
    /// filtered by extension and ignore patterns.
    fn find_component_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in &self.args.inputs {
            if input.is_file() {
                files.push(input.clone());
                continue;
            }
            if !input.is_dir() {
                return Err(miette::miette!("Input not found: {}", input.display()));
            }

            let mut found: Vec<PathBuf> = walkdir::WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_entry(|e| e.file_name() != "node_modules")
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|path| self.config.should_process(path))
                .collect();
            found.sort();
            files.extend(found);
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COUNTER: &str = r#"import React, { useState } from 'react';

export default function Counter() {
  const [count, setCount] = useState(0);

  const increment = () => {
    setCount(count + 1);
  };

  return (
    <div>
      <p>{count}</p>
      <button onClick={increment}>+</button>
    </div>
  );
}
"#;

    fn convert(source: &str, options: &ConvertOptions) -> MemorySink {
        let conversion = convert_source("Counter.jsx", source, options).unwrap();
        let mut sink = MemorySink::new();
        conversion.emit(&mut sink).unwrap();
        sink
    }

    #[test]
    fn test_sink_receives_three_artifacts() {
        let options = ConvertOptions {
            emit_stylesheet: true,
            ..ConvertOptions::default()
        };
        let sink = convert(COUNTER, &options);

        let names: Vec<_> = sink.files.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "Counter.component.ts",
                "Counter.component.html",
                "Counter.component.css"
            ]
        );
        assert_eq!(sink.get("Counter.component.css"), Some(""));
        assert_eq!(
            sink.get("Counter.component.html"),
            Some(
                "<div>\n      <p>{{ count }}</p>\n      <button (click)=\"increment()\">+</button>\n    </div>\n"
            )
        );

        let class = sink.get("Counter.component.ts").unwrap();
        assert!(class.contains("selector: 'app-counter',"));
        assert!(class.contains("  count: number = 0;\n"));
        assert!(class.contains("    this.count = this.count + 1;\n"));
        assert!(class.ends_with("}\n"));
    }

    /// Fails the write of one named artifact.
    struct FailingSink {
        inner: MemorySink,
        fail_on: &'static str,
    }

    impl ArtifactSink for FailingSink {
        fn write(&mut self, name: &str, contents: &str) -> std::io::Result<()> {
            if name == self.fail_on {
                return Err(std::io::Error::other("disk full"));
            }
            self.inner.write(name, contents)
        }

        fn remove(&mut self, name: &str) -> std::io::Result<()> {
            self.inner.remove(name)
        }
    }

    #[test]
    fn test_failed_write_removes_earlier_artifacts() {
        let options = ConvertOptions {
            emit_stylesheet: true,
            ..ConvertOptions::default()
        };
        let conversion = convert_source("Counter.jsx", COUNTER, &options).unwrap();
        let mut sink = FailingSink {
            inner: MemorySink::new(),
            fail_on: "Counter.component.css",
        };

        let err = conversion.emit(&mut sink).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(sink.inner.files.is_empty());
    }

    #[test]
    fn test_failed_directory_write_leaves_no_partial_component() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory in the way of the template file makes its write fail.
        std::fs::create_dir(tmp.path().join("Counter.component.html")).unwrap();

        let conversion = convert_source("Counter.jsx", COUNTER, &ConvertOptions::default()).unwrap();
        let mut sink = DirectorySink::new(tmp.path());
        assert!(conversion.emit(&mut sink).is_err());
        assert!(!tmp.path().join("Counter.component.ts").exists());
    }

    #[test]
    fn test_skip_stylesheet_writes_two_files() {
        let sink = convert(COUNTER, &ConvertOptions::default());
        assert_eq!(sink.files.len(), 2);
        assert!(sink.get("Counter.component.css").is_none());
    }

    #[test]
    fn test_selector_prefix_is_applied() {
        let options = ConvertOptions {
            codegen: CodegenOptions {
                selector_prefix: "acme".to_string(),
            },
            ..ConvertOptions::default()
        };
        let sink = convert(COUNTER, &options);
        assert!(sink
            .get("Counter.component.ts")
            .unwrap()
            .contains("selector: 'acme-counter',"));
    }

    #[test]
    fn test_missing_component_produces_nothing() {
        let err = convert_source(
            "util.js",
            "export const add = (a, b) => a + b;\n",
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, "no-component");
        assert!(err.to_string().starts_with("no component definition"));
    }

    #[test]
    fn test_missing_fragment_points_at_component() {
        let source = "function Empty() {\n  return null;\n}\n";
        let err = convert_source("Empty.jsx", source, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.code, "no-markup-fragment");
        assert_eq!(err.span.slice(source), "Empty");
    }

    #[test]
    fn test_strict_mapping_failure_produces_nothing() {
        let source = r#"function Search() {
  return (<input value={query} onChange={(e) => setQuery(e.target.value)} />);
}"#;
        let options = ConvertOptions {
            translate: TranslateOptions {
                strict_state_mapping: true,
            },
            ..ConvertOptions::default()
        };
        let err = convert_source("Search.jsx", source, &options).unwrap_err();
        assert_eq!(err.code, "unmapped-setter");
        assert!(err.span.slice(source).starts_with("<input"));
    }

    #[test]
    fn test_diagnostic_has_label_and_source() {
        let err = convert_source("util.js", "const x = 1;", &ConvertOptions::default())
            .unwrap_err();
        assert!(err.source_code().is_some());
        let labels: Vec<_> = err.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 0);
        assert_eq!(labels[0].len(), "const x = 1;".len());
        assert_eq!(Diagnostic::code(&err).unwrap().to_string(), "no-component");
    }
}
