//! Output formatting for conversion results.

use crate::cli::OutputFormat;
use crate::orchestrator::{Conversion, RunResult};
use crate::sink::MemorySink;
use miette::Report;
use ng_template_compiler::TemplateWarning;
use source_map::LineIndex;
use std::path::Path;

/// Formatter for conversion output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a successful conversion.
    ///
    /// `out_dir` is where the artifacts were written; `dry_run` holds them
    /// instead when nothing was written.
    pub fn print_conversion(
        &self,
        file: &Path,
        source: &str,
        conversion: &Conversion,
        out_dir: Option<&Path>,
        dry_run: Option<&MemorySink>,
    ) {
        match self.format {
            OutputFormat::Human => {
                self.print_conversion_human(file, source, conversion, out_dir, dry_run)
            }
            OutputFormat::Json => {
                self.print_conversion_json(file, source, conversion, out_dir, dry_run)
            }
        }
    }

    /// Print a failed conversion.
    pub fn print_failure(&self, file: &Path, report: &Report) {
        match self.format {
            OutputFormat::Human => eprintln!("{:?}", report),
            OutputFormat::Json => self.print_failure_json(file, report),
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, result: &RunResult) {
        match self.format {
            OutputFormat::Human => self.print_summary_human(result),
            OutputFormat::Json => self.print_summary_json(result),
        }
    }

    // Human format

    fn print_conversion_human(
        &self,
        file: &Path,
        source: &str,
        conversion: &Conversion,
        out_dir: Option<&Path>,
        dry_run: Option<&MemorySink>,
    ) {
        match out_dir {
            Some(dir) => println!(
                "Generated Angular component for {} in {}",
                conversion.component,
                dir.display()
            ),
            None => println!(
                "Generated Angular component for {} (dry run)",
                conversion.component
            ),
        }

        let index = LineIndex::new(source);
        for warning in &conversion.warnings {
            let (line, col) = index.line_col(warning.span.start).to_display();
            println!(
                "{}:{}:{}: \x1b[33mwarning\x1b[0m[{}]: {}",
                file.display(),
                line,
                col,
                warning.code.as_str(),
                warning.message
            );
        }

        if let Some(sink) = dry_run {
            for (name, contents) in &sink.files {
                println!("\n\x1b[1m--- {} ---\x1b[0m", name);
                print!("{}", contents);
            }
        }
    }

    fn print_summary_human(&self, result: &RunResult) {
        println!();
        if result.failed == 0 && result.warning_count == 0 {
            println!(
                "\x1b[32m✓\x1b[0m Converted {} component{} ({}ms)",
                result.converted,
                plural(result.converted),
                result.duration_ms
            );
            return;
        }

        if result.failed > 0 {
            println!(
                "\x1b[31m✗\x1b[0m {} of {} file{} failed",
                result.failed,
                result.file_count,
                plural(result.file_count)
            );
        }
        if result.warning_count > 0 {
            println!(
                "\x1b[33m⚠\x1b[0m {} warning{} need manual review",
                result.warning_count,
                plural(result.warning_count)
            );
        }
        println!(
            "Converted {} component{} ({}ms)",
            result.converted,
            plural(result.converted),
            result.duration_ms
        );
    }

    // JSON format

    fn print_conversion_json(
        &self,
        file: &Path,
        source: &str,
        conversion: &Conversion,
        out_dir: Option<&Path>,
        dry_run: Option<&MemorySink>,
    ) {
        let index = LineIndex::new(source);
        let warnings: Vec<_> = conversion
            .warnings
            .iter()
            .map(|w| warning_json(&index, w))
            .collect();
        let files: Vec<_> = conversion.artifacts.iter().map(|a| &a.name).collect();

        let mut json = serde_json::json!({
            "type": "component",
            "file": file.to_string_lossy(),
            "component": conversion.component,
            "outDir": out_dir.map(|d| d.to_string_lossy().to_string()),
            "files": files,
            "warnings": warnings
        });
        if let Some(sink) = dry_run {
            json["contents"] = serde_json::json!(sink.files);
        }
        println!("{}", json);
    }

    fn print_failure_json(&self, file: &Path, report: &Report) {
        let span = report
            .labels()
            .and_then(|mut labels| labels.next())
            .map(|label| {
                serde_json::json!({
                    "start": label.offset(),
                    "end": label.offset() + label.len()
                })
            });
        let json = serde_json::json!({
            "type": "error",
            "file": file.to_string_lossy(),
            "code": report.code().map(|c| c.to_string()),
            "message": report.to_string(),
            "span": span
        });
        println!("{}", json);
    }

    fn print_summary_json(&self, result: &RunResult) {
        let json = serde_json::json!({
            "type": "summary",
            "files": result.file_count,
            "converted": result.converted,
            "failed": result.failed,
            "warnings": result.warning_count,
            "duration_ms": result.duration_ms
        });
        println!("{}", json);
    }
}

fn warning_json(index: &LineIndex, warning: &TemplateWarning) -> serde_json::Value {
    let (line, column) = index.line_col(warning.span.start).to_display();
    serde_json::json!({
        "code": warning.code.as_str(),
        "message": warning.message,
        "line": line,
        "column": column,
        "span": {
            "start": warning.span.start,
            "end": warning.span.end
        }
    })
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
