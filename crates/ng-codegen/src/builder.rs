//! Line-oriented code builder.

/// Accumulates generated lines and joins them with `\n`.
#[derive(Debug, Default)]
pub struct CodeBuilder {
    lines: Vec<String>,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one line.
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Push a line indented by `indent` spaces.
    pub fn indented(&mut self, indent: usize, line: &str) {
        self.lines.push(format!("{}{}", " ".repeat(indent), line));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Drop a trailing blank line, if any.
    pub fn trim_trailing_blank(&mut self) {
        if self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
    }

    /// Join the lines. No trailing newline is added.
    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut builder = CodeBuilder::new();
        builder.line("a {");
        builder.indented(2, "b");
        builder.blank();
        builder.trim_trailing_blank();
        builder.trim_trailing_blank();
        builder.line("}");
        assert_eq!(builder.finish(), "a {\n  b\n}");
    }
}
