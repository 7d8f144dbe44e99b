//! Ordered output buffer for generated statements

use std::fmt;

/// Accumulates generated lines in order
///
/// Lines never contain a newline; indentation is part of the line text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuilder {
    lines: Vec<String>,
}

impl LineBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line made of `parts` concatenated
    pub fn append(&mut self, parts: &[&str]) {
        self.push(parts.concat());
    }

    /// Append one formatted line
    pub fn appendf(&mut self, args: fmt::Arguments<'_>) {
        self.push(args.to_string());
    }

    /// Append one line
    pub fn push(&mut self, line: String) {
        debug_assert!(!line.contains('\n'), "generated line contains a newline: {line:?}");
        self.lines.push(line);
    }

    /// Append already rendered lines
    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            self.push(line);
        }
    }

    /// Lines appended so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Snapshot of the lines appended so far
    pub fn get_lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// Drop every line
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<LineBuilder> for Vec<String> {
    fn from(builder: LineBuilder) -> Self {
        builder.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_joins_parts() {
        let mut lines = LineBuilder::new();
        lines.append(&["\t", "out.One", " = ", "in.One"]);
        lines.appendf(format_args!("{}if {} != nil {{", "\t", "in.Two"));

        assert_eq!(lines.lines(), ["\tout.One = in.One", "\tif in.Two != nil {"]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut lines = LineBuilder::new();
        lines.push("a".to_string());
        let snapshot = lines.get_lines();
        lines.clear();

        assert_eq!(snapshot, vec!["a".to_string()]);
        assert!(lines.is_empty());
    }
}
