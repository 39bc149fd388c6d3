//! Markdown line assembly for worldcontext summaries.
//!
//! [`MarkdownDoc`] collects lines and joins them with single newlines. Sections
//! open with an `###` heading separated from earlier content by one blank line.

mod text;

pub use text::{bold, italic, truncate_chars};

/// Indent applied to continuation lines under a bullet.
const CONTINUATION_INDENT: &str = "  ";

/// An append-only markdown document.
#[derive(Debug, Clone, Default)]
pub struct MarkdownDoc {
    lines: Vec<String>,
}

impl MarkdownDoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw line.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    /// Open a section: a blank separator line (unless the document is empty)
    /// followed by an `###` heading.
    pub fn section(&mut self, title: &str) -> &mut Self {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("### {title}"));
        self
    }

    /// Append a `- ` bullet.
    pub fn bullet(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("- {}", text.as_ref()));
        self
    }

    /// Append an indented line belonging to the preceding bullet.
    pub fn continuation(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines
            .push(format!("{CONTINUATION_INDENT}{}", text.as_ref()));
        self
    }

    /// Join all lines with `\n`. No trailing newline is added.
    pub fn finish(self) -> String {
        tracing::trace!(lines = self.lines.len(), "markdown document finished");
        self.lines.join("\n")
    }
}
