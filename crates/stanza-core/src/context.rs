//! Context types for rule execution.

use std::path::{Path, PathBuf};

use stanza_ast::Span;

use crate::types::Location;

/// Context provided to per-file rules.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as discovered.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Builds a [`Location`] for a byte range of this file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        Location::from_span(self.path.to_path_buf(), self.content, span)
    }

    /// Returns the source text covered by `span`.
    #[must_use]
    pub fn text(&self, span: Span) -> Option<&'a str> {
        span.text(self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_is_stripped() {
        let ctx = FileContext::new(Path::new("/p/src/a.ts"), "", Path::new("/p"));
        assert_eq!(ctx.relative_path, PathBuf::from("src/a.ts"));

        let outside = FileContext::new(Path::new("/q/a.ts"), "", Path::new("/p"));
        assert_eq!(outside.relative_path, PathBuf::from("/q/a.ts"));
    }

    #[test]
    fn location_for_span() {
        let content = "a();\n  b();";
        let ctx = FileContext::new(Path::new("x.ts"), content, Path::new("."));
        let loc = ctx.location(Span::new(7, 11));
        assert_eq!((loc.line, loc.column), (2, 3));
        assert_eq!(ctx.text(Span::new(7, 11)), Some("b();"));
    }
}
