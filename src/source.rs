//! A YAML document under analysis.
//!
//! [`YamlSource`] owns the document text, the result of the syntax gate and
//! the token stream every check scans. The syntax gate runs the document
//! through [`yaml_rust2`]; only documents that load cleanly are
//! scanned into tokens.

use crate::token::{self, Token};
use std::path::{Path, PathBuf};
use yaml_rust2::YamlLoader;

/// Unicode line separators stripped when line-break filtering is on.
const FILTERED_LINE_BREAKS: [char; 3] = ['\u{85}', '\u{2028}', '\u{2029}'];

/// Why a document could not be loaded. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

#[derive(Debug, Clone)]
pub struct YamlSource {
    path: Option<PathBuf>,
    content: String,
    syntax_error: Option<SyntaxError>,
    tokens: Vec<Token>,
}

impl YamlSource {
    /// Reads and prepares the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the file cannot be read as UTF-8 text.
    pub fn read(path: &Path, filter_line_breaks: bool) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut source = Self::from_str(&content, filter_line_breaks);
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// Prepares in-memory YAML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use yaml_key_audit::source::YamlSource;
    ///
    /// let ok = YamlSource::from_str("a: 1\n", false);
    /// assert!(ok.has_correct_syntax());
    ///
    /// let broken = YamlSource::from_str("a: [1, 2\n", false);
    /// assert!(broken.syntax_error().is_some());
    /// assert!(broken.tokens().is_empty());
    /// ```
    pub fn from_str(content: &str, filter_line_breaks: bool) -> Self {
        // The scanner does not skip a byte order mark.
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let content: String = if filter_line_breaks {
            content
                .chars()
                .filter(|c| !FILTERED_LINE_BREAKS.contains(c))
                .collect()
        } else {
            content.to_string()
        };

        let syntax_error = check_syntax(&content);
        let tokens = match syntax_error {
            None => token::tokenize(&content),
            Some(_) => Vec::new(),
        };

        YamlSource {
            path: None,
            content,
            syntax_error,
            tokens,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        self.syntax_error.as_ref()
    }

    pub fn has_correct_syntax(&self) -> bool {
        self.syntax_error.is_none()
    }

    /// Tokens of the document; empty when the syntax is not correct.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

fn check_syntax(content: &str) -> Option<SyntaxError> {
    match YamlLoader::load_from_str(content) {
        Ok(_) => None,
        Err(e) => {
            let marker = e.marker();
            Some(SyntaxError {
                message: e.info().to_string(),
                line: marker.line().max(1),
                column: marker.col() + 1,
            })
        }
    }
}
