//! The token stream the structural checks walk.
//!
//! Tokens come from [`yaml_rust2::scanner::Scanner`], converted into owned
//! [`Token`] values with 0-based [`Mark`]s. Key/value structure is explicit
//! in the stream: a `Key` token precedes every mapping key and
//! `BlockMappingStart`/`BlockSequenceStart` are closed by `BlockEnd`.
//!
//! # Examples
//!
//! ```
//! use yaml_key_audit::token::{tokenize, TokenKind};
//!
//! let tokens = tokenize("key: value\n");
//! let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
//! assert!(matches!(kinds[1], TokenKind::BlockMappingStart));
//! assert!(matches!(kinds[2], TokenKind::Key));
//! ```

use yaml_rust2::scanner::{Marker, Scanner, TScalarStyle, Token as RawToken, TokenType};

/// A position in the source text. All fields are 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mark {
    /// Offset in characters from the start of the input.
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl From<Marker> for Mark {
    fn from(marker: Marker) -> Self {
        Mark {
            index: marker.index(),
            line: marker.line().saturating_sub(1),
            column: marker.col(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl From<TScalarStyle> for ScalarStyle {
    fn from(style: TScalarStyle) -> Self {
        match style {
            TScalarStyle::Plain => ScalarStyle::Plain,
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal => ScalarStyle::Literal,
            TScalarStyle::Folded => ScalarStyle::Folded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    StreamStart,
    StreamEnd,
    /// `%YAML` or `%TAG` directive, rendered as `YAML 1.2` or `TAG !e! tag:x,2000:`.
    Directive(String),
    DocumentStart,
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    FlowSequenceStart,
    FlowSequenceEnd,
    FlowMappingStart,
    FlowMappingEnd,
    BlockEntry,
    FlowEntry,
    Key,
    Value,
    Alias(String),
    Anchor(String),
    /// Handle and suffix joined, e.g. `!!str`.
    Tag(String),
    Scalar { value: String, style: ScalarStyle },
}

impl From<TokenType> for TokenKind {
    fn from(token: TokenType) -> Self {
        match token {
            TokenType::StreamStart(_) => TokenKind::StreamStart,
            TokenType::StreamEnd => TokenKind::StreamEnd,
            TokenType::VersionDirective(major, minor) => {
                TokenKind::Directive(format!("YAML {major}.{minor}"))
            }
            TokenType::TagDirective(handle, prefix) => {
                TokenKind::Directive(format!("TAG {handle} {prefix}"))
            }
            TokenType::DocumentStart => TokenKind::DocumentStart,
            TokenType::DocumentEnd => TokenKind::DocumentEnd,
            TokenType::BlockSequenceStart => TokenKind::BlockSequenceStart,
            TokenType::BlockMappingStart => TokenKind::BlockMappingStart,
            TokenType::BlockEnd => TokenKind::BlockEnd,
            TokenType::FlowSequenceStart => TokenKind::FlowSequenceStart,
            TokenType::FlowSequenceEnd => TokenKind::FlowSequenceEnd,
            TokenType::FlowMappingStart => TokenKind::FlowMappingStart,
            TokenType::FlowMappingEnd => TokenKind::FlowMappingEnd,
            TokenType::BlockEntry => TokenKind::BlockEntry,
            TokenType::FlowEntry => TokenKind::FlowEntry,
            TokenType::Key => TokenKind::Key,
            TokenType::Value => TokenKind::Value,
            TokenType::Alias(name) => TokenKind::Alias(name),
            TokenType::Anchor(name) => TokenKind::Anchor(name),
            TokenType::Tag(handle, suffix) => TokenKind::Tag(handle + &suffix),
            TokenType::Scalar(style, value) => TokenKind::Scalar {
                value,
                style: style.into(),
            },
        }
    }
}

/// A typed token and the position where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Mark,
}

impl From<RawToken> for Token {
    fn from(RawToken(marker, token): RawToken) -> Self {
        Token {
            kind: token.into(),
            start: marker.into(),
        }
    }
}

impl Token {
    /// Returns the scalar text when this is a `Scalar` token.
    pub fn scalar(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self.kind, TokenKind::Key)
    }

    pub fn is_value(&self) -> bool {
        matches!(self.kind, TokenKind::Value)
    }
}

/// Scans a whole document stream.
///
/// Scanning stops at the first scan error, so the stream of a malformed
/// document may be cut short. [`crate::source::YamlSource`] only tokenizes
/// documents that passed its syntax gate.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(input.chars());
    let tokens: Vec<Token> = scanner.by_ref().map(Token::from).collect();
    if let Some(error) = scanner.get_error() {
        log::debug!("Token stream truncated: {error}");
    }
    tokens
}
