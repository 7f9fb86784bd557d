//! Ancestor path tracking.
//!
//! The tracker follows the block collections opened and closed by the token
//! stream and names every open block mapping after the key that introduced
//! it. The resulting path, such as `<root>:spec:template`, is what the
//! `included-ancestors` and `excluded-ancestors` filters are matched against.

use crate::token::{Token, TokenKind};

/// Label of the top-level mapping, used before any key has been seen.
pub const ROOT: &str = "<root>";

/// Separator between labels in a rendered ancestor path.
pub const PATH_SEPARATOR: &str = ":";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Mapping,
    Sequence,
}

/// An open block mapping: the key that introduced it and that key's 0-based
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    pub name: String,
    pub line: usize,
}

impl Ancestor {
    fn root(line: usize) -> Self {
        Ancestor {
            name: ROOT.to_string(),
            line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AncestorTracker {
    blocks: Vec<Block>,
    ancestors: Vec<Ancestor>,
    last_key: Option<Ancestor>,
}

impl Default for AncestorTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AncestorTracker {
    pub fn new() -> Self {
        AncestorTracker {
            blocks: Vec::new(),
            ancestors: Vec::new(),
            last_key: None,
        }
    }

    /// Updates the tracker with one consumed token.
    ///
    /// `next` is the token that follows `token`, peeked and not consumed.
    pub fn on_token(&mut self, token: &Token, next: Option<&Token>) {
        match &token.kind {
            TokenKind::BlockMappingStart => {
                let label = self
                    .last_key
                    .clone()
                    .unwrap_or_else(|| Ancestor::root(token.start.line));
                self.blocks.push(Block::Mapping);
                self.ancestors.push(label);
            }
            TokenKind::BlockSequenceStart => self.blocks.push(Block::Sequence),
            TokenKind::BlockEnd => {
                // A stray BlockEnd on an empty stack is ignored.
                if let Some(Block::Mapping) = self.blocks.pop() {
                    let closed = self.ancestors.pop();
                    // Back at the top level, the next document starts afresh.
                    self.last_key = if self.ancestors.is_empty() { None } else { closed };
                }
            }
            TokenKind::Key => {
                if let Some(scalar) = next {
                    if let Some(name) = scalar.scalar() {
                        self.last_key = Some(Ancestor {
                            name: name.to_string(),
                            line: scalar.start.line,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    /// The open mapping labels, oldest first, joined with `:`.
    pub fn current_path(&self) -> String {
        self.ancestors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }

    /// Name of the most recently seen key, or `<root>` before the first key.
    pub fn last_key_scalar(&self) -> &str {
        self.last_key.as_ref().map_or(ROOT, |a| a.name.as_str())
    }

    /// The innermost open mapping.
    pub fn innermost(&self) -> Option<&Ancestor> {
        self.ancestors.last()
    }

    /// Number of open block mappings.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty() && self.blocks.is_empty()
    }
}
