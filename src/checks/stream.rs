//! Token lookahead used by every structural check.
//!
//! [`TokenStream`] is a one-token lookahead buffer over an immutable token
//! slice. [`Cursor`] layers the [`AncestorTracker`] on top so that every token
//! a check consumes, including the ones consumed while extracting a value,
//! keeps the ancestor path in sync.

use super::ancestors::AncestorTracker;
use crate::token::Token;

/// Forward-only token stream with a single peeked slot.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: std::slice::Iter<'a, Token>,
    peeked: Option<&'a Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        TokenStream {
            tokens: tokens.iter(),
            peeked: None,
        }
    }

    pub fn has_more_tokens(&mut self) -> bool {
        self.peek_token().is_some()
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Option<&'a Token> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next();
        }
        self.peeked
    }

    pub fn next_token(&mut self) -> Option<&'a Token> {
        self.peeked.take().or_else(|| self.tokens.next())
    }
}

/// A [`TokenStream`] whose consumed tokens drive an [`AncestorTracker`].
#[derive(Debug)]
pub struct Cursor<'a> {
    stream: TokenStream<'a>,
    ancestors: AncestorTracker,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor {
            stream: TokenStream::new(tokens),
            ancestors: AncestorTracker::new(),
        }
    }

    /// Consumes one token and feeds it to the tracker.
    ///
    /// A `Key` token updates the tracker's last key from the scalar peeked
    /// behind it, before the caller gets to look at the key. The ancestor
    /// path is unaffected until the next mapping opens.
    pub fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.stream.next_token()?;
        let next = self.stream.peek_token();
        self.ancestors.on_token(token, next);
        Some(token)
    }

    pub fn peek_token(&mut self) -> Option<&'a Token> {
        self.stream.peek_token()
    }

    pub fn has_more_tokens(&mut self) -> bool {
        self.stream.has_more_tokens()
    }

    pub fn ancestors(&self) -> &AncestorTracker {
        &self.ancestors
    }

    /// The ancestor path at the current position.
    pub fn path(&self) -> String {
        self.ancestors.current_path()
    }
}
