//! Structural cursor over a [`Document`]'s token stream.
//!
//! A cursor sits *before* a token (or at the end of the document). It is
//! `Copy`, so probing is done by copying a cursor and moving the copy; the
//! original never changes behind the caller's back.

use crate::document::Document;
use crate::lexer::{Token, TokenKind};

#[derive(Clone, Copy)]
pub struct TokenCursor<'a> {
    doc: &'a Document,
    index: usize,
}

impl std::fmt::Debug for TokenCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCursor")
            .field("index", &self.index)
            .field("offset", &self.offset())
            .finish()
    }
}

impl<'a> TokenCursor<'a> {
    pub(crate) fn new(doc: &'a Document, index: usize) -> Self {
        Self {
            doc,
            index: index.min(doc.tokens().len()),
        }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset of the cursor position.
    pub fn offset(&self) -> usize {
        self.token().map_or(self.doc.len(), |t| t.offset)
    }

    /// The token right after the cursor.
    pub fn token(&self) -> Option<&'a Token> {
        self.doc.token(self.index)
    }

    /// The token right before the cursor.
    pub fn prev_token(&self) -> Option<&'a Token> {
        self.index.checked_sub(1).and_then(|i| self.doc.token(i))
    }

    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.doc.tokens().len()
    }

    pub fn depth(&self) -> usize {
        self.doc.depth(self.index)
    }

    /// True between top-level forms.
    pub fn at_top_level(&self) -> bool {
        self.depth() == 0
    }

    /// Open token of the list the cursor is inside.
    pub fn enclosing_list(&self) -> Option<usize> {
        self.doc.parent(self.index)
    }

    /// Skip whitespace and comments forward.
    pub fn forward_whitespace(&mut self) {
        while self.token().is_some_and(Token::is_whitespace) {
            self.index += 1;
        }
    }

    /// Skip whitespace and comments backward.
    pub fn backward_whitespace(&mut self) {
        while self.prev_token().is_some_and(Token::is_whitespace) {
            self.index -= 1;
        }
    }

    /// Skip whitespace, comments, `#_`-discarded forms and `^metadata`
    /// forward, stopping before the next form that counts.
    pub fn forward_ignored(&mut self) {
        // Each marker owes one form; chained markers add up.
        let mut pending = 0usize;
        loop {
            self.forward_whitespace();
            match self.token().map(|t| t.kind) {
                Some(TokenKind::Ignore) | Some(TokenKind::Meta) => {
                    self.index += 1;
                    pending += 1;
                }
                Some(_) if pending > 0 => {
                    if !self.step_forward() {
                        return;
                    }
                    pending -= 1;
                }
                _ => return,
            }
        }
    }

    /// Move past the next form. False at the end of a list or document, and
    /// before a list that is never closed.
    pub fn forward_sexp(&mut self) -> bool {
        let mut probe = *self;
        probe.forward_ignored();
        if probe.step_forward() {
            *self = probe;
            true
        } else {
            false
        }
    }

    /// Move before the previous form, together with any metadata attached to
    /// it. Discarded (`#_`) forms and their markers are passed over. False at
    /// the start of a list or document.
    pub fn backward_sexp(&mut self) -> bool {
        let mut probe = *self;
        loop {
            probe.backward_whitespace();
            if !probe.step_backward() {
                return false;
            }
            let marker = probe
                .token()
                .is_some_and(|t| matches!(t.kind, TokenKind::Ignore | TokenKind::Meta));
            if marker || self.doc.is_discarded(probe.index) {
                continue;
            }
            probe.absorb_metadata_backward();
            *self = probe;
            return true;
        }
    }

    /// Enter the list right after the cursor, landing before its first
    /// element.
    pub fn down_list(&mut self) -> bool {
        let mut probe = *self;
        probe.forward_ignored();
        match probe.token() {
            Some(tok) if tok.kind == TokenKind::Open => {
                probe.index += 1;
                *self = probe;
                true
            }
            _ => false,
        }
    }

    /// Enter the list right before the cursor, landing before its closing
    /// bracket.
    pub fn backward_down_list(&mut self) -> bool {
        let mut probe = *self;
        probe.backward_whitespace();
        match probe.prev_token() {
            Some(tok)
                if tok.kind == TokenKind::Close && self.doc.partner(probe.index - 1).is_some() =>
            {
                probe.index -= 1;
                *self = probe;
                true
            }
            _ => false,
        }
    }

    /// Move to the start of the enclosing list's content.
    pub fn backward_list(&mut self) -> bool {
        match self.enclosing_list() {
            Some(open) => {
                self.index = open + 1;
                true
            }
            None => false,
        }
    }

    /// Leave the enclosing list, landing just before its opening bracket.
    pub fn backward_up_list(&mut self) -> bool {
        match self.enclosing_list() {
            Some(open) => {
                self.index = open;
                true
            }
            None => false,
        }
    }

    fn step_forward(&mut self) -> bool {
        let Some(tok) = self.token() else {
            return false;
        };
        match tok.kind {
            TokenKind::Open => match self.doc.partner(self.index) {
                Some(close) => {
                    self.index = close + 1;
                    true
                }
                None => false,
            },
            // A paired close ends the current list; a stray one is junk.
            TokenKind::Close if self.doc.partner(self.index).is_some() => false,
            _ => {
                self.index += 1;
                true
            }
        }
    }

    fn step_backward(&mut self) -> bool {
        let Some(tok) = self.prev_token() else {
            return false;
        };
        match tok.kind {
            TokenKind::Close => {
                self.index = self.doc.partner(self.index - 1).unwrap_or(self.index - 1);
                true
            }
            TokenKind::Open => false,
            _ => {
                self.index -= 1;
                true
            }
        }
    }

    /// Extend a backward step over `^meta` markers preceding the form.
    fn absorb_metadata_backward(&mut self) {
        loop {
            let mut probe = *self;
            probe.backward_whitespace();
            if probe.prev_token().map(|t| t.kind) == Some(TokenKind::Meta) {
                probe.index -= 1;
                *self = probe;
                continue;
            }
            if probe.step_backward() {
                probe.backward_whitespace();
                if probe.prev_token().map(|t| t.kind) == Some(TokenKind::Meta) {
                    probe.index -= 1;
                    *self = probe;
                    continue;
                }
            }
            return;
        }
    }
}
