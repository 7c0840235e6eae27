//! In-memory document: source text plus its structural index.
//!
//! A [`Document`] is built once from text and never changes afterwards.
//! Besides the token stream it records, for every cursor position, the list
//! that encloses it and its nesting depth, so cursors can move through the
//! tree without re-scanning.

use crate::cursor::TokenCursor;
use crate::lexer::{self, Token, TokenKind};

pub struct Document {
    text: String,
    tokens: Vec<Token>,
    /// Matching bracket for every paired open/close token
    partners: Vec<Option<usize>>,
    /// Innermost open token enclosing the position before token `i`
    /// (one extra entry for the end-of-document position)
    parents: Vec<Option<usize>>,
    depths: Vec<usize>,
    /// Outermost open token enclosing each position
    roots: Vec<Option<usize>>,
    /// Forms removed by a pending `#_`, flagged at their first token
    discarded: Vec<bool>,
    line_starts: Vec<usize>,
}

/// Span of a top-level list form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSpan {
    /// Token index of the opening bracket
    pub open: usize,
    pub start: usize,
    pub end: usize,
    /// False when the form is never closed; it then extends to the end of
    /// the document.
    pub closed: bool,
}

impl FormSpan {
    /// True when `offset` lies strictly between the form's outer edges.
    pub fn contains(&self, offset: usize) -> bool {
        self.start < offset && (offset < self.end || !self.closed)
    }
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = lexer::lex(&text);

        let mut partners = vec![None; tokens.len()];
        let mut parents = Vec::with_capacity(tokens.len() + 1);
        let mut depths = Vec::with_capacity(tokens.len() + 1);
        let mut roots = Vec::with_capacity(tokens.len() + 1);
        let mut stack: Vec<usize> = Vec::new();

        for (i, tok) in tokens.iter().enumerate() {
            match tok.kind {
                TokenKind::Open => {
                    roots.push(stack.first().copied());
                    parents.push(stack.last().copied());
                    depths.push(stack.len());
                    stack.push(i);
                }
                TokenKind::Close => {
                    // A close pairs with the innermost open of the same bracket
                    // type; opens it skips over stay unterminated.
                    let close = tok.raw.chars().next();
                    let matched = stack
                        .iter()
                        .rposition(|&open| lexer::closing_bracket(&tokens[open].raw) == close);
                    match matched {
                        Some(level) => {
                            let open = stack[level];
                            roots.push(stack.first().copied());
                            parents.push(Some(open));
                            depths.push(level + 1);
                            partners[open] = Some(i);
                            partners[i] = Some(open);
                            stack.truncate(level);
                        }
                        None => {
                            roots.push(stack.first().copied());
                            parents.push(stack.last().copied());
                            depths.push(stack.len());
                        }
                    }
                }
                _ => {
                    roots.push(stack.first().copied());
                    parents.push(stack.last().copied());
                    depths.push(stack.len());
                }
            }
        }
        roots.push(stack.first().copied());
        parents.push(stack.last().copied());
        depths.push(stack.len());

        let discarded = discarded_forms(&tokens, &partners, &depths);

        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Document {
            text,
            tokens,
            partners,
            parents,
            depths,
            roots,
            discarded,
            line_starts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The bracket paired with the open or close token at `index`.
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.partners.get(index).copied().flatten()
    }

    /// Open token of the innermost list enclosing the position before token
    /// `index`.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Nesting depth of the position before token `index`.
    pub fn depth(&self, index: usize) -> usize {
        self.depths.get(index).copied().unwrap_or(0)
    }

    /// Index of the token containing `offset`; the token count when the
    /// offset is at or past the end of the text.
    /// True when the form starting at token `index` is dropped by `#_`,
    /// either directly or through a run such as `#_ #_ a b`.
    pub fn is_discarded(&self, index: usize) -> bool {
        self.discarded.get(index).copied().unwrap_or(false)
    }

    pub fn index_at(&self, offset: usize) -> usize {
        if offset >= self.text.len() {
            return self.tokens.len();
        }
        self.tokens
            .partition_point(|t| t.offset <= offset)
            .saturating_sub(1)
    }

    /// A cursor positioned before the token that contains `offset`.
    pub fn cursor_at(&self, offset: usize) -> TokenCursor<'_> {
        TokenCursor::new(self, self.index_at(offset))
    }

    pub fn cursor_at_start(&self) -> TokenCursor<'_> {
        TokenCursor::new(self, 0)
    }

    /// Byte span of the list opened at token `open`.
    pub fn form_span(&self, open: usize) -> Option<FormSpan> {
        let tok = self.tokens.get(open).filter(|t| t.kind == TokenKind::Open)?;
        let close = self.partner(open);
        Some(FormSpan {
            open,
            start: tok.offset,
            end: close.map_or(self.text.len(), |c| self.tokens[c].end()),
            closed: close.is_some(),
        })
    }

    /// The top-level list form that strictly contains `offset`, if any.
    ///
    /// An offset sitting on the opening edge of a form, or just past its
    /// closing bracket, is outside it.
    pub fn top_level_form_at(&self, offset: usize) -> Option<FormSpan> {
        let offset = offset.min(self.text.len());
        let index = self.index_at(offset);
        // Offsets inside a multi-character opening token such as `#?(` fall
        // back to the token itself.
        let top = self.roots.get(index).copied().flatten().unwrap_or(index);
        self.form_span(top).filter(|span| span.contains(offset))
    }

    /// 1-based line number of `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        let offset = offset.min(self.text.len());
        self.line_starts.partition_point(|&s| s <= offset) as u32
    }

    /// Byte offset of a 1-based line and column, the column counted in
    /// characters. Columns past the end of the line clamp to the line end.
    pub fn offset_at(&self, line: u32, column: u32) -> Option<usize> {
        let line_idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map_or(self.text.len(), |next| next - 1);
        let column = (column as usize).max(1) - 1;
        let offset = self.text[start..end]
            .char_indices()
            .nth(column)
            .map_or(end, |(i, _)| start + i);
        Some(offset)
    }
}

/// Reader markers waiting for a form, for one list level.
#[derive(Default)]
struct PendingMarkers {
    kinds: Vec<TokenKind>,
    ignores: usize,
}

impl PendingMarkers {
    fn push(&mut self, kind: TokenKind) {
        if kind == TokenKind::Ignore {
            self.ignores += 1;
        }
        self.kinds.push(kind);
    }

    /// Hand the next form to the innermost pending marker. Returns whether
    /// a `#_` was pending at that point.
    fn consume(&mut self) -> bool {
        let discarded = self.ignores > 0;
        if self.kinds.pop() == Some(TokenKind::Ignore) {
            self.ignores -= 1;
        }
        discarded
    }
}

/// Each `#_` or `^` marker takes the next form at its level. A form taken
/// while any `#_` is pending is discarded, metadata included.
fn discarded_forms(tokens: &[Token], partners: &[Option<usize>], depths: &[usize]) -> Vec<bool> {
    let mut discarded = vec![false; tokens.len()];
    let mut levels: Vec<PendingMarkers> = vec![PendingMarkers::default()];

    for (i, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TokenKind::Whitespace | TokenKind::Comment => {}
            TokenKind::Ignore | TokenKind::Meta => {
                if let Some(level) = levels.last_mut() {
                    level.push(tok.kind);
                }
            }
            TokenKind::Close if partners[i].is_some() => levels.truncate(depths[i]),
            kind => {
                if let Some(level) = levels.last_mut() {
                    discarded[i] = level.consume();
                }
                if kind == TokenKind::Open {
                    levels.push(PendingMarkers::default());
                }
            }
        }
    }
    discarded
}
