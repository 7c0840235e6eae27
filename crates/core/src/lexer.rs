//! Tokenizer for Clojure-family source text.
//!
//! Lexing never fails: every byte of the input lands in exactly one token,
//! and malformed input (unterminated strings, dangling reader macros) turns
//! into ordinary tokens. Editors hold half-typed code most of the time.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Opening bracket, reader prefix included (`(`, `[`, `#{`, `'(`, `#?(`)
    Open,
    Close,
    /// Identifier-like symbol, quote prefixes included (`foo`, `'foo.bar`)
    Symbol,
    /// `:foo`, `::foo`
    Keyword,
    /// String or regex literal
    Str,
    /// Numbers, `true`, `false`, `nil`, `##Inf`
    Literal,
    /// Character literal (`\a`, `\newline`)
    Char,
    /// Spaces, tabs, newlines and commas
    Whitespace,
    Comment,
    /// `#_` discard marker
    Ignore,
    /// `^` metadata marker
    Meta,
    /// Anything else, e.g. a reader prefix with nothing to attach to
    Junk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token, verbatim
    pub raw: String,
    /// Byte offset of the first character
    pub offset: usize,
    pub line: u32,
}

impl Token {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.offset + self.raw.len()
    }

    /// Whitespace and comments: tokens a structural move skips freely.
    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// The closing bracket for an opening token's raw text.
pub fn closing_bracket(open: &str) -> Option<char> {
    match open.chars().last()? {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Characters that end a symbol, keyword or number.
fn is_terminator(c: char) -> bool {
    is_whitespace(c)
        || matches!(
            c,
            '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';' | '\\' | '^' | '@' | '`' | '~'
        )
}

/// Collects tokens and glues pending reader prefixes onto the token that
/// follows them.
struct TokenSink<'s> {
    src: &'s str,
    tokens: Vec<Token>,
    prefix: Option<(usize, u32)>,
}

impl<'s> TokenSink<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            tokens: Vec::new(),
            prefix: None,
        }
    }

    fn prefix(&mut self, start: usize, line: u32) {
        if self.prefix.is_none() {
            self.prefix = Some((start, line));
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize, line: u32) {
        let (start, line) = match self.prefix.take() {
            Some(pending) if accepts_prefix(kind) => pending,
            Some((prefix_start, prefix_line)) => {
                self.emit(TokenKind::Junk, prefix_start, start, prefix_line);
                (start, line)
            }
            None => (start, line),
        };
        self.emit(kind, start, end, line);
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize, line: u32) {
        self.tokens.push(Token {
            kind,
            raw: self.src[start..end].to_owned(),
            offset: start,
            line,
        });
    }

    fn finish(mut self) -> Vec<Token> {
        if let Some((start, line)) = self.prefix.take() {
            self.emit(TokenKind::Junk, start, self.src.len(), line);
        }
        self.tokens
    }
}

fn accepts_prefix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Open
            | TokenKind::Symbol
            | TokenKind::Keyword
            | TokenKind::Str
            | TokenKind::Literal
            | TokenKind::Char
    )
}

/// Split `src` into tokens. Offsets are byte offsets, lines are 1-based.
pub fn lex(src: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let len = chars.len();
    let ch = |pos: usize| chars.get(pos).map(|&(_, c)| c);
    let byte_at = |pos: usize| chars.get(pos).map_or(src.len(), |&(b, _)| b);
    let scan_word = |mut pos: usize| {
        while pos < len && !is_terminator(chars[pos].1) {
            pos += 1;
        }
        pos
    };

    let mut out = TokenSink::new(src);
    let mut pos = 0usize;
    let mut line: u32 = 1;

    while pos < len {
        let c = chars[pos].1;
        let next = ch(pos + 1);
        let start = pos;
        let tok_line = line;

        // Whitespace, commas included
        if is_whitespace(c) {
            while pos < len && is_whitespace(chars[pos].1) {
                if chars[pos].1 == '\n' {
                    line += 1;
                }
                pos += 1;
            }
            out.push(TokenKind::Whitespace, byte_at(start), byte_at(pos), tok_line);
            continue;
        }

        // Line comment
        if c == ';' {
            while pos < len && chars[pos].1 != '\n' {
                pos += 1;
            }
            out.push(TokenKind::Comment, byte_at(start), byte_at(pos), tok_line);
            continue;
        }

        // String literal, or regex literal when prefixed with '#'.
        // An unterminated string runs to the end of input.
        if c == '"' || (c == '#' && next == Some('"')) {
            pos += if c == '#' { 2 } else { 1 };
            while pos < len {
                match chars[pos].1 {
                    '"' => {
                        pos += 1;
                        break;
                    }
                    '\\' => {
                        if ch(pos + 1) == Some('\n') {
                            line += 1;
                        }
                        pos += 2;
                    }
                    '\n' => {
                        line += 1;
                        pos += 1;
                    }
                    _ => pos += 1,
                }
            }
            pos = pos.min(len);
            out.push(TokenKind::Str, byte_at(start), byte_at(pos), tok_line);
            continue;
        }

        // Character literal: the first character after '\' is always taken
        if c == '\\' {
            pos += 1;
            if pos < len {
                if chars[pos].1 == '\n' {
                    line += 1;
                }
                pos = scan_word(pos + 1);
            }
            out.push(TokenKind::Char, byte_at(start), byte_at(pos), tok_line);
            continue;
        }

        // Dispatch macros
        if c == '#' {
            let kind = match next {
                Some('_') => {
                    pos += 2;
                    TokenKind::Ignore
                }
                Some('(') | Some('{') => {
                    pos += 2;
                    TokenKind::Open
                }
                Some('?') => {
                    pos += 2;
                    if ch(pos) == Some('@') {
                        pos += 1;
                    }
                    if ch(pos) == Some('(') {
                        pos += 1;
                        TokenKind::Open
                    } else {
                        TokenKind::Junk
                    }
                }
                Some('\'') => {
                    pos += 2;
                    out.prefix(byte_at(start), tok_line);
                    continue;
                }
                // Namespaced map: `#:person{...}`, `#::{...}`
                Some(':') => {
                    pos = scan_word(pos + 2);
                    if ch(pos) == Some('{') {
                        pos += 1;
                        TokenKind::Open
                    } else {
                        TokenKind::Junk
                    }
                }
                Some('#') => {
                    pos = scan_word(pos + 2);
                    TokenKind::Literal
                }
                // Tagged literal: `#inst`, `#uuid`
                Some(n) if !is_terminator(n) => {
                    pos = scan_word(pos + 1);
                    TokenKind::Symbol
                }
                _ => {
                    pos += 1;
                    TokenKind::Junk
                }
            };
            out.push(kind, byte_at(start), byte_at(pos), tok_line);
            continue;
        }

        // Quote, syntax-quote, unquote, unquote-splicing, deref
        if matches!(c, '\'' | '`' | '~' | '@') {
            pos += 1;
            if c == '~' && next == Some('@') {
                pos += 1;
            }
            out.prefix(byte_at(start), tok_line);
            continue;
        }

        let kind = match c {
            '^' => {
                pos += 1;
                TokenKind::Meta
            }
            '(' | '[' | '{' => {
                pos += 1;
                TokenKind::Open
            }
            ')' | ']' | '}' => {
                pos += 1;
                TokenKind::Close
            }
            ':' => {
                pos = scan_word(pos + 1);
                TokenKind::Keyword
            }
            _ if c.is_ascii_digit()
                || ((c == '+' || c == '-') && next.is_some_and(|n| n.is_ascii_digit())) =>
            {
                pos = scan_word(pos + 1);
                TokenKind::Literal
            }
            _ => {
                pos = scan_word(pos + 1);
                match &src[byte_at(start)..byte_at(pos)] {
                    "true" | "false" | "nil" => TokenKind::Literal,
                    _ => TokenKind::Symbol,
                }
            }
        };
        out.push(kind, byte_at(start), byte_at(pos), tok_line);
    }

    out.finish()
}
