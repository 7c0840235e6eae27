//! Namespace resolution: which `ns` / `in-ns` form governs an offset.
//!
//! The search runs on a fixed dispatch, repeated one nesting level further
//! out each time:
//!
//! 1. an offset strictly inside a top-level declaration form belongs to it;
//! 2. an offset with nothing but whitespace before it takes the first
//!    declaration in the document;
//! 3. otherwise the nearest declaration among preceding top-level forms
//!    wins, climbing out of nested lists until top level is reached.
//!
//! The climb is a loop over strictly decreasing offsets, so nesting depth
//! never turns into stack depth.

use serde::Serialize;

use crate::cursor::TokenCursor;
use crate::document::Document;
use crate::lexer::TokenKind;

/// Which declaring form introduced a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclKind {
    #[serde(rename = "ns")]
    Ns,
    #[serde(rename = "in-ns")]
    InNs,
}

impl DeclKind {
    fn from_symbol(raw: &str) -> Option<Self> {
        match raw {
            "ns" => Some(DeclKind::Ns),
            "in-ns" => Some(DeclKind::InNs),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Ns => "ns",
            DeclKind::InNs => "in-ns",
        }
    }

    /// The declared name carried by the symbol token following the keyword.
    /// `in-ns` takes a quoted symbol, so its first character is the quote.
    fn declared_name(self, raw: &str) -> Option<String> {
        let name = match self {
            DeclKind::Ns => raw,
            DeclKind::InNs => {
                let mut chars = raw.chars();
                chars.next();
                chars.as_str()
            }
        };
        (!name.is_empty()).then(|| name.to_owned())
    }
}

/// A namespace declaration found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NsDeclaration {
    pub name: String,
    pub kind: DeclKind,
    /// Byte offset of the declaring form's opening parenthesis
    pub offset: usize,
    pub line: u32,
}

/// Side from which a cursor approaches the list it is classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEntry {
    /// The cursor sits before the list.
    FromLeft,
    /// The cursor sits after the list.
    FromRight,
}

/// Classify the list the cursor touches as a namespace declaration.
///
/// The cursor itself is not moved.
pub fn ns_symbol_of_current_form(
    cursor: &TokenCursor<'_>,
    entry: ListEntry,
) -> Option<NsDeclaration> {
    let mut probe = *cursor;
    let entered = match entry {
        ListEntry::FromLeft => probe.down_list(),
        ListEntry::FromRight => probe.backward_down_list(),
    };
    if !entered || !probe.backward_list() {
        return None;
    }
    let doc = probe.document();
    let open = doc.token(probe.enclosing_list()?)?;
    if open.raw != "(" {
        return None;
    }

    probe.forward_whitespace();
    let head = probe.token().filter(|t| t.kind == TokenKind::Symbol)?;
    let kind = DeclKind::from_symbol(&head.raw)?;

    while probe.forward_sexp() {
        probe.forward_ignored();
        match probe.token() {
            Some(tok) if tok.kind == TokenKind::Symbol => {
                let name = kind.declared_name(&tok.raw)?;
                return Some(NsDeclaration {
                    name,
                    kind,
                    offset: open.offset,
                    line: open.line,
                });
            }
            _ => {}
        }
    }
    None
}

/// Classify the list whose opening bracket is token `open`.
pub fn classify_list(doc: &Document, open: usize) -> Option<NsDeclaration> {
    let span = doc.form_span(open)?;
    ns_symbol_of_current_form(&doc.cursor_at(span.start), ListEntry::FromLeft)
}

/// The declaration governing `offset`, if any.
pub fn find_ns_declaration(doc: &Document, offset: usize) -> Option<NsDeclaration> {
    let mut offset = offset.min(doc.len());
    loop {
        if let Some(form) = doc.top_level_form_at(offset) {
            if let Some(decl) = classify_list(doc, form.open) {
                log::debug!("offset {} is inside the declaration of {}", offset, decl.name);
                return Some(decl);
            }
        }

        let mut cursor = doc.cursor_at(offset);
        let mut start_probe = cursor;
        start_probe.backward_whitespace();
        if start_probe.at_start() {
            log::debug!("nothing precedes offset {}, scanning forward", offset);
            return first_declaration(cursor);
        }

        cursor.backward_whitespace();
        if cursor.at_top_level() {
            while cursor.backward_sexp() {
                if let Some(decl) = ns_symbol_of_current_form(&cursor, ListEntry::FromLeft) {
                    log::debug!(
                        "nearest declaration before offset {} is {} (line {})",
                        offset,
                        decl.name,
                        decl.line
                    );
                    return Some(decl);
                }
            }
            log::trace!("no declaration precedes offset {}", offset);
            return None;
        }

        cursor.backward_list();
        cursor.backward_up_list();
        cursor.backward_whitespace();
        if cursor.at_start() {
            return None;
        }
        let next = cursor.offset();
        if next >= offset {
            return None;
        }
        log::trace!("climbing from offset {} to {}", offset, next);
        offset = next;
    }
}

fn first_declaration(mut cursor: TokenCursor<'_>) -> Option<NsDeclaration> {
    cursor.forward_whitespace();
    while cursor.forward_sexp() {
        if let Some(decl) = ns_symbol_of_current_form(&cursor, ListEntry::FromRight) {
            return Some(decl);
        }
    }
    None
}

/// Name of the namespace in effect at `offset`.
pub fn ns_from_document(doc: &Document, offset: usize) -> Option<String> {
    find_ns_declaration(doc, offset).map(|decl| decl.name)
}

/// Name of the namespace in effect at `offset` of `text`, or at the end of
/// the text when no offset is given.
pub fn ns_from_text(text: &str, offset: Option<usize>) -> Option<String> {
    let doc = Document::new(text);
    ns_from_document(&doc, offset.unwrap_or(text.len()))
}

/// Every top-level namespace declaration, in document order.
pub fn ns_declarations(doc: &Document) -> Vec<NsDeclaration> {
    let mut cursor = doc.cursor_at_start();
    let mut found = Vec::new();
    while cursor.forward_sexp() {
        if let Some(decl) = ns_symbol_of_current_form(&cursor, ListEntry::FromRight) {
            found.push(decl);
        }
    }
    found
}
