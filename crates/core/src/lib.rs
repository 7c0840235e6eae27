//! nsresolve-core: find the namespace in effect at a position in a
//! Clojure-family source document.
//!
//! # Public API
//!
//! - [`ns_from_text()`] / [`ns_from_document()`] -- namespace name at an offset
//! - [`find_ns_declaration()`] -- the governing declaration with its location
//! - [`ns_declarations()`] -- every top-level declaration in a document
//! - [`resolve_ns_name()`], [`path_to_ns()`], [`is_prefix()`] -- namespace
//!   names derived from file paths and source roots
//! - [`Document`] and [`TokenCursor`] -- the structural model the search
//!   walks over
//!
//! Nothing here fails: malformed or half-typed source simply yields no
//! declaration.

pub mod cursor;
pub mod document;
pub mod lexer;
pub mod ns_form;
pub mod ns_path;

// ── Convenience re-exports: key types ────────────────────────────────

pub use cursor::TokenCursor;
pub use document::{Document, FormSpan};
pub use lexer::{lex, Token, TokenKind};
pub use ns_form::{DeclKind, ListEntry, NsDeclaration};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use ns_form::{
    classify_list, find_ns_declaration, ns_declarations, ns_from_document, ns_from_text,
    ns_symbol_of_current_form,
};
pub use ns_path::{
    is_prefix, normalize_path, ns_to_path, path_to_ns, relative_path, resolve_ns_name,
};
