//! Lettera Parser Module
//!
//! Parses the token stream of a letter into a tree of universal [`Node`]s.

mod ast;
mod letter_parser;

pub use ast::{Node, NodeKind, NodeValue};
pub use letter_parser::{render_call, LetterParser, ParserConfig};
