//! Lexical analysis for Lettera
//!
//! Converts source text into a stream of tokens by trying anchored patterns
//! in a fixed priority order.

mod scanner;
mod token;

pub use scanner::{tokenize, LetterScanner};
pub use token::{Token, TokenKind};
