//! # Lettera - Sealed Letters to LLVM IR
//!
//! A compiler for *letters*: small, section-based performance scripts. Each
//! letter is lowered to textual LLVM IR that calls into a DJ runtime, and the
//! output is sealed with a SHA-256 digest binding the IR to the exact AST it
//! was generated from.
//!
//! ## Features
//!
//! - **Strict grammar** - `Module → Entry → Block+ → End`, with an optional
//!   punctuation discipline that reports missing `;` distinctly
//! - **Canonicalization** - `Below` is authoritative over `Above`
//! - **Base-12 numerals** - digits `0-9`, `a`, `b`
//! - **Domain commands** - `BPM`, `Crossfade`, `Loop`, `Drop`, ... lowered to `dj_*` calls
//! - **Seals** - deterministic, independently verifiable
//!
//! ## Quick Start
//!
//! ```rust
//! use lettera::{Compiler, CompileOptions};
//!
//! # fn main() -> lettera::Result<()> {
//! let source = r#"
//! Module:
//! Entry: Func main():;
//! Block:
//!   Equation: greeting = "hi"
//!   Above: print "greeting"
//!   Below: print "greeting"
//! End: Return 0;
//! "#;
//!
//! let compiler = Compiler::new(CompileOptions::default());
//! let result = compiler.compile(source)?;
//!
//! assert!(result.ir.contains("define i32 @main()"));
//! assert!(lettera::verify(&result.seal, &result.ast_bytes, result.ir.as_bytes()));
//! # Ok(())
//! # }
//! ```
//!
//! ### Stage by stage
//!
//! ```rust
//! use lettera::{Parser, Scanner};
//!
//! # fn main() -> lettera::Result<()> {
//! let mut scanner = Scanner::new("Module:\nEntry: Func main():;\n\
//!     Block:\n Equation: n = b0\n Above: print \"n\"\n Below: print \"n\"\nEnd: Return 0;");
//! let tokens = scanner.scan_tokens()?;
//! let mut parser = Parser::new(tokens);
//! let program = parser.parse()?;
//!
//! assert_eq!(program.children.len(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source → Scanner → Tokens → Parser → AST → Canonicalizer → IrGenerator → IR text
//!                                       └──────────── serialize ──────────┴─→ Seal
//! ```
//!
//! ### Main Components
//!
//! - [`Scanner`] - Tokenizes source text
//! - [`Parser`] - Builds the [`Node`] tree
//! - [`compiler::canonicalize`] - Reconciles mirrored sections
//! - [`compiler::ir::IrGenerator`] - Lowers the tree to an [`IrModule`]
//! - [`compiler::seal`] - Serializes the AST and computes the [`Seal`]
//! - [`compiler::embed`] - Boundary to the tool that stamps seals into objects
//!
//! Logging goes through `tracing`; install a subscriber to see it.

/// Version of the Lettera compiler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;

// Re-export main types
pub use compiler::{
    seal, verify, verify_hex, CompileOptions, CompileResult, Compiler, IrModule, Seal,
    UnknownCommandPolicy,
};
pub use error::{CodegenError, EmbedError, Error, Result, Stage};
pub use lexer::{tokenize, LetterScanner, Token, TokenKind};
pub use parser::{LetterParser, Node, NodeKind, NodeValue, ParserConfig};

/// Type alias for the letter scanner (lexer).
pub type Scanner<'a> = LetterScanner<'a>;

/// Type alias for the letter parser.
pub type Parser = LetterParser;
