//! # Lettera Compiler - letters to LLVM IR
//!
//! This module compiles letter sources to textual LLVM IR and seals the
//! result so the IR can be traced back to the exact AST it came from.
//!
//! ## Architecture
//!
//! ```text
//! Source → Tokens → AST → Canonicalize → IR → Text
//!                     └──── serialize ────────┴──→ Seal
//! ```
//!
//! Lowering the IR to an object file is left to an external LLVM backend.
//! Embedding the seal into that object goes through [`embed::SealEmbedder`].
//!
//! ## Usage
//!
//! ```ignore
//! use lettera::compiler::{Compiler, CompileOptions};
//!
//! let compiler = Compiler::new(CompileOptions::default());
//! let result = compiler.compile(source)?;
//! std::fs::write("letter.ll", &result.ir)?;
//! println!("seal: {}", result.seal);
//! ```

pub mod canonicalize;
pub mod commands;
pub mod embed;
pub mod ir;
pub mod seal;

pub use canonicalize::{correct, correct_program};
pub use commands::{CommandSpec, ParamType, COMMANDS};
pub use embed::{ObjcopyEmbedder, SealEmbedder, SEAL_SECTION};
pub use ir::{IrGenerator, IrInstruction, IrModule, UnknownCommandPolicy};
pub use seal::{seal, serialize_ast, verify, verify_hex, Seal};

use crate::error::Result;
use crate::lexer::LetterScanner as Scanner;
use crate::parser::{LetterParser as Parser, Node, NodeKind, ParserConfig};
use std::path::Path;

/// Default module identifier in emitted IR
pub const DEFAULT_MODULE_NAME: &str = "lettera_module";

/// Compilation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Parser punctuation discipline
    pub parser: ParserConfig,
    /// Handling of calls to keywords outside the command table
    pub unknown_commands: UnknownCommandPolicy,
    /// `ModuleID` of the emitted IR
    pub module_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            unknown_commands: UnknownCommandPolicy::Error,
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

/// Compilation result
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Canonicalized AST
    pub program: Node,
    /// In-memory IR module
    pub module: IrModule,
    /// Textual LLVM IR
    pub ir: String,
    /// Serialized AST the seal was computed over
    pub ast_bytes: Vec<u8>,
    /// Seal over `ast_bytes` and `ir`
    pub seal: Seal,
    /// Number of Blocks whose Above payload was rewritten
    pub corrected_blocks: usize,
}

impl CompileResult {
    /// Recompute the seal from the stored artifacts
    pub fn verify(&self) -> bool {
        verify(&self.seal, &self.ast_bytes, self.ir.as_bytes())
    }
}

/// Letter to LLVM IR compiler
pub struct Compiler {
    options: CompileOptions,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl Compiler {
    /// Create a new compiler with options
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Options this compiler was built with
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Tokenize and parse without canonicalizing
    pub fn parse(&self, source: &str) -> Result<Node> {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens()?;
        tracing::debug!("scanned {} token(s)", tokens.len());

        let mut parser = Parser::with_config(tokens, self.options.parser);
        parser.parse()
    }

    /// Compile letter source to sealed IR
    pub fn compile(&self, source: &str) -> Result<CompileResult> {
        let program = self.parse(source)?;
        self.compile_ast(program)
    }

    /// Compile from an already-parsed AST
    pub fn compile_ast(&self, mut program: Node) -> Result<CompileResult> {
        // Phase 1: Canonicalize every Block
        let corrected_blocks = correct_program(&mut program);
        tracing::debug!(
            "canonicalized {} block(s), {} rewritten",
            program.children_of(NodeKind::Block).count(),
            corrected_blocks
        );

        // Phase 2: Generate IR
        let mut generator =
            IrGenerator::with_policy(&self.options.module_name, self.options.unknown_commands);
        let module = generator.generate(&program)?;
        let ir = module.to_string();
        tracing::debug!(
            "generated {} global(s), {} instruction(s), {} byte(s) of IR",
            module.globals.len(),
            module.function.instructions.len(),
            ir.len()
        );

        // Phase 3: Seal
        let ast_bytes = serialize_ast(&program);
        let seal = seal(&ast_bytes, ir.as_bytes());
        tracing::debug!("sealed {}…", &seal.to_hex()[..12]);

        Ok(CompileResult {
            program,
            module,
            ir,
            ast_bytes,
            seal,
            corrected_blocks,
        })
    }

    /// Canonicalized AST as pretty-printed JSON
    pub fn emit_ast(&self, source: &str) -> Result<String> {
        let mut program = self.parse(source)?;
        correct_program(&mut program);
        Ok(seal::ast_to_json_pretty(&program))
    }

    /// Hand a finished compilation's seal to an object-sealing tool.
    ///
    /// Failures surface as [`Error::Embed`](crate::Error::Embed) and leave the
    /// result's IR untouched.
    pub fn seal_object(
        &self,
        result: &CompileResult,
        object: &Path,
        embedder: &dyn SealEmbedder,
    ) -> Result<()> {
        embedder.embed(&result.seal, object).map_err(|e| {
            tracing::warn!("failed to embed seal into {}: {}", object.display(), e);
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EmbedError, Error, Stage};

    const HELLO: &str = r#"
Module:
Entry: Func main():;
Block:
  Equation: greeting = "hi"
  Above: print "greeting"
  Below: print "greeting"
End: Return 0;
"#;

    #[test]
    fn test_compiler_creation() {
        let compiler = Compiler::new(CompileOptions::default());
        assert_eq!(compiler.options().module_name, "lettera_module");
        assert!(compiler.options().parser.strict);
        assert_eq!(compiler.options().unknown_commands, UnknownCommandPolicy::Error);
    }

    #[test]
    fn test_compile_hello() {
        let result = Compiler::default().compile(HELLO).unwrap();
        assert!(result.ir.starts_with("; ModuleID = 'lettera_module'"));
        assert!(result.ir.contains("c\"hi\\00\""));
        assert!(result.ir.contains("ret i32 0"));
        assert_eq!(result.corrected_blocks, 0);
        assert!(result.verify());
    }

    #[test]
    fn test_mismatched_payloads_are_corrected_before_codegen() {
        let source = HELLO.replace("Above: print \"greeting\"", "Above: print \"bye\"");
        let result = Compiler::default().compile(&source).unwrap();
        assert_eq!(result.corrected_blocks, 1);
        assert_eq!(result.module.call_count("printf"), 2);
        assert!(!result.ir.contains("bye"));
    }

    #[test]
    fn test_emit_ast() {
        let json = Compiler::default().emit_ast(HELLO).unwrap();
        assert!(json.contains("\"format\": \"lettera-ast\""));
        assert!(json.contains("\"greeting\""));
    }

    #[test]
    fn test_custom_module_name() {
        let options = CompileOptions {
            module_name: "set_one".to_string(),
            ..Default::default()
        };
        let result = Compiler::new(options).compile(HELLO).unwrap();
        assert!(result.ir.starts_with("; ModuleID = 'set_one'"));
    }

    #[test]
    fn test_seal_object_reports_embed_stage() {
        struct Failing;
        impl SealEmbedder for Failing {
            fn embed(&self, _: &Seal, _: &Path) -> std::result::Result<(), EmbedError> {
                Err(EmbedError::ToolNotFound)
            }
        }

        let compiler = Compiler::default();
        let result = compiler.compile(HELLO).unwrap();
        let ir_before = result.ir.clone();
        let err = compiler
            .seal_object(&result, Path::new("letter.o"), &Failing)
            .unwrap_err();
        assert_eq!(err, Error::Embed(EmbedError::ToolNotFound));
        assert_eq!(err.stage(), Stage::Embed);
        assert!(!err.is_core());
        assert_eq!(result.ir, ir_before);
    }
}
