//! # Intermediate Representation (IR) for Lettera Compilation
//!
//! Lowers a canonicalized letter to an in-memory module that renders as
//! textual LLVM IR for an external native backend.
//!
//! ## Module Structure
//!
//! ```text
//! ir/
//! ├── mod.rs          # This file - module definition and re-exports
//! ├── instruction.rs  # IrType, Temp, Operand, IrInstruction
//! ├── program.rs      # Global, ExternDecl, IrFunction, IrModule
//! ├── generator.rs    # IrGenerator (AST walk, symbol table, command lowering)
//! └── text.rs         # Textual LLVM IR rendering
//! ```
//!
//! ## Key Types
//!
//! - [`IrGenerator`] - AST-to-IR transformer with a per-module symbol table and namer
//! - [`IrModule`] - Globals, external declarations and the entry routine
//! - [`IrInstruction`] - Address-of, load, call, return

mod generator;
mod instruction;
mod program;
mod text;

// Re-export all public types
pub use generator::{base12_value, is_base12, IrGenerator, UnknownCommandPolicy};
pub use instruction::{IrInstruction, IrType, Operand, Temp};
pub use program::{ExternDecl, Global, GlobalInit, IrFunction, IrModule};
pub use text::{
    escape_bytes, format_declaration, format_global, format_instruction, render_module,
};
