//! Textual LLVM IR rendering
//!
//! Uses typed-pointer syntax (`i8*`) so the output is accepted by the
//! LLVM toolchains the native backend targets.

use super::instruction::{IrInstruction, IrType};
use super::program::{ExternDecl, Global, GlobalInit, IrModule};
use std::fmt;

/// Escape bytes for an LLVM `c"..."` literal; quotes, backslashes and non-printables become `\XX`
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            0x20..=0x7e if b != b'"' && b != b'\\' => out.push(b as char),
            _ => out.push_str(&format!("\\{:02X}", b)),
        }
    }
    out
}

/// Format a single global definition
pub fn format_global(global: &Global) -> String {
    match &global.init {
        GlobalInit::Bytes(bytes) => format!(
            "@{} = private unnamed_addr constant [{} x i8] c\"{}\"",
            global.name,
            bytes.len(),
            escape_bytes(bytes)
        ),
        GlobalInit::Int(value) => format!(
            "@{} = private unnamed_addr constant i32 {}",
            global.name, value
        ),
    }
}

fn signature(params: &[IrType], variadic: bool) -> String {
    let mut parts: Vec<String> = params.iter().map(|p| p.to_string()).collect();
    if variadic {
        parts.push("...".to_string());
    }
    parts.join(", ")
}

/// Format a single external declaration
pub fn format_declaration(decl: &ExternDecl) -> String {
    format!(
        "declare {} @{}({})",
        decl.ret,
        decl.name,
        signature(&decl.params, decl.variadic)
    )
}

/// Format a single IR instruction
pub fn format_instruction(instr: &IrInstruction) -> String {
    match instr {
        IrInstruction::AddressOf { dst, global, len } => format!(
            "{} = getelementptr inbounds [{len} x i8], [{len} x i8]* @{}, i32 0, i32 0",
            dst,
            global,
            len = len
        ),
        IrInstruction::Load { dst, ty, global } => {
            format!("{} = load {}, {}* @{}", dst, ty, ty, global)
        }
        IrInstruction::Call {
            dst,
            callee,
            ret,
            variadic,
            args,
        } => {
            let args: Vec<String> = args
                .iter()
                .map(|(ty, op)| format!("{} {}", ty, op))
                .collect();
            let callee_ty = match variadic {
                Some(fixed) => format!("{} ({})", ret, signature(fixed, true)),
                None => ret.to_string(),
            };
            let call = format!("call {} @{}({})", callee_ty, callee, args.join(", "));
            match dst {
                Some(dst) => format!("{} = {}", dst, call),
                None => call,
            }
        }
        IrInstruction::Ret(code) => format!("ret i32 {}", code),
    }
}

/// Render a whole module
pub fn render_module(module: &IrModule) -> String {
    module.to_string()
}

impl fmt::Display for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        writeln!(f, "source_filename = \"{}\"", self.name)?;

        if !self.globals.is_empty() {
            writeln!(f)?;
            for global in &self.globals {
                writeln!(f, "{}", format_global(global))?;
            }
        }

        if !self.declarations.is_empty() {
            writeln!(f)?;
            for decl in &self.declarations {
                writeln!(f, "{}", format_declaration(decl))?;
            }
        }

        let function = &self.function;
        writeln!(f)?;
        writeln!(f, "define {} @{}() {{", function.ret, function.name)?;
        writeln!(f, "entry:")?;
        for instr in &function.instructions {
            writeln!(f, "  {}", format_instruction(instr))?;
        }
        writeln!(f, "}}")
    }
}
