//! IR Generator - transforms a canonicalized letter AST to IR
//!
//! Walks every `Block` in source order:
//!
//! 1. `Equation` binds its left-hand side to a private constant (integer for
//!    base-12 numerals, byte array for strings) or, when the right-hand side is
//!    a domain command, emits the call and binds the first argument.
//! 2. `Above` and `Below` each emit their own `printf` call (or their own
//!    command call). They are never merged into one site.
//!
//! Module metadata is compile-time only and emits nothing. The entry routine
//! returns the `End` code.

use super::instruction::{IrInstruction, IrType, Operand, Temp};
use super::program::{ExternDecl, Global, GlobalInit, IrModule};
use crate::compiler::commands::{self, CommandSpec, ParamType, COMMANDS};
use crate::error::{CodegenError, Error, Result};
use crate::parser::{Node, NodeKind};
use std::collections::{HashMap, HashSet};

/// Variadic formatting routine every module declares
const PRINTF: &str = "printf";

/// What to do with a call whose keyword is not in the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCommandPolicy {
    /// Fail with `CodegenError::UnknownCommand`
    #[default]
    Error,
    /// Drop the call and log a warning
    Ignore,
}

/// Storage a symbol name resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// `i32` global
    Int { global: String },
    /// Null-terminated byte-array global
    Str { global: String, len: usize },
}

/// Lowered command argument
#[derive(Debug, Clone)]
struct LoweredArg {
    ty: IrType,
    operand: Operand,
    /// Immediate value, when the argument was a numeral
    value: Option<i32>,
    /// Storage behind the argument, when it has one
    binding: Option<Binding>,
}

/// Per-module global namer; never shared across compilations
#[derive(Debug, Default)]
struct GlobalNamer {
    used: HashSet<String>,
    counters: HashMap<String, u32>,
}

impl GlobalNamer {
    fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    /// `base` if free, otherwise `base.N` for the first free N
    fn unique(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        loop {
            let counter = self.counters.entry(base.to_string()).or_insert(0);
            *counter += 1;
            let candidate = format!("{}.{}", base, counter);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// `prefix.N` with N counting from 0
    fn fresh(&mut self, prefix: &str) -> String {
        loop {
            let counter = self.counters.entry(prefix.to_string()).or_insert(0);
            let candidate = format!("{}.{}", prefix, counter);
            *counter += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// True when every character is a base-12 digit (`0-9`, `a`, `b`)
pub fn is_base12(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| matches!(c, '0'..='9' | 'a' | 'b'))
}

/// Positional base-12 value; `None` for non-numerals or i64 overflow
pub fn base12_value(text: &str) -> Option<i64> {
    if !is_base12(text) {
        return None;
    }
    text.chars().try_fold(0i64, |acc, c| {
        let digit = match c {
            'a' => 10,
            'b' => 11,
            d => d.to_digit(10)? as i64,
        };
        acc.checked_mul(12)?.checked_add(digit)
    })
}

fn base12_i32(text: &str) -> std::result::Result<i32, CodegenError> {
    base12_value(text)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| CodegenError::IntegerOutOfRange {
            text: text.to_string(),
        })
}

fn strip_quotes(text: &str) -> Option<&str> {
    text.strip_prefix('"').and_then(|t| t.strip_suffix('"'))
}

fn c_string(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// IR Generator - transforms a letter AST to an [`IrModule`]
pub struct IrGenerator {
    /// Module identifier
    module_name: String,
    /// Unknown command handling
    unknown_commands: UnknownCommandPolicy,
    /// Next available temporary
    next_temp: u32,
    /// Symbol name to storage mapping
    symbols: HashMap<String, Binding>,
    /// Global naming state
    namer: GlobalNamer,
    /// Emitted globals
    globals: Vec<Global>,
    /// Shared format strings, keyed by content
    formats: HashMap<&'static str, Binding>,
    /// Generated instructions
    instructions: Vec<IrInstruction>,
}

impl IrGenerator {
    /// Create a new IR generator for one module
    pub fn new(module_name: &str) -> Self {
        Self::with_policy(module_name, UnknownCommandPolicy::default())
    }

    /// Create a generator with an explicit unknown-command policy
    pub fn with_policy(module_name: &str, unknown_commands: UnknownCommandPolicy) -> Self {
        Self {
            module_name: module_name.to_string(),
            unknown_commands,
            next_temp: 0,
            symbols: HashMap::new(),
            namer: GlobalNamer::default(),
            globals: Vec::new(),
            formats: HashMap::new(),
            instructions: Vec::new(),
        }
    }

    /// Generate IR from a `Program` node
    pub fn generate(&mut self, program: &Node) -> Result<IrModule> {
        let entry = program
            .child(NodeKind::Entry)
            .and_then(Node::value_str)
            .unwrap_or("main")
            .to_string();

        let declarations = Self::declarations();
        if declarations.iter().any(|decl| decl.name == entry) {
            return Err(CodegenError::ReservedEntryName { name: entry }.into());
        }
        self.namer.reserve(&entry);
        for decl in &declarations {
            self.namer.reserve(&decl.name);
        }

        let blocks: Vec<&Node> = program.children_of(NodeKind::Block).collect();
        tracing::debug!("generating IR for {} block(s), entry @{}", blocks.len(), entry);

        for block in blocks {
            self.generate_block(block)?;
        }

        let code_text = program
            .child(NodeKind::End)
            .and_then(Node::value_str)
            .unwrap_or("0");
        let code: i32 = code_text
            .parse()
            .map_err(|_| CodegenError::InvalidReturnCode {
                text: code_text.to_string(),
            })?;
        self.emit(IrInstruction::Ret(code));

        let mut module = IrModule::new(&self.module_name, &entry);
        module.globals = std::mem::take(&mut self.globals);
        module.declarations = declarations;
        module.function.instructions = std::mem::take(&mut self.instructions);
        Ok(module)
    }

    /// `printf` plus one declaration per domain command, always all of them
    fn declarations() -> Vec<ExternDecl> {
        let mut decls = vec![ExternDecl {
            name: PRINTF.to_string(),
            ret: IrType::I32,
            params: vec![IrType::I8Ptr],
            variadic: true,
        }];
        decls.extend(COMMANDS.iter().map(|spec| ExternDecl {
            name: spec.symbol.to_string(),
            ret: IrType::Void,
            params: spec.param_types(),
            variadic: false,
        }));
        decls
    }

    fn generate_block(&mut self, block: &Node) -> Result<()> {
        for child in &block.children {
            match child.kind {
                NodeKind::Equation => self.generate_equation(child)?,
                NodeKind::Above | NodeKind::Below => self.generate_section(child)?,
                _ => {}
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EQUATIONS
    // ═══════════════════════════════════════════════════════════════════════

    fn generate_equation(&mut self, equation: &Node) -> Result<()> {
        let Some(value) = &equation.value else {
            return Ok(());
        };
        let lhs = value.first().to_string();
        let rhs = value.second().to_string();

        if let Some(call) = equation.children.iter().find(|c| c.is_call()) {
            let lowered = self.generate_call(call)?;
            match lowered.and_then(|args| args.into_iter().next()) {
                Some(first) => self.bind_argument(&lhs, first),
                None => tracing::debug!("`{}` left unbound: call produced no argument", lhs),
            }
            return Ok(());
        }

        let binding = self.classify_constant(&lhs, &rhs)?;
        self.symbols.insert(lhs, binding);
        Ok(())
    }

    /// Numeral → `i32` global; quoted text → byte-array global;
    /// bound identifier → alias of its storage
    fn classify_constant(&mut self, lhs: &str, rhs: &str) -> Result<Binding> {
        if is_base12(rhs) {
            let value = base12_i32(rhs)?;
            return Ok(self.int_global(lhs, value));
        }
        if let Some(text) = strip_quotes(rhs) {
            return Ok(self.string_global(lhs, text.as_bytes()));
        }
        if let Some(existing) = self.symbols.get(rhs) {
            return Ok(existing.clone());
        }
        Err(CodegenError::UnclassifiableConstant {
            name: lhs.to_string(),
            text: rhs.to_string(),
        }
        .into())
    }

    fn bind_argument(&mut self, lhs: &str, arg: LoweredArg) {
        let binding = match (arg.binding, arg.value) {
            (Some(binding), _) => binding,
            (None, Some(value)) => self.int_global(lhs, value),
            (None, None) => return,
        };
        self.symbols.insert(lhs.to_string(), binding);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SECTIONS
    // ═══════════════════════════════════════════════════════════════════════

    fn generate_section(&mut self, section: &Node) -> Result<()> {
        if let Some(call) = section.children.iter().find(|c| c.is_call()) {
            self.generate_call(call)?;
            return Ok(());
        }

        let Some(value) = &section.value else {
            return Ok(());
        };
        let directive = value.first();
        if !directive.eq_ignore_ascii_case("print") {
            return Err(CodegenError::UnsupportedDirective {
                directive: directive.to_string(),
            }
            .into());
        }

        let payload = value.second();
        let text = strip_quotes(payload).unwrap_or(payload);

        match self.symbols.get(text).cloned() {
            Some(binding) => self.print_symbol(&binding),
            None => self.print_literal(text),
        }
        Ok(())
    }

    fn print_symbol(&mut self, binding: &Binding) {
        let (value_ty, value, format) = match binding {
            Binding::Int { global } => {
                let dst = self.alloc_temp();
                self.emit(IrInstruction::Load {
                    dst,
                    ty: IrType::I32,
                    global: global.clone(),
                });
                (IrType::I32, dst, "%d\n")
            }
            Binding::Str { .. } => (IrType::I8Ptr, self.address_of(binding), "%s\n"),
        };

        let format = self.format_global(format);
        let format_ptr = self.address_of(&format);
        self.emit_printf(vec![
            (IrType::I8Ptr, Operand::Temp(format_ptr)),
            (value_ty, Operand::Temp(value)),
        ]);
    }

    /// Message plus newline, `%` doubled so it prints verbatim
    fn print_literal(&mut self, message: &str) {
        let text = format!("{}\n", message.replace('%', "%%"));
        let name = self.namer.fresh(".str");
        let binding = self.push_bytes(name, c_string(&text));
        let ptr = self.address_of(&binding);
        self.emit_printf(vec![(IrType::I8Ptr, Operand::Temp(ptr))]);
    }

    fn emit_printf(&mut self, args: Vec<(IrType, Operand)>) {
        self.emit(IrInstruction::Call {
            dst: None,
            callee: PRINTF.to_string(),
            ret: IrType::I32,
            variadic: Some(vec![IrType::I8Ptr]),
            args,
        });
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DOMAIN COMMANDS
    // ═══════════════════════════════════════════════════════════════════════

    /// Emit one domain command call. `Ok(None)` when an unknown call was
    /// dropped under [`UnknownCommandPolicy::Ignore`].
    fn generate_call(&mut self, call: &Node) -> Result<Option<Vec<LoweredArg>>> {
        let name = call.value_str().unwrap_or_default();
        let spec = match commands::lookup(name) {
            Some(spec) if call.kind == NodeKind::Command => spec,
            _ => match self.unknown_commands {
                UnknownCommandPolicy::Error => {
                    return Err(CodegenError::UnknownCommand {
                        name: name.to_string(),
                    }
                    .into())
                }
                UnknownCommandPolicy::Ignore => {
                    tracing::warn!("ignoring unknown command `{}`", name);
                    return Ok(None);
                }
            },
        };

        let args: Vec<&str> = call.children.iter().filter_map(Node::value_str).collect();
        if args.len() != spec.arity() {
            return Err(CodegenError::ArityMismatch {
                command: spec.keyword.to_string(),
                expected: spec.arity(),
                got: args.len(),
            }
            .into());
        }

        let mut lowered = Vec::with_capacity(args.len());
        for (index, (param, arg)) in spec.params.iter().zip(args).enumerate() {
            lowered.push(self.lower_argument(spec, index, param.ty, arg)?);
        }

        self.emit(IrInstruction::Call {
            dst: None,
            callee: spec.symbol.to_string(),
            ret: IrType::Void,
            variadic: None,
            args: lowered.iter().map(|a| (a.ty, a.operand)).collect(),
        });
        Ok(Some(lowered))
    }

    fn lower_argument(
        &mut self,
        spec: &CommandSpec,
        index: usize,
        ty: ParamType,
        arg: &str,
    ) -> Result<LoweredArg> {
        let invalid = || -> Error {
            CodegenError::InvalidArgument {
                command: spec.keyword.to_string(),
                index,
                expected: ty.describe().to_string(),
                got: arg.to_string(),
            }
            .into()
        };

        match ty {
            ParamType::Int | ParamType::Duration => {
                if let Some(Binding::Int { global }) = self.symbols.get(arg).cloned() {
                    let dst = self.alloc_temp();
                    self.emit(IrInstruction::Load {
                        dst,
                        ty: IrType::I32,
                        global: global.clone(),
                    });
                    let binding = Binding::Int { global };
                    return Ok(LoweredArg {
                        ty: IrType::I32,
                        operand: Operand::Temp(dst),
                        value: None,
                        binding: Some(binding),
                    });
                }

                let mut text = strip_quotes(arg).unwrap_or(arg);
                if ty == ParamType::Duration {
                    text = text.strip_suffix('s').filter(|t| !t.is_empty()).unwrap_or(text);
                }
                if !is_base12(text) {
                    return Err(invalid());
                }
                let value = base12_i32(text)?;
                Ok(LoweredArg {
                    ty: IrType::I32,
                    operand: Operand::Const(value as i64),
                    value: Some(value),
                    binding: None,
                })
            }
            ParamType::Str => {
                let bound = self
                    .symbols
                    .get(arg)
                    .filter(|b| matches!(b, Binding::Str { .. }))
                    .cloned();
                let binding = match (strip_quotes(arg), bound) {
                    (Some(text), _) => {
                        let name = self.namer.fresh(".arg");
                        self.push_bytes(name, c_string(text))
                    }
                    (None, Some(binding)) => binding,
                    (None, None) => {
                        let name = self.namer.fresh(".arg");
                        self.push_bytes(name, c_string(arg))
                    }
                };
                let ptr = self.address_of(&binding);
                Ok(LoweredArg {
                    ty: IrType::I8Ptr,
                    operand: Operand::Temp(ptr),
                    value: None,
                    binding: Some(binding),
                })
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    fn int_global(&mut self, name: &str, value: i32) -> Binding {
        let global = self.namer.unique(name);
        self.globals.push(Global {
            name: global.clone(),
            init: GlobalInit::Int(value),
        });
        Binding::Int { global }
    }

    fn string_global(&mut self, name: &str, text: &[u8]) -> Binding {
        let mut bytes = text.to_vec();
        bytes.push(0);
        let global = self.namer.unique(name);
        self.push_bytes(global, bytes)
    }

    fn push_bytes(&mut self, global: String, bytes: Vec<u8>) -> Binding {
        let len = bytes.len();
        self.globals.push(Global {
            name: global.clone(),
            init: GlobalInit::Bytes(bytes),
        });
        Binding::Str { global, len }
    }

    /// Shared `printf` format constant, emitted on first use
    fn format_global(&mut self, format: &'static str) -> Binding {
        if let Some(existing) = self.formats.get(format) {
            return existing.clone();
        }
        let base = if format.starts_with("%d") {
            ".fmt.int"
        } else {
            ".fmt.str"
        };
        let name = self.namer.unique(base);
        let binding = self.push_bytes(name, c_string(format));
        self.formats.insert(format, binding.clone());
        binding
    }

    /// Pointer to a string binding; integer bindings are loaded instead
    fn address_of(&mut self, binding: &Binding) -> Temp {
        let dst = self.alloc_temp();
        match binding {
            Binding::Str { global, len } => self.emit(IrInstruction::AddressOf {
                dst,
                global: global.clone(),
                len: *len,
            }),
            Binding::Int { global } => self.emit(IrInstruction::Load {
                dst,
                ty: IrType::I32,
                global: global.clone(),
            }),
        }
        dst
    }

    fn alloc_temp(&mut self) -> Temp {
        let temp = Temp::new(self.next_temp);
        self.next_temp += 1;
        temp
    }

    fn emit(&mut self, instr: IrInstruction) {
        self.instructions.push(instr);
    }
}
