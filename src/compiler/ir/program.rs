//! IR module, global and declaration definitions

use super::instruction::{IrInstruction, IrType};
use std::collections::BTreeSet;

/// Initializer of a private, read-only global
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalInit {
    /// Byte array (already null-terminated)
    Bytes(Vec<u8>),
    /// 32-bit integer
    Int(i32),
}

/// Private constant global
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    /// Symbol name (without `@`)
    pub name: String,
    /// Initializer
    pub init: GlobalInit,
}

/// External function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternDecl {
    /// Symbol name (without `@`)
    pub name: String,
    /// Return type
    pub ret: IrType,
    /// Fixed parameter types
    pub params: Vec<IrType>,
    /// Accepts extra arguments (`...`)
    pub variadic: bool,
}

/// Function with a single entry block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrFunction {
    /// Function name (without `@`)
    pub name: String,
    /// Return type
    pub ret: IrType,
    /// Instructions of the `entry` block in order
    pub instructions: Vec<IrInstruction>,
}

/// Complete IR module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrModule {
    /// Module identifier
    pub name: String,
    /// Private constants in emission order
    pub globals: Vec<Global>,
    /// External declarations (stable linkage surface)
    pub declarations: Vec<ExternDecl>,
    /// Program entry routine
    pub function: IrFunction,
}

impl IrModule {
    /// Create a new empty IR module
    pub fn new(name: &str, entry: &str) -> Self {
        Self {
            name: name.to_string(),
            globals: Vec::new(),
            declarations: Vec::new(),
            function: IrFunction {
                name: entry.to_string(),
                ret: IrType::I32,
                instructions: Vec::new(),
            },
        }
    }

    /// Global by name
    pub fn global(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// Names of every declared external symbol
    pub fn external_symbols(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.name.as_str()).collect()
    }

    /// External symbols the entry routine actually calls, sorted
    pub fn referenced_symbols(&self) -> BTreeSet<&str> {
        self.function
            .instructions
            .iter()
            .filter_map(|instr| match instr {
                IrInstruction::Call { callee, .. } => Some(callee.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of calls to the given symbol
    pub fn call_count(&self, callee: &str) -> usize {
        self.function
            .instructions
            .iter()
            .filter(|instr| matches!(instr, IrInstruction::Call { callee: c, .. } if c == callee))
            .count()
    }
}
