//! IR instruction definitions

use std::fmt;

/// First-class IR types used by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrType {
    /// 32-bit integer
    I32,
    /// Pointer to bytes (C string)
    I8Ptr,
    /// No value
    Void,
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IrType::I32 => f.write_str("i32"),
            IrType::I8Ptr => f.write_str("i8*"),
            IrType::Void => f.write_str("void"),
        }
    }
}

/// Virtual temporary (infinite supply, numbered per function)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temp(pub u32);

impl Temp {
    /// Creates a temporary with the given ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "%t{}", self.0)
    }
}

/// Instruction operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Value held in a temporary
    Temp(Temp),
    /// Immediate integer
    Const(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Temp(t) => write!(f, "{}", t),
            Operand::Const(n) => write!(f, "{}", n),
        }
    }
}

/// IR instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrInstruction {
    /// dst = pointer to the first byte of a byte-array global
    AddressOf {
        /// Destination temporary
        dst: Temp,
        /// Global name (without `@`)
        global: String,
        /// Array length including the terminator
        len: usize,
    },

    /// dst = load of a scalar global
    Load {
        /// Destination temporary
        dst: Temp,
        /// Loaded type
        ty: IrType,
        /// Global name (without `@`)
        global: String,
    },

    /// Call an external symbol, store result in optional dst
    Call {
        /// Destination temporary, if the result is kept
        dst: Option<Temp>,
        /// Callee symbol (without `@`)
        callee: String,
        /// Return type
        ret: IrType,
        /// Fixed parameter types when the callee is variadic
        variadic: Option<Vec<IrType>>,
        /// Typed arguments in order
        args: Vec<(IrType, Operand)>,
    },

    /// Return an integer exit code
    Ret(i32),
}
