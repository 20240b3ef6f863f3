//! Domain command table
//!
//! Maps each recognized domain keyword to its parameter list and the fixed
//! external runtime symbol it lowers to. Every symbol returns `void`.
//!
//! | Keyword | Parameters | Runtime symbol |
//! |---------|------------|----------------|
//! | `BPM` | bpm: int | `dj_bpm(i32)` |
//! | `Key` | key: string | `dj_key(i8*)` |
//! | `Energy` | level: int | `dj_energy(i32)` |
//! | `Genre` | genre: string | `dj_genre(i8*)` |
//! | `Crossfade` | duration: duration, type: string | `dj_crossfade(i32, i8*)` |
//! | `Filter` | type: string, sweep: string | `dj_filter(i8*, i8*)` |
//! | `Loop` | length: int, count: int | `dj_loop(i32, i32)` |
//! | `Drop` | effect: string, value: int | `dj_drop(i8*, i32)` |
//! | `Playlist` | name: string | `dj_playlist(i8*)` |
//! | `Order` | a, b, method: string | `dj_order(i8*, i8*, i8*)` |
//! | `RecordSet` | file: string | `dj_record(i8*)` |
//! | `SealSet` | hash: string | `dj_seal(i8*)` |
//! | `Log` | event: string | `dj_log(i8*)` |
//! | `Play` | file: string | `dj_play(i8*)` |

use super::ir::IrType;

/// Parameter shape of a domain command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Base-12 integer
    Int,
    /// Base-12 integer that may carry a trailing `s` unit
    Duration,
    /// Null-terminated string
    Str,
}

impl ParamType {
    /// IR type of the lowered argument
    pub fn ir_type(&self) -> IrType {
        match self {
            ParamType::Int | ParamType::Duration => IrType::I32,
            ParamType::Str => IrType::I8Ptr,
        }
    }

    /// Description used in argument errors
    pub fn describe(&self) -> &'static str {
        match self {
            ParamType::Int => "a base-12 integer",
            ParamType::Duration => "a base-12 duration",
            ParamType::Str => "a string",
        }
    }
}

/// Named positional parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Parameter name (documentation only)
    pub name: &'static str,
    /// Parameter shape
    pub ty: ParamType,
}

const fn int(name: &'static str) -> Param {
    Param {
        name,
        ty: ParamType::Int,
    }
}

const fn duration(name: &'static str) -> Param {
    Param {
        name,
        ty: ParamType::Duration,
    }
}

const fn string(name: &'static str) -> Param {
    Param {
        name,
        ty: ParamType::Str,
    }
}

/// One row of the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Source keyword
    pub keyword: &'static str,
    /// External runtime symbol
    pub symbol: &'static str,
    /// Parameters in declared order
    pub params: &'static [Param],
}

impl CommandSpec {
    /// Declared argument count
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// IR parameter types in declared order
    pub fn param_types(&self) -> Vec<IrType> {
        self.params.iter().map(|p| p.ty.ir_type()).collect()
    }
}

/// Every recognized domain command
pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        keyword: "BPM",
        symbol: "dj_bpm",
        params: &[int("bpm")],
    },
    CommandSpec {
        keyword: "Key",
        symbol: "dj_key",
        params: &[string("key")],
    },
    CommandSpec {
        keyword: "Energy",
        symbol: "dj_energy",
        params: &[int("level")],
    },
    CommandSpec {
        keyword: "Genre",
        symbol: "dj_genre",
        params: &[string("genre")],
    },
    CommandSpec {
        keyword: "Crossfade",
        symbol: "dj_crossfade",
        params: &[duration("duration"), string("type")],
    },
    CommandSpec {
        keyword: "Filter",
        symbol: "dj_filter",
        params: &[string("type"), string("sweep")],
    },
    CommandSpec {
        keyword: "Loop",
        symbol: "dj_loop",
        params: &[int("length"), int("count")],
    },
    CommandSpec {
        keyword: "Drop",
        symbol: "dj_drop",
        params: &[string("effect"), int("value")],
    },
    CommandSpec {
        keyword: "Playlist",
        symbol: "dj_playlist",
        params: &[string("name")],
    },
    CommandSpec {
        keyword: "Order",
        symbol: "dj_order",
        params: &[string("a"), string("b"), string("method")],
    },
    CommandSpec {
        keyword: "RecordSet",
        symbol: "dj_record",
        params: &[string("file")],
    },
    CommandSpec {
        keyword: "SealSet",
        symbol: "dj_seal",
        params: &[string("hash")],
    },
    CommandSpec {
        keyword: "Log",
        symbol: "dj_log",
        params: &[string("event")],
    },
    CommandSpec {
        keyword: "Play",
        symbol: "dj_play",
        params: &[string("file")],
    },
];

/// Look up a keyword (case-sensitive)
pub fn lookup(keyword: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.keyword == keyword)
}

/// True when the keyword belongs to the command set
pub fn is_command(keyword: &str) -> bool {
    lookup(keyword).is_some()
}
