//! Error types for the Lettera compiler

use thiserror::Error;

/// Lettera compilation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lex errors
    /// No token pattern matched at a position in the source
    ///
    /// **Triggered by:** A character outside the token alphabet
    /// **Example:** `Module: @` (`@` is not a symbol)
    #[error("Lex error at byte {offset} (line {line}, column {column}): unexpected character {ch:?}")]
    LexError {
        /// Byte offset of the offending character
        offset: usize,
        /// Line number (1-indexed)
        line: usize,
        /// Column number (1-indexed)
        column: usize,
        /// The character no pattern accepted
        ch: char,
    },

    // Parse errors
    /// Structural mismatch between the grammar and the token stream
    ///
    /// **Triggered by:** Sections out of order, missing sections, stray tokens
    /// **Example:** `Block:` followed by `Above:` before `Equation:`
    #[error("Parse error at line {line}, column {column}: expected {expected}, got {got}")]
    UnexpectedToken {
        /// Expected token description
        expected: String,
        /// Actual token received
        got: String,
        /// Line of the offending token
        line: usize,
        /// Column of the offending token
        column: usize,
    },

    /// Strict mode requires a `;` that is not there
    ///
    /// **Triggered by:** A metadata line, the Entry signature or the End
    /// statement without a trailing `;` while strict mode is on
    /// **Prevention:** Terminate those lines with `;` or disable strict mode
    #[error("Missing terminator `;` after {after} at line {line}, column {column} (got {got})")]
    MissingTerminator {
        /// Construct that needed the terminator
        after: String,
        /// Token found instead
        got: String,
        /// Line of the token found instead
        line: usize,
        /// Column of the token found instead
        column: usize,
    },

    // Codegen errors
    /// IR generation failed
    #[error("Codegen error: {0}")]
    Codegen(#[from] CodegenError),

    // Collaborator errors
    /// Embedding the seal into an object file failed
    #[error("Seal embedding failed: {0}")]
    Embed(#[from] EmbedError),
}

/// IR generation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// Equation right-hand side is neither a base-12 numeral nor a string
    #[error("cannot classify right-hand side `{text}` of `{name}` as numeral or string")]
    UnclassifiableConstant {
        /// Equation left-hand side
        name: String,
        /// Offending right-hand side text
        text: String,
    },

    /// Domain command called with the wrong number of arguments
    #[error("command {command} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Command keyword
        command: String,
        /// Declared arity
        expected: usize,
        /// Arguments supplied
        got: usize,
    },

    /// Call to a keyword that is not in the domain command table
    #[error("unknown command `{name}`")]
    UnknownCommand {
        /// Keyword as written
        name: String,
    },

    /// Argument does not fit the declared parameter type
    #[error("argument {index} of {command} must be {expected}, got `{got}`")]
    InvalidArgument {
        /// Command keyword
        command: String,
        /// Zero-based argument position
        index: usize,
        /// Parameter description
        expected: String,
        /// Argument text
        got: String,
    },

    /// Numeral does not fit a 32-bit integer
    #[error("numeral `{text}` does not fit in i32")]
    IntegerOutOfRange {
        /// Numeral text
        text: String,
    },

    /// End statement carries something that is not a decimal return code
    #[error("invalid return code `{text}`")]
    InvalidReturnCode {
        /// Return code text
        text: String,
    },

    /// Entry routine named after a runtime symbol the module already declares
    #[error("entry name `{name}` collides with a runtime symbol")]
    ReservedEntryName {
        /// Entry name as written
        name: String,
    },

    /// Section directive other than `print` with a plain payload
    #[error("unsupported directive `{directive}`")]
    UnsupportedDirective {
        /// Directive word
        directive: String,
    },
}

/// Failures of the object-sealing collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// Neither `llvm-objcopy` nor `objcopy` is on the PATH
    #[error("no objcopy tool found (install llvm-objcopy or GNU objcopy)")]
    ToolNotFound,

    /// Object format of this platform cannot take custom sections
    #[error("seal embedding is not supported on {platform}")]
    UnsupportedPlatform {
        /// Platform name
        platform: String,
    },

    /// The tool ran and reported failure
    #[error("{tool} failed: {reason}")]
    ToolFailed {
        /// Tool that was invoked
        tool: String,
        /// Exit status or stderr
        reason: String,
    },

    /// Temporary seal file could not be written
    #[error("I/O error: {0}")]
    Io(String),
}

/// Pipeline stage an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tokenizer
    Lex,
    /// Parser (grammar and terminator errors)
    Parse,
    /// IR generator
    Codegen,
    /// Object-sealing collaborator
    Embed,
}

impl Error {
    /// Classify the error by the stage that raised it
    pub fn stage(&self) -> Stage {
        match self {
            Error::LexError { .. } => Stage::Lex,
            Error::UnexpectedToken { .. } | Error::MissingTerminator { .. } => Stage::Parse,
            Error::Codegen(_) => Stage::Codegen,
            Error::Embed(_) => Stage::Embed,
        }
    }

    /// True for failures of the compilation core, false for collaborator failures
    pub fn is_core(&self) -> bool {
        self.stage() != Stage::Embed
    }
}

/// Result type for Lettera operations
pub type Result<T> = std::result::Result<T, Error>;
