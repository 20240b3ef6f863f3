use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Byte offset where the token starts
    pub offset: usize,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, offset: usize, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            offset,
            line,
            column,
        }
    }

    /// Byte offset one past the last byte of the token
    pub fn end(&self) -> usize {
        self.offset + self.lexeme.len()
    }
}

/// All possible token types in Lettera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Structural keywords
    /// `Module:`
    Module,
    /// `Entry:`
    Entry,
    /// `Block:`
    Block,
    /// `End:`
    End,
    /// `Func`
    Func,
    /// `Equation:`
    Equation,
    /// `Above:`
    Above,
    /// `Below:`
    Below,
    /// `Return`
    Return,

    // Metadata keywords
    /// `Target:`
    Target,
    /// `Version:`
    Version,
    /// `Subject:`
    Subject,
    /// `Address:`
    Address,

    // Literals
    /// Identifier
    Identifier,
    /// Double-quoted string literal (lexeme keeps the quotes)
    String,
    /// Base-12 numeral (`0-9`, `a`, `b`)
    Number,

    // Symbols
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `=`
    Assign,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,

    // Special
    /// End of input marker
    Eof,
}

impl TokenKind {
    /// Check if token is one of the four metadata keywords
    pub fn is_metadata(&self) -> bool {
        matches!(
            self,
            TokenKind::Target | TokenKind::Version | TokenKind::Subject | TokenKind::Address
        )
    }

    /// Map a single symbol character to its kind
    pub fn symbol(c: char) -> Option<TokenKind> {
        match c {
            ':' => Some(TokenKind::Colon),
            ';' => Some(TokenKind::Semicolon),
            '=' => Some(TokenKind::Assign),
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            _ => None,
        }
    }

    /// Human-readable name used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Module => "`Module:`",
            TokenKind::Entry => "`Entry:`",
            TokenKind::Block => "`Block:`",
            TokenKind::End => "`End:`",
            TokenKind::Func => "`Func`",
            TokenKind::Equation => "`Equation:`",
            TokenKind::Above => "`Above:`",
            TokenKind::Below => "`Below:`",
            TokenKind::Return => "`Return`",
            TokenKind::Target => "`Target:`",
            TokenKind::Version => "`Version:`",
            TokenKind::Subject => "`Subject:`",
            TokenKind::Address => "`Address:`",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Assign => "`=`",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::Eof => "end of input",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}
