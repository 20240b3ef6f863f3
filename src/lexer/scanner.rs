use super::token::{Token, TokenKind};
use crate::error::{Error, Result};
use regex::Regex;

/// What the scanner does with a pattern match
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Emit a token of this kind
    Emit(TokenKind),
    /// Emit the kind mapped from the matched symbol character
    Symbol,
    /// Consume without emitting (whitespace, newlines)
    Skip,
}

lazy_static::lazy_static! {
    /// Token patterns in priority order. The first pattern matching at the
    /// current position wins; keywords precede the identifier rule because
    /// every keyword is also a valid identifier prefix.
    static ref RULES: Vec<(Regex, Rule)> = {
        let table: [(&str, Rule); 19] = [
            (r"^Module:", Rule::Emit(TokenKind::Module)),
            (r"^Entry:", Rule::Emit(TokenKind::Entry)),
            (r"^Block:", Rule::Emit(TokenKind::Block)),
            (r"^End:", Rule::Emit(TokenKind::End)),
            (r"^Func\b", Rule::Emit(TokenKind::Func)),
            (r"^Equation:", Rule::Emit(TokenKind::Equation)),
            (r"^Above:", Rule::Emit(TokenKind::Above)),
            (r"^Below:", Rule::Emit(TokenKind::Below)),
            (r"^Target:", Rule::Emit(TokenKind::Target)),
            (r"^Version:", Rule::Emit(TokenKind::Version)),
            (r"^Subject:", Rule::Emit(TokenKind::Subject)),
            (r"^Address:", Rule::Emit(TokenKind::Address)),
            (r"^Return\b", Rule::Emit(TokenKind::Return)),
            (r"^[A-Za-z_][A-Za-z0-9_]*", Rule::Emit(TokenKind::Identifier)),
            (r#"^"[^"\n]*""#, Rule::Emit(TokenKind::String)),
            (r"^[0-9ab]+", Rule::Emit(TokenKind::Number)),
            (r"^[:;=()]", Rule::Symbol),
            (r"^\n", Rule::Skip),
            (r"^[ \t\r]+", Rule::Skip),
        ];
        table
            .iter()
            .map(|(pattern, rule)| {
                (Regex::new(pattern).expect("token pattern table is valid"), *rule)
            })
            .collect()
    };
}

/// Scanner for Lettera letter syntax
pub struct LetterScanner<'a> {
    /// Source text
    source: &'a str,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Current byte position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl<'a> LetterScanner<'a> {
    /// Creates a new scanner over source text
    pub fn new(source: &'a str) -> Self {
        LetterScanner {
            source,
            tokens: Vec::new(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens and returns them, terminated by an `Eof` token
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        while self.current < self.source.len() {
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.current,
            self.line,
            self.column,
        ));

        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<()> {
        let rest = &self.source[self.current..];

        for (pattern, rule) in RULES.iter() {
            let Some(found) = pattern.find(rest) else {
                continue;
            };
            let text = found.as_str();

            let kind = match rule {
                Rule::Emit(kind) => Some(*kind),
                Rule::Symbol => text.chars().next().and_then(TokenKind::symbol),
                Rule::Skip => None,
            };
            if let Some(kind) = kind {
                self.tokens.push(Token::new(
                    kind,
                    text.to_string(),
                    self.current,
                    self.line,
                    self.column,
                ));
            }

            self.advance_over(text);
            return Ok(());
        }

        // `rest` is non-empty here, so there is always a next char
        let ch = rest.chars().next().unwrap_or('\0');
        Err(Error::LexError {
            offset: self.current,
            line: self.line,
            column: self.column,
            ch,
        })
    }

    fn advance_over(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.current += text.len();
    }
}

/// Tokenize source text in one call
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    LetterScanner::new(source).scan_tokens()
}
