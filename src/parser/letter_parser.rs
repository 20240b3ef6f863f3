use super::ast::{Node, NodeKind};
use crate::compiler::commands;
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Parser configuration, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Require `;` after metadata lines, the Entry signature and the End statement
    pub strict: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ParserConfig {
    /// Strict punctuation discipline
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Terminators optional
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// Recursive-descent parser for the `Module → Entry → Block → End` grammar
pub struct LetterParser {
    tokens: Vec<Token>,
    current: usize,
    config: ParserConfig,
}

impl LetterParser {
    /// Creates a strict-mode parser
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    /// Creates a parser with explicit configuration
    pub fn with_config(mut tokens: Vec<Token>, config: ParserConfig) -> Self {
        // Hand-built token lists may omit the terminator
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (offset, line, column) = tokens
                .last()
                .map(|t| (t.end(), t.line, t.column + t.lexeme.chars().count()))
                .unwrap_or((0, 1, 1));
            tokens.push(Token::new(TokenKind::Eof, String::new(), offset, line, column));
        }
        LetterParser {
            tokens,
            current: 0,
            config,
        }
    }

    /// Parses the tokens into a `Program` node
    pub fn parse(&mut self) -> Result<Node> {
        let module = self.parse_module()?;
        let entry = self.parse_entry()?;

        let mut children = vec![module, entry];
        children.push(self.parse_block()?);
        while self.check(TokenKind::Block) {
            children.push(self.parse_block()?);
        }

        children.push(self.parse_end()?);
        self.consume(TokenKind::Eof)?;

        Ok(Node::new(NodeKind::Program).with_children(children))
    }

    fn parse_module(&mut self) -> Result<Node> {
        self.consume(TokenKind::Module)?;
        let metadata = self.collect_metadata()?;
        Ok(Node::new(NodeKind::Module).with_children(metadata))
    }

    /// `key value ;` lines, for as long as the lookahead is a metadata keyword
    fn collect_metadata(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        while self.peek().kind.is_metadata() {
            let key = self.advance();
            let value = self.consume_value("metadata value")?;
            self.terminator("metadata line")?;

            let kind = match key.kind {
                TokenKind::Target => NodeKind::Target,
                TokenKind::Version => NodeKind::Version,
                TokenKind::Subject => NodeKind::Subject,
                _ => NodeKind::Address,
            };
            nodes.push(Node::pair(kind, key.lexeme.trim_end_matches(':'), value.lexeme));
        }

        Ok(nodes)
    }

    /// `Entry: Func name ( ) :`
    fn parse_entry(&mut self) -> Result<Node> {
        self.consume(TokenKind::Entry)?;
        self.consume(TokenKind::Func)?;
        let name = self.consume(TokenKind::Identifier)?;
        self.consume(TokenKind::LeftParen)?;
        self.consume(TokenKind::RightParen)?;
        self.consume(TokenKind::Colon)?;
        self.terminator("entry signature")?;
        Ok(Node::text(NodeKind::Entry, name.lexeme))
    }

    /// Exactly one Equation, one Above, one Below, in that order
    fn parse_block(&mut self) -> Result<Node> {
        self.consume(TokenKind::Block)?;
        let equation = self.parse_equation()?;
        let above = self.parse_section(TokenKind::Above, NodeKind::Above)?;
        let below = self.parse_section(TokenKind::Below, NodeKind::Below)?;
        Ok(Node::new(NodeKind::Block).with_children(vec![equation, above, below]))
    }

    fn parse_equation(&mut self) -> Result<Node> {
        self.consume(TokenKind::Equation)?;
        let lhs = self.consume(TokenKind::Identifier)?.lexeme;
        self.consume(TokenKind::Assign)?;

        if self.at_call() {
            let call = self.parse_call()?;
            let rendered = render_call(&call);
            return Ok(Node::pair(NodeKind::Equation, lhs, rendered).with_children(vec![call]));
        }

        match self.peek().kind {
            TokenKind::Number | TokenKind::String | TokenKind::Identifier => {
                let rhs = self.advance();
                Ok(Node::pair(NodeKind::Equation, lhs, rhs.lexeme))
            }
            _ => Err(self.expected_error("numeral, string, identifier or command")),
        }
    }

    /// `Above:`/`Below:` followed by `word "payload"` or a command call
    fn parse_section(&mut self, keyword: TokenKind, kind: NodeKind) -> Result<Node> {
        self.consume(keyword)?;

        if self.at_call() {
            let call = self.parse_call()?;
            let name = call.value_str().unwrap_or_default().to_string();
            let rendered = render_call(&call);
            return Ok(Node::pair(kind, name, rendered).with_children(vec![call]));
        }

        let directive = self.consume(TokenKind::Identifier)?;
        let payload = self.consume(TokenKind::String)?;
        Ok(Node::pair(kind, directive.lexeme, payload.lexeme))
    }

    /// `Keyword ( arg* )`; known keywords are tagged `Command`, others `Call`
    fn parse_call(&mut self) -> Result<Node> {
        let name = self.consume(TokenKind::Identifier)?.lexeme;
        self.consume(TokenKind::LeftParen)?;

        let mut args = Vec::new();
        while !self.check(TokenKind::RightParen) {
            let arg = match self.peek().kind {
                TokenKind::Number => {
                    let number = self.advance();
                    self.glue_unit(number)
                }
                TokenKind::String | TokenKind::Identifier => self.advance().lexeme,
                _ => return Err(self.expected_error("argument or `)`")),
            };
            args.push(Node::text(NodeKind::Argument, arg));
        }
        self.consume(TokenKind::RightParen)?;

        let kind = if commands::is_command(&name) {
            NodeKind::Command
        } else {
            NodeKind::Call
        };
        Ok(Node::text(kind, name).with_children(args))
    }

    /// Join a numeral with an identifier written directly after it (`8s`)
    fn glue_unit(&mut self, number: Token) -> String {
        let next = self.peek();
        if next.kind == TokenKind::Identifier && next.offset == number.end() {
            let unit = self.advance();
            format!("{}{}", number.lexeme, unit.lexeme)
        } else {
            number.lexeme
        }
    }

    /// `End: Return code`
    fn parse_end(&mut self) -> Result<Node> {
        self.consume(TokenKind::End)?;
        self.consume(TokenKind::Return)?;
        let code = self.consume(TokenKind::Number)?;
        self.terminator("return statement")?;
        Ok(Node::text(NodeKind::End, code.lexeme))
    }

    /// Strict mode demands `;`; lenient mode accepts it when present
    fn terminator(&mut self, after: &str) -> Result<()> {
        if self.check(TokenKind::Semicolon) {
            self.advance();
            return Ok(());
        }
        if !self.config.strict {
            return Ok(());
        }

        let token = self.peek();
        Err(Error::MissingTerminator {
            after: after.to_string(),
            got: Self::describe_token(token),
            line: token.line,
            column: token.column,
        })
    }

    fn consume_value(&mut self, expected: &str) -> Result<Token> {
        match self.peek().kind {
            TokenKind::Identifier | TokenKind::String | TokenKind::Number => Ok(self.advance()),
            _ => Err(self.expected_error(expected)),
        }
    }

    fn at_call(&self) -> bool {
        self.peek().kind == TokenKind::Identifier
            && self.peek_next().map(|t| t.kind) == Some(TokenKind::LeftParen)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1)
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current - 1].clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token> {
        if kind == TokenKind::Eof && self.is_at_end() {
            return Ok(self.peek().clone());
        }
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected_error(kind.describe()))
        }
    }

    /// Helper to create an expected/got error at the current token
    fn expected_error(&self, expected: &str) -> Error {
        let token = self.peek();
        Error::UnexpectedToken {
            expected: expected.to_string(),
            got: Self::describe_token(token),
            line: token.line,
            column: token.column,
        }
    }

    fn describe_token(token: &Token) -> String {
        match token.kind {
            TokenKind::Identifier => format!("identifier `{}`", token.lexeme),
            TokenKind::String => format!("string {}", token.lexeme),
            TokenKind::Number => format!("number `{}`", token.lexeme),
            kind => kind.describe().to_string(),
        }
    }
}

/// Render a call node back to source form: `Name(arg arg)`
pub fn render_call(call: &Node) -> String {
    let args: Vec<&str> = call
        .children
        .iter()
        .filter_map(|arg| arg.value_str())
        .collect();
    format!("{}({})", call.value_str().unwrap_or_default(), args.join(" "))
}
