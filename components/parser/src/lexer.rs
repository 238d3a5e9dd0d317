//! Lexer - tokenizes script source into tokens on demand

use core_types::{LexError, SourcePosition};
use std::fmt;

/// Reserved words recognised after an identifier has been scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// let keyword
    Let,
    /// const keyword
    Const,
    /// function keyword
    Function,
    /// return keyword
    Return,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// for keyword
    For,
    /// while keyword
    While,
    /// true keyword
    True,
    /// false keyword
    False,
}

impl Keyword {
    /// Exact-match lookup of an identifier in the keyword table
    pub fn from_identifier(ident: &str) -> Option<Self> {
        let keyword = match ident {
            "let" => Keyword::Let,
            "const" => Keyword::Const,
            "function" => Keyword::Function,
            "return" => Keyword::Return,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "for" => Keyword::For,
            "while" => Keyword::While,
            "true" => Keyword::True,
            "false" => Keyword::False,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source spelling of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Let => "let",
            Keyword::Const => "const",
            Keyword::Function => "function",
            Keyword::Return => "return",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::For => "for",
            Keyword::While => "while",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }
}

/// Operators and delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Semicolon
    Semicolon,
    /// Comma
    Comma,
    /// Dot
    Dot,
    /// Colon
    Colon,
    /// Assignment
    Assign,
    /// Plus
    Plus,
    /// Minus
    Minus,
    /// Multiply
    Star,
    /// Divide
    Slash,
    /// Equality
    EqEq,
    /// Inequality
    NotEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Logical AND
    AndAnd,
    /// Logical OR
    OrOr,
    /// Plus equals
    PlusEq,
    /// Minus equals
    MinusEq,
}

impl Punctuator {
    /// Source spelling of the punctuator
    pub fn as_str(&self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::Semicolon => ";",
            Punctuator::Comma => ",",
            Punctuator::Dot => ".",
            Punctuator::Colon => ":",
            Punctuator::Assign => "=",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::EqEq => "==",
            Punctuator::NotEq => "!=",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
            Punctuator::PlusEq => "+=",
            Punctuator::MinusEq => "-=",
        }
    }

    fn two_char(first: char, second: char) -> Option<Self> {
        let punct = match (first, second) {
            ('=', '=') => Punctuator::EqEq,
            ('!', '=') => Punctuator::NotEq,
            ('>', '=') => Punctuator::GtEq,
            ('<', '=') => Punctuator::LtEq,
            ('&', '&') => Punctuator::AndAnd,
            ('|', '|') => Punctuator::OrOr,
            ('+', '=') => Punctuator::PlusEq,
            ('-', '=') => Punctuator::MinusEq,
            _ => return None,
        };
        Some(punct)
    }

    fn one_char(c: char) -> Option<Self> {
        let punct = match c {
            '(' => Punctuator::LParen,
            ')' => Punctuator::RParen,
            '{' => Punctuator::LBrace,
            '}' => Punctuator::RBrace,
            '[' => Punctuator::LBracket,
            ']' => Punctuator::RBracket,
            ';' => Punctuator::Semicolon,
            ',' => Punctuator::Comma,
            '.' => Punctuator::Dot,
            ':' => Punctuator::Colon,
            '=' => Punctuator::Assign,
            '+' => Punctuator::Plus,
            '-' => Punctuator::Minus,
            '*' => Punctuator::Star,
            '/' => Punctuator::Slash,
            '<' => Punctuator::Lt,
            '>' => Punctuator::Gt,
            _ => return None,
        };
        Some(punct)
    }
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (variable name, etc.)
    Identifier(String),
    /// Number literal (a run of decimal digits)
    Number(f64),
    /// String literal with escapes resolved
    String(String),
    /// Template text from the opening back-tick (or a closing `}`) up to `${`
    TemplateStart(String),
    /// Template text from the opening back-tick (or a closing `}`) up to the closing back-tick
    TemplateEnd(String),
    /// Keyword
    Keyword(Keyword),
    /// Punctuator/operator
    Punctuator(Punctuator),
    /// End of file
    EOF,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Number(n) => write!(f, "number {}", n),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::TemplateStart(_) | Token::TemplateEnd(_) => write!(f, "template literal"),
            Token::Keyword(k) => write!(f, "'{}'", k.as_str()),
            Token::Punctuator(p) => write!(f, "'{}'", p.as_str()),
            Token::EOF => write!(f, "end of input"),
        }
    }
}

/// Lexer for script source code
///
/// Tokens are produced lazily, one per [`next_token`](Lexer::next_token)
/// call, with a single token of lookahead through
/// [`peek_token`](Lexer::peek_token).
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    current_token: Option<Token>,
    token_start: SourcePosition,
    /// Open `${` interpolations, each with its nesting depth of plain braces
    template_braces: Vec<usize>,
    template_start: SourcePosition,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            current_token: None,
            token_start: SourcePosition::start(),
            template_braces: Vec::new(),
            template_start: SourcePosition::start(),
        }
    }

    /// The source text being tokenized
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the next token from the source
    ///
    /// Once the input is exhausted every further call returns [`Token::EOF`].
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(token) = self.current_token.take() {
            return Ok(token);
        }
        self.scan_token()
    }

    /// Peek at the next token without consuming it
    pub fn peek_token(&mut self) -> Result<&Token, LexError> {
        let token = match self.current_token.take() {
            Some(token) => token,
            None => self.scan_token()?,
        };
        Ok(self.current_token.insert(token))
    }

    /// Start position of the most recently scanned token
    pub fn token_position(&self) -> SourcePosition {
        self.token_start
    }

    /// Character offset of the first unconsumed character
    pub fn offset(&self) -> usize {
        self.position
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        self.token_start = self.current_position();

        if self.is_at_end() {
            if !self.template_braces.is_empty() {
                return Err(LexError::UnterminatedTemplate {
                    position: self.template_start,
                });
            }
            return Ok(Token::EOF);
        }

        let c = self.advance();

        if c.is_ascii_digit() {
            return Ok(self.scan_number(c));
        }
        if is_id_start(c) {
            return Ok(self.scan_identifier(c));
        }

        match c {
            '"' | '\'' => return self.scan_string(c),
            '`' => return self.scan_template_segment(),
            '{' => {
                if let Some(depth) = self.template_braces.last_mut() {
                    *depth += 1;
                }
                return Ok(Token::Punctuator(Punctuator::LBrace));
            }
            '}' => {
                if self.template_braces.last() == Some(&0) {
                    self.template_braces.pop();
                    return self.scan_template_segment();
                }
                if let Some(depth) = self.template_braces.last_mut() {
                    *depth -= 1;
                }
                return Ok(Token::Punctuator(Punctuator::RBrace));
            }
            _ => {}
        }

        if let Some(punct) = Punctuator::two_char(c, self.peek()) {
            self.advance();
            return Ok(Token::Punctuator(punct));
        }
        if let Some(punct) = Punctuator::one_char(c) {
            return Ok(Token::Punctuator(punct));
        }

        Err(LexError::UnexpectedCharacter {
            character: c,
            position: self.token_start,
        })
    }

    fn scan_number(&mut self, first: char) -> Token {
        let mut digits = String::from(first);
        while self.peek().is_ascii_digit() {
            digits.push(self.advance());
        }
        // A run of ASCII digits always parses; overly long runs round to infinity.
        Token::Number(digits.parse().unwrap_or(f64::INFINITY))
    }

    fn scan_identifier(&mut self, first: char) -> Token {
        let mut ident = String::from(first);
        while is_id_continue(self.peek()) {
            ident.push(self.advance());
        }
        match Keyword::from_identifier(&ident) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(ident),
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<Token, LexError> {
        let start_pos = self.token_start;
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(LexError::UnterminatedString {
                    position: start_pos,
                });
            }
            let c = self.advance();
            if c == quote {
                return Ok(Token::String(value));
            }
            if c == '\\' {
                if self.is_at_end() {
                    return Err(LexError::UnterminatedString {
                        position: start_pos,
                    });
                }
                let escaped = self.advance();
                value.push(unescape(escaped));
            } else {
                value.push(c);
            }
        }
    }

    /// Scan template text after a back-tick or after the `}` closing an
    /// interpolation.
    fn scan_template_segment(&mut self) -> Result<Token, LexError> {
        let start_pos = self.token_start;
        self.template_start = start_pos;
        let mut text = String::new();

        loop {
            if self.is_at_end() {
                return Err(LexError::UnterminatedTemplate {
                    position: start_pos,
                });
            }
            let c = self.advance();
            match c {
                '`' => return Ok(Token::TemplateEnd(text)),
                '$' if self.peek() == '{' => {
                    self.advance();
                    self.template_braces.push(0);
                    return Ok(Token::TemplateStart(text));
                }
                '\\' => {
                    if self.is_at_end() {
                        return Err(LexError::UnterminatedTemplate {
                            position: start_pos,
                        });
                    }
                    let escaped = self.advance();
                    text.push(unescape(escaped));
                }
                _ => text.push(c),
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        while !self.is_at_end() {
            match self.peek() {
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == Some('*') => {
                    let start = self.current_position();
                    self.advance();
                    self.advance();
                    loop {
                        if self.is_at_end() {
                            return Err(LexError::UnterminatedComment { position: start });
                        }
                        if self.peek() == '*' && self.peek_next() == Some('/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars.get(self.position).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.position)
    }
}

/// Tokenize a whole source text, including the trailing [`Token::EOF`]
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token == Token::EOF;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

fn unescape(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

fn is_id_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_id_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}
