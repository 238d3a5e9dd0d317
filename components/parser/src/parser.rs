//! Recursive descent parser
//!
//! One token of lookahead, no error recovery: the first mismatch aborts the
//! parse with [`ParseError::UnexpectedToken`].
//!
//! Binary operators form a single precedence tier combined left to right,
//! so `1 + 2 * 3` is `(1 + 2) * 3` and `a > 1 + 1` is `(a > 1) + 1`.
//! Parentheses are the only way to group.

use crate::ast::*;
use crate::error::unexpected_token;
use crate::lexer::{Keyword, Lexer, Punctuator, Token};
use core_types::stack::ensure_sufficient_stack;
use core_types::ParseError;
use std::rc::Rc;

/// Deepest nesting of blocks and bracketed expressions the parser accepts
pub const MAX_NESTING_DEPTH: usize = 256;

/// Script parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            depth: 0,
        }
    }

    /// Parse the source into a [`Program`]
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while !self.check(&Token::EOF)? {
            body.push(self.parse_statement()?);
        }
        tracing::debug!(statements = body.len(), "parsed program");
        Ok(Program { body })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let keyword = match self.lexer.peek_token()? {
            Token::Keyword(k) => Some(*k),
            _ => None,
        };

        match keyword {
            Some(Keyword::Let) | Some(Keyword::Const) => self.parse_variable_declaration(),
            Some(Keyword::Function) => self.parse_function_declaration(),
            Some(Keyword::If) => self.parse_if_statement(),
            Some(Keyword::For) => self.parse_for_statement(),
            Some(Keyword::While) => self.parse_while_statement(),
            Some(Keyword::Return) => self.parse_return_statement(),
            _ => {
                let expression = self.parse_expression()?;
                self.eat_punctuator(Punctuator::Semicolon)?;
                Ok(Statement::ExpressionStatement { expression })
            }
        }
    }

    /// `let|const name = expression ;`
    fn parse_variable_declaration(&mut self) -> Result<Statement, ParseError> {
        let kind = match self.lexer.next_token()? {
            Token::Keyword(Keyword::Const) => VariableKind::Const,
            _ => VariableKind::Let,
        };
        let name = self.expect_identifier()?;
        self.expect_punctuator(Punctuator::Assign)?;
        let init = self.parse_expression()?;
        self.expect_punctuator(Punctuator::Semicolon)?;
        Ok(Statement::VariableDeclaration { kind, name, init })
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Function)?;
        let name = self.expect_identifier()?;

        self.expect_punctuator(Punctuator::LParen)?;
        let mut params = Vec::new();
        if !self.check_punctuator(Punctuator::RParen)? {
            loop {
                params.push(self.expect_identifier()?);
                if !self.eat_punctuator(Punctuator::Comma)? {
                    break;
                }
            }
        }
        self.expect_punctuator(Punctuator::RParen)?;

        let body = self.parse_block()?;
        Ok(Statement::FunctionDeclaration(Rc::new(FunctionDeclaration {
            name,
            params,
            body,
        })))
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::If)?;
        let test = self.parse_condition()?;
        let consequent = self.parse_block()?;

        let alternate = if self.check(&Token::Keyword(Keyword::Else))? {
            self.lexer.next_token()?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Statement::IfStatement {
            test,
            consequent,
            alternate,
        })
    }

    /// `for (init ; condition ; update) { body }`, every clause optional
    fn parse_for_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::For)?;
        self.expect_punctuator(Punctuator::LParen)?;

        let init = if self.eat_punctuator(Punctuator::Semicolon)? {
            None
        } else if matches!(
            self.lexer.peek_token()?,
            Token::Keyword(Keyword::Let) | Token::Keyword(Keyword::Const)
        ) {
            Some(Box::new(self.parse_variable_declaration()?))
        } else {
            let expression = self.parse_expression()?;
            self.expect_punctuator(Punctuator::Semicolon)?;
            Some(Box::new(Statement::ExpressionStatement { expression }))
        };

        let test = if self.check_punctuator(Punctuator::Semicolon)? {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punctuator(Punctuator::Semicolon)?;

        let update = if self.check_punctuator(Punctuator::RParen)? {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punctuator(Punctuator::RParen)?;

        let body = self.parse_block()?;
        Ok(Statement::ForStatement {
            init,
            test,
            update,
            body,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::While)?;
        let test = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Statement::WhileStatement { test, body })
    }

    fn parse_return_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Return)?;
        let ends_here = matches!(
            self.lexer.peek_token()?,
            Token::Punctuator(Punctuator::Semicolon)
                | Token::Punctuator(Punctuator::RBrace)
                | Token::EOF
        );
        let argument = if ends_here {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.eat_punctuator(Punctuator::Semicolon)?;
        Ok(Statement::ReturnStatement { argument })
    }

    /// `( expression )`
    fn parse_condition(&mut self) -> Result<Expression, ParseError> {
        self.expect_punctuator(Punctuator::LParen)?;
        let test = self.parse_expression()?;
        self.expect_punctuator(Punctuator::RParen)?;
        Ok(test)
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.nested(Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.expect_punctuator(Punctuator::LBrace)?;
        let mut statements = Vec::new();
        while !self.check_punctuator(Punctuator::RBrace)? {
            if self.check(&Token::EOF)? {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(statements)
    }

    /// Assignment (right associative) over the flat binary chain
    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_binary_chain()?;

        let operator = match self.lexer.peek_token()? {
            Token::Punctuator(Punctuator::Assign) => AssignmentOperator::Assign,
            Token::Punctuator(Punctuator::PlusEq) => AssignmentOperator::AddAssign,
            Token::Punctuator(Punctuator::MinusEq) => AssignmentOperator::SubtractAssign,
            _ => return Ok(left),
        };

        let Expression::Identifier(target) = left else {
            let token = self.lexer.next_token()?;
            return Err(unexpected_token(
                "end of expression",
                &token,
                self.lexer.token_position(),
            ));
        };
        self.lexer.next_token()?;
        let value = self.nested(Self::parse_expression)?;
        Ok(Expression::AssignmentExpression {
            operator,
            target,
            value: Box::new(value),
        })
    }

    fn parse_binary_chain(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_primary()?;

        while let Some(operator) = self.peek_binary_operator()? {
            self.lexer.next_token()?;
            let right = self.parse_primary()?;
            left = Expression::BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn peek_binary_operator(&mut self) -> Result<Option<BinaryOperator>, ParseError> {
        let Token::Punctuator(punct) = self.lexer.peek_token()? else {
            return Ok(None);
        };
        let operator = match punct {
            Punctuator::Plus => BinaryOperator::Add,
            Punctuator::Minus => BinaryOperator::Subtract,
            Punctuator::Star => BinaryOperator::Multiply,
            Punctuator::Slash => BinaryOperator::Divide,
            Punctuator::EqEq => BinaryOperator::Equal,
            Punctuator::NotEq => BinaryOperator::NotEqual,
            Punctuator::Lt => BinaryOperator::LessThan,
            Punctuator::Gt => BinaryOperator::GreaterThan,
            Punctuator::LtEq => BinaryOperator::LessThanEqual,
            Punctuator::GtEq => BinaryOperator::GreaterThanEqual,
            _ => return Ok(None),
        };
        Ok(Some(operator))
    }

    /// A primary expression followed by any `.name` and `(args)` suffixes
    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        self.nested(|parser| {
            let atom = parser.parse_atom()?;
            parser.parse_postfix(atom)
        })
    }

    fn parse_atom(&mut self) -> Result<Expression, ParseError> {
        let token = self.lexer.next_token()?;
        match token {
            Token::Number(n) => Ok(Expression::Literal(Literal::Number(n))),
            Token::String(s) => Ok(Expression::Literal(Literal::String(s))),
            Token::Keyword(Keyword::True) => Ok(Expression::Literal(Literal::Boolean(true))),
            Token::Keyword(Keyword::False) => Ok(Expression::Literal(Literal::Boolean(false))),
            Token::Identifier(name) => Ok(Expression::Identifier(name)),
            Token::Punctuator(Punctuator::LParen) => {
                let expr = self.parse_expression()?;
                self.expect_punctuator(Punctuator::RParen)?;
                Ok(expr)
            }
            Token::Punctuator(Punctuator::LBracket) => self.parse_array_literal(),
            Token::Punctuator(Punctuator::LBrace) => self.parse_object_literal(),
            Token::TemplateEnd(text) => Ok(Expression::Literal(Literal::String(text))),
            Token::TemplateStart(text) => self.parse_template(text),
            other => Err(unexpected_token(
                "expression",
                &other,
                self.lexer.token_position(),
            )),
        }
    }

    /// Member reads and calls bind tighter than any operator and chain
    /// left to right, so `o.a.f(1)(2)` is one expression
    fn parse_postfix(&mut self, mut expr: Expression) -> Result<Expression, ParseError> {
        loop {
            if self.check_punctuator(Punctuator::LParen)? {
                let arguments = self.parse_arguments()?;
                expr = Expression::CallExpression {
                    callee: Callee::from_expression(expr),
                    arguments,
                };
            } else if self.eat_punctuator(Punctuator::Dot)? {
                let property = self.expect_identifier()?;
                expr = Expression::MemberExpression {
                    object: Box::new(expr),
                    property,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    /// Run a recursive production one nesting level deeper
    fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                position: self.lexer.token_position(),
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| production(self));
        self.depth -= 1;
        result
    }

    /// `( [expression {, expression}] )`
    fn parse_arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
        self.expect_punctuator(Punctuator::LParen)?;
        let mut arguments = Vec::new();
        if !self.check_punctuator(Punctuator::RParen)? {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.eat_punctuator(Punctuator::Comma)? {
                    break;
                }
            }
        }
        self.expect_punctuator(Punctuator::RParen)?;
        Ok(arguments)
    }

    fn parse_array_literal(&mut self) -> Result<Expression, ParseError> {
        let mut elements = Vec::new();
        while !self.check_punctuator(Punctuator::RBracket)? {
            elements.push(self.parse_expression()?);
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_punctuator(Punctuator::RBracket)?;
        Ok(Expression::ArrayExpression { elements })
    }

    fn parse_object_literal(&mut self) -> Result<Expression, ParseError> {
        let mut properties = Vec::new();
        while !self.check_punctuator(Punctuator::RBrace)? {
            let key = match self.lexer.next_token()? {
                Token::Identifier(name) | Token::String(name) => name,
                other => {
                    return Err(unexpected_token(
                        "property name",
                        &other,
                        self.lexer.token_position(),
                    ))
                }
            };
            self.expect_punctuator(Punctuator::Colon)?;
            let value = self.parse_expression()?;
            properties.push(Property { key, value });
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(Expression::ObjectExpression { properties })
    }

    /// Desugar `` `a${x}b` `` into `"a" + x + "b"`
    fn parse_template(&mut self, head: String) -> Result<Expression, ParseError> {
        let mut expr = Expression::Literal(Literal::String(head));
        loop {
            let part = self.parse_expression()?;
            expr = concat(expr, part);
            match self.lexer.next_token()? {
                Token::TemplateStart(text) => {
                    expr = concat(expr, Expression::Literal(Literal::String(text)));
                }
                Token::TemplateEnd(text) => {
                    return Ok(concat(expr, Expression::Literal(Literal::String(text))));
                }
                other => {
                    return Err(unexpected_token(
                        "'}' closing template substitution",
                        &other,
                        self.lexer.token_position(),
                    ))
                }
            }
        }
    }

    fn check(&mut self, expected: &Token) -> Result<bool, ParseError> {
        Ok(self.lexer.peek_token()? == expected)
    }

    fn check_punctuator(&mut self, punct: Punctuator) -> Result<bool, ParseError> {
        self.check(&Token::Punctuator(punct))
    }

    /// Consume the punctuator if it is next
    fn eat_punctuator(&mut self, punct: Punctuator) -> Result<bool, ParseError> {
        if self.check_punctuator(punct)? {
            self.lexer.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punctuator(&mut self, punct: Punctuator) -> Result<(), ParseError> {
        let token = self.lexer.next_token()?;
        if token == Token::Punctuator(punct) {
            Ok(())
        } else {
            Err(unexpected_token(
                format!("'{}'", punct.as_str()),
                &token,
                self.lexer.token_position(),
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        let token = self.lexer.next_token()?;
        if token == Token::Keyword(keyword) {
            Ok(())
        } else {
            Err(unexpected_token(
                format!("'{}'", keyword.as_str()),
                &token,
                self.lexer.token_position(),
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.lexer.next_token()? {
            Token::Identifier(name) => Ok(name),
            other => Err(unexpected_token(
                "identifier",
                &other,
                self.lexer.token_position(),
            )),
        }
    }
}

fn concat(left: Expression, right: Expression) -> Expression {
    Expression::BinaryExpression {
        operator: BinaryOperator::Add,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Parse a complete source text
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    Parser::new(source).parse()
}
