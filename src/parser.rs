use std::rc::Rc;
use thiserror::Error;
use crate::ast::{self, Expression, Statement};
use crate::lexer::TokenSource;
use crate::parser_tracing::ParseTrace;
use crate::token::{Token, TokenType};


#[derive(PartialOrd, Ord, PartialEq, Eq, Debug, Copy, Clone)]
pub enum Precedence {
    Lowest,
    // ==
    Equals,
    // > or <
    LessGreater,
    // +
    Sum,
    // *
    Product,
    // -X or !X
    Prefix,
    // myFunction(X)
    Call,
}

impl Precedence {
    pub fn of(token_type: TokenType) -> Self {
        match token_type {
            TokenType::Eq | TokenType::NotEq => Precedence::Equals,
            TokenType::Lt | TokenType::Gt => Precedence::LessGreater,
            TokenType::Plus | TokenType::Minus => Precedence::Sum,
            TokenType::Slash | TokenType::Asterisk => Precedence::Product,
            TokenType::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// A syntax diagnostic. The display text is the message reported to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {got} instead")]
    UnexpectedToken { expected: TokenType, got: TokenType },
    #[error("no prefix parse function for token kind {0}")]
    NoPrefixParseFn(TokenType),
    #[error("could not parse {0} as integer")]
    InvalidInteger(String),
}

type PrefixParseFn<S> = fn(&mut Parser<S>) -> Option<Expression>;
type InfixParseFn<S> = fn(&mut Parser<S>, Expression) -> Option<Expression>;

pub struct Parser<S> {
    l: S,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParseError>,
}

/// Parses a whole token stream, returning the program together with every
/// diagnostic collected on the way.
pub fn parse<S: TokenSource>(source: S) -> (ast::Program, Vec<ParseError>) {
    let mut p = Parser::new(source);
    let program = p.parse_program();
    (program, p.errors)
}

impl<S: TokenSource> Parser<S> {
    pub fn new(l: S) -> Self {
        let mut p = Parser {
            l,
            cur_token: Token::default(),
            peek_token: Token::default(),
            errors: Vec::new(),
        };

        p.next_token();
        p.next_token();
        p
    }

    fn prefix_parse_fn(token_type: TokenType) -> Option<PrefixParseFn<S>> {
        let rule: PrefixParseFn<S> = match token_type {
            TokenType::Ident => Self::parse_identifier,
            TokenType::Int => Self::parse_integer_literal,
            TokenType::String => Self::parse_string_literal,
            TokenType::True | TokenType::False => Self::parse_boolean,
            TokenType::Bang | TokenType::Minus => Self::parse_prefix_expression,
            TokenType::LParen => Self::parse_grouped_expression,
            TokenType::If => Self::parse_if_expression,
            TokenType::Function => Self::parse_function_literal,
            _ => return None,
        };
        Some(rule)
    }

    fn infix_parse_fn(token_type: TokenType) -> Option<InfixParseFn<S>> {
        let rule: InfixParseFn<S> = match token_type {
            TokenType::Plus
            | TokenType::Minus
            | TokenType::Slash
            | TokenType::Asterisk
            | TokenType::Eq
            | TokenType::NotEq
            | TokenType::Lt
            | TokenType::Gt => Self::parse_infix_expression,
            TokenType::LParen => Self::parse_call_expression,
            _ => return None,
        };
        Some(rule)
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.l.next_token());
    }

    pub fn parse_program(&mut self) -> ast::Program {
        let mut program = ast::Program::default();

        while !self.cur_token_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.next_token();
        }

        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.token_type {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }

        let name = ast::Identifier::new(self.cur_token.clone());

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }

        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_to_semicolon();

        Some(Statement::Let(ast::LetStatement { token, name, value }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        self.next_token();

        let return_value = if self.cur_token_is(TokenType::Semicolon) || self.cur_token_is(TokenType::Eof) {
            None
        } else {
            self.parse_expression(Precedence::Lowest)
        };
        self.skip_to_semicolon();

        Some(Statement::Return(ast::ReturnStatement { token, return_value }))
    }

    // Tokens left over after a let/return value are dropped, not reported.
    fn skip_to_semicolon(&mut self) {
        while !self.cur_token_is(TokenType::Semicolon) && !self.cur_token_is(TokenType::Eof) {
            self.next_token();
        }
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression(ast::ExpressionStatement {
            token,
            expression: Some(expression),
        }))
    }

    fn parse_block_statement(&mut self) -> ast::BlockStatement {
        let mut block = ast::BlockStatement {
            token: self.cur_token.clone(),
            statements: Vec::new(),
        };

        self.next_token();

        while !self.cur_token_is(TokenType::RBrace) && !self.cur_token_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                block.statements.push(stmt);
            }
            self.next_token();
        }

        block
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let _trace = ParseTrace::new("parse_expression");

        let prefix = match Self::prefix_parse_fn(self.cur_token.token_type) {
            Some(prefix) => prefix,
            None => {
                self.no_prefix_parse_fn_error(self.cur_token.token_type);
                return None;
            }
        };

        let mut left_exp = prefix(self)?;

        while !self.peek_token_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            let infix = match Self::infix_parse_fn(self.peek_token.token_type) {
                Some(infix) => infix,
                None => return Some(left_exp),
            };
            self.next_token();
            left_exp = infix(self, left_exp)?;
        }

        Some(left_exp)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(ast::Identifier::new(self.cur_token.clone())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(ast::IntegerLiteral {
                token: self.cur_token.clone(),
                value,
            })),
            Err(_) => {
                let literal = self.cur_token.literal.clone();
                self.push_error(ParseError::InvalidInteger(literal));
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::String(ast::StringLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(ast::BooleanLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token_is(TokenType::True),
        }))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let _trace = ParseTrace::new("parse_prefix_expression");
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix(ast::PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let _trace = ParseTrace::new("parse_infix_expression");
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix(ast::InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let exp = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(exp)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let consequence = self.parse_block_statement();
        let mut alternative = None;

        if self.peek_token_is(TokenType::Else) {
            self.next_token();

            if !self.expect_peek(TokenType::LBrace) {
                return None;
            }

            alternative = Some(self.parse_block_statement());
        }

        Some(Expression::If(ast::IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let body = Rc::new(self.parse_block_statement());

        Some(Expression::Function(ast::FunctionLiteral { token, parameters, body }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<ast::Identifier>> {
        let mut identifiers = Vec::new();

        if self.peek_token_is(TokenType::RParen) {
            self.next_token();
            return Some(identifiers);
        }

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        identifiers.push(ast::Identifier::new(self.cur_token.clone()));

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            if !self.expect_peek(TokenType::Ident) {
                return None;
            }
            identifiers.push(ast::Identifier::new(self.cur_token.clone()));
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let _trace = ParseTrace::new("parse_call_expression");
        let token = self.cur_token.clone();
        let arguments = self.parse_call_arguments()?;

        Some(Expression::Call(ast::CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut args = Vec::new();

        if self.peek_token_is(TokenType::RParen) {
            self.next_token();
            return Some(args);
        }

        self.next_token();
        args.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            args.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(args)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek_token.token_type)
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur_token.token_type)
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn push_error(&mut self, error: ParseError) {
        tracing::debug!(%error, literal = %self.cur_token.literal, "syntax error");
        self.errors.push(error);
    }

    fn no_prefix_parse_fn_error(&mut self, t: TokenType) {
        self.push_error(ParseError::NoPrefixParseFn(t));
    }

    fn peek_error(&mut self, expected: TokenType) {
        let got = self.peek_token.token_type;
        self.push_error(ParseError::UnexpectedToken { expected, got });
    }

    fn cur_token_is(&self, t: TokenType) -> bool {
        self.cur_token.token_type == t
    }

    fn peek_token_is(&self, t: TokenType) -> bool {
        self.peek_token.token_type == t
    }

    fn expect_peek(&mut self, t: TokenType) -> bool {
        if self.peek_token_is(t) {
            self.next_token();
            true
        } else {
            self.peek_error(t);
            false
        }
    }
}
