use std::fmt::{self, Display};
use std::rc::Rc;
use crate::token;

/// Shared behaviour of every syntax node: the literal of the token that
/// introduced it, plus a fully parenthesized rendering through `Display`.
pub trait Node: Display {
    fn token_literal(&self) -> String;
}

/// Borrowed view over any node, used as the evaluator's entry point.
#[derive(Debug, Clone, Copy)]
pub enum AnyNode<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a BlockStatement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for AnyNode<'a> {
    fn from(node: &'a Program) -> Self {
        AnyNode::Program(node)
    }
}

impl<'a> From<&'a Statement> for AnyNode<'a> {
    fn from(node: &'a Statement) -> Self {
        AnyNode::Statement(node)
    }
}

impl<'a> From<&'a BlockStatement> for AnyNode<'a> {
    fn from(node: &'a BlockStatement) -> Self {
        AnyNode::Block(node)
    }
}

impl<'a> From<&'a Expression> for AnyNode<'a> {
    fn from(node: &'a Expression) -> Self {
        AnyNode::Expression(node)
    }
}

// Program and block bodies. Statements are space separated, with a `;`
// inserted when the previous one does not already end in one.
fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    let mut previous = String::new();
    for (i, s) in statements.iter().enumerate() {
        if i > 0 {
            if !previous.ends_with(';') {
                f.write_str(";")?;
            }
            f.write_str(" ")?;
        }
        previous = s.to_string();
        f.write_str(&previous)?;
    }
    Ok(())
}

fn write_joined<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}


#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Node for Program {
    fn token_literal(&self) -> String {
        if let Some(first_statement) = self.statements.first() {
            first_statement.token_literal()
        } else {
            "".to_string()
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> String {
        match self {
            Statement::Let(s) => s.token.literal.clone(),
            Statement::Return(s) => s.token.literal.clone(),
            Statement::Expression(s) => s.token.literal.clone(),
            Statement::Block(s) => s.token_literal(),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => {
                write!(f, "{} {} = ", s.token.literal, s.name)?;
                if let Some(ref value) = s.value {
                    write!(f, "{}", value)?;
                }
                f.write_str(";")
            }
            Statement::Return(s) => {
                f.write_str(&s.token.literal)?;
                if let Some(ref value) = s.return_value {
                    write!(f, " {}", value)?;
                }
                f.write_str(";")
            }
            Statement::Expression(s) => match s.expression {
                Some(ref expression) => write!(f, "{}", expression),
                None => Ok(()),
            },
            Statement::Block(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: token::Token,
    pub name: Identifier,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: token::Token,
    // the 'return' token
    pub return_value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: token::Token,
    // the first token of the expression
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: token::Token,
    pub statements: Vec<Statement>,
}

impl Node for BlockStatement {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
}

impl Expression {
    fn token(&self) -> &token::Token {
        match self {
            Expression::Identifier(e) => &e.token,
            Expression::Integer(e) => &e.token,
            Expression::String(e) => &e.token,
            Expression::Boolean(e) => &e.token,
            Expression::Prefix(e) => &e.token,
            Expression::Infix(e) => &e.token,
            Expression::If(e) => &e.token,
            Expression::Function(e) => &e.token,
            Expression::Call(e) => &e.token,
        }
    }
}

impl Node for Expression {
    fn token_literal(&self) -> String {
        self.token().literal.clone()
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{}", e),
            Expression::Integer(e) => f.write_str(&e.token.literal),
            Expression::String(e) => write!(f, "\"{}\"", e.value),
            Expression::Boolean(e) => f.write_str(&e.token.literal),
            Expression::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Expression::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
            Expression::If(e) => {
                write!(f, "if ({}) {{{}}}", e.condition, e.consequence)?;
                if let Some(ref alternative) = e.alternative {
                    write!(f, " else {{{}}}", alternative)?;
                }
                Ok(())
            }
            Expression::Function(e) => {
                write!(f, "{}(", e.token.literal)?;
                write_joined(f, &e.parameters)?;
                write!(f, "){{{}}}", e.body)
            }
            Expression::Call(e) => {
                write!(f, "{}(", e.function)?;
                write_joined(f, &e.arguments)?;
                f.write_str(")")
            }
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: token::Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: token::Token) -> Self {
        let value = token.literal.clone();
        Identifier {
            token,
            value,
        }
    }
}

impl Node for Identifier {
    fn token_literal(&self) -> String {
        self.token.literal.clone()
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: token::Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: token::Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: token::Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: token::Token,
    // the prefix operator token, e.g. ! or -
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub token: token::Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: token::Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

/// `fn(params) { body }`. The body sits behind an `Rc` so every function
/// value created from this literal shares it with the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: token::Token,
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub token: token::Token,
    // the '(' token
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}
