use std::fmt::{self, Debug, Display};
use std::rc::Rc;
use std::collections::HashMap;
use lazy_static::lazy_static;
use crate::ast;
use crate::env::Env;

pub type BuiltinFn = fn(Vec<Object>) -> Object;

lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, Builtin> = {
        let mut m = HashMap::new();
        m.insert("len", Builtin::new("len", builtin_len));
        m.insert("puts", Builtin::new("puts", builtin_puts));
        m
    };
}

fn builtin_len(args: Vec<Object>) -> Object {
    if args.len() != 1 {
        return Object::Error(format!(
            "wrong number of arguments. got={}, want=1",
            args.len()
        ));
    }
    match &args[0] {
        Object::String(s) => Object::Integer(s.chars().count() as i64),
        other => Object::Error(format!(
            "argument to len not supported, got {}",
            other.object_type()
        )),
    }
}

fn builtin_puts(args: Vec<Object>) -> Object {
    for arg in args {
        println!("{}", arg.inspect());
    }
    NULL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    String,
    Boolean,
    Null,
    ReturnValue,
    Error,
    Function,
    Builtin,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Integer => write!(f, "INTEGER"),
            ObjectType::String => write!(f, "STRING"),
            ObjectType::Boolean => write!(f, "BOOLEAN"),
            ObjectType::Null => write!(f, "NULL"),
            ObjectType::ReturnValue => write!(f, "RETURN_VALUE"),
            ObjectType::Error => write!(f, "ERROR"),
            ObjectType::Function => write!(f, "FUNCTION"),
            ObjectType::Builtin => write!(f, "BUILTIN"),
        }
    }
}

/// A runtime value.
///
/// `ReturnValue` and `Error` are control carriers: the statement-list
/// evaluator stops on either and hands it upward.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    ReturnValue(Box<Object>),
    Error(String),
    Function(Rc<Function>),
    Builtin(Builtin),
}

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::String(_) => ObjectType::String,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::String(value) => value.clone(),
            Object::Boolean(value) => value.to_string(),
            Object::Null => "null".to_string(),
            Object::ReturnValue(value) => value.inspect(),
            Object::Error(message) => format!("ERROR: {}", message),
            Object::Function(func) => func.inspect(),
            Object::Builtin(_) => "builtin function".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Identity comparison used by `==` and `!=` on non-integer, non-string
    /// operands. Booleans and null compare by tag, functions by allocation.
    pub fn is_same(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        if value { TRUE } else { FALSE }
    }
}

/// A closure: parameters and body from the literal, plus the scope that was
/// live where the literal was evaluated.
pub struct Function {
    pub parameters: Vec<ast::Identifier>,
    pub body: Rc<ast::BlockStatement>,
    pub env: Env,
}

impl Function {
    pub fn inspect(&self) -> String {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        format!("fn({}) {{\n{}\n}}", params.join(", "), self.body)
    }
}

// The captured scope can hold this very function, so it is left out.
impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: &'static str, func: BuiltinFn) -> Self {
        Builtin { name, func }
    }

    pub fn lookup(name: &str) -> Option<Builtin> {
        BUILTINS.get(name).copied()
    }

    pub fn call(&self, args: Vec<Object>) -> Object {
        (self.func)(args)
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .finish()
    }
}
