use std::rc::Rc;
use crate::ast::{self, AnyNode, Expression, Statement};
use crate::env::{Env, Environment};
use crate::object::{Builtin, Function, Object, NULL};


/// Evaluates any node against `env`. Runtime failures come back as
/// `Object::Error`; this never panics on user input.
pub fn eval<'a>(node: impl Into<AnyNode<'a>>, env: &Env) -> Object {
    match node.into() {
        AnyNode::Program(program) => eval_program(&program.statements, env),
        AnyNode::Statement(stmt) => eval_statement(stmt, env),
        AnyNode::Block(block) => eval_block_statement(block, env),
        AnyNode::Expression(expr) => eval_expression(expr, env),
    }
}

fn eval_program(stmts: &[Statement], env: &Env) -> Object {
    let mut result = NULL;
    for statement in stmts {
        result = eval_statement(statement, env);
        match result {
            Object::ReturnValue(value) => return *value,
            Object::Error(_) => return result,
            _ => {}
        }
    }
    result
}

// Unlike the program loop this keeps the ReturnValue wrapper, so a `return`
// inside nested blocks reaches the enclosing function call intact.
fn eval_block_statement(block: &ast::BlockStatement, env: &Env) -> Object {
    let mut result = NULL;
    for statement in &block.statements {
        result = eval_statement(statement, env);
        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Env) -> Object {
    match stmt {
        Statement::Expression(expr_stmt) => eval_optional(expr_stmt.expression.as_ref(), env),
        Statement::Block(block_stmt) => eval_block_statement(block_stmt, env),
        Statement::Return(ret_stmt) => {
            let val = eval_optional(ret_stmt.return_value.as_ref(), env);
            if val.is_error() {
                return val;
            }
            Object::ReturnValue(Box::new(val))
        }
        Statement::Let(let_stmt) => {
            let val = eval_optional(let_stmt.value.as_ref(), env);
            if val.is_error() {
                return val;
            }
            env.borrow_mut().set(let_stmt.name.value.clone(), val);
            NULL
        }
    }
}

// Sub-expressions can only be missing after a failed parse.
fn eval_optional(expr: Option<&Expression>, env: &Env) -> Object {
    match expr {
        Some(expr) => eval_expression(expr, env),
        None => NULL,
    }
}

fn eval_expressions(exprs: &[Expression], env: &Env) -> Result<Vec<Object>, Object> {
    let mut result = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let evaluated = eval_expression(expr, env);
        if evaluated.is_error() {
            return Err(evaluated);
        }
        result.push(evaluated);
    }
    Ok(result)
}

fn eval_expression(expr: &Expression, env: &Env) -> Object {
    match expr {
        Expression::Integer(int_expr) => Object::Integer(int_expr.value),
        Expression::String(str_expr) => Object::String(str_expr.value.clone()),
        Expression::Boolean(bool_expr) => Object::from(bool_expr.value),
        Expression::Prefix(prefix_expr) => {
            let right = eval_expression(&prefix_expr.right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(&prefix_expr.operator, right)
        }
        Expression::Infix(infix_expr) => {
            let left = eval_expression(&infix_expr.left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(&infix_expr.right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(&infix_expr.operator, left, right)
        }
        Expression::If(if_expr) => eval_if_expression(if_expr, env),
        Expression::Identifier(identifier) => eval_identifier(identifier, env),
        Expression::Function(fn_expr) => Object::Function(Rc::new(Function {
            parameters: fn_expr.parameters.clone(),
            body: Rc::clone(&fn_expr.body),
            env: Rc::clone(env),
        })),
        Expression::Call(call_expr) => {
            let func = eval_expression(&call_expr.function, env);
            if func.is_error() {
                return func;
            }
            match eval_expressions(&call_expr.arguments, env) {
                Ok(args) => apply_function(func, args),
                Err(err) => err,
            }
        }
    }
}

fn new_error(message: String) -> Object {
    tracing::debug!(%message, "runtime error");
    Object::Error(message)
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => eval_bang_operator_expression(&right),
        "-" => eval_minus_prefix_operator_expression(right),
        _ => new_error(format!("unknown operator: {}{}", operator, right.object_type())),
    }
}

fn eval_bang_operator_expression(right: &Object) -> Object {
    Object::from(!is_truthy(right))
}

fn eval_minus_prefix_operator_expression(right: Object) -> Object {
    match right {
        Object::Integer(value) => Object::Integer(value.wrapping_neg()),
        other => new_error(format!("unknown operator: -{}", other.object_type())),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    if left.object_type() != right.object_type() {
        return new_error(format!("type mismatch: {} {} {}", left.object_type(), operator, right.object_type()));
    }

    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix_expression(operator, l, r),
        _ => match operator {
            "==" => Object::from(left.is_same(&right)),
            "!=" => Object::from(!left.is_same(&right)),
            _ => new_error(format!("unknown operator: {} {} {}", left.object_type(), operator, right.object_type())),
        },
    }
}

// Arithmetic wraps like native 64-bit integers; `/` truncates toward zero.
fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        "/" if right == 0 => new_error("division by zero".to_string()),
        "/" => Object::Integer(left.wrapping_div(right)),
        "<" => Object::from(left < right),
        ">" => Object::from(left > right),
        "==" => Object::from(left == right),
        "!=" => Object::from(left != right),
        _ => new_error(format!("unknown operator: INTEGER {} INTEGER", operator)),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Object {
    match operator {
        "+" => Object::String(format!("{}{}", left, right)),
        _ => new_error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

fn eval_if_expression(if_expr: &ast::IfExpression, env: &Env) -> Object {
    let condition = eval_expression(&if_expr.condition, env);
    if condition.is_error() {
        return condition;
    }

    if is_truthy(&condition) {
        eval_block_statement(&if_expr.consequence, env)
    } else if let Some(alternative) = &if_expr.alternative {
        eval_block_statement(alternative, env)
    } else {
        NULL
    }
}

fn is_truthy(obj: &Object) -> bool {
    !matches!(obj, Object::Null | Object::Boolean(false))
}

fn eval_identifier(node: &ast::Identifier, env: &Env) -> Object {
    let bound = env.borrow().get(&node.value);
    if let Some(val) = bound {
        return val;
    }

    if let Some(builtin) = Builtin::lookup(&node.value) {
        return Object::Builtin(builtin);
    }

    new_error(format!("identifier not found: {}", node.value))
}

fn apply_function(func: Object, args: Vec<Object>) -> Object {
    tracing::trace!(callee = %func.object_type(), args = args.len(), "apply function");
    match func {
        Object::Function(function) => {
            let extended_env = extend_function_env(&function, args);
            let evaluated = eval_block_statement(&function.body, &extended_env);
            unwrap_return_value(evaluated)
        }
        Object::Builtin(builtin) => builtin.call(args),
        other => new_error(format!("not a function: {}", other.object_type())),
    }
}

// Parameters are bound positionally; surplus arguments are dropped and
// parameters without an argument stay unbound.
fn extend_function_env(func: &Function, args: Vec<Object>) -> Env {
    let env = Environment::new_enclosed(Rc::clone(&func.env));
    for (param, arg) in func.parameters.iter().zip(args) {
        env.borrow_mut().set(param.value.clone(), arg);
    }
    env
}

fn unwrap_return_value(obj: Object) -> Object {
    match obj {
        Object::ReturnValue(value) => *value,
        other => other,
    }
}
