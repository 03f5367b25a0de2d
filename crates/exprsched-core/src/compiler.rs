//! # Expression Compiler (C1)
//!
//! Turns a canonical infix string into an ordered list of [`InternalTask`]s
//! such that every task's operand references point to earlier entries in the
//! list — a topological order for the DAG, produced directly by evaluating
//! shunting-yard postfix output against an argument stack.

use thiserror::Error;
use uuid::Uuid;

use crate::model::{InternalTask, Operation, TaskArg};

#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("invalid character: {0}")]
    InvalidCharacter(char),
    #[error("mismatched parentheses")]
    MismatchedParentheses,
    #[error("invalid expression")]
    InvalidExpression,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(Operation),
    LParen,
    RParen,
}

/// Strip whitespace and normalize the decimal separator, per §4.1.
pub fn canonicalize(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).map(|c| if c == ',' { '.' } else { c }).collect()
}

fn precedence(op: Operation) -> u8 {
    match op {
        Operation::Add | Operation::Subtract => 1,
        Operation::Multiply | Operation::Divide => 2,
    }
}

/// Lex the canonical form into tokens, folding a leading/after-operator `-`
/// into the sign of the following numeric literal rather than emitting a
/// binary-minus token.
fn lex(canonical: &str) -> Result<Vec<Token>, CompileError> {
    let chars: Vec<char> = canonical.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut prev_was_operand_or_rparen = false;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value: f64 = literal
                    .parse()
                    .map_err(|_| CompileError::InvalidExpression)?;
                tokens.push(Token::Number(value));
                prev_was_operand_or_rparen = true;
            }
            '+' | '-' | '*' | '/' => {
                if c == '-' && !prev_was_operand_or_rparen {
                    // Unary minus: fold into the following literal.
                    i += 1;
                    let start = i;
                    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                        i += 1;
                    }
                    if start == i {
                        return Err(CompileError::InvalidExpression);
                    }
                    let literal: String = chars[start..i].iter().collect();
                    let value: f64 = literal
                        .parse()
                        .map_err(|_| CompileError::InvalidExpression)?;
                    tokens.push(Token::Number(-value));
                    prev_was_operand_or_rparen = true;
                    continue;
                }
                let op = match c {
                    '+' => Operation::Add,
                    '-' => Operation::Subtract,
                    '*' => Operation::Multiply,
                    '/' => Operation::Divide,
                    _ => unreachable!(),
                };
                tokens.push(Token::Op(op));
                prev_was_operand_or_rparen = false;
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                prev_was_operand_or_rparen = false;
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                prev_was_operand_or_rparen = true;
                i += 1;
            }
            other => return Err(CompileError::InvalidCharacter(other)),
        }
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy)]
enum PostfixItem {
    Number(f64),
    Op(Operation),
}

/// Classical shunting-yard: infix tokens -> postfix items.
fn to_postfix(tokens: &[Token]) -> Result<Vec<PostfixItem>, CompileError> {
    let mut output = Vec::new();
    let mut ops: Vec<Token> = Vec::new();

    for &tok in tokens {
        match tok {
            Token::Number(n) => output.push(PostfixItem::Number(n)),
            Token::Op(op) => {
                while let Some(&Token::Op(top)) = ops.last() {
                    if precedence(top) >= precedence(op) {
                        ops.pop();
                        output.push(PostfixItem::Op(top));
                    } else {
                        break;
                    }
                }
                ops.push(Token::Op(op));
            }
            Token::LParen => ops.push(Token::LParen),
            Token::RParen => {
                let mut found = false;
                while let Some(top) = ops.pop() {
                    match top {
                        Token::Op(op) => output.push(PostfixItem::Op(op)),
                        Token::LParen => {
                            found = true;
                            break;
                        }
                        Token::RParen => unreachable!(),
                        Token::Number(_) => unreachable!(),
                    }
                }
                if !found {
                    return Err(CompileError::MismatchedParentheses);
                }
            }
        }
    }

    while let Some(top) = ops.pop() {
        match top {
            Token::Op(op) => output.push(PostfixItem::Op(op)),
            Token::LParen | Token::RParen => return Err(CompileError::MismatchedParentheses),
            Token::Number(_) => unreachable!(),
        }
    }

    Ok(output)
}

/// Evaluate postfix against an argument stack, emitting one [`InternalTask`]
/// per operator, each carrying fresh UUIDs for both the task and its
/// operand references (§4.1 "Task emission"). Returns the tasks alongside
/// the final stack value, since a postfix stream with no operators at all
/// (a bare literal, possibly parenthesized) emits zero tasks and leaves the
/// literal as the sole stack entry.
fn emit_tasks(postfix: &[PostfixItem]) -> Result<(Vec<InternalTask>, TaskArg), CompileError> {
    let mut stack: Vec<TaskArg> = Vec::new();
    let mut tasks = Vec::new();

    for item in postfix {
        match item {
            PostfixItem::Number(n) => stack.push(TaskArg::Literal(*n)),
            PostfixItem::Op(op) => {
                let arg2 = stack.pop().ok_or(CompileError::InvalidExpression)?;
                let arg1 = stack.pop().ok_or(CompileError::InvalidExpression)?;
                let id = Uuid::new_v4();
                tasks.push(InternalTask::new(id, arg1, arg2, *op));
                stack.push(TaskArg::Ref(id));
            }
        }
    }

    if stack.len() != 1 {
        return Err(CompileError::InvalidExpression);
    }

    Ok((tasks, stack.pop().unwrap()))
}

/// Result of compiling a canonical expression: either it reduces to a single
/// literal with no operator at all (possibly wrapped in parentheses, e.g.
/// `"42"` or `"(5)"`), or it emits a non-empty task DAG whose last entry is
/// the root.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledExpression {
    Literal(f64),
    Tasks(Vec<InternalTask>),
}

/// Compile a canonical expression.
///
/// The bare-literal edge case of §4.1 — including a literal wrapped in
/// parentheses, which still emits zero operator tasks — is detected here,
/// from the same parse that would otherwise build the task DAG, rather than
/// by a separate raw-string check against the caller's input.
pub fn compile(canonical: &str) -> Result<CompiledExpression, CompileError> {
    let tokens = lex(canonical)?;
    if tokens.is_empty() {
        return Err(CompileError::InvalidExpression);
    }
    let postfix = to_postfix(&tokens)?;
    let (tasks, final_arg) = emit_tasks(&postfix)?;

    if tasks.is_empty() {
        match final_arg {
            TaskArg::Literal(value) => Ok(CompiledExpression::Literal(value)),
            TaskArg::Ref(_) => unreachable!("no tasks emitted but final arg is a reference"),
        }
    } else {
        Ok(CompiledExpression::Tasks(tasks))
    }
}
