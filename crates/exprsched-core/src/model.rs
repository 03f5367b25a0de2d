//! # Data Model
//!
//! The three entities of §3: `Expression`, `Result`, and `InternalTask`.
//! `InternalTask` is the only one with real structure; expressions and
//! results are plain strings in the store and are only given shape here for
//! the HTTP-facing DTOs built on top of them (see `exprsched-orchestrator`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One operand of a task: either a resolved literal or a reference to
/// another task in the same DAG whose result feeds this one.
///
/// `#[serde(untagged)]` keeps the wire representation exactly what the spec
/// requires — a JSON number or a JSON string — while the type system (not
/// string-vs-number introspection at the call site) enforces the tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskArg {
    Literal(f64),
    Ref(Uuid),
}

impl TaskArg {
    pub fn as_literal(&self) -> Option<f64> {
        match self {
            TaskArg::Literal(v) => Some(*v),
            TaskArg::Ref(_) => None,
        }
    }

    pub fn as_ref_id(&self) -> Option<Uuid> {
        match self {
            TaskArg::Ref(id) => Some(*id),
            TaskArg::Literal(_) => None,
        }
    }
}

/// One of the four supported binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }

    /// Apply the operator to two resolved operands. `None` on division by
    /// zero; the caller is responsible for turning that into a runtime
    /// `TaskResult::Error`, never a Rust `Err` (see §7).
    pub fn apply(&self, arg1: f64, arg2: f64) -> Option<f64> {
        match self {
            Operation::Add => Some(arg1 + arg2),
            Operation::Subtract => Some(arg1 - arg2),
            Operation::Multiply => Some(arg1 * arg2),
            Operation::Divide => {
                if arg2 == 0.0 {
                    None
                } else {
                    Some(arg1 / arg2)
                }
            }
        }
    }
}

/// The per-task `result` field's partial order: `Pending -> Processing ->
/// {Value | Error}`. Terminal states never transition further (§3 invariant 5).
///
/// Serialized manually (not `#[serde(untagged)]`) because the wire form for
/// `Pending` is the empty string `""`, which an untagged unit variant would
/// otherwise render as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskResult {
    Pending,
    Processing,
    Error,
    Value(f64),
}

impl TaskResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskResult::Error | TaskResult::Value(_))
    }

    pub fn is_ready_value(&self) -> bool {
        matches!(self, TaskResult::Value(_))
    }
}

impl Serialize for TaskResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            TaskResult::Pending => serializer.serialize_str(""),
            TaskResult::Processing => serializer.serialize_str("PROCESSING"),
            TaskResult::Error => serializer.serialize_str("ERROR"),
            TaskResult::Value(n) => serializer.serialize_f64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for TaskResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(ref s) if s.is_empty() => TaskResult::Pending,
            serde_json::Value::String(ref s) if s == "PROCESSING" => TaskResult::Processing,
            serde_json::Value::String(ref s) if s == "ERROR" => TaskResult::Error,
            serde_json::Value::Number(n) => {
                TaskResult::Value(n.as_f64().unwrap_or_default())
            }
            other => {
                return Err(serde::de::Error::custom(format!(
                    "invalid task result: {other:?}"
                )))
            }
        })
    }
}

/// A single node in the compiled task DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalTask {
    pub id: Uuid,
    pub arg1: TaskArg,
    pub arg2: TaskArg,
    pub operation: Operation,
    pub result: TaskResult,
}

impl InternalTask {
    /// A freshly emitted task, not yet dispatched.
    pub fn new(id: Uuid, arg1: TaskArg, arg2: TaskArg, operation: Operation) -> Self {
        Self {
            id,
            arg1,
            arg2,
            operation,
            result: TaskResult::Pending,
        }
    }
}

/// Status reported by the query interface (C6), derived from a Results entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionStatus {
    Done,
    Processing,
    Error,
}

impl ExpressionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionStatus::Done => "DONE",
            ExpressionStatus::Processing => "PROCESSING",
            ExpressionStatus::Error => "ERROR",
        }
    }
}

/// The sentinel/numeric value stored under a root UUID in the Results namespace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResultValue {
    Processing,
    Error,
    Number(f64),
}

impl ResultValue {
    pub fn status(&self) -> ExpressionStatus {
        match self {
            ResultValue::Processing => ExpressionStatus::Processing,
            ResultValue::Error => ExpressionStatus::Error,
            ResultValue::Number(_) => ExpressionStatus::Done,
        }
    }

    /// The numeric value, or `0.0` for sentinel states per §4.6.
    pub fn numeric_or_zero(&self) -> f64 {
        match self {
            ResultValue::Number(n) => *n,
            _ => 0.0,
        }
    }

    /// Serialize to the exact wire string this system persists: a decimal
    /// number, or one of the two sentinels.
    pub fn to_store_string(self) -> String {
        match self {
            ResultValue::Processing => "PROCESSING".to_string(),
            ResultValue::Error => "ERROR".to_string(),
            ResultValue::Number(n) => n.to_string(),
        }
    }

    pub fn from_store_string(s: &str) -> Self {
        match s {
            "PROCESSING" => ResultValue::Processing,
            "ERROR" => ResultValue::Error,
            other => other
                .parse::<f64>()
                .map(ResultValue::Number)
                .unwrap_or(ResultValue::Error),
        }
    }
}
