//! Integer calculator tools (`add`, `mult`) used by the arithmetic agent.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::Tool;

pub const TOOL_ADD: &str = "add";
pub const TOOL_MULT: &str = "mult";

/// Binary integer operations exposed as tools. Dispatch is by variant, not by string
/// lookup; [`Arithmetic::from_name`] maps a tool name back to its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arithmetic {
    Add,
    Mult,
}

impl Arithmetic {
    pub const ALL: [Arithmetic; 2] = [Arithmetic::Add, Arithmetic::Mult];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            TOOL_ADD => Some(Self::Add),
            TOOL_MULT => Some(Self::Mult),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => TOOL_ADD,
            Self::Mult => TOOL_MULT,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Add => "Add two integers a and b and return the sum.",
            Self::Mult => "Multiply two integers a and b and return the product.",
        }
    }

    /// Applies the operation; `None` on overflow.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Self::Add => a.checked_add(b),
            Self::Mult => a.checked_mul(b),
        }
    }
}

fn int_arg(args: &Value, key: &str) -> Result<i64, ToolSourceError> {
    args.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolSourceError::InvalidInput(format!("missing or non-integer '{}'", key)))
}

#[async_trait]
impl Tool for Arithmetic {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.as_str().to_string(),
            description: Some(self.description().to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "a": { "type": "integer", "description": "First operand." },
                    "b": { "type": "integer", "description": "Second operand." }
                },
                "required": ["a", "b"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let a = int_arg(&args, "a")?;
        let b = int_arg(&args, "b")?;
        let value = self.apply(a, b).ok_or_else(|| {
            ToolSourceError::Execution(format!("{}({}, {}) overflows i64", self.as_str(), a, b))
        })?;
        Ok(ToolCallContent::new(value.to_string()))
    }
}
