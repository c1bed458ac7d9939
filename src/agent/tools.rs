//! Built-in Tools
//!
//! The distance calculator the agent ships with. Additional tools plug into
//! the same registry interface without loop changes.

use anyhow::{anyhow, bail, Result};
use serde_json::{json, Map, Value};

use crate::agent::registry::{ToolFn, ToolRegistry};
use crate::error::RegistryError;
use crate::types::{ParamSpec, ParamType, ToolSpec};

/// Register every built-in tool.
pub fn register_builtin_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(distance_tool_spec(), Box::new(calculate_distance) as ToolFn)?;
    Ok(())
}

fn number_param(name: &str, description: &str) -> ParamSpec {
    ParamSpec {
        name: name.to_string(),
        param_type: ParamType::Number,
        description: description.to_string(),
        required: true,
    }
}

pub fn distance_tool_spec() -> ToolSpec {
    ToolSpec {
        name: "calculate_distance".to_string(),
        description: "Calculates the straight-line distance between two points (x1, y1) and \
                      (x2, y2) in a 2D coordinate system. Use this when the user asks for \
                      distance or comparison of distances."
            .to_string(),
        parameters: vec![
            number_param("x1", "The x-coordinate of the first point."),
            number_param("y1", "The y-coordinate of the first point."),
            number_param("x2", "The x-coordinate of the second point."),
            number_param("y2", "The y-coordinate of the second point."),
        ],
    }
}

/// Euclidean distance between (x1, y1) and (x2, y2), echoing both points.
fn calculate_distance(args: &Map<String, Value>) -> Result<Map<String, Value>> {
    let x1 = number_arg(args, "x1")?;
    let y1 = number_arg(args, "y1")?;
    let x2 = number_arg(args, "x2")?;
    let y2 = number_arg(args, "y2")?;

    let dx = x2 - x1;
    let dy = y2 - y1;
    let distance = (dx * dx + dy * dy).sqrt();

    // JSON cannot carry non-finite numbers, but extreme coordinates can
    // still overflow to infinity here.
    if !distance.is_finite() {
        bail!("Calculation failed: distance is not a finite number");
    }

    let mut fields = Map::new();
    fields.insert("distance".to_string(), json!(distance));
    fields.insert("units".to_string(), json!("arbitrary_units"));
    fields.insert("point1".to_string(), json!(format!("({}, {})", x1, y1)));
    fields.insert("point2".to_string(), json!(format!("({}, {})", x2, y2)));
    Ok(fields)
}

fn number_arg(args: &Map<String, Value>, name: &str) -> Result<f64> {
    args.get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| anyhow!("Missing '{}' argument", name))
}
