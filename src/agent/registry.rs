//! Tool Registry
//!
//! The static catalog mapping tool names to their schemas and executable
//! implementations. The loop consults it for the catalog to advertise to
//! the model and for synchronous dispatch; it has no control-flow role.

use anyhow::Result;
use serde_json::{Map, Value};

use crate::error::RegistryError;
use crate::types::{ParamType, ToolPayload, ToolSpec};

/// A tool implementation: named arguments in, string-keyed payload out.
/// Errors are caught by `invoke` and converted to failure payloads, never
/// propagated to the loop.
pub type ToolFn = Box<dyn Fn(&Map<String, Value>) -> Result<Map<String, Value>> + Send + Sync>;

struct RegisteredTool {
    spec: ToolSpec,
    run: ToolFn,
}

/// Registration-ordered tool catalog. Order is visible to the model, so it
/// must be stable across calls within one process.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Associate a name with its schema and implementation. Fails if the
    /// name is already taken, leaving the registry unchanged.
    pub fn register(&mut self, spec: ToolSpec, run: ToolFn) -> Result<(), RegistryError> {
        if self.tools.iter().any(|t| t.spec.name == spec.name) {
            return Err(RegistryError::DuplicateTool(spec.name));
        }
        self.tools.push(RegisteredTool { spec, run });
        Ok(())
    }

    /// The catalog to advertise to the model, in registration order.
    pub fn schemas(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up and run a tool synchronously. Schema violations and
    /// implementation errors come back as failure payloads; only an
    /// unregistered name is an `Err`.
    pub fn invoke(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<ToolPayload, RegistryError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.spec.name == name)
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))?;

        if let Err(violation) = validate_arguments(&tool.spec, arguments) {
            return Ok(ToolPayload::Failure(violation));
        }

        match (tool.run)(arguments) {
            Ok(fields) => Ok(ToolPayload::Success(fields)),
            Err(err) => Ok(ToolPayload::Failure(err.to_string())),
        }
    }
}

/// Check loosely-typed model arguments against the declared schema before
/// invocation. Unknown extra keys are ignored.
fn validate_arguments(spec: &ToolSpec, arguments: &Map<String, Value>) -> Result<(), String> {
    for param in &spec.parameters {
        match arguments.get(&param.name) {
            None if param.required => {
                return Err(format!("missing required argument '{}'", param.name));
            }
            None => {}
            Some(value) => {
                let matches_type = match param.param_type {
                    ParamType::String => value.is_string(),
                    ParamType::Number => value.is_number(),
                    ParamType::Boolean => value.is_boolean(),
                };
                if !matches_type {
                    return Err(format!(
                        "argument '{}' expected {} but got {}",
                        param.name,
                        param.param_type.as_str(),
                        value_type_name(value),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParamSpec;
    use serde_json::json;

    fn echo_spec() -> ToolSpec {
        ToolSpec {
            name: "echo".to_string(),
            description: "Echo the input back.".to_string(),
            parameters: vec![ParamSpec {
                name: "value".to_string(),
                param_type: ParamType::String,
                description: "The value to echo.".to_string(),
                required: true,
            }],
        }
    }

    fn echo_impl() -> ToolFn {
        Box::new(|args| {
            let mut fields = Map::new();
            fields.insert("value".to_string(), args["value"].clone());
            Ok(fields)
        })
    }

    fn string_args(key: &str, value: &str) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert(key.to_string(), json!(value));
        args
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_spec(), echo_impl()).unwrap();

        let mut second = echo_spec();
        second.description = "A different echo.".to_string();
        let err = registry.register(second, echo_impl()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("echo".to_string()));

        // First registration is still the active one.
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.schemas()[0].description, "Echo the input back.");
    }

    #[test]
    fn test_schemas_idempotent_and_ordered() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_spec(), echo_impl()).unwrap();
        let mut other = echo_spec();
        other.name = "echo2".to_string();
        registry.register(other, echo_impl()).unwrap();

        let first: Vec<String> = registry.schemas().iter().map(|s| s.name.clone()).collect();
        let second: Vec<String> = registry.schemas().iter().map(|s| s.name.clone()).collect();
        assert_eq!(first, vec!["echo", "echo2"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("nope", &Map::new()).unwrap_err();
        assert_eq!(err, RegistryError::UnknownTool("nope".to_string()));
    }

    #[test]
    fn test_invoke_success() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_spec(), echo_impl()).unwrap();

        let payload = registry
            .invoke("echo", &string_args("value", "hi"))
            .unwrap();
        assert_eq!(
            payload,
            ToolPayload::Success({
                let mut fields = Map::new();
                fields.insert("value".to_string(), json!("hi"));
                fields
            })
        );
    }

    #[test]
    fn test_invoke_catches_implementation_error() {
        let mut registry = ToolRegistry::new();
        let failing: ToolFn = Box::new(|_| anyhow::bail!("boom"));
        registry.register(echo_spec(), failing).unwrap();

        let payload = registry
            .invoke("echo", &string_args("value", "hi"))
            .unwrap();
        assert_eq!(payload, ToolPayload::Failure("boom".to_string()));
    }

    #[test]
    fn test_invoke_validates_missing_argument() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_spec(), echo_impl()).unwrap();

        let payload = registry.invoke("echo", &Map::new()).unwrap();
        assert_eq!(
            payload,
            ToolPayload::Failure("missing required argument 'value'".to_string())
        );
    }

    #[test]
    fn test_invoke_validates_argument_type() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_spec(), echo_impl()).unwrap();

        let mut args = Map::new();
        args.insert("value".to_string(), json!(42));
        let payload = registry.invoke("echo", &args).unwrap();
        assert_eq!(
            payload,
            ToolPayload::Failure("argument 'value' expected string but got number".to_string())
        );
    }

    #[test]
    fn test_optional_argument_may_be_absent() {
        let mut registry = ToolRegistry::new();
        let mut spec = echo_spec();
        spec.parameters[0].required = false;
        registry
            .register(spec, Box::new(|_| Ok(Map::new())))
            .unwrap();

        let payload = registry.invoke("echo", &Map::new()).unwrap();
        assert!(!payload.is_failure());
    }
}
