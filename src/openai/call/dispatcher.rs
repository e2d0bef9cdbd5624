use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::openai::error::CallError;
use crate::openai::history::FunctionCallDirective;
use crate::openai::tools::{DispatchTable, FunctionSchema, HandlerError};

/// Resolve the directive against the dispatch table, validate its arguments, and run it.
///
/// Lookup and argument checks happen before the handler is touched, so an unknown
/// name or malformed payload never causes any I/O.
#[instrument(name = "dispatch", skip(table), fields(function = %directive.name))]
pub fn dispatch(directive: &FunctionCallDirective, table: &DispatchTable) -> Result<String, CallError> {
    let tool = table
        .get(&directive.name)
        .ok_or_else(|| CallError::UnknownFunction { name: directive.name.clone() })?;

    let args = decode_arguments(directive, &tool.schema)?;
    debug!(target: "openai", keys = args.len(), "arguments_decoded");

    tool.execute(&args).map_err(|e| match e {
        HandlerError::InvalidArguments(reason) => {
            CallError::malformed(&directive.name, &directive.arguments, reason)
        }
        HandlerError::Failed(source) => CallError::FunctionExecutionFailed {
            name: directive.name.clone(),
            source,
        },
    })
}

/// Parse the raw argument text into an object and check it against the schema:
/// every `required` key present, and no undeclared keys when the schema forbids them.
pub fn decode_arguments(
    directive: &FunctionCallDirective,
    schema: &FunctionSchema,
) -> Result<Map<String, Value>, CallError> {
    let malformed = |reason: String| CallError::malformed(&directive.name, &directive.arguments, reason);

    let value: Value = serde_json::from_str(&directive.arguments)
        .map_err(|e| malformed(format!("invalid JSON: {e}")))?;
    let Value::Object(args) = value else {
        return Err(malformed("arguments must be a JSON object".into()));
    };

    let missing: Vec<&str> = schema
        .parameters
        .required()
        .into_iter()
        .filter(|r| !args.contains_key(*r))
        .collect();
    if !missing.is_empty() {
        return Err(malformed(format!("missing required parameter(s): {}", missing.join(", "))));
    }

    if !schema.parameters.allows_additional() {
        let unknown: Vec<&str> = args
            .keys()
            .map(String::as_str)
            .filter(|k| !schema.parameters.declares(k))
            .collect();
        if !unknown.is_empty() {
            return Err(malformed(format!("unknown parameter(s): {}", unknown.join(", "))));
        }
    }

    Ok(args)
}
