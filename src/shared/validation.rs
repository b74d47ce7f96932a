//! Validation Utilities

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::domain::error::{DomainError, InvalidParam};

/// Fields whose submitted value is never echoed back in an error.
const REDACTED_FIELDS: &[&str] = &["password"];

/// Run the derived validator and convert any failure into a domain error.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), DomainError> {
    input.validate().map_err(validation_error)
}

/// Convert validation errors to a `DomainError`.
///
/// Nested struct errors are flattened into dotted field names
/// (`author.id`). Params are sorted by field so the output is stable.
pub fn validation_error(errors: ValidationErrors) -> DomainError {
    let mut params = Vec::new();
    collect(&errors, None, &mut params);
    params.sort_by(|a, b| a.field.cmp(&b.field));
    DomainError::invalid(params)
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<InvalidParam>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| to_param(&path, field, e)));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn to_param(path: &str, field: &str, error: &ValidationError) -> InvalidParam {
    let value = if REDACTED_FIELDS.contains(&field) {
        None
    } else {
        error.params.get("value").map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    };
    let reason = error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string());
    InvalidParam::new(path, value, reason)
}
