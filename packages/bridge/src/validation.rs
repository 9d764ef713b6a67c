//! Request checks that run before any directory or backend access.

use crate::model::FieldMask;
use crate::Status;

/// Unwrap a required message field.
pub(crate) fn required<'a, T>(field: &'a Option<T>, name: &str) -> Result<&'a T, Status> {
    field.as_ref().ok_or_else(|| missing_field(name))
}

/// Require a non-empty string field.
pub(crate) fn required_str(value: &str, name: &str) -> Result<(), Status> {
    if value.is_empty() {
        return Err(missing_field(name));
    }
    Ok(())
}

fn missing_field(name: &str) -> Status {
    Status::invalid_argument(format!("missing required field: {}", name))
}

/// Enforce an upper byte-length bound, reporting the full accepted range.
pub(crate) fn max_len(field: &str, value: &str, max: usize) -> Result<(), Status> {
    if value.len() > max {
        return Err(Status::invalid_argument(format!(
            "{} value ({}) is too long, have to be between 1 and {}",
            field, value, max
        )));
    }
    Ok(())
}

/// Every mask path must name a known updatable field.
pub(crate) fn field_mask(mask: Option<&FieldMask>, known: &[&str]) -> Result<(), Status> {
    let Some(mask) = mask else {
        return Ok(());
    };
    for path in &mask.paths {
        if !known.contains(&path.as_str()) {
            return Err(Status::invalid_argument(format!(
                "invalid field path: {}",
                path
            )));
        }
    }
    Ok(())
}
