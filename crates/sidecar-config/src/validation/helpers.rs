//! Shared validation helpers used by all section validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` contains a NUL byte, which no OS accepts in
/// argv or the environment.
pub(crate) fn validate_no_nul(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.contains('\0') {
        errors.push(format!("{name} must not contain NUL bytes"));
    }
}
