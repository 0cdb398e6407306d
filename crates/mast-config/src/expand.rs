//! Environment variable expansion for site document strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! A `$` not followed by `{` is literal, so prices in titles and bare
//! `$VAR` text survive expansion.

use crate::ConfigError;

/// Expand an optional document field in place.
pub(crate) fn expand_field(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(current) = value.as_deref()
        && current.contains("${")
    {
        *value = Some(expand_env(current, field)?);
    }
    Ok(())
}

/// Double every `$` that doesn't open a `${...}` reference.
///
/// shellexpand also expands bare `$NAME` and reads `$$` as a literal `$`.
fn escape_bare_dollars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '$' && chars.peek() != Some(&'{') {
            out.push('$');
        }
    }
    out
}

/// Expand environment variable references in a string.
fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let escaped = escape_bare_dollars(value);
    shellexpand::env_with_context(&escaped, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Lookup failure carrying the variable name.
struct UnsetVar(String);
