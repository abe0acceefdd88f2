//! `${VAR}` and `${VAR:-default}` expansion for string settings.

use crate::ConfigError;

/// Name of the variable that failed to resolve.
struct Unset(String);

/// Expand environment references in `value`.
///
/// Only the braced form is recognised, so a bare `$` in a URL survives.
/// `field` names the setting in the error.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| {
        std::env::var(name)
            .map(Some)
            .map_err(|_| Unset(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand in place.
pub(crate) fn expand_in(value: &mut String, field: &str) -> Result<(), ConfigError> {
    *value = expand_env(value, field)?;
    Ok(())
}
