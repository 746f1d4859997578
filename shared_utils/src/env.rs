use thiserror::Error;

/// An environment variable required by the application is not set (or is blank).
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Blank values (empty or whitespace only) count as missing, so a `.env`
/// entry like `GOOGLE_PRIVATE_KEY=` is reported the same way as an unset one.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads an optional environment variable; blank values become `None`.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    get_env_var(name).ok()
}

/// Reads a multi-line secret (such as a PEM key) stored on a single line.
///
/// Dotenv files usually carry PEM keys with literal `\n` sequences; those are
/// turned back into real newlines.
pub fn get_multiline_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    get_env_var(name).map(|value| value.replace("\\n", "\n"))
}
