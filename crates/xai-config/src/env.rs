use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Failure while substituting `{{ env.VAR }}` placeholders
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Placeholder references an unset variable and carries no default
    #[error("environment variable not found: `{0}`")]
    MissingVariable(String),

    /// Placeholder uses a scope other than `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.VAR }}` or `{{ env.VAR | default("fallback") }}`
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Substitute environment placeholders in raw config text
///
/// Comment lines are copied verbatim so a commented-out secret never has
/// to be present in the environment.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
            continue;
        }
        lines.push(expand_line(line)?);
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut failure = None;

    let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| {
        match resolve(&caps[1], caps.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_owned()));
    };

    match (std::env::var(var_name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(ExpandError::MissingVariable(var_name.to_owned())),
    }
}
