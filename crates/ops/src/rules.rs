//! Rules sidecar read-modify-write
//!
//! The binary reads its encryption rules from a `.yed_config.yml` next to
//! the files being worked on. `append_rule` adds a plaintext rule record to
//! that document, preserving everything else in it.

use std::path::Path;

use serde_yml::{Mapping, Value};
use yedctl_errors::{ConfigError, Error};

/// Append `rule` to the `rules` sequence of the sidecar at `path`.
///
/// Creates the file with an empty `rules` sequence when it does not exist.
/// Appending a rule that is already present is a no-op.
///
/// # Errors
///
/// Returns a `ConfigError` when the document cannot be parsed, `rules`
/// holds something other than a sequence, or the file cannot be written.
pub async fn append_rule(path: &Path, rule: &str) -> Result<(), Error> {
    let mut doc = match tokio::fs::read_to_string(path).await {
        Ok(raw) => serde_yml::from_str::<Value>(&raw).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Mapping(Mapping::new()),
        Err(e) => return Err(Error::io_with_path(&e, path)),
    };

    let Value::Mapping(map) = &mut doc else {
        return Err(ConfigError::ParseError {
            message: format!("{} is not a YAML mapping", path.display()),
        }
        .into());
    };

    let rules_key = Value::from("rules");
    match map.get_mut(&rules_key) {
        Some(Value::Sequence(rules)) => {
            if !rules.iter().any(|r| r.as_str() == Some(rule)) {
                rules.push(Value::from(rule));
            }
        }
        Some(Value::Null) | None => {
            map.insert(rules_key, Value::Sequence(vec![Value::from(rule)]));
        }
        Some(_) => {
            return Err(ConfigError::InvalidValue {
                field: "rules".to_string(),
                value: "expected a sequence".to_string(),
            }
            .into())
        }
    }

    let serialized = serde_yml::to_string(&doc).map_err(|e| ConfigError::SerializeError {
        error: e.to_string(),
    })?;
    tokio::fs::write(path, serialized)
        .await
        .map_err(|e| ConfigError::WriteError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

    Ok(())
}
