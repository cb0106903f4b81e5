//! `--set PATH=VALUE` parsing.

use anyhow::Context;
use feign_core::Value;

/// Parse an override like `.Address.City=Berlin`.
///
/// The path must start with `.`. The value is parsed as YAML, so `42`,
/// `true`, `~`, `[1, 2]` and `{City: Berlin}` all have their natural
/// meaning; `~` forces the slot to zero.
pub fn parse_override(s: &str) -> anyhow::Result<(String, Value)> {
    let (path, raw) = s
        .split_once('=')
        .with_context(|| format!("Missing '=' in override: {s}"))?;

    let path = path.trim();
    if !path.starts_with('.') || path.len() < 2 {
        anyhow::bail!("Override path must look like '.Field': {path}");
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(raw)
        .with_context(|| format!("Invalid value for {path}: {raw}"))?;

    Ok((path.to_string(), Value::from_yaml(yaml)))
}
