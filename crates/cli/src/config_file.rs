use anyhow::{anyhow, Context as AnyhowContext, Result};
use context_code_splitter::SplitterConfig;
use std::fs;
use std::path::Path;

const KNOWN_KEYS: &[&str] = &[
    "max_chars",
    "max_lines",
    "strategy",
    "grace_ratio",
    "context_lines",
    "max_matches",
];

/// Load a splitter config from a JSON or TOML file
pub fn load_config(path: &Path) -> Result<SplitterConfig> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_raw(&bytes).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn parse_raw(bytes: &[u8]) -> Result<SplitterConfig> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                anyhow!("Config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| anyhow!("Failed to convert TOML config to JSON: {err}"))?
        }
    };

    reject_unknown_keys(&value)?;
    serde_json::from_value(value).map_err(|err| anyhow!("Config parse error: {err}"))
}

fn reject_unknown_keys(value: &serde_json::Value) -> Result<()> {
    let Some(map) = value.as_object() else {
        return Err(anyhow!("Config must be a table/object"));
    };
    let mut unknown: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| !KNOWN_KEYS.contains(key))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(anyhow!("Unknown config fields: {}", unknown.join(", ")))
}
