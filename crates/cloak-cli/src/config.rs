use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Defaults read from `<config dir>/cloak/config.json`; every field is
/// optional and command-line flags win.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Default content owner email for built descriptors.
    pub owner: Option<String>,
    /// Default contact URI for users requesting access.
    pub referrer: Option<String>,
    /// BCP 47 locale for service-provided strings.
    pub locale: Option<String>,
}

fn config_path() -> PathBuf {
    let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("cloak");
    p.push("config.json");
    p
}

/// Load the config file; absent or unreadable files mean no defaults.
pub fn load() -> Option<Config> {
    let raw = fs::read_to_string(config_path()).ok()?;
    match serde_json::from_str(&raw) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!("ignoring malformed config file: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses() {
        let cfg: Config = serde_json::from_str(r#"{"owner":"me@contoso.com"}"#).unwrap();
        assert_eq!(cfg.owner.as_deref(), Some("me@contoso.com"));
        assert!(cfg.referrer.is_none());
        assert!(cfg.locale.is_none());
    }
}
