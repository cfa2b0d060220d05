//! Dynamic watermarks configured by an admin for a label.
//!
//! The format string carries `${...}` variables that are resolved against
//! the consuming user at display time, so every viewer sees their own
//! identity burned into the content.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Variable name resolved to the consuming user's principal name.
pub const VAR_CONSUMER_PRINCIPAL_NAME: &str = "Consumer.PrincipalName";
/// Variable name resolved to the event timestamp (UTC, RFC 3339).
pub const VAR_EVENT_DATE_TIME: &str = "Event.DateTime";

/// Values substituted into a watermark format string.
#[derive(Debug, Clone)]
pub struct WatermarkContext {
    pub consumer_principal_name: String,
    pub event_time: DateTime<Utc>,
    /// Additional variables beyond the built-in ones.
    pub extras: BTreeMap<String, String>,
}

impl WatermarkContext {
    pub fn new(consumer_principal_name: impl Into<String>, event_time: DateTime<Utc>) -> Self {
        Self {
            consumer_principal_name: consumer_principal_name.into(),
            event_time,
            extras: BTreeMap::new(),
        }
    }

    fn resolve(&self, variable: &str) -> Option<String> {
        match variable {
            VAR_CONSUMER_PRINCIPAL_NAME => Some(self.consumer_principal_name.clone()),
            VAR_EVENT_DATE_TIME => Some(self.event_time.to_rfc3339()),
            other => self.extras.get(other).cloned(),
        }
    }
}

/// The watermark an admin configured, e.g.
/// `"${Consumer.PrincipalName} viewed on ${Event.DateTime}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicWatermark {
    format_string: String,
}

impl DynamicWatermark {
    pub fn new(format_string: impl Into<String>) -> Self {
        Self {
            format_string: format_string.into(),
        }
    }

    /// The raw format string with variables unresolved.
    pub fn format_string(&self) -> &str {
        &self.format_string
    }

    /// The display text for the end user, with supported variables
    /// replaced. Unknown variables are left verbatim so a format typo is
    /// visible instead of silently dropped.
    pub fn text(&self, context: &WatermarkContext) -> String {
        let mut out = String::with_capacity(self.format_string.len());
        let mut rest = self.format_string.as_str();

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let variable = &after[..end];
                    match context.resolve(variable) {
                        Some(value) => out.push_str(&value),
                        None => {
                            out.push_str("${");
                            out.push_str(variable);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    // unterminated variable, keep the tail as-is
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn context() -> WatermarkContext {
        WatermarkContext::new(
            "alice@contoso.com",
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn replaces_known_variables() {
        let wm = DynamicWatermark::new("${Consumer.PrincipalName} - CONFIDENTIAL");
        assert_eq!(wm.text(&context()), "alice@contoso.com - CONFIDENTIAL");
    }

    #[test]
    fn keeps_unknown_variables_verbatim() {
        let wm = DynamicWatermark::new("${Nope.Unknown} for ${Consumer.PrincipalName}");
        assert_eq!(
            wm.text(&context()),
            "${Nope.Unknown} for alice@contoso.com"
        );
    }

    #[test]
    fn extras_extend_the_variable_set() {
        let mut ctx = context();
        ctx.extras
            .insert("Tenant.Name".into(), "Contoso".into());
        let wm = DynamicWatermark::new("${Tenant.Name}/${Event.DateTime}");
        let text = wm.text(&ctx);
        assert!(text.starts_with("Contoso/2025-06-01T12:00:00"));
    }

    #[test]
    fn unterminated_variable_is_preserved() {
        let wm = DynamicWatermark::new("tail ${Consumer.PrincipalName");
        assert_eq!(wm.text(&context()), "tail ${Consumer.PrincipalName");
    }

    #[test]
    fn plain_text_passes_through() {
        let wm = DynamicWatermark::new("no variables here");
        assert_eq!(wm.text(&context()), "no variables here");
        assert_eq!(wm.format_string(), "no variables here");
    }
}
