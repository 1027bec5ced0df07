//! Localized message templates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry of the message table.
///
/// `text` may contain `{placeholder}` slots substituted at render time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    /// Stable identifier; filled from the table key by the loader.
    #[serde(default)]
    pub id: String,
    pub text: String,
    /// Grouping used by the by-category index (e.g. "combat", "corruption").
    pub category: String,
}

impl MessageTemplate {
    /// Substitutes `{key}` slots from `args`.
    ///
    /// Placeholders with no matching argument are left intact so that a
    /// missing argument is visible in logs rather than silently blanked.
    pub fn render(&self, args: &HashMap<String, String>) -> String {
        let mut out = self.text.clone();
        for (key, value) in args {
            out = out.replace(&format!("{{{key}}}"), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(text: &str) -> MessageTemplate {
        MessageTemplate {
            id: "t".into(),
            text: text.into(),
            category: "combat".into(),
        }
    }

    #[test]
    fn render_substitutes_known_placeholders() {
        let args = HashMap::from([
            ("attacker".to_string(), "Mira".to_string()),
            ("amount".to_string(), "7".to_string()),
        ]);
        assert_eq!(
            template("{attacker} hits the monster for {amount} damage").render(&args),
            "Mira hits the monster for 7 damage"
        );
    }

    #[test]
    fn render_leaves_unknown_placeholders_intact() {
        let args = HashMap::from([("attacker".to_string(), "Mira".to_string())]);
        assert_eq!(
            template("{attacker} heals {target}").render(&args),
            "Mira heals {target}"
        );
    }
}
