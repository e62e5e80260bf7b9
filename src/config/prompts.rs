//! Prompt templates for Svar.
//!
//! The RAG prompt can be customized in the `[prompts]` section of the config
//! file. Templates use `{{variable}}` placeholders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prompts for RAG answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            user: r#"Here are video chunks from a course library, as JSON records with
title, video number, start/end seconds and transcript text:

{{context}}

Question: {{question}}

Answer clearly based only on the chunks above, and mention the video number
and timestamp of the chunks you used."#
                .to_string(),
        }
    }
}

impl RagPrompts {
    /// Render a template, substituting `{{key}}` placeholders.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_variables() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What is a JOIN?".to_string());
        vars.insert("context".to_string(), "[]".to_string());

        let rendered = RagPrompts::render(&RagPrompts::default().user, &vars);
        assert!(rendered.contains("What is a JOIN?"));
        assert!(!rendered.contains("{{question}}"));
        assert!(!rendered.contains("{{context}}"));
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let vars = HashMap::new();
        let rendered = RagPrompts::render("{{missing}}", &vars);
        assert_eq!(rendered, "{{missing}}");
    }
}
