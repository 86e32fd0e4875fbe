//! Clause splitting on contrastive connectors and sentence punctuation.
//!
//! `"me costó pero lo recomiendo"` → `["me costó", "lo recomiendo"]`. The last
//! clause carries the final judgment of a concessive opinion.

use crate::error::{AnnotateError, Result};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct ClauseSplitter {
    split_re: Regex,
    connector_re: Option<Regex>,
}

impl ClauseSplitter {
    pub fn new<S: AsRef<str>>(connectors: &[S]) -> Result<Self> {
        let alternation = connectors
            .iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .map(|c| {
                c.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|");

        let (split_src, connector_src) = if alternation.is_empty() {
            (r"[.!?]".to_string(), None)
        } else {
            (
                format!(r"(?:\s(?:{alternation})\s|[.!?])"),
                Some(format!(r"(?:^|\s)(?:{alternation})(?:\s|$)")),
            )
        };

        let compile = |src: &str| {
            Regex::new(src).map_err(|e| AnnotateError::Config(format!("contrast connectors: {e}")))
        };
        Ok(Self {
            split_re: compile(&split_src)?,
            connector_re: connector_src.as_deref().map(compile).transpose()?,
        })
    }

    /// Non-empty, trimmed clauses in order.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.split_re
            .split(text)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Last clause, or the whole (trimmed) text when nothing splits off.
    pub fn last_clause<'a>(&self, text: &'a str) -> &'a str {
        self.split(text).pop().unwrap_or_else(|| text.trim())
    }

    /// Whole-word connector test (`espero` does not contain `pero`).
    pub fn has_connector(&self, text: &str) -> bool {
        self.connector_re
            .as_ref()
            .is_some_and(|re| re.is_match(&text.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SentimentConfig;

    fn splitter() -> ClauseSplitter {
        ClauseSplitter::new(&SentimentConfig::default().contrast).unwrap()
    }

    #[test]
    fn splits_on_connectors_and_punctuation() {
        let s = splitter();
        assert_eq!(
            s.split("me costó mucho pero lo recomiendo . sin embargo es caro"),
            vec!["me costó mucho", "lo recomiendo", "es caro"]
        );
        assert_eq!(s.last_clause("bueno aunque caro"), "caro");
    }

    #[test]
    fn multiword_connector_tolerates_extra_spaces() {
        let s = splitter();
        assert_eq!(s.last_clause("rico no   obstante caro"), "caro");
    }

    #[test]
    fn last_clause_falls_back_to_whole_text() {
        let s = splitter();
        assert_eq!(s.last_clause("  todo bien  "), "todo bien");
        assert_eq!(s.last_clause("..."), "...");
    }

    #[test]
    fn connector_detection_is_whole_word() {
        let s = splitter();
        assert!(s.has_connector("me gusta pero cuesta"));
        assert!(s.has_connector("Sin Embargo sigo"));
        assert!(!s.has_connector("espero resultados"));
        assert!(!s.has_connector("no_pero nada"));
    }
}
