// src/lexicon.rs
//! Token-level lexicon lookup.
//!
//! Entries without spaces (`recomiendo`, `no_recomendar`, `:smile:`) match a
//! single whitespace token. Entries with spaces (`me fue bien`, `sin embargo`)
//! match a contiguous run of tokens.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashSet<String>,
    phrases: Vec<Vec<String>>,
}

impl Lexicon {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lex = Self::default();
        for e in entries {
            let parts: Vec<String> = e
                .as_ref()
                .split_whitespace()
                .map(str::to_lowercase)
                .collect();
            match parts.len() {
                0 => {}
                1 => {
                    lex.words.extend(parts);
                }
                _ => lex.phrases.push(parts),
            }
        }
        lex
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.phrases.is_empty()
    }

    pub fn contains_word(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// True if any entry occurs in `tokens` (already lower-cased).
    pub fn matches<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        if tokens.iter().any(|t| self.words.contains(t.as_ref())) {
            return true;
        }
        self.phrases.iter().any(|p| {
            tokens
                .windows(p.len())
                .any(|w| w.iter().zip(p).all(|(a, b)| a.as_ref() == b))
        })
    }
}
