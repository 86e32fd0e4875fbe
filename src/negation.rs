// src/negation.rs
//! Negation scoper.
//!
//! After a cue (`no`, `nunca`, `jamás`, `tampoco`) the next `window` tokens are
//! rewritten as `no_<token>`. The cue itself is consumed. A second cue inside
//! an active window restarts the count at `window`. Punctuation does not end a
//! window (`no . me gusta` → `no_. no_me no_gusta`); only the scope-reset tokens
//! (`pero`, `aunque` by default) close it early, and they stay unmarked.
//!
//! Negated tokens keep their lexical identity behind the marker, so lexicon
//! lookups can target either form (`recomiendo` vs `no_recomiendo`).

use crate::config::NegationConfig;
use crate::text::{replace_emojis, tokenize};
use std::collections::HashSet;
use std::fmt;

pub const NEGATION_PREFIX: &str = "no_";

/// One normalized token of the scoped stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopedToken {
    Plain(String),
    Negated(String),
}

impl ScopedToken {
    /// Underlying word form without the marker.
    pub fn lemma(&self) -> &str {
        match self {
            ScopedToken::Plain(s) | ScopedToken::Negated(s) => s,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, ScopedToken::Negated(_))
    }
}

impl fmt::Display for ScopedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopedToken::Plain(s) => f.write_str(s),
            ScopedToken::Negated(s) => write!(f, "{NEGATION_PREFIX}{s}"),
        }
    }
}

/// True for a whitespace token of `texto_proc` that carries the negation marker.
pub fn is_negated_form(token: &str) -> bool {
    token.len() > NEGATION_PREFIX.len() && token.starts_with(NEGATION_PREFIX)
}

#[derive(Debug, Clone)]
pub struct NegationScoper {
    cues: HashSet<String>,
    resets: HashSet<String>,
    window: usize,
}

impl NegationScoper {
    pub fn new(cfg: &NegationConfig) -> Self {
        Self {
            cues: cfg.cues.iter().map(|c| c.to_lowercase()).collect(),
            resets: cfg.scope_resets.iter().map(|c| c.to_lowercase()).collect(),
            window: cfg.window,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn scope<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<ScopedToken> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut remaining = 0usize;

        for tok in tokens {
            let t = tok.as_ref().trim().to_lowercase();
            if t.is_empty() {
                continue;
            }
            if self.cues.contains(&t) {
                remaining = self.window;
                continue;
            }
            if self.resets.contains(&t) {
                remaining = 0;
                out.push(ScopedToken::Plain(t));
                continue;
            }
            if remaining > 0 {
                remaining -= 1;
                out.push(ScopedToken::Negated(t));
            } else {
                out.push(ScopedToken::Plain(t));
            }
        }
        out
    }

    /// Scope a token sequence and join it into the canonical `texto_proc` form.
    pub fn mark<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        join(&self.scope(tokens))
    }

    /// Replace emoji, tokenize raw text and mark it. Empty or malformed input gives "".
    pub fn process_text(&self, raw: &str) -> String {
        self.mark(&tokenize(&replace_emojis(raw)))
    }
}

fn join(tokens: &[ScopedToken]) -> String {
    let mut out = String::new();
    for t in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&t.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoper(window: usize) -> NegationScoper {
        NegationScoper::new(&NegationConfig {
            window,
            ..NegationConfig::default()
        })
    }

    #[test]
    fn marks_exactly_window_tokens_after_cue() {
        let s = scoper(3);
        let out = s.mark(&["no", "me", "gusta", "nada", "esta", "dieta"]);
        assert_eq!(out, "no_me no_gusta no_nada esta dieta");
    }

    #[test]
    fn second_cue_restarts_full_window() {
        let s = scoper(3);
        let out = s.mark(&["no", "es", "nunca", "fue", "tan", "caro", "hoy", "bien"]);
        assert_eq!(out, "no_es no_fue no_tan no_caro hoy bien");
    }

    #[test]
    fn window_counts_function_words_too() {
        let s = scoper(2);
        let toks = s.scope(&["tampoco", "la", "de", "keto"]);
        assert_eq!(
            toks,
            vec![
                ScopedToken::Negated("la".into()),
                ScopedToken::Negated("de".into()),
                ScopedToken::Plain("keto".into()),
            ]
        );
        assert_eq!(toks[0].lemma(), "la");
    }

    #[test]
    fn scope_reset_closes_the_window() {
        let s = scoper(3);
        let out = s.process_text("No, pero lo recomiendo");
        assert_eq!(out, "no_, pero lo recomiendo");
    }

    #[test]
    fn window_runs_across_sentence_punctuation() {
        let s = scoper(3);
        assert_eq!(s.mark(&["no", ".", "me", "gusta", "nada"]), "no_. no_me no_gusta nada");
        assert_eq!(
            s.process_text("No me gustó, la verdad"),
            "no_me no_gustó no_, la verdad"
        );
    }

    #[test]
    fn emoji_are_marked_like_words() {
        let s = scoper(3);
        assert_eq!(s.process_text("No 👍"), "no_:+1:");
        assert_eq!(s.process_text("La keto 😄"), "la keto :smile:");
    }

    #[test]
    fn state_does_not_leak_across_calls() {
        let s = scoper(3);
        assert_eq!(s.mark(&["plan", "no"]), "plan");
        assert_eq!(s.mark(&["me", "gusta"]), "me gusta");
    }

    #[test]
    fn empty_and_malformed_input_give_empty_output() {
        let s = scoper(3);
        assert_eq!(s.process_text(""), "");
        assert_eq!(s.mark(&["", "   "]), "");
        assert_eq!(s.mark(&["no", "jamás"]), "");
    }

    #[test]
    fn negated_form_detection() {
        assert!(is_negated_form("no_funciona"));
        assert!(!is_negated_form("no_"));
        assert!(!is_negated_form("noche"));
    }
}
