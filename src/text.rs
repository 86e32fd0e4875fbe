// src/text.rs
//! Text cleaning and tokenization shared by the preprocess stage and the
//! degraded path that builds `texto_proc` on the fly.
//!
//! Emoji are rewritten to gemoji placeholders (`😄` -> `:smile:`) so the
//! sentiment lexicons can vote on them like any other token.

use once_cell::sync::Lazy;
use regex::Regex;

// Longest emoji sequence tried at one position (ZWJ families, flags, skin tones)
const MAX_EMOJI_CHARS: usize = 10;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

// Emoji placeholders (`:smile:`), word compounds (`16/8`, `no_recomendar`),
// then any single non-space, non-word char as its own token.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?u):[a-z0-9_+\-]+:|\w+(?:[/_']\w+)*|[^\w\s]").expect("tokenizer regex")
});

/// Strip HTML tags, decode entities, collapse whitespace.
pub fn basic_clean(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    let decoded = html_escape::decode_html_entities(&no_tags);
    collapse_whitespace(&decoded)
}

/// Replace every emoji with a space-delimited `:shortcode:` placeholder.
pub fn replace_emojis(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        if c.is_ascii() {
            out.push(c);
            rest = &rest[1..];
            continue;
        }
        match longest_emoji(rest) {
            Some((emoji, len)) => {
                out.push_str(" :");
                out.push_str(&placeholder(emoji));
                out.push_str(": ");
                rest = &rest[len..];
            }
            None => {
                // stray presentation selectors and joiners carry no meaning alone
                if c != '\u{fe0f}' && c != '\u{200d}' {
                    out.push(c);
                }
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    collapse_whitespace(&out)
}

fn longest_emoji(s: &str) -> Option<(&'static emojis::Emoji, usize)> {
    let ends: Vec<usize> = s
        .char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .take(MAX_EMOJI_CHARS)
        .collect();
    ends.iter()
        .rev()
        .find_map(|&end| emojis::get(&s[..end]).map(|e| (e, end)))
}

fn placeholder(emoji: &emojis::Emoji) -> String {
    let base = emoji
        .with_skin_tone(emojis::SkinTone::Default)
        .unwrap_or(emoji);
    match base.shortcode() {
        Some(code) => code.to_string(),
        None => base
            .name()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect::<String>()
            .trim_matches('_')
            .to_string(),
    }
}

pub fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for part in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// Lower-cased tokens; punctuation marks come out as standalone tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    let lower = input.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whitespace tokens of an already normalized string.
pub fn whitespace_tokens(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_markup_and_entities() {
        let s = "<p>Me&nbsp;encantó   la <b>keto</b> &amp; el ayuno</p>\n";
        assert_eq!(basic_clean(s), "Me encantó la keto & el ayuno");
    }

    #[test]
    fn tokenizer_keeps_placeholders_and_punctuation() {
        let toks = tokenize("¿Funciona el 16/8? ¡Sí! :smile: No_lo sé.");
        assert_eq!(
            toks,
            vec![
                "¿", "funciona", "el", "16/8", "?", "¡", "sí", "!", ":smile:", "no_lo", "sé", "."
            ]
        );
    }

    #[test]
    fn emoji_become_lexicon_placeholders() {
        assert_eq!(replace_emojis("La keto 😄"), "La keto :smile:");
        assert_eq!(replace_emojis("genial👍dieta"), "genial :+1: dieta");
        assert_eq!(replace_emojis("¿Ayuno? sí, mañana"), "¿Ayuno? sí, mañana");
        assert_eq!(
            tokenize(&replace_emojis("Me encanta❤️")),
            vec!["me", "encanta", ":heart:"]
        );
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("   ").is_empty());
        assert_eq!(basic_clean(""), "");
    }
}
