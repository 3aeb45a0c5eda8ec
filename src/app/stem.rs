// src/app/stem.rs
use itertools::Itertools;
use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Lower-case the input, split it into alphanumeric word tokens, stem each
/// token and join the stems back with single spaces.
///
/// Search matches on substrings of this representation, so minor inflection
/// differences ("running" vs "run") collapse to the same text.
pub fn stem_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .map(|tok| STEMMER.stem(tok))
        .join(" ")
}

/// Stem a single word (lower-cased). Empty input stays empty.
pub fn stem_word(word: &str) -> String {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    STEMMER.stem(&trimmed.to_lowercase()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::{stem_text, stem_word};

    #[test]
    fn strips_inflection() {
        assert_eq!(stem_word("Running"), "run");
        assert_eq!(stem_word("movies"), "movi");
    }

    #[test]
    fn joins_tokens_with_single_spaces() {
        let out = stem_text("  The   running, jumping movies ");
        assert_eq!(out, "the run jump movi");
    }

    #[test]
    fn query_stem_is_substring_of_title_stem() {
        // "note" must find "Notebook" via substring containment.
        let query = stem_text("note");
        let title = stem_text("Notebook");
        assert!(title.contains(&query));
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(stem_text(""), "");
        assert_eq!(stem_text("   "), "");
        assert_eq!(stem_word(" "), "");
    }
}
