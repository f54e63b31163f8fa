//! Tagger adapter: turns question text into a sequence of tagged tokens.
//!
//! The linguistic model behind tagging is not this crate's business; rules
//! only see [`TaggedToken`]s. The [`Tagger`] trait is the seam where a real
//! part-of-speech tagger plugs in, and [`LexiconTagger`] is the built-in
//! implementation: a closed-class lexicon plus a handful of form heuristics,
//! producing Penn-treebank-style tags. It is deliberately crude — rules that
//! need more than coarse word classes should ship their own tagger.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use thiserror::Error;

/// A word annotated with part-of-speech and lemma metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    /// Surface form as it appeared in the question.
    pub token: String,
    /// Normalized dictionary form.
    pub lemma: String,
    /// Penn-treebank-style part-of-speech tag.
    pub pos: String,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, lemma: impl Into<String>, pos: impl Into<String>) -> Self {
        TaggedToken { token: token.into(), lemma: lemma.into(), pos: pos.into() }
    }
}

impl fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.token, self.lemma, self.pos)
    }
}

#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("tagger produced no tokens")]
    EmptyOutput,
    #[error("cannot parse tagger output: {0}")]
    MalformedOutput(String),
}

/// A tagging capability. Implementations must be deterministic for a fixed
/// input; a failure is per-question and recoverable for the caller.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TaggingError>;
}

/// The tagger used when an application does not supply its own.
pub fn default_tagger() -> Box<dyn Tagger> {
    Box::new(LexiconTagger::new())
}

// --- Built-in lexicon tagger ------------------------------------------------

static CLOSED_CLASS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // wh-words
        ("what", "WP"),
        ("who", "WP"),
        ("whom", "WP"),
        ("whose", "WP$"),
        ("which", "WDT"),
        ("where", "WRB"),
        ("when", "WRB"),
        ("why", "WRB"),
        ("how", "WRB"),
        // determiners
        ("the", "DT"),
        ("a", "DT"),
        ("an", "DT"),
        ("this", "DT"),
        ("that", "DT"),
        ("these", "DT"),
        ("those", "DT"),
        ("each", "DT"),
        ("every", "DT"),
        ("some", "DT"),
        ("any", "DT"),
        ("no", "DT"),
        // prepositions
        ("of", "IN"),
        ("in", "IN"),
        ("on", "IN"),
        ("at", "IN"),
        ("by", "IN"),
        ("for", "IN"),
        ("with", "IN"),
        ("from", "IN"),
        ("to", "TO"),
        ("about", "IN"),
        ("over", "IN"),
        ("under", "IN"),
        ("between", "IN"),
        // conjunctions
        ("and", "CC"),
        ("or", "CC"),
        ("but", "CC"),
        // pronouns
        ("i", "PRP"),
        ("you", "PRP"),
        ("he", "PRP"),
        ("she", "PRP"),
        ("it", "PRP"),
        ("we", "PRP"),
        ("they", "PRP"),
        ("me", "PRP"),
        ("him", "PRP"),
        ("her", "PRP$"),
        ("us", "PRP"),
        ("them", "PRP"),
        ("my", "PRP$"),
        ("your", "PRP$"),
        ("his", "PRP$"),
        ("its", "PRP$"),
        ("our", "PRP$"),
        ("their", "PRP$"),
        // auxiliaries and modals
        ("is", "VBZ"),
        ("are", "VBP"),
        ("am", "VBP"),
        ("was", "VBD"),
        ("were", "VBD"),
        ("be", "VB"),
        ("been", "VBN"),
        ("being", "VBG"),
        ("do", "VBP"),
        ("does", "VBZ"),
        ("did", "VBD"),
        ("have", "VBP"),
        ("has", "VBZ"),
        ("had", "VBD"),
        ("will", "MD"),
        ("would", "MD"),
        ("can", "MD"),
        ("could", "MD"),
        ("shall", "MD"),
        ("should", "MD"),
        ("may", "MD"),
        ("might", "MD"),
        ("must", "MD"),
        // misc
        ("not", "RB"),
        ("there", "EX"),
    ])
});

/// Lexicon-and-heuristics tagger.
#[derive(Debug, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        LexiconTagger
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TaggingError> {
        let token_re = regex!(r"[A-Za-z]+(?:'[A-Za-z]+)?|\d+(?:[.,]\d+)*|[^\sA-Za-z0-9]");

        let mut words = Vec::new();
        for (index, m) in token_re.find_iter(text).enumerate() {
            let token = m.as_str();
            let pos = classify(token, index == 0);
            let lemma = lemmatize(token, pos);
            words.push(TaggedToken::new(token, lemma, pos));
        }

        if words.is_empty() {
            return Err(TaggingError::EmptyOutput);
        }
        Ok(words)
    }
}

fn classify(token: &str, sentence_initial: bool) -> &'static str {
    let lower = token.to_lowercase();
    if let Some(&tag) = CLOSED_CLASS.get(lower.as_str()) {
        return tag;
    }

    let mut chars = token.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return "NN",
    };

    if first.is_ascii_digit() {
        return "CD";
    }
    if !first.is_alphanumeric() {
        return match first {
            '.' | '?' | '!' => ".",
            ',' => ",",
            _ => "SYM",
        };
    }

    if lower.ends_with("ly") {
        return "RB";
    }
    if lower.ends_with("ing") && lower.len() > 4 {
        return "VBG";
    }
    if lower.ends_with("ed") && lower.len() > 3 {
        return "VBD";
    }
    if first.is_uppercase() && !sentence_initial {
        return "NNP";
    }
    if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
        return "NNS";
    }
    "NN"
}

fn lemmatize(token: &str, pos: &str) -> String {
    let lower = token.to_lowercase();
    if pos == "NNS" {
        if let Some(stem) = lower.strip_suffix("ies") {
            return format!("{stem}y");
        }
        if let Some(stem) = lower.strip_suffix('s') {
            return stem.to_string();
        }
    }
    lower
}
