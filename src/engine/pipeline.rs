//! Question compilation: sanitize, canonicalize, tag, match in rank order.

use tracing::{debug, warn};

use crate::encoding;
use crate::engine::RankedRules;
use crate::tagger::{TaggedToken, Tagger};
use crate::{Expression, Userdata};

/// Escape embedded quotes so serializers can splice the question text into
/// generated query syntax without terminating a quoted literal.
pub(crate) fn sanitize_question(question: &str) -> String {
    question.replace('\'', "\\'").replace('"', "\\\"")
}

/// Compile `question` into a lazy sequence of `(expression, userdata)` pairs.
///
/// Sanitization and canonicalization happen here, once. Tagging is deferred
/// to the first pull, and each rule is only consulted when the consumer asks
/// for the next match — a consumer that stops after the first match never
/// pays for the rules ranked below it.
pub fn compile<'a>(question: &str, rules: &'a RankedRules, tagger: &'a dyn Tagger) -> Matches<'a> {
    let question = sanitize_question(question);
    let question = encoding::canonicalize(&question).into_owned();
    Matches { question, rules, tagger, state: State::Untagged }
}

enum State {
    Untagged,
    Matching { words: Vec<TaggedToken>, next_rule: usize },
    Exhausted,
}

/// Lazy iterator over the matches for one question. Single-use; build a
/// fresh one per question via [`compile`].
pub struct Matches<'a> {
    question: String,
    rules: &'a RankedRules,
    tagger: &'a dyn Tagger,
    state: State,
}

impl Matches<'_> {
    fn tag_question(&self) -> Option<Vec<TaggedToken>> {
        match self.tagger.tag(&self.question) {
            Ok(words) => {
                if tracing::enabled!(tracing::Level::DEBUG) {
                    let dump: Vec<String> = words.iter().map(|w| format!("\t{w}")).collect();
                    debug!("tagged question:\n{}", dump.join("\n"));
                }
                Some(words)
            }
            Err(error) => {
                warn!(question = %self.question, %error, "cannot parse tagger output");
                None
            }
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = (Expression, Userdata);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Exhausted) {
                State::Untagged => {
                    if let Some(words) = self.tag_question() {
                        self.state = State::Matching { words, next_rule: 0 };
                    }
                }
                State::Matching { words, mut next_rule } => {
                    while let Some(rule) = self.rules.as_slice().get(next_rule) {
                        next_rule += 1;
                        if let Some((expression, userdata)) = rule.semantics(&words) {
                            debug!(rule = rule.name, ?expression, "semantics matched");
                            self.state = State::Matching { words, next_rule };
                            return Some((expression, userdata));
                        }
                    }
                }
                State::Exhausted => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::tagger::{LexiconTagger, TaggingError};
    use crate::{Expression, Rule};

    struct FailingTagger;

    impl Tagger for FailingTagger {
        fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TaggingError> {
            Err(TaggingError::MalformedOutput(text.to_string()))
        }
    }

    fn match_all(name: &'static str, weight: i32) -> Rule {
        Rule::new(name, weight, |_| Some((Expression::new(), None)))
    }

    fn match_none(name: &'static str, weight: i32) -> Rule {
        Rule::new(name, weight, |_| None)
    }

    #[test]
    fn sanitize_escapes_embedded_quotes() {
        assert_eq!(sanitize_question(r#"He said "hi""#), r#"He said \"hi\""#);
        assert_eq!(sanitize_question("France's capital"), r"France\'s capital");
    }

    #[test]
    fn matches_come_out_in_rank_order() {
        let rules = RankedRules::rank(vec![match_all("low", 5), match_all("high", 20)]);
        let tagger = LexiconTagger::new();

        let produced: Vec<_> = compile("Who is the president?", &rules, &tagger)
            .map(|(expression, _)| expression.rule_used.unwrap())
            .collect();
        assert_eq!(produced, vec!["high", "low"]);
    }

    #[test]
    fn non_matching_rules_contribute_nothing() {
        let rules =
            RankedRules::rank(vec![match_none("a", 10), match_all("b", 5), match_none("c", 1)]);
        let tagger = LexiconTagger::new();

        let produced: Vec<_> = compile("anything", &rules, &tagger)
            .map(|(expression, _)| expression.rule_used.unwrap())
            .collect();
        assert_eq!(produced, vec!["b"]);
    }

    #[test]
    fn tagging_failure_yields_an_empty_sequence() {
        let rules = RankedRules::rank(vec![match_all("any", 1)]);
        let tagger = FailingTagger;
        let mut matches = compile("unparseable", &rules, &tagger);
        assert!(matches.next().is_none());
        assert!(matches.next().is_none());
    }

    #[test]
    fn rules_after_the_last_pull_are_never_evaluated() {
        let calls = Arc::new(AtomicUsize::new(0));

        let counting = |name: &'static str, weight: i32, hit: bool| {
            let calls = Arc::clone(&calls);
            Rule::new(name, weight, move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                hit.then(|| (Expression::new(), None))
            })
        };

        let rules = RankedRules::rank(vec![
            counting("first", 30, false),
            counting("second", 20, true),
            counting("third", 10, true),
        ]);
        let tagger = LexiconTagger::new();

        let first = compile("a question", &rules, &tagger).next();
        assert_eq!(first.unwrap().0.rule_used, Some("second"));
        // "first" missed, "second" matched, "third" was never consulted.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn each_compile_is_a_fresh_sequence() {
        let rules = RankedRules::rank(vec![match_all("only", 1)]);
        let tagger = LexiconTagger::new();

        assert_eq!(compile("one", &rules, &tagger).count(), 1);
        assert_eq!(compile("two", &rules, &tagger).count(), 1);
    }
}
