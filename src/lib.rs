#[macro_use]
mod macros;

mod app;
mod encoding;
mod engine;
mod expression;
mod serialize;
pub mod settings;
mod tagger;

pub use app::{
    Answer, AppBundle, Application, BundleError, DEFAULT_QUERY_LANG, InstallError, NamespaceRole,
    Queries, Semantics, install,
};
pub use encoding::{canonicalize, flexible_decode};
pub use engine::{Matches, RankedRules, compile};
pub use expression::{Expression, Term, Triple};
pub use serialize::{SerializerFn, SerializerModule, expression_to_dot, expression_to_sparql};
pub use settings::{SettingValue, SettingsNamespace};
pub use tagger::{LexiconTagger, TaggedToken, Tagger, TaggingError, default_tagger};

// --- Core rule types --------------------------------------------------------

/// Free-form metadata a rule author attaches to a match; passed through
/// untouched to the consumer.
pub type Userdata = Option<String>;

/// A rule's matching operation: inspects the tagged question and either
/// contributes one semantic expression (plus userdata) or declines.
pub type Matcher = Box<dyn Fn(&[TaggedToken]) -> Option<(Expression, Userdata)> + Send + Sync>;

/// A weighted pattern rule.
///
/// Rules are tried against every question in weight order (higher first; ties
/// keep the order in which the rules were supplied). A rule that does not
/// match returns `None` from its matcher, which is a normal outcome rather
/// than an error.
pub struct Rule {
    pub name: &'static str,
    pub weight: i32,
    matcher: Matcher,
}

impl Rule {
    pub fn new<F>(name: &'static str, weight: i32, matcher: F) -> Self
    where
        F: Fn(&[TaggedToken]) -> Option<(Expression, Userdata)> + Send + Sync + 'static,
    {
        Rule { name, weight, matcher: Box::new(matcher) }
    }

    /// Run the matcher against a tagged question.
    ///
    /// On a match, the produced expression is stamped with this rule's name
    /// so diagnostics can report which rule generated a query.
    pub fn semantics(&self, words: &[TaggedToken]) -> Option<(Expression, Userdata)> {
        let (mut expression, userdata) = (self.matcher)(words)?;
        expression.rule_used = Some(self.name);
        Some((expression, userdata))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("matcher", &"<function>")
            .finish()
    }
}
