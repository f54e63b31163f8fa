//! Application installation and the query facade.
//!
//! An application is described by an [`AppBundle`]: four namespaces
//! (settings, rules, semantics, and optionally serializers) plus the tagger
//! it wants to run with. [`install`] loads the bundle into an immutable
//! [`Application`], propagating its settings into the shared store first.
//!
//! The facade exposes two read operations per loaded application:
//! [`Application::get_first`] for "first match wins" consumers and
//! [`Application::get_all`] for the full lazy sequence.

use std::fmt;

use thiserror::Error;
use tracing::{debug, error};

use crate::engine::{self, RankedRules};
use crate::serialize::{self, SerializerFn, SerializerModule};
use crate::settings::{self, SettingsNamespace};
use crate::tagger::{Tagger, default_tagger};
use crate::{Rule, Userdata};

/// Query language used when the caller does not name one.
pub const DEFAULT_QUERY_LANG: &str = "sparql";

pub type BundleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which of an application's namespaces failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceRole {
    Settings,
    Rules,
    Semantics,
    Serializers,
}

impl fmt::Display for NamespaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamespaceRole::Settings => "settings",
            NamespaceRole::Rules => "rules",
            NamespaceRole::Semantics => "semantics",
            NamespaceRole::Serializers => "serializers",
        };
        f.write_str(name)
    }
}

/// A required application namespace could not be loaded. Fatal to the
/// install; nothing was partially installed.
#[derive(Debug, Error)]
#[error("error loading application namespace `{role}`: {source}")]
pub struct InstallError {
    pub role: NamespaceRole,
    #[source]
    pub source: BundleError,
}

/// The domain vocabulary an application's semantics namespace declares:
/// the relation names its rules may compile questions into.
#[derive(Debug, Clone, Default)]
pub struct Semantics {
    pub relations: Vec<String>,
}

/// The namespaces that make up one application.
///
/// `settings`, `rules` and `semantics` are required: a load failure in any
/// of them aborts installation. `serializers` is optional and a failure
/// there silently degrades to "no application-specific serializers".
pub trait AppBundle {
    fn name(&self) -> &str;

    fn settings(&self) -> Result<SettingsNamespace, BundleError>;

    fn rules(&self) -> Result<Vec<Rule>, BundleError>;

    fn semantics(&self) -> Result<Semantics, BundleError>;

    fn serializers(&self) -> Result<Option<SerializerModule>, BundleError> {
        Ok(None)
    }

    fn tagger(&self) -> Box<dyn Tagger> {
        default_tagger()
    }
}

/// Load `bundle` into a ready-to-query [`Application`].
///
/// Settings are propagated into the shared store before anything else so
/// that rules and serializers can read them from the moment they run.
pub fn install(bundle: &dyn AppBundle) -> Result<Application, InstallError> {
    let app_settings = bundle
        .settings()
        .map_err(|source| InstallError { role: NamespaceRole::Settings, source })?;
    settings::propagate(&app_settings);

    let semantics = bundle
        .semantics()
        .map_err(|source| InstallError { role: NamespaceRole::Semantics, source })?;
    debug!(app = bundle.name(), relations = semantics.relations.len(), "semantics loaded");

    let rules =
        bundle.rules().map_err(|source| InstallError { role: NamespaceRole::Rules, source })?;
    let rules = RankedRules::rank(rules);
    debug!(app = bundle.name(), rules = rules.len(), "rules ranked");

    let serializers = bundle.serializers().unwrap_or_else(|error| {
        debug!(app = bundle.name(), %error, "application serializers unavailable");
        None
    });

    Ok(Application { tagger: bundle.tagger(), rules, serializers })
}

/// One generated query.
///
/// `target` is reserved and never populated today; the triple shape is kept
/// for compatibility with consumers that expect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub target: Option<String>,
    pub query: String,
    pub userdata: Option<String>,
}

/// A loaded application: the tagger, the ranked rule list and the optional
/// application serializer module. Immutable once installed.
pub struct Application {
    tagger: Box<dyn Tagger>,
    rules: RankedRules,
    serializers: Option<SerializerModule>,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("rules", &self.rules)
            .field("serializers", &self.serializers)
            .finish_non_exhaustive()
    }
}

impl Application {
    pub fn rules(&self) -> &RankedRules {
        &self.rules
    }

    /// First matching query for `question` in the default query language.
    pub fn get_first(&self, question: &str) -> Option<Answer> {
        self.get_first_with(question, DEFAULT_QUERY_LANG)
    }

    /// First matching query for `question` in `query_lang`.
    ///
    /// Rules ranked after the first match are never evaluated.
    pub fn get_first_with(&self, question: &str, query_lang: &str) -> Option<Answer> {
        self.get_all_with(question, query_lang).next()
    }

    /// All matching queries for `question` in the default query language.
    pub fn get_all(&self, question: &str) -> Queries<'_> {
        self.get_all_with(question, DEFAULT_QUERY_LANG)
    }

    /// All matching queries for `question` in `query_lang`, lazily, in rule
    /// rank order.
    ///
    /// The serializer is resolved once per call. When no serializer exists
    /// for `query_lang` the sequence is empty and no tagging or matching
    /// work happens at all.
    pub fn get_all_with(&self, question: &str, query_lang: &str) -> Queries<'_> {
        let resolved =
            serialize::resolve(query_lang, self.serializers.as_ref(), serialize::default_module());
        let Some(serializer) = resolved else {
            error!(query_lang, "no expression serialization found");
            return Queries { inner: None };
        };

        let matches = engine::compile(question, &self.rules, self.tagger.as_ref());
        Queries { inner: Some((matches, serializer)) }
    }
}

/// Lazy sequence of [`Answer`]s for one question.
pub struct Queries<'a> {
    inner: Option<(engine::Matches<'a>, SerializerFn)>,
}

impl Iterator for Queries<'_> {
    type Item = Answer;

    fn next(&mut self) -> Option<Answer> {
        let (matches, serialize) = self.inner.as_mut()?;
        let (expression, userdata): (_, Userdata) = matches.next()?;
        let query = serialize(&expression);
        debug!(rule = expression.rule_used.unwrap_or("<unknown>"), %query, "query generated");
        Some(Answer { target: None, query, userdata })
    }
}
