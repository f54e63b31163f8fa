//! Serializer modules and the two-tier resolver.
//!
//! A serializer turns one [`Expression`] into query text for one target
//! language. Serializers live in a [`SerializerModule`] under the symbol
//! `expression_to_<lang>`; resolution prefers the application's module and
//! falls back to the bundled default module, which knows `sparql` and `dot`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use once_cell::sync::Lazy;

use crate::expression::{Expression, Term};
use crate::settings::{self, SettingValue};

/// Serializes one expression into one target-language query string.
/// Must be deterministic and side-effect-free.
pub type SerializerFn = fn(&Expression) -> String;

/// A named collection of serializer functions.
#[derive(Debug, Clone, Default)]
pub struct SerializerModule {
    symbols: BTreeMap<String, SerializerFn>,
}

impl SerializerModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a serializer for `query_lang` under the conventional
    /// `expression_to_<lang>` symbol.
    pub fn register(&mut self, query_lang: &str, serializer: SerializerFn) -> &mut Self {
        self.symbols.insert(symbol_for(query_lang), serializer);
        self
    }

    fn lookup(&self, symbol: &str) -> Option<SerializerFn> {
        self.symbols.get(symbol).copied()
    }
}

fn symbol_for(query_lang: &str) -> String {
    format!("expression_to_{}", query_lang.to_lowercase())
}

/// Find a serializer for `query_lang`: the application module first, then
/// the global default module. `None` when neither exposes the symbol.
pub(crate) fn resolve(
    query_lang: &str,
    app_module: Option<&SerializerModule>,
    global_module: &SerializerModule,
) -> Option<SerializerFn> {
    let symbol = symbol_for(query_lang);
    app_module.and_then(|module| module.lookup(&symbol)).or_else(|| global_module.lookup(&symbol))
}

pub(crate) fn default_module() -> &'static SerializerModule {
    static DEFAULT: Lazy<SerializerModule> = Lazy::new(|| {
        let mut module = SerializerModule::new();
        module.register("sparql", expression_to_sparql);
        module.register("dot", expression_to_dot);
        module
    });
    &DEFAULT
}

// --- Bundled serializers ----------------------------------------------------

fn sparql_term(term: &Term) -> String {
    match term {
        Term::Var(name) => format!("?{name}"),
        Term::Data(value) => format!("\"{value}\""),
        Term::Iri(value) => format!("<{value}>"),
    }
}

/// Render an expression as a SPARQL `SELECT`.
///
/// When the shared setting `SPARQL_PREAMBLE` is present it is emitted ahead
/// of the query, which is how applications inject `PREFIX` declarations.
pub fn expression_to_sparql(expression: &Expression) -> String {
    let mut query = String::new();
    if let Some(SettingValue::Text(preamble)) = settings::get("SPARQL_PREAMBLE") {
        query.push_str(&preamble);
        query.push('\n');
    }

    match expression.target_var() {
        Some(var) => {
            let _ = writeln!(query, "SELECT DISTINCT ?{var} WHERE {{");
        }
        None => query.push_str("SELECT DISTINCT * WHERE {\n"),
    }
    for triple in expression.triples() {
        let _ = writeln!(
            query,
            "  {} {} {} .",
            sparql_term(&triple.subject),
            triple.relation,
            sparql_term(&triple.object),
        );
    }
    query.push('}');
    query
}

fn dot_node(term: &Term) -> String {
    match term {
        Term::Var(name) => format!("\"?{name}\""),
        Term::Data(value) | Term::Iri(value) => format!("{value:?}"),
    }
}

/// Render an expression as a Graphviz digraph, for inspecting what a rule
/// compiled a question into.
pub fn expression_to_dot(expression: &Expression) -> String {
    let mut out = String::from("digraph expression {\n");
    for triple in expression.triples() {
        let _ = writeln!(
            out,
            "  {} -> {} [label=\"{}\"];",
            dot_node(&triple.subject),
            dot_node(&triple.object),
            triple.relation,
        );
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Term;

    fn capital_expression() -> Expression {
        Expression::new()
            .triple(Term::var("x0"), "is-capital-of", Term::data("France"))
            .target("x0")
    }

    #[test]
    fn resolution_prefers_the_application_module() {
        fn app_sparql(_: &Expression) -> String {
            "app".into()
        }

        let mut app = SerializerModule::new();
        app.register("sparql", app_sparql);

        let resolved = resolve("sparql", Some(&app), default_module()).unwrap();
        assert_eq!(resolved(&capital_expression()), "app");

        // Other languages still fall back to the default module.
        assert!(resolve("dot", Some(&app), default_module()).is_some());
    }

    #[test]
    fn resolution_is_case_insensitive_on_the_language_name() {
        assert!(resolve("SPARQL", None, default_module()).is_some());
    }

    #[test]
    fn unknown_language_does_not_resolve() {
        assert!(resolve("cypher", None, default_module()).is_none());
    }

    #[test]
    fn sparql_renders_target_and_triples() {
        let query = expression_to_sparql(&capital_expression());
        assert!(query.contains("SELECT DISTINCT ?x0 WHERE {"));
        assert!(query.contains("?x0 is-capital-of \"France\" ."));
        assert!(query.ends_with('}'));
    }

    #[test]
    fn dot_renders_an_edge_per_triple() {
        let out = expression_to_dot(&capital_expression());
        assert!(out.starts_with("digraph expression {"));
        assert!(out.contains("\"?x0\" -> \"France\" [label=\"is-capital-of\"];"));
    }
}
