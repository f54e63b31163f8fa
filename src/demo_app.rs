//! The demo application installed by the CLI: a few geography-flavored
//! rules compiling questions into a small RDF-ish vocabulary.

use querent::{
    AppBundle, BundleError, Expression, Rule, Semantics, SerializerModule, SettingsNamespace,
    TaggedToken, Term, rule,
};

pub struct DemoApp;

fn first_proper_noun(words: &[TaggedToken]) -> Option<&TaggedToken> {
    words.iter().find(|w| w.pos == "NNP")
}

fn first_common_noun(words: &[TaggedToken]) -> Option<&TaggedToken> {
    words.iter().find(|w| w.pos == "NN" || w.pos == "NNS")
}

fn demo_rules() -> Vec<Rule> {
    vec![
        rule! {
            name: "who_is",
            weight: 20,
            semantics: |words: &[TaggedToken]| {
                if words.first()?.lemma != "who" {
                    return None;
                }
                let person = first_proper_noun(words)?;
                let expression = Expression::new()
                    .triple(Term::data(&person.token), "definition", Term::var("x0"))
                    .target("x0");
                Some((expression, Some(format!("person={}", person.token))))
            },
        },
        rule! {
            name: "capital_of",
            weight: 10,
            semantics: |words: &[TaggedToken]| {
                words.iter().any(|w| w.lemma == "capital").then_some(())?;
                let country = first_proper_noun(words)?;
                let expression = Expression::new()
                    .triple(Term::var("x0"), "is-capital-of", Term::data(&country.token))
                    .target("x0");
                Some((expression, None))
            },
        },
        rule! {
            name: "population_of",
            weight: 10,
            semantics: |words: &[TaggedToken]| {
                words.iter().any(|w| w.lemma == "population").then_some(())?;
                let place = first_proper_noun(words)?;
                let expression = Expression::new()
                    .triple(Term::data(&place.token), "population", Term::var("x0"))
                    .target("x0");
                Some((expression, None))
            },
        },
        rule! {
            name: "what_is",
            weight: 1,
            semantics: |words: &[TaggedToken]| {
                if words.first()?.lemma != "what" {
                    return None;
                }
                let thing = first_proper_noun(words).or_else(|| first_common_noun(words))?;
                let expression = Expression::new()
                    .triple(Term::data(&thing.lemma), "definition", Term::var("x0"))
                    .target("x0");
                Some((expression, None))
            },
        },
    ]
}

impl AppBundle for DemoApp {
    fn name(&self) -> &str {
        "atlas-demo"
    }

    fn settings(&self) -> Result<SettingsNamespace, BundleError> {
        Ok(SettingsNamespace::new()
            .text("SPARQL_PREAMBLE", "PREFIX atlas: <http://example.org/atlas#>")
            .text("LANGUAGE", "en"))
    }

    fn rules(&self) -> Result<Vec<Rule>, BundleError> {
        Ok(demo_rules())
    }

    fn semantics(&self) -> Result<Semantics, BundleError> {
        Ok(Semantics {
            relations: vec!["is-capital-of".into(), "population".into(), "definition".into()],
        })
    }

    fn serializers(&self) -> Result<Option<SerializerModule>, BundleError> {
        // The bundled sparql/dot serializers are enough for the demo.
        Ok(None)
    }
}
