//! Rule ranking and the question-compilation pipeline.
//!
//! This module is the operational core of the crate. Compiling a question is
//! a short pipeline:
//!
//! ```text
//! rules ───────── RankedRules::rank          (registry.rs, once per install)
//!                        │
//! question ── sanitize ──┼── canonicalize
//!                        │
//!                        v
//!                 compile(..) -> Matches     (pipeline.rs, once per question)
//!                   - tag on first pull
//!                   - try rules in rank order
//!                   - yield (expression, userdata) lazily
//! ```
//!
//! The two halves deliberately have different lifetimes: a [`RankedRules`] is
//! built once when an application is installed and reused for every question,
//! while a [`Matches`] iterator is a single-use, per-question object.
//!
//! ## Ordering guarantee
//!
//! Matches are produced in strict rank order: weight descending, ties broken
//! by the order rules were supplied. A later-ranked rule is never yielded
//! before an earlier-ranked one, and rules past the consumer's last pull are
//! never evaluated at all — "first match wins" consumers stop the work early.

#[path = "engine/pipeline.rs"]
mod pipeline;
#[path = "engine/registry.rs"]
mod registry;

pub use pipeline::{Matches, compile};
pub use registry::RankedRules;
