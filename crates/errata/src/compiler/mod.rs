//! Message compilation.
//!
//! This module walks a rule-evaluation result tree, resolves a catalog
//! template for every failed predicate through the lookup cascade, and
//! renders it with the predicate's arguments. Disjunctions are grouped by
//! the paths their alternatives touch.

mod error;
mod opts;
mod resolver;
mod tokens;
mod walker;

pub use error::{CompileError, compute_suggestions};
pub use opts::{VisitState, VisitorOpts};
pub use resolver::{LookupContext, LookupResolver};
pub use tokens::{INPUT_ARG, LIST_SEPARATOR, arg_type, message_tokens, val_type};
pub use walker::{Compilation, CompileOptions, KEY_PREDICATE, MessageCompiler};
