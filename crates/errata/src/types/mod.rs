mod disjunction;
mod message;
mod outcome;
mod path;
mod value;

pub use disjunction::{Disjunction, Entry, MultiPath, SinglePath};
pub use message::{HINT_EXCLUDED_PREDICATES, Message, MessageKind, is_hint_excluded};
pub use outcome::Outcome;
pub use path::{Path, PathSegment};
pub use value::Value;
