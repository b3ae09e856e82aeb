pub mod ast;
pub mod catalog;
pub mod compiler;
pub mod key_map;
pub mod key_validator;
pub mod message_set;
pub mod report;
pub mod types;

pub use ast::Node;
pub use catalog::{Config, LoadError, RenderError, TemplateError, TemplateStore};
pub use compiler::{
    Compilation, CompileError, CompileOptions, LookupResolver, MessageCompiler,
    compute_suggestions,
};
pub use key_map::{Key, KeyMap};
pub use key_validator::KeyValidator;
pub use message_set::{MessageMap, MessageNode, MessageSet, View};
pub use report::Report;
pub use types::{
    Disjunction, Entry, Message, MessageKind, MultiPath, Outcome, Path, PathSegment, SinglePath,
    Value,
};

/// Creates a predicate argument list from name/value pairs.
///
/// Values are converted via `Into<Value>`, so integers, strings, ranges or
/// lists can be passed directly. Order is preserved.
///
/// # Example
///
/// ```
/// use errata::args;
///
/// let a = args! { "num" => 18, "input" => 12 };
/// assert_eq!(a.len(), 2);
/// assert_eq!(a[0].0, "num");
/// assert_eq!(a[1].1.as_number(), Some(12));
/// ```
#[macro_export]
macro_rules! args {
    {} => {
        ::std::vec::Vec::<(String, $crate::Value)>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        ::std::vec![
            $(
                ($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value)),
            )+
        ]
    };
}
