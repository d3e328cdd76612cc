pub use crate::diagnostics::{CollectingSink, DiagnosticSink, ParseDiagnostic};
pub use crate::errors::{ErrorKind, QuillError, SourceContext};
pub use crate::parser::{parse_script, CommandNode, CommandParams, ParseSession};
pub use crate::registry::CommandRegistry;

pub mod cli;
pub mod diagnostics;
pub mod errors;
pub mod lines;
pub mod parser;
pub mod registry;
pub mod scan;
