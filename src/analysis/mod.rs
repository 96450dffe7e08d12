pub mod handler;
pub mod interpreter;
pub mod parse;
pub mod prompt;

pub use handler::ReportAnalyzer;
pub use interpreter::Interpreter;
pub use parse::{FallbackReason, ParseOutcome};
