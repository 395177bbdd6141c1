pub mod backtrace;
pub mod errors;
pub mod lexer;
pub mod list_file_types;
pub mod parser;
pub mod token;

pub use backtrace::{ListFileBacktrace, ListFileContext};
pub use errors::ListFileParseError;
pub use list_file_types::{ListFile, ListFileArgument, ListFileFunction};
pub use parser::{parse_file, parse_string};
