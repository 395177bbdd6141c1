pub mod context;
pub mod dag_checker;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod transitive;

pub use context::{Diagnostic, EvaluationContext, Messenger};
pub use dag_checker::{DagCheckResult, DagChecker};
pub use evaluator::GenexEvaluator;
pub use parser::{contains_genex, parse_genex, GenexContent, GenexNode};
pub use transitive::TransitiveProperty;
