// Client-side filtering for list commands

pub mod evaluator;
pub mod parser;

pub use evaluator::*;
pub use parser::{parse_query, FilterKey, ListQuery};
