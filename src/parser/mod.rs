pub mod entry_factory;
pub mod filter_node;
pub mod filter_parser;
pub mod term;

pub use entry_factory::create_entry;
pub use filter_node::FilterNode;
pub use filter_parser::parse_filter;
pub use term::{parse_term, TermSpec};
