pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod logging;
pub mod parser;
pub mod records;
pub mod registry;
pub mod tester;
pub mod utils;

// Re-export commonly used types for easier access
pub use entry::{Operator, StringMatchMode, TestEntry, Value};
pub use error::{FilterError, FilterResult};
pub use filter::{Filter, FilterOptions, Tester};
pub use parser::{parse_filter, FilterNode};
pub use registry::{TestEntryRegistrar, TestEntryRegistry};
pub use tester::JsonTester;
