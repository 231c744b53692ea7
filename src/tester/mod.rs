pub mod json_tester;

pub use json_tester::JsonTester;
