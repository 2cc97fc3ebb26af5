pub mod model;

pub use model::status::Status;
pub use model::test_result::TestResult;
