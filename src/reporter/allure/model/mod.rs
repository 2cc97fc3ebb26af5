pub mod status;
pub mod test_result;
