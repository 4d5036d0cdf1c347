pub mod method;
pub mod options;
