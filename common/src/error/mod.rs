pub mod error_location;
pub mod url_error;
