pub mod demo;
pub mod error;
pub mod logger;
