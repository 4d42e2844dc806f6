// Application layer - configuration, errors and the command orchestration
// that ties parsing, authorization, conversion and storage together.

pub mod config;
pub mod error;
pub mod service;

pub use config::*;
pub use error::*;
pub use service::*;
