pub mod application;
pub mod cli;
pub mod convert;
pub mod domain;
pub mod io;
pub mod storage;

pub use domain::*;
pub use storage::Repository;
