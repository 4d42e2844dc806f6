mod allowlist;
mod classification;
mod command;
mod money;
mod report;
mod transaction;

pub use allowlist::*;
pub use classification::*;
pub use command::*;
pub use money::*;
pub use report::*;
pub use transaction::*;
