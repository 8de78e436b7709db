mod config;
mod error;
mod money;
mod parser;
mod record;
mod summary;

pub use config::*;
pub use error::*;
pub use money::*;
pub use parser::*;
pub use record::*;
pub use summary::*;
