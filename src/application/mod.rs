// Application layer - loading the ledger, running the pipeline, building reports

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
