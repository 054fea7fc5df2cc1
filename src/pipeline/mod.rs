// Core pipeline: validate → summarize → flatten → aggregate

pub mod aggregate;
pub mod flatten;
pub mod report;
pub mod runner;
pub mod validate;

pub use aggregate::aggregate;
pub use flatten::flatten;
pub use report::summarize;
pub use runner::{process_batch, BatchResult};
pub use validate::validate;
