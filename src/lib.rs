pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod sink;
pub mod storage;
