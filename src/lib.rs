pub mod analyzers;
pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod server;
pub mod utils;

pub use error::{DashboardError, Result};
pub use processors::{ReportBuilder, ReportContext};
