//! Synthetic therapeutic drug monitoring (TDM) data and the interactive
//! HTML charts and dashboard built from it.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod logging;

pub use config::EdaConfig;
pub use dashboard::{generate, Artifact, DashboardReport};
pub use data::{Dataset, Synthesizer, TdmRecord};
