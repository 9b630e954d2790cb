//! The two operational flows: `provision` (build step) and `startup` (start step).

pub mod provision;
pub mod startup;

pub use provision::{ProvisionReport, provision};
pub use startup::serve;
