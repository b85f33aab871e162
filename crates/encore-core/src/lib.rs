pub mod access;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod filter;
pub mod identity;
pub mod io;
pub mod metrics;
pub mod row;
pub mod session;
pub mod store;
pub mod timer;
pub mod types;
pub mod validation;

pub use error::{EncoreError, Result};
