//! Paid-leave engine for French childminder (assistante maternelle) contracts
//!
//! This crate derives, from stored calendar facts and time-versioned
//! contract settings, the paid-leave entitlement of a contract, its
//! consumption, its valuation (maintenance of salary vs one tenth) and the
//! regularization owed when historical facts change.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use engine::{compute_period, compute_year, regularize};
