//! # Washbay Core
//!
//! Domain types shared by the database and API crates: the error taxonomy,
//! booking and settings models, roles and capabilities, and the
//! availability calculator.

pub mod access;
pub mod availability;
pub mod errors;
pub mod models;
