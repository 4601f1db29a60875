//! Core types and the activation driver for `pim-activate`.
//!
//! This crate is deliberately free of HTTP dependencies. The directory / PIM
//! service is reached only through the [`directory::PimDirectory`] trait;
//! `pim-graph` provides the Microsoft Graph implementation.

pub mod directory;
pub mod driver;
pub mod error;
pub mod model;
pub mod request;
pub mod schedule;
pub mod single;

pub use error::{Error, Result};
