//! Microsoft Graph backend for `pim-activate`.
//!
//! [`GraphClient`] implements [`pim_core::directory::PimDirectory`]: users
//! are read from Graph `v1.0`, privileged Azure resources, role definitions
//! and role assignment requests from the `beta` `privilegedAccess` API.
//! Signing in uses the OAuth 2.0 device-code flow.

mod auth;
mod client;
mod odata;

pub mod config;
pub mod error;

pub use auth::DeviceCode;
pub use client::GraphClient;
pub use config::GraphConfig;
pub use error::{Error, Result};
