//! asc-submit - Automated App Store review submission
//!
//! Library for promoting a TestFlight build to an App Store version and
//! submitting it for review through the App Store Connect API.

pub mod auth;
pub mod connect;
pub mod error;
pub mod submit;
pub mod types;
