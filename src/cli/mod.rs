//! CLI command implementations

mod auth;
mod submit;

pub use auth::{run_auth_setup, run_auth_test};
pub use submit::{run_find_build, run_submit};
