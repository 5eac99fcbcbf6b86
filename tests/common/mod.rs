//! Common test utilities for asc-submit tests

pub mod fixtures;
pub mod mock_gateway;

// Re-exports for convenience - not all test binaries use all exports
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_gateway::MockGateway;
