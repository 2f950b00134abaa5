//! Hosts the workspace-level integration tests in `tests/`.

pub use multitest_core::*;
