//! Testing tools for selectmirror.
//!
//! - [`MemoryDom`]: an in-memory document with native single-select
//!   semantics, usable wherever a [`Dom`](selectmirror_core::Dom) is expected
//! - [`Harness`]: fixture builder and user-interaction simulator

#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

mod harness;
mod memory_dom;

pub use harness::{FixtureOption, Harness};
pub use memory_dom::{Dispatched, MemoryDom};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Filtering follows `RUST_LOG`. Safe to call from every test; only the
/// first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
