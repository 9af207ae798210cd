//! Shared test fixtures and property-test strategies: a `publish = false`
//! dev-only crate other crates' `[dev-dependencies]` point at, rather than
//! every crate hand-rolling its own builders.

#[cfg(feature = "fixtures")]
pub mod fixtures;

#[cfg(feature = "proptest-strategies")]
pub mod strategies;
