//! Fortune-captioned cat pictures.
//!
//! The crate keeps the same split the server relies on:
//!
//! - **[`core`]**: Pure text shaping (wrapping and percent-encoding the fortune).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: The two external boundaries, the `fortune` child process and the
//!   upstream image service, each behind a trait so handlers can be tested with
//!   doubles.
//!
//! [`config`] and [`logging`] carry the startup concerns shared by binaries.

pub mod config;
pub mod core;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
