//! Framework-free export of a server-rendered site.
//!
//! Copies the build output's pages, stylesheet and media into a standalone tree
//! that works from a plain file server with no client framework.

pub mod assets;
pub mod builder;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
