//! Markup transforms for the vanilla export.
//!
//! Each stage works on the raw document text and returns the whole document,
//! leaving markup outside the regions it touches byte-for-byte intact.

pub mod contact;
pub mod faq;
pub mod html;
pub mod mount;
pub mod pipeline;
pub mod reviews;
pub mod rewrite;
pub mod route;
pub mod strip;
pub mod templates;
pub mod traits;

pub use contact::ContactPatcher;
pub use faq::FaqPatcher;
pub use html::escape_html;
pub use mount::ensure_mount_points;
pub use pipeline::{PageOutput, Pipeline};
pub use reviews::{filled_stars, initials, ReviewsPatcher};
pub use rewrite::{inject_assets, rewrite_root_relative};
pub use route::Route;
pub use strip::{strip_runtime, strip_stylesheets};
pub use templates::Templates;
pub use traits::{PagePatcher, PatchContext, PatchError};
