//! Output generation for the digest.
//!
//! # Submodules
//!
//! - [`html`]: Renders parsed papers into the HTML document that is emailed
//!   (or printed with `--dry-run`)

pub mod html;
