//! Pure renderers for generated magazines.
//!
//! Both renderers transform a validated `MagazineContent` with no side
//! effects; callers store the resulting artifact and record the `Magazine`
//! entity pointing at it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pdf;
mod text;

pub use pdf::render_pdf;
pub use text::render_text;
