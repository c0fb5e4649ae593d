//! Text layout: page geometry, line wrapping and pagination.

mod geometry;
mod paginate;
mod wrap;

pub use geometry::PageGeometry;
pub use paginate::{page_count, paginate};
pub use wrap::{wrap_paragraph, LineWrapper};
