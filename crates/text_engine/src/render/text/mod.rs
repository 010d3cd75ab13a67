//! Text rendering system
//!
//! Glyph atlas management, text layout, and cached text drawing.

pub mod align;
pub mod cached_text;
pub mod coords_buffer;
pub mod font_atlas;
pub mod layout;

pub use align::*;
pub use cached_text::*;
pub use coords_buffer::*;
pub use font_atlas::*;
pub use layout::*;
