//! # Text Engine
//!
//! A cached text rendering subsystem with glyph atlas management.
//!
//! ## Features
//!
//! - **Glyph Atlas**: Pure Rust font rasterization packed into a texture atlas
//! - **Cached Layout**: Glyph positions and vertex buffers are recomputed only
//!   when the text, font, alignment, or target rectangle actually changes
//! - **Highlight Effects**: Per-glyph color blending with a smooth wrap-around
//!   falloff, for marquee and lyric-style emphasis
//! - **Backend Agnostic**: Draws are recorded into a command queue the host
//!   renderer drains each frame
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use text_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let font_bytes = std::fs::read("resources/fonts/default.ttf")?;
//!     let font: Arc<dyn FontLayout> =
//!         Arc::new(BitmapFont::new(&font_bytes, 24.0, TextureHandle(0))?);
//!
//!     let mut label = CachedText::new();
//!     label.set_font(&font);
//!     label.set_text("Hello, world!");
//!
//!     let mut queue = DrawQueue::new();
//!     label.draw(&mut queue, Rect::new(0.0, 0.0, 320.0, 48.0), Color::WHITE);
//!     // Hand queue.drain() to the renderer backend
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::foundation::{
        color::Color,
        math::{Rect, Vec2},
    };
    pub use crate::render::{
        draw_queue::{DrawQueue, TextDrawCommand},
        text::{
            AtlasStamp, BitmapFont, CachedText, CoordsBuffer, FontError, FontLayout, FontResult,
            TextAlign, TextureHandle,
        },
    };
}
