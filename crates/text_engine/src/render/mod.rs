//! # Rendering System
//!
//! Backend-agnostic text rendering: draws are recorded as commands carrying a
//! texture handle, a vertex buffer, and a color, and the host renderer drains
//! the queue each frame.

pub mod draw_queue;
pub mod text;

pub use draw_queue::*;
pub use text::*;
