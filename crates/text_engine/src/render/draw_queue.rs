//! Draw-command queue
//!
//! Records textured draw submissions in order. This is the bridge between
//! text components and the low-level renderer: components push commands, the
//! backend drains them once per frame and turns them into actual draw calls.

use std::sync::Arc;

use super::text::{CoordsBuffer, TextureHandle};
use crate::foundation::color::Color;

/// A single textured draw submission
#[derive(Debug, Clone)]
pub struct TextDrawCommand {
    /// Texture atlas to sample
    pub texture: TextureHandle,
    /// Vertex and texture coordinates to draw
    pub coords: Arc<CoordsBuffer>,
    /// Uniform tint color applied to every vertex
    pub color: Color,
}

/// Queue of draw commands recorded during a frame
#[derive(Debug, Default)]
pub struct DrawQueue {
    commands: Vec<TextDrawCommand>,
}

impl DrawQueue {
    /// Create an empty draw queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a textured coordinate buffer for drawing
    ///
    /// Fire-and-forget: submission order is preserved and nothing is
    /// observable by the caller beyond the recorded command.
    pub fn submit(&mut self, texture: TextureHandle, coords: Arc<CoordsBuffer>, color: Color) {
        self.commands.push(TextDrawCommand {
            texture,
            coords,
            color,
        });
    }

    /// Get all commands recorded so far
    pub fn commands(&self) -> &[TextDrawCommand] {
        &self.commands
    }

    /// Take all recorded commands, leaving the queue empty
    pub fn drain(&mut self) -> Vec<TextDrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Discard all recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the queue holds no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_order_preserved() {
        let mut queue = DrawQueue::new();
        let coords = Arc::new(CoordsBuffer::new());

        queue.submit(TextureHandle(1), Arc::clone(&coords), Color::WHITE);
        queue.submit(TextureHandle(2), Arc::clone(&coords), Color::BLACK);

        let commands = queue.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].texture, TextureHandle(1));
        assert_eq!(commands[0].color, Color::WHITE);
        assert_eq!(commands[1].texture, TextureHandle(2));
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = DrawQueue::new();
        queue.submit(TextureHandle(1), Arc::new(CoordsBuffer::new()), Color::WHITE);

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty());
    }
}
