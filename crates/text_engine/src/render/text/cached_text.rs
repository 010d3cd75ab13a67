//! Cached text drawing
//!
//! A stateful text value that caches glyph layout and filled vertex buffers
//! between draws. Mutators recompute glyph positions eagerly so the measured
//! size is available immediately; the screen-space vertex buffer is keyed by
//! the last draw rectangle and refilled only when the rectangle or the font's
//! atlas generation changes.

use std::f32::consts::PI;
use std::sync::Arc;

use super::align::TextAlign;
use super::coords_buffer::CoordsBuffer;
use super::font_atlas::{AtlasStamp, FontLayout};
use crate::foundation::color::Color;
use crate::foundation::math::{Rect, Vec2};
use crate::render::draw_queue::DrawQueue;

/// Text value with cached glyph layout and vertex data
///
/// Owned by whatever UI element displays the text. The font is shared: many
/// cached texts may hold the same [`FontLayout`] provider. Draws degrade to
/// silent no-ops until a font is set.
pub struct CachedText {
    text: String,
    font: Option<Arc<dyn FontLayout>>,
    align: TextAlign,
    atlas_stamp: AtlasStamp,
    /// `None` means no valid vertex cache
    last_draw_rect: Option<Rect>,
    glyph_positions: Vec<Vec2>,
    measured_size: Vec2,
    coords: Arc<CoordsBuffer>,
}

impl Default for CachedText {
    fn default() -> Self {
        Self::new()
    }
}

impl CachedText {
    /// Create an empty cached text with no font
    pub fn new() -> Self {
        Self {
            text: String::new(),
            font: None,
            align: TextAlign::default(),
            atlas_stamp: AtlasStamp::default(),
            last_draw_rect: None,
            glyph_positions: Vec::new(),
            measured_size: Vec2::zeros(),
            coords: Arc::new(CoordsBuffer::new()),
        }
    }

    /// Current text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current alignment
    pub fn align(&self) -> TextAlign {
        self.align
    }

    /// Measured intrinsic size of the laid-out text
    ///
    /// Valid immediately after any mutator call.
    pub fn size(&self) -> Vec2 {
        self.measured_size
    }

    /// The font this text is laid out with, if one is set
    pub fn font(&self) -> Option<&Arc<dyn FontLayout>> {
        self.font.as_ref()
    }

    /// Replace the font
    ///
    /// No-op when `font` is the same shared provider already in use.
    pub fn set_font(&mut self, font: &Arc<dyn FontLayout>) {
        if let Some(current) = &self.font {
            if Arc::ptr_eq(current, font) {
                return;
            }
        }

        self.font = Some(Arc::clone(font));
        self.update();
    }

    /// Replace the text content
    ///
    /// No-op when `text` equals the current content.
    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }

        self.text = text.to_owned();
        self.update();
    }

    /// Replace the alignment
    ///
    /// No-op when unchanged.
    pub fn set_align(&mut self, align: TextAlign) {
        if self.align == align {
            return;
        }

        self.align = align;
        self.update();
    }

    /// Recompute glyph positions and measured size for the current state
    ///
    /// Layout is intrinsic (independent of any draw rectangle). The vertex
    /// cache is always invalidated, so the next draw refills its buffer even
    /// at an unchanged rectangle.
    pub fn update(&mut self) {
        if let Some(font) = &self.font {
            let (positions, size) = font.intrinsic_layout(&self.text, self.align);
            self.glyph_positions = positions;
            self.measured_size = size;
        }

        self.last_draw_rect = None;
    }

    /// Word-wrap the current text to `max_width`
    ///
    /// Replaces the content with the font's wrapped transform, with the same
    /// invalidation as [`Self::set_text`]. No-op without a font.
    pub fn wrap_text(&mut self, max_width: f32) {
        let Some(font) = self.font.clone() else {
            return;
        };

        self.text = font.wrap_to_width(&self.text, max_width);
        self.update();
    }

    /// Draw the text into `rect` with a single color
    ///
    /// The filled vertex buffer is reused as long as `rect` and the font's
    /// atlas generation are unchanged. No-op without a font.
    pub fn draw(&mut self, queue: &mut DrawQueue, rect: Rect, color: Color) {
        let Some(font) = self.font.clone() else {
            return;
        };

        // The atlas may repack underneath us; stale texture coordinates force
        // a refill even when the rectangle is unchanged.
        let stamp = font.atlas_stamp();
        if stamp != self.atlas_stamp {
            self.atlas_stamp = stamp;
            self.last_draw_rect = None;
        }

        if self.last_draw_rect != Some(rect) {
            self.last_draw_rect = Some(rect);
            font.fill_screen_coords(
                Arc::make_mut(&mut self.coords),
                &self.text,
                self.measured_size,
                self.align,
                rect,
                &self.glyph_positions,
            );
        }

        queue.submit(font.texture_handle(), Arc::clone(&self.coords), color);
    }

    /// Draw the text with a positional highlight sweeping over the glyphs
    ///
    /// Each glyph blends `base_color` toward `highlight_color` by its
    /// proximity to `highlight_pos` in glyph-index space. The distance is
    /// circular: the highlight wraps past the end of the text back to the
    /// start, so a continuously advancing position produces a looping sweep.
    /// Glyphs farther than `highlight_width` keep the base color; a width of
    /// zero or less highlights nothing. No-op without a font or with empty
    /// text.
    ///
    /// This path batches one buffer per distinct blended color and does not
    /// touch the single-color vertex cache.
    pub fn draw_with_highlight(
        &mut self,
        queue: &mut DrawQueue,
        rect: Rect,
        base_color: Color,
        highlight_color: Color,
        highlight_pos: f32,
        highlight_width: f32,
    ) {
        let Some(font) = self.font.clone() else {
            return;
        };
        if self.text.is_empty() {
            return;
        }

        let stamp = font.atlas_stamp();
        if stamp != self.atlas_stamp {
            // Positions recomputed below are atlas-independent and the
            // per-color buffers are refilled every call, so only the stamp
            // needs refreshing here.
            self.atlas_stamp = stamp;
        }

        if self.last_draw_rect != Some(rect) {
            self.last_draw_rect = Some(rect);
            let (positions, _) = font.intrinsic_layout(&self.text, self.align);
            self.glyph_positions = positions;
        }

        let glyph_count = self.text.chars().count();
        if glyph_count == 0 {
            return;
        }
        let len = glyph_count as f32;

        // Wrap the highlight position into [0, len)
        let mut highlight_pos = highlight_pos;
        while highlight_pos < 0.0 {
            highlight_pos += len;
        }
        while highlight_pos >= len {
            highlight_pos -= len;
        }

        let mut glyph_colors = Vec::with_capacity(glyph_count);
        for index in 0..glyph_count {
            // Circular distance: the shorter of the direct and wrap-around
            // paths between this glyph and the highlight center
            let direct = (index as f32 - highlight_pos).abs();
            let dist = direct.min(len - direct);

            let t = if dist < highlight_width {
                // Raised-cosine falloff: 1 at the center, 0 at the window edge
                ((dist / highlight_width * PI).cos() + 1.0) / 2.0
            } else {
                0.0
            };

            glyph_colors.push((index, base_color.mix(highlight_color, t)));
        }

        let color_coords = font.fill_color_coords(
            &self.text,
            &glyph_colors,
            self.measured_size,
            self.align,
            rect,
            &self.glyph_positions,
        );

        let texture = font.texture_handle();
        for (color, coords) in color_coords {
            queue.submit(texture, Arc::new(coords), color);
        }
    }
}

impl std::fmt::Debug for CachedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedText")
            .field("text", &self.text)
            .field("align", &self.align)
            .field("has_font", &self.font.is_some())
            .field("measured_size", &self.measured_size)
            .field("last_draw_rect", &self.last_draw_rect)
            .finish()
    }
}
