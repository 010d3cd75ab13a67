//! Font atlas and glyph layout provider
//!
//! Font loading, glyph rasterization, and GPU texture atlas packing using the
//! `fontdue` library for pure Rust font rendering, plus the [`FontLayout`]
//! trait consumed by cached text components.
//!
//! The atlas packs glyphs into a fixed-width grid. When it runs out of rows it
//! doubles in height and rescales every stored UV, which invalidates any
//! texture coordinates handed out earlier; the [`AtlasStamp`] generation token
//! lets downstream caches detect this and refill.

use std::collections::HashMap;
use std::sync::RwLock;

use fontdue::{Font, FontSettings};

use super::align::TextAlign;
use super::coords_buffer::CoordsBuffer;
use super::layout;
use crate::foundation::color::Color;
use crate::foundation::math::{Rect, Vec2};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    LoadError(String),

    /// Requested character was not found in the font atlas
    #[error("Character '{0}' not found in atlas")]
    GlyphNotFound(char),
}

/// Handle for a GPU texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Opaque generation token for an atlas packing state
///
/// Downstream caches compare stamps between draws; a changed stamp means the
/// atlas shifted its texture coordinates and previously filled buffers are
/// stale. Providers call [`AtlasStamp::bump`] whenever packed UVs move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtlasStamp(u64);

impl AtlasStamp {
    /// Advance to the next generation
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Information about a single glyph in the atlas
#[derive(Debug, Clone, Copy)]
pub struct GlyphInfo {
    /// UV coordinates in atlas texture (normalized 0.0-1.0) - top-left corner
    pub uv_min: Vec2,
    /// UV coordinates in atlas texture (normalized 0.0-1.0) - bottom-right corner
    pub uv_max: Vec2,

    /// Glyph bitmap size in pixels
    pub size: Vec2,

    /// Horizontal advance for cursor positioning
    pub advance: f32,

    /// Bearing offset from the baseline (x = left, y = bottom of bitmap)
    pub bearing: Vec2,
}

/// Glyph layout provider consumed by cached text components
///
/// A font measures and places glyphs, fills coordinate buffers for a target
/// rectangle, and reports its atlas generation and texture. Fonts are shared
/// across many text components, so implementations must be safe to call from
/// multiple threads.
pub trait FontLayout: Send + Sync {
    /// Compute per-glyph placements and the measured block size for `text`
    ///
    /// Layout is intrinsic: independent of any target rectangle. One position
    /// is returned per `char` of `text`, in order.
    fn intrinsic_layout(&self, text: &str, align: TextAlign) -> (Vec<Vec2>, Vec2);

    /// Fill `buffer` with screen-space quads for `text` placed inside `rect`
    ///
    /// `positions` is the placement hint previously produced by
    /// [`Self::intrinsic_layout`]; only absolute screen coordinates are
    /// recomputed here.
    fn fill_screen_coords(
        &self,
        buffer: &mut CoordsBuffer,
        text: &str,
        measured: Vec2,
        align: TextAlign,
        rect: Rect,
        positions: &[Vec2],
    );

    /// Fill one coordinate buffer per distinct glyph color
    ///
    /// `colors` maps glyph indices to resolved colors in ascending index
    /// order. Every rendered glyph lands in exactly one returned group;
    /// groups keep first-appearance order.
    fn fill_color_coords(
        &self,
        text: &str,
        colors: &[(usize, Color)],
        measured: Vec2,
        align: TextAlign,
        rect: Rect,
        positions: &[Vec2],
    ) -> Vec<(Color, CoordsBuffer)>;

    /// Word-wrap `text` so no line measures wider than `max_width`
    fn wrap_to_width(&self, text: &str, max_width: f32) -> String;

    /// Current atlas packing generation
    fn atlas_stamp(&self) -> AtlasStamp;

    /// GPU texture backing this font's atlas
    fn texture_handle(&self) -> TextureHandle;
}

/// Mutable atlas packing state, guarded by the font's lock
struct AtlasState {
    glyphs: HashMap<char, GlyphInfo>,
    width: u32,
    height: u32,
    /// Single-channel coverage bitmap, row-major
    bitmap: Vec<u8>,
    cell_width: u32,
    cell_height: u32,
    cursor_x: u32,
    cursor_y: u32,
    stamp: AtlasStamp,
}

/// Font atlas that manages a glyph texture and layout metadata
///
/// The atlas rasterizes glyphs from a TrueType/OpenType font using `fontdue`
/// and packs them into a single texture for efficient rendering. Printable
/// ASCII is rasterized up front; other characters are added on demand, which
/// may grow the atlas and bump its stamp.
pub struct BitmapFont {
    /// Underlying fontdue font
    font: Font,

    /// Font size in pixels
    font_size: f32,

    /// Baseline distance from the top of a line cell
    ascent: f32,

    /// Distance between line tops
    line_height: f32,

    /// Handle to the GPU texture this atlas is uploaded to
    texture: TextureHandle,

    /// Packing state, shared between readers on the draw path and the
    /// on-demand rasterizer
    atlas: RwLock<AtlasState>,
}

const ASCII_START: u32 = 32; // Space character
const ASCII_END: u32 = 126; // Tilde character

const ATLAS_WIDTH: u32 = 1024;
const GLYPHS_PER_ROW: u32 = 16;

impl BitmapFont {
    /// Create a new font atlas from TrueType/OpenType font data
    ///
    /// Rasterizes all printable ASCII characters (32-126) and packs them into
    /// the atlas grid. `texture` is the handle the host renderer associates
    /// with the uploaded atlas image (see [`Self::atlas_rgba`]).
    ///
    /// # Errors
    ///
    /// Returns [`FontError::LoadError`] when `font_data` is not a parseable
    /// font file.
    pub fn new(font_data: &[u8], font_size: f32, texture: TextureHandle) -> FontResult<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::LoadError(format!("fontdue error: {e}")))?;

        log::info!("Loaded font at {font_size}px size");

        let ascent = font
            .horizontal_line_metrics(font_size)
            .map_or(font_size * 0.8, |metrics| metrics.ascent);

        // Rasterize all glyphs first to determine the required cell size
        let glyph_count = (ASCII_END - ASCII_START + 1) as usize;
        let mut rasterized = Vec::with_capacity(glyph_count);
        let mut max_glyph_height = 0usize;

        for code_point in ASCII_START..=ASCII_END {
            let ch = char::from_u32(code_point).expect("printable ASCII is valid");
            let (metrics, bitmap) = font.rasterize(ch, font_size);

            max_glyph_height = max_glyph_height.max(metrics.height);
            rasterized.push((ch, metrics, bitmap));
        }

        let cell_height = (max_glyph_height as u32 * 3) / 2; // Add padding
        let mut state = AtlasState {
            glyphs: HashMap::with_capacity(glyph_count),
            width: ATLAS_WIDTH,
            height: ATLAS_WIDTH,
            bitmap: vec![0u8; (ATLAS_WIDTH * ATLAS_WIDTH) as usize],
            cell_width: ATLAS_WIDTH / GLYPHS_PER_ROW,
            cell_height: cell_height.max(1),
            cursor_x: 0,
            cursor_y: 0,
            stamp: AtlasStamp::default(),
        };

        for (ch, metrics, bitmap) in rasterized {
            state.pack_glyph(
                ch,
                metrics.width,
                metrics.height,
                metrics.advance_width,
                Vec2::new(metrics.xmin as f32, metrics.ymin as f32),
                &bitmap,
            );
        }

        log::info!(
            "Atlas packed: {}x{}, {} glyphs cached",
            state.width,
            state.height,
            state.glyphs.len()
        );

        Ok(Self {
            font,
            font_size,
            ascent,
            line_height: font_size * 1.2,
            texture,
            atlas: RwLock::new(state),
        })
    }

    /// Get the font size in pixels
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Get the line height (distance between line tops)
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Get current atlas dimensions
    pub fn atlas_dimensions(&self) -> (u32, u32) {
        let state = self.read_atlas();
        (state.width, state.height)
    }

    /// Produce the atlas as RGBA data for GPU upload
    ///
    /// Glyph coverage lands in the alpha channel over white RGB, so the
    /// texture can be tinted by vertex color at draw time.
    pub fn atlas_rgba(&self) -> Vec<u8> {
        let state = self.read_atlas();
        let mut rgba = Vec::with_capacity(state.bitmap.len() * 4);

        for &alpha in &state.bitmap {
            rgba.extend_from_slice(&[255, 255, 255, alpha]);
        }

        rgba
    }

    /// Get glyph information for a character
    ///
    /// # Errors
    ///
    /// Returns [`FontError::GlyphNotFound`] when `ch` has not been rasterized
    /// into the atlas.
    pub fn glyph(&self, ch: char) -> FontResult<GlyphInfo> {
        self.read_atlas()
            .glyphs
            .get(&ch)
            .copied()
            .ok_or(FontError::GlyphNotFound(ch))
    }

    /// Rasterize any characters of `text` missing from the atlas
    ///
    /// May grow the atlas and bump its stamp when the new glyphs do not fit
    /// the current packing.
    fn ensure_glyphs(&self, text: &str) {
        {
            let state = self.read_atlas();
            if text
                .chars()
                .all(|ch| ch == '\n' || state.glyphs.contains_key(&ch))
            {
                return;
            }
        }

        let mut state = self.atlas.write().expect("font atlas lock poisoned");
        for ch in text.chars() {
            if ch == '\n' || state.glyphs.contains_key(&ch) {
                continue;
            }

            let (metrics, bitmap) = self.font.rasterize(ch, self.font_size);
            state.pack_glyph(
                ch,
                metrics.width,
                metrics.height,
                metrics.advance_width,
                Vec2::new(metrics.xmin as f32, metrics.ymin as f32),
                &bitmap,
            );
        }
    }

    fn read_atlas(&self) -> std::sync::RwLockReadGuard<'_, AtlasState> {
        self.atlas.read().expect("font atlas lock poisoned")
    }

    /// Advance for `ch`, falling back to the space advance for unknown glyphs
    fn advance_of(state: &AtlasState, ch: char) -> f32 {
        state.glyphs.get(&ch).map_or_else(
            || state.glyphs.get(&' ').map_or(0.0, |glyph| glyph.advance),
            |glyph| glyph.advance,
        )
    }

    /// Emit one quad per rendered glyph, routing each through `emit`
    fn emit_quads(
        &self,
        state: &AtlasState,
        text: &str,
        measured: Vec2,
        align: TextAlign,
        rect: Rect,
        positions: &[Vec2],
        mut emit: impl FnMut(usize, Vec2, Vec2, &GlyphInfo),
    ) {
        let origin = layout::block_origin(rect, measured, align);

        for (index, ch) in text.chars().enumerate() {
            let Some(position) = positions.get(index) else {
                break;
            };
            let Some(glyph) = state.glyphs.get(&ch) else {
                continue;
            };
            if glyph.size.x <= 0.0 || glyph.size.y <= 0.0 {
                continue;
            }

            // Top of the bitmap relative to the line cell: baseline sits at
            // `ascent`, the bitmap extends `bearing.y + size.y` above it.
            let top = self.ascent - (glyph.bearing.y + glyph.size.y);
            let dest_min = Vec2::new(
                origin.x + position.x + glyph.bearing.x,
                origin.y + position.y + top,
            );

            emit(index, dest_min, dest_min + glyph.size, glyph);
        }
    }
}

impl FontLayout for BitmapFont {
    fn intrinsic_layout(&self, text: &str, align: TextAlign) -> (Vec<Vec2>, Vec2) {
        self.ensure_glyphs(text);
        let state = self.read_atlas();

        layout::place_glyphs(text, align, self.line_height, |ch| {
            Self::advance_of(&state, ch)
        })
    }

    fn fill_screen_coords(
        &self,
        buffer: &mut CoordsBuffer,
        text: &str,
        measured: Vec2,
        align: TextAlign,
        rect: Rect,
        positions: &[Vec2],
    ) {
        self.ensure_glyphs(text);
        let state = self.read_atlas();

        buffer.clear();
        self.emit_quads(
            &state,
            text,
            measured,
            align,
            rect,
            positions,
            |_, dest_min, dest_max, glyph| {
                buffer.add_quad(dest_min, dest_max, glyph.uv_min, glyph.uv_max);
            },
        );
    }

    fn fill_color_coords(
        &self,
        text: &str,
        colors: &[(usize, Color)],
        measured: Vec2,
        align: TextAlign,
        rect: Rect,
        positions: &[Vec2],
    ) -> Vec<(Color, CoordsBuffer)> {
        self.ensure_glyphs(text);
        let state = self.read_atlas();

        let mut groups: Vec<(Color, CoordsBuffer)> = Vec::new();
        let mut next_entry = 0usize;
        let mut current = Color::WHITE;

        self.emit_quads(
            &state,
            text,
            measured,
            align,
            rect,
            positions,
            |index, dest_min, dest_max, glyph| {
                while next_entry < colors.len() && colors[next_entry].0 <= index {
                    current = colors[next_entry].1;
                    next_entry += 1;
                }

                let found = groups.iter().position(|(color, _)| *color == current);
                let slot = match found {
                    Some(slot) => slot,
                    None => {
                        groups.push((current, CoordsBuffer::new()));
                        groups.len() - 1
                    }
                };
                groups[slot].1.add_quad(dest_min, dest_max, glyph.uv_min, glyph.uv_max);
            },
        );

        groups
    }

    fn wrap_to_width(&self, text: &str, max_width: f32) -> String {
        self.ensure_glyphs(text);
        let state = self.read_atlas();

        layout::wrap_text(text, max_width, |ch| Self::advance_of(&state, ch))
    }

    fn atlas_stamp(&self) -> AtlasStamp {
        self.read_atlas().stamp
    }

    fn texture_handle(&self) -> TextureHandle {
        self.texture
    }
}

impl AtlasState {
    /// Pack one rasterized glyph bitmap into the next free grid cell
    fn pack_glyph(
        &mut self,
        ch: char,
        width: usize,
        height: usize,
        advance: f32,
        bearing: Vec2,
        bitmap: &[u8],
    ) {
        if self.cursor_x + self.cell_width > self.width {
            self.cursor_x = 0;
            self.cursor_y += self.cell_height;
        }
        if self.cursor_y + self.cell_height > self.height {
            self.grow();
        }

        // Copy glyph coverage into the atlas, bounds-checked
        for y in 0..height {
            for x in 0..width {
                let src = y * width + x;
                let dst_x = self.cursor_x + x as u32;
                let dst_y = self.cursor_y + y as u32;
                let dst = (dst_y * self.width + dst_x) as usize;

                if dst < self.bitmap.len() && src < bitmap.len() {
                    self.bitmap[dst] = bitmap[src];
                }
            }
        }

        let uv_min = Vec2::new(
            self.cursor_x as f32 / self.width as f32,
            self.cursor_y as f32 / self.height as f32,
        );
        let uv_max = Vec2::new(
            (self.cursor_x + width as u32) as f32 / self.width as f32,
            (self.cursor_y + height as u32) as f32 / self.height as f32,
        );

        self.glyphs.insert(
            ch,
            GlyphInfo {
                uv_min,
                uv_max,
                size: Vec2::new(width as f32, height as f32),
                advance,
                bearing,
            },
        );

        self.cursor_x += self.cell_width;
    }

    /// Double the atlas height and rescale every stored UV
    ///
    /// Pixel rows keep their offsets, so packed coverage stays in place, but
    /// normalized V coordinates shrink; every previously handed-out UV is now
    /// stale, so the stamp advances.
    fn grow(&mut self) {
        let old_height = self.height;
        self.height *= 2;
        self.bitmap.resize((self.width * self.height) as usize, 0);

        let ratio = old_height as f32 / self.height as f32;
        for glyph in self.glyphs.values_mut() {
            glyph.uv_min.y *= ratio;
            glyph.uv_max.y *= ratio;
        }

        self.stamp.bump();
        log::debug!(
            "Font atlas grown to {}x{} (generation {})",
            self.width,
            self.height,
            self.stamp.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn empty_state() -> AtlasState {
        AtlasState {
            glyphs: HashMap::new(),
            width: 64,
            height: 64,
            bitmap: vec![0u8; 64 * 64],
            cell_width: 16,
            cell_height: 16,
            cursor_x: 0,
            cursor_y: 0,
            stamp: AtlasStamp::default(),
        }
    }

    #[test]
    fn test_pack_first_glyph_at_uv_origin() {
        let mut state = empty_state();
        state.pack_glyph('A', 8, 8, 9.0, Vec2::zeros(), &[255u8; 64]);

        let glyph = state.glyphs[&'A'];
        assert_eq!(glyph.uv_min, Vec2::new(0.0, 0.0));
        assert_relative_eq!(glyph.uv_max.x, 8.0 / 64.0);
        assert_relative_eq!(glyph.uv_max.y, 8.0 / 64.0);
        assert_eq!(glyph.advance, 9.0);
    }

    #[test]
    fn test_pack_advances_one_cell_per_glyph() {
        let mut state = empty_state();
        state.pack_glyph('A', 8, 8, 9.0, Vec2::zeros(), &[255u8; 64]);
        state.pack_glyph('B', 8, 8, 9.0, Vec2::zeros(), &[128u8; 64]);

        let b = state.glyphs[&'B'];
        assert_relative_eq!(b.uv_min.x, 16.0 / 64.0);
        assert_eq!(b.uv_min.y, 0.0);

        // Coverage landed in the second cell, first cell untouched
        assert_eq!(state.bitmap[0], 255);
        assert_eq!(state.bitmap[16], 128);
    }

    #[test]
    fn test_pack_wraps_to_next_row() {
        let mut state = empty_state();
        for (offset, ch) in ('a'..='e').enumerate() {
            state.pack_glyph(ch, 4, 4, 5.0, Vec2::zeros(), &[offset as u8 + 1; 16]);
        }

        // 64 / 16 = 4 cells per row, so the fifth glyph starts row two
        let e = state.glyphs[&'e'];
        assert_eq!(e.uv_min.x, 0.0);
        assert_relative_eq!(e.uv_min.y, 16.0 / 64.0);
    }

    #[test]
    fn test_grow_rescales_uvs_and_bumps_stamp() {
        let mut state = empty_state();
        state.pack_glyph('A', 8, 8, 9.0, Vec2::zeros(), &[255u8; 64]);
        let before = state.glyphs[&'A'];
        let stamp_before = state.stamp;

        // Fill every remaining cell, then one more to force growth
        let mut ch = 'b';
        for _ in 0..16 {
            state.pack_glyph(ch, 4, 4, 5.0, Vec2::zeros(), &[1u8; 16]);
            ch = char::from_u32(ch as u32 + 1).unwrap();
        }

        assert_eq!(state.height, 128);
        assert_ne!(state.stamp, stamp_before);

        let after = state.glyphs[&'A'];
        assert_relative_eq!(after.uv_min.y, before.uv_min.y * 0.5);
        assert_relative_eq!(after.uv_max.y, before.uv_max.y * 0.5);
        // Horizontal coordinates are untouched by vertical growth
        assert_eq!(after.uv_min.x, before.uv_min.x);

        // Packed coverage stays at the same pixel offsets
        assert_eq!(state.bitmap[0], 255);
    }

    #[test]
    fn test_stamp_bump_changes_generation() {
        let mut stamp = AtlasStamp::default();
        let initial = stamp;

        stamp.bump();
        assert_ne!(stamp, initial);
    }
}
