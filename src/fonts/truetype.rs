//! TrueType/OpenType font program parsing for PDF embedding.
//!
//! This module wraps the `ttf-parser` crate to extract what a simple
//! `/TrueType` font dictionary needs: the PostScript name, descriptor
//! metrics and the advance widths of the WinAnsi code range.
//!
//! Per ISO 32000-1 Section 9.6-9.8, an embedded simple TrueType font requires:
//! - FontDescriptor with metrics (ascent, descent, cap height, etc.)
//! - `/Widths` for codes `/FirstChar`..`/LastChar`
//! - Font program data (`/FontFile2`)

use ttf_parser::{Face, GlyphId};

/// First code of the WinAnsi width table.
pub const FIRST_CHAR: u8 = 32;
/// Last code of the WinAnsi width table.
pub const LAST_CHAR: u8 = 255;

/// Error types for TrueType font parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrueTypeError {
    /// Failed to parse font file
    #[error("Failed to parse font file: {0}")]
    ParseError(String),

    /// Font file is empty or invalid
    #[error("Font file is empty or invalid")]
    EmptyFont,

    /// Units-per-em of zero would make every metric meaningless
    #[error("Font reports zero units per em")]
    ZeroUnitsPerEm,
}

/// Result type for TrueType operations.
pub type TrueTypeResult<T> = Result<T, TrueTypeError>;

/// Metrics of a parsed TrueType program, scaled to PDF glyph space (1/1000 em).
#[derive(Debug, Clone, PartialEq)]
pub struct TrueTypeMetrics {
    /// PostScript name (name ID 6), if present
    pub postscript_name: Option<String>,
    /// Ascender
    pub ascent: i32,
    /// Descender (negative)
    pub descent: i32,
    /// Cap height
    pub cap_height: i32,
    /// Font bounding box (llx, lly, urx, ury)
    pub bbox: (i32, i32, i32, i32),
    /// Italic angle in degrees
    pub italic_angle: f32,
    /// Estimated vertical stem width
    pub stem_v: i32,
    /// FontDescriptor `/Flags`
    pub flags: u32,
    /// Advance widths for codes FIRST_CHAR..=LAST_CHAR
    pub widths: Vec<u16>,
}

impl TrueTypeMetrics {
    /// Parse a TrueType/OpenType font from raw data.
    pub fn parse(data: &[u8]) -> TrueTypeResult<Self> {
        if data.is_empty() {
            return Err(TrueTypeError::EmptyFont);
        }

        let face = Face::parse(data, 0).map_err(|e| TrueTypeError::ParseError(e.to_string()))?;
        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(TrueTypeError::ZeroUnitsPerEm);
        }
        let scale = |v: i16| (v as i32) * 1000 / units_per_em as i32;

        let bbox = face.global_bounding_box();
        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                winansi_to_char(code)
                    .and_then(|ch| face.glyph_index(ch))
                    .map(|gid| advance_width(&face, gid, units_per_em))
                    .unwrap_or(0)
            })
            .collect();

        Ok(Self {
            postscript_name: find_name(&face, ttf_parser::name_id::POST_SCRIPT_NAME),
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: scale(face.capital_height().unwrap_or_else(|| face.ascender())),
            bbox: (
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ),
            italic_angle: face.tables().post.map(|post| post.italic_angle).unwrap_or(0.0),
            // TrueType doesn't store StemV; estimate from weight.
            stem_v: if face.is_bold() { 140 } else { 80 },
            flags: font_flags(&face),
            widths,
        })
    }
}

fn find_name(face: &Face<'_>, name_id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == name_id)
        .and_then(|name| name.to_string())
}

fn advance_width(face: &Face<'_>, gid: GlyphId, units_per_em: u16) -> u16 {
    let advance = face.glyph_hor_advance(gid).unwrap_or(0);
    (advance as u32 * 1000 / units_per_em as u32) as u16
}

/// Font flags per ISO 32000-1 Table 123.
fn font_flags(face: &Face<'_>) -> u32 {
    let mut flags = 0u32;
    // Bit 1: FixedPitch
    if face.is_monospaced() {
        flags |= 1 << 0;
    }
    // Bit 6: Nonsymbolic
    flags |= 1 << 5;
    // Bit 7: Italic
    if face.is_italic() {
        flags |= 1 << 6;
    }
    flags
}

/// Map a WinAnsiEncoding code to its Unicode character.
pub fn winansi_to_char(code: u8) -> Option<char> {
    let cp: u32 = match code {
        0x80 => 0x20AC,
        0x82 => 0x201A,
        0x83 => 0x0192,
        0x84 => 0x201E,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02C6,
        0x89 => 0x2030,
        0x8A => 0x0160,
        0x8B => 0x2039,
        0x8C => 0x0152,
        0x8E => 0x017D,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201C,
        0x94 => 0x201D,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02DC,
        0x99 => 0x2122,
        0x9A => 0x0161,
        0x9B => 0x203A,
        0x9C => 0x0153,
        0x9E => 0x017E,
        0x9F => 0x0178,
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => return None,
        _ => code as u32,
    };
    char::from_u32(cp)
}
