//! Typefaces and glyph-source resolution.
//!
//! A [`Typeface`] is the (family, style, weight, stretch) tuple a caller
//! asks for. Resolving it to a concrete outline source may legitimately
//! fail: composite families have no single source, and families outside
//! the standard set need a registered program. Both cases are reported as
//! `None`, never as an error; callers fall back to their own composition
//! logic.

use std::collections::HashMap;

use super::font::FontProgram;
use crate::fonts::StandardFont;

/// Font family of a typeface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A single named family with one outline source per style.
    Single(String),
    /// A family assembled from several member families (e.g. per script).
    Composite {
        /// Name the composite is known by
        name: String,
        /// Member family names, in fallback order
        members: Vec<String>,
    },
}

impl FontFamily {
    /// A single named family.
    pub fn new(name: impl Into<String>) -> Self {
        FontFamily::Single(name.into())
    }

    /// A composite family made of `members`.
    pub fn composite<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FontFamily::Composite {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// The family name.
    pub fn name(&self) -> &str {
        match self {
            FontFamily::Single(name) => name,
            FontFamily::Composite { name, .. } => name,
        }
    }

    /// Whether this is a composite family.
    pub fn is_composite(&self) -> bool {
        matches!(self, FontFamily::Composite { .. })
    }
}

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    /// Upright
    #[default]
    Normal,
    /// Italic
    Italic,
    /// Oblique (slanted upright design)
    Oblique,
}

impl FontStyle {
    /// Italic and oblique both select a slanted face.
    pub fn is_slanted(&self) -> bool {
        !matches!(self, FontStyle::Normal)
    }
}

/// Font weight on the CSS 100–900 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// 100
    pub const THIN: FontWeight = FontWeight(100);
    /// 200
    pub const EXTRA_LIGHT: FontWeight = FontWeight(200);
    /// 300
    pub const LIGHT: FontWeight = FontWeight(300);
    /// 400
    pub const NORMAL: FontWeight = FontWeight(400);
    /// 500
    pub const MEDIUM: FontWeight = FontWeight(500);
    /// 600
    pub const SEMI_BOLD: FontWeight = FontWeight(600);
    /// 700
    pub const BOLD: FontWeight = FontWeight(700);
    /// 800
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
    /// 900
    pub const BLACK: FontWeight = FontWeight(900);

    /// Weights from semi-bold up select a bold face.
    pub fn is_bold(&self) -> bool {
        self.0 >= Self::SEMI_BOLD.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Font stretch on the 1–9 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontStretch(pub u16);

impl FontStretch {
    /// 1
    pub const ULTRA_CONDENSED: FontStretch = FontStretch(1);
    /// 2
    pub const EXTRA_CONDENSED: FontStretch = FontStretch(2);
    /// 3
    pub const CONDENSED: FontStretch = FontStretch(3);
    /// 4
    pub const SEMI_CONDENSED: FontStretch = FontStretch(4);
    /// 5
    pub const NORMAL: FontStretch = FontStretch(5);
    /// 6
    pub const SEMI_EXPANDED: FontStretch = FontStretch(6);
    /// 7
    pub const EXPANDED: FontStretch = FontStretch(7);
    /// 8
    pub const EXTRA_EXPANDED: FontStretch = FontStretch(8);
    /// 9
    pub const ULTRA_EXPANDED: FontStretch = FontStretch(9);
}

impl Default for FontStretch {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// A combination of family, style, weight and stretch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Typeface {
    family: FontFamily,
    style: FontStyle,
    weight: FontWeight,
    stretch: FontStretch,
}

impl Typeface {
    /// Typeface of a single family with normal style, weight and stretch.
    pub fn new(family: impl Into<String>) -> Self {
        Self::with_attributes(
            FontFamily::new(family),
            FontStyle::Normal,
            FontWeight::NORMAL,
            FontStretch::NORMAL,
        )
    }

    /// Typeface with every attribute given explicitly.
    pub fn with_attributes(
        family: FontFamily,
        style: FontStyle,
        weight: FontWeight,
        stretch: FontStretch,
    ) -> Self {
        Self {
            family,
            style,
            weight,
            stretch,
        }
    }

    /// Same typeface with another style.
    pub fn styled(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Same typeface with another weight.
    pub fn weighted(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Same typeface with another stretch.
    pub fn stretched(mut self, stretch: FontStretch) -> Self {
        self.stretch = stretch;
        self
    }

    /// The font family.
    pub fn family(&self) -> &FontFamily {
        &self.family
    }

    /// The style.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// The relative weight.
    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// The stretch.
    pub fn stretch(&self) -> FontStretch {
        self.stretch
    }

    /// Try to resolve this typeface to a concrete glyph source using the
    /// standard-14 fonts.
    ///
    /// Returns `None` for composite families and for families outside the
    /// standard set. This is an expected outcome, not a failure.
    pub fn try_resolve_glyph_source(&self) -> Option<GlyphSource> {
        self.try_resolve_glyph_source_with(&StandardFontResolver)
    }

    /// Try to resolve through a specific resolver.
    pub fn try_resolve_glyph_source_with(
        &self,
        resolver: &dyn GlyphSourceResolver,
    ) -> Option<GlyphSource> {
        if self.family.is_composite() {
            return None;
        }
        resolver.resolve(self)
    }
}

impl std::fmt::Display for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:?} {} stretch {}",
            self.family.name(),
            self.style,
            self.weight.0,
            self.stretch.0
        )
    }
}

/// A concrete outline source for a typeface.
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphSource {
    /// One of the standard-14 fonts; nothing is embedded.
    Standard(StandardFont),
    /// An embedded font program.
    Embedded(FontProgram),
}

/// Capability to resolve a typeface to a glyph source.
pub trait GlyphSourceResolver: Send + Sync {
    /// Resolve a (non-composite) typeface, or `None` if no single source exists.
    fn resolve(&self, typeface: &Typeface) -> Option<GlyphSource>;
}

/// Resolves typefaces to the standard-14 fonts only.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontResolver;

impl GlyphSourceResolver for StandardFontResolver {
    fn resolve(&self, typeface: &Typeface) -> Option<GlyphSource> {
        let family = match typeface.family() {
            FontFamily::Single(name) => name,
            FontFamily::Composite { .. } => return None,
        };
        StandardFont::select(
            family,
            typeface.weight().is_bold(),
            typeface.style().is_slanted(),
        )
        .map(GlyphSource::Standard)
    }
}

/// Registered font programs, with standard-14 fallback.
#[derive(Debug, Clone, Default)]
pub struct FontCollection {
    /// (lower-cased family, bold, italic) -> program
    programs: HashMap<(String, bool, bool), FontProgram>,
}

impl FontCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program for a family face.
    pub fn register(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        program: FontProgram,
    ) -> &mut Self {
        self.programs
            .insert((family.to_lowercase(), bold, italic), program);
        self
    }

    /// Number of registered programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl GlyphSourceResolver for FontCollection {
    fn resolve(&self, typeface: &Typeface) -> Option<GlyphSource> {
        let family = match typeface.family() {
            FontFamily::Single(name) => name.to_lowercase(),
            FontFamily::Composite { .. } => return None,
        };
        let key = (
            family,
            typeface.weight().is_bold(),
            typeface.style().is_slanted(),
        );
        match self.programs.get(&key) {
            Some(program) => Some(GlyphSource::Embedded(program.clone())),
            None => StandardFontResolver.resolve(typeface),
        }
    }
}
