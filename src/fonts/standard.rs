//! The PDF Base-14 standard fonts.

/// One of the 14 standard Type 1 fonts every conforming reader provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    /// Helvetica
    Helvetica,
    /// Helvetica-Bold
    HelveticaBold,
    /// Helvetica-Oblique
    HelveticaOblique,
    /// Helvetica-BoldOblique
    HelveticaBoldOblique,
    /// Times-Roman
    TimesRoman,
    /// Times-Bold
    TimesBold,
    /// Times-Italic
    TimesItalic,
    /// Times-BoldItalic
    TimesBoldItalic,
    /// Courier
    Courier,
    /// Courier-Bold
    CourierBold,
    /// Courier-Oblique
    CourierOblique,
    /// Courier-BoldOblique
    CourierBoldOblique,
    /// Symbol
    Symbol,
    /// ZapfDingbats
    ZapfDingbats,
}

impl StandardFont {
    /// The `/BaseFont` name.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Symbolic fonts carry their own built-in encoding.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    /// Select the standard font for a family name and style.
    ///
    /// Family names are matched case-insensitively and ignore spaces and
    /// hyphens, so "Times New Roman", "times-roman" and "Times" all select
    /// the Times family. Returns `None` for families outside the standard set.
    pub fn select(family: &str, bold: bool, italic: bool) -> Option<Self> {
        let key: String = family
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let base = match key.as_str() {
            "helvetica" | "arial" | "sansserif" => StandardFont::Helvetica,
            "times" | "timesroman" | "timesnewroman" | "serif" => StandardFont::TimesRoman,
            "courier" | "couriernew" | "monospace" => StandardFont::Courier,
            "symbol" => return Some(StandardFont::Symbol),
            "zapfdingbats" | "dingbats" => return Some(StandardFont::ZapfDingbats),
            _ => return None,
        };

        Some(match (base, bold, italic) {
            (StandardFont::Helvetica, false, false) => StandardFont::Helvetica,
            (StandardFont::Helvetica, true, false) => StandardFont::HelveticaBold,
            (StandardFont::Helvetica, false, true) => StandardFont::HelveticaOblique,
            (StandardFont::Helvetica, true, true) => StandardFont::HelveticaBoldOblique,
            (StandardFont::TimesRoman, false, false) => StandardFont::TimesRoman,
            (StandardFont::TimesRoman, true, false) => StandardFont::TimesBold,
            (StandardFont::TimesRoman, false, true) => StandardFont::TimesItalic,
            (StandardFont::TimesRoman, true, true) => StandardFont::TimesBoldItalic,
            (_, false, false) => StandardFont::Courier,
            (_, true, false) => StandardFont::CourierBold,
            (_, false, true) => StandardFont::CourierOblique,
            (_, true, true) => StandardFont::CourierBoldOblique,
        })
    }
}

impl std::fmt::Display for StandardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base_font())
    }
}
