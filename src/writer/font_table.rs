//! Canonical font table.
//!
//! Turns drawing-layer fonts into font dictionaries, once per document.
//!
//! # Font dictionaries
//!
//! Per ISO 32000-1 Section 9.6:
//! - Standard-14 fonts become `/Type1` fonts with no embedded program.
//! - Embedded programs become simple `/TrueType` fonts with a
//!   `/FontDescriptor` and a `/FontFile2` stream, WinAnsi-encoded.

use crate::drawing::{Font, FontKey, FontProgram, GlyphSource, GlyphSourceResolver};
use crate::error::{Error, Result};
use crate::fonts::truetype::{TrueTypeMetrics, FIRST_CHAR, LAST_CHAR};
use crate::fonts::StandardFont;
use crate::object::{Dictionary, Object, ObjectRef};
use crate::store::ObjectStore;

use super::canonical::CanonicalTable;

/// The canonical font dictionary of one font in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalFont {
    reference: ObjectRef,
    base_font: String,
    embedded: bool,
}

impl CanonicalFont {
    /// Indirect reference to the font dictionary.
    pub fn reference(&self) -> ObjectRef {
        self.reference
    }

    /// The `/BaseFont` name.
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// Whether the font program is embedded.
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }
}

/// What a font materializer is asked to build.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// A standard-14 font
    Standard(StandardFont),
    /// An embedded program
    Embedded {
        /// Name to fall back on when the program has no PostScript name
        name_hint: String,
        /// The program bytes
        program: FontProgram,
    },
}

/// Builds font dictionaries for the font table.
pub trait FontMaterializer: Send + Sync {
    /// Build the font dictionary for `source`.
    ///
    /// Auxiliary objects (descriptor, font file) may be inserted into
    /// `store`; the returned object is inserted by the caller.
    fn materialize_font(&self, source: &FontSource, store: &mut ObjectStore) -> Result<Object>;
}

/// Default font materializer: Type1 standard fonts and simple TrueType embedding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFontMaterializer;

impl FontMaterializer for DefaultFontMaterializer {
    fn materialize_font(&self, source: &FontSource, store: &mut ObjectStore) -> Result<Object> {
        match source {
            FontSource::Standard(font) => Ok(standard_font_dict(*font)),
            FontSource::Embedded { name_hint, program } => {
                truetype_font_dict(name_hint, program, store)
            },
        }
    }
}

fn standard_font_dict(font: StandardFont) -> Object {
    let mut dict = Dictionary::new();
    dict.insert("Type".to_string(), Object::name("Font"));
    dict.insert("Subtype".to_string(), Object::name("Type1"));
    dict.insert("BaseFont".to_string(), Object::name(font.base_font()));
    if !font.is_symbolic() {
        dict.insert("Encoding".to_string(), Object::name("WinAnsiEncoding"));
    }
    Object::Dictionary(dict)
}

fn truetype_font_dict(
    name_hint: &str,
    program: &FontProgram,
    store: &mut ObjectStore,
) -> Result<Object> {
    let metrics = TrueTypeMetrics::parse(program.data())
        .map_err(|e| Error::Font(format!("cannot embed '{}': {}", name_hint, e)))?;
    let base_font = sanitize_base_font(metrics.postscript_name.as_deref().unwrap_or(name_hint));

    let mut file_dict = Dictionary::new();
    file_dict.insert(
        "Length1".to_string(),
        Object::Integer(program.data().len() as i64),
    );
    file_dict.insert(
        "Length".to_string(),
        Object::Integer(program.data().len() as i64),
    );
    let font_file = store.insert(Object::Stream {
        dict: file_dict,
        data: program.bytes(),
    });

    let (llx, lly, urx, ury) = metrics.bbox;
    let mut descriptor = Dictionary::new();
    descriptor.insert("Type".to_string(), Object::name("FontDescriptor"));
    descriptor.insert("FontName".to_string(), Object::name(base_font.clone()));
    descriptor.insert("Flags".to_string(), Object::Integer(metrics.flags as i64));
    descriptor.insert(
        "FontBBox".to_string(),
        Object::Array(
            [llx, lly, urx, ury]
                .iter()
                .map(|v| Object::Integer(*v as i64))
                .collect(),
        ),
    );
    descriptor.insert(
        "ItalicAngle".to_string(),
        Object::Real(metrics.italic_angle as f64),
    );
    descriptor.insert("Ascent".to_string(), Object::Integer(metrics.ascent as i64));
    descriptor.insert("Descent".to_string(), Object::Integer(metrics.descent as i64));
    descriptor.insert(
        "CapHeight".to_string(),
        Object::Integer(metrics.cap_height as i64),
    );
    descriptor.insert("StemV".to_string(), Object::Integer(metrics.stem_v as i64));
    descriptor.insert("FontFile2".to_string(), Object::Reference(font_file));
    let descriptor = store.insert(Object::Dictionary(descriptor));

    let mut dict = Dictionary::new();
    dict.insert("Type".to_string(), Object::name("Font"));
    dict.insert("Subtype".to_string(), Object::name("TrueType"));
    dict.insert("BaseFont".to_string(), Object::name(base_font));
    dict.insert("FirstChar".to_string(), Object::Integer(FIRST_CHAR as i64));
    dict.insert("LastChar".to_string(), Object::Integer(LAST_CHAR as i64));
    dict.insert(
        "Widths".to_string(),
        Object::Array(
            metrics
                .widths
                .iter()
                .map(|w| Object::Integer(*w as i64))
                .collect(),
        ),
    );
    dict.insert("Encoding".to_string(), Object::name("WinAnsiEncoding"));
    dict.insert("FontDescriptor".to_string(), Object::Reference(descriptor));
    Ok(Object::Dictionary(dict))
}

/// Reduce a font name to characters that need no escaping in a PDF name.
fn sanitize_base_font(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_'))
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

/// The document's font table.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    table: CanonicalTable<FontKey, CanonicalFont>,
}

impl FontTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical font for a drawing font.
    ///
    /// An explicit program on the font wins; otherwise the typeface is
    /// resolved through `resolver`. A typeface that stays unresolved
    /// (composite or unknown family) cannot be materialized.
    pub fn get_font(
        &mut self,
        font: &Font,
        resolver: &dyn GlyphSourceResolver,
        materializer: &dyn FontMaterializer,
        store: &mut ObjectStore,
    ) -> Result<CanonicalFont> {
        let key = font.key();
        if let Some(existing) = self.table.get(&key) {
            log::trace!("Font table hit for {} -> {}", font.typeface(), existing.reference);
            return Ok(existing.clone());
        }

        let name_hint = font.typeface().family().name().to_string();
        let source = match font.program() {
            Some(program) => FontSource::Embedded {
                name_hint,
                program: program.clone(),
            },
            None => match font.typeface().try_resolve_glyph_source_with(resolver) {
                Some(GlyphSource::Standard(standard)) => FontSource::Standard(standard),
                Some(GlyphSource::Embedded(program)) => FontSource::Embedded { name_hint, program },
                None => {
                    return Err(Error::Font(format!(
                        "typeface '{}' does not resolve to a single glyph source",
                        font.typeface()
                    )))
                },
            },
        };

        self.table
            .get_or_try_insert_with(key, || materialize(&source, materializer, store))
    }

    /// Canonical font for raw font data registered under `id_name`.
    pub fn get_font_from_data(
        &mut self,
        id_name: &str,
        data: &[u8],
        materializer: &dyn FontMaterializer,
        store: &mut ObjectStore,
    ) -> Result<CanonicalFont> {
        let program = FontProgram::new(data.to_vec());
        let key = FontKey::raw(id_name, &program);
        if let Some(existing) = self.table.get(&key) {
            log::trace!("Font table hit for raw font '{}' -> {}", id_name, existing.reference);
            return Ok(existing.clone());
        }

        let source = FontSource::Embedded {
            name_hint: id_name.to_string(),
            program,
        };
        self.table
            .get_or_try_insert_with(key, || materialize(&source, materializer, store))
    }

    /// Number of canonical fonts.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if no font has been materialized.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over canonical fonts (unordered).
    pub fn fonts(&self) -> impl Iterator<Item = &CanonicalFont> {
        self.table.values()
    }
}

fn materialize(
    source: &FontSource,
    materializer: &dyn FontMaterializer,
    store: &mut ObjectStore,
) -> Result<CanonicalFont> {
    let mark = store.mark();
    let result = materializer
        .materialize_font(source, store)
        .and_then(check_font_object);
    let obj = match result {
        Ok(obj) => obj,
        Err(e) => {
            store.rollback(mark);
            return Err(e);
        },
    };

    let base_font = obj
        .as_dict()
        .and_then(|d| d.get("BaseFont"))
        .and_then(Object::as_name)
        .unwrap_or_default()
        .to_string();
    let embedded = matches!(source, FontSource::Embedded { .. });
    let reference = store.insert(obj);
    log::debug!("Materialized font {} as {}", base_font, reference);

    Ok(CanonicalFont {
        reference,
        base_font,
        embedded,
    })
}

fn check_font_object(obj: Object) -> Result<Object> {
    if obj.dict_type() == Some("Font") {
        Ok(obj)
    } else {
        Err(Error::Materializer(format!(
            "font materializer returned {} without /Type /Font",
            obj.type_name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{FontFamily, FontStretch, FontStyle, FontWeight, StandardFontResolver, Typeface};

    fn get(table: &mut FontTable, store: &mut ObjectStore, font: &Font) -> Result<CanonicalFont> {
        table.get_font(font, &StandardFontResolver, &DefaultFontMaterializer, store)
    }

    #[test]
    fn test_standard_font_dictionary() {
        let mut table = FontTable::new();
        let mut store = ObjectStore::new();
        let font = get(&mut table, &mut store, &Font::new("Helvetica", 12.0)).unwrap();

        assert_eq!(font.base_font(), "Helvetica");
        assert!(!font.is_embedded());
        let obj = store.get(font.reference()).unwrap();
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Subtype").and_then(Object::as_name), Some("Type1"));
        assert_eq!(
            dict.get("Encoding").and_then(Object::as_name),
            Some("WinAnsiEncoding")
        );
    }

    #[test]
    fn test_symbol_has_no_encoding() {
        let mut table = FontTable::new();
        let mut store = ObjectStore::new();
        let font = get(&mut table, &mut store, &Font::new("Symbol", 12.0)).unwrap();
        let obj = store.get(font.reference()).unwrap();
        assert!(!obj.as_dict().unwrap().contains_key("Encoding"));
    }

    #[test]
    fn test_equal_fonts_share_object() {
        let mut table = FontTable::new();
        let mut store = ObjectStore::new();
        let a = get(&mut table, &mut store, &Font::new("Times", 10.0)).unwrap();
        let b = get(&mut table, &mut store, &Font::new("Times", 18.0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unresolved_typeface_fails_cleanly() {
        let mut table = FontTable::new();
        let mut store = ObjectStore::new();
        let composite = Font::from_typeface(
            Typeface::with_attributes(
                FontFamily::composite("Mixed", ["Helvetica", "Symbol"]),
                FontStyle::Normal,
                FontWeight::NORMAL,
                FontStretch::NORMAL,
            ),
            12.0,
        );
        assert!(matches!(
            get(&mut table, &mut store, &composite),
            Err(Error::Font(_))
        ));
        assert!(table.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_raw_font_rolls_back() {
        let mut table = FontTable::new();
        let mut store = ObjectStore::new();
        let result =
            table.get_font_from_data("Broken", b"not a font", &DefaultFontMaterializer, &mut store);
        assert!(matches!(result, Err(Error::Font(_))));
        assert!(table.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_contract_violation() {
        struct NullMaterializer;
        impl FontMaterializer for NullMaterializer {
            fn materialize_font(&self, _: &FontSource, store: &mut ObjectStore) -> Result<Object> {
                store.insert(Object::Integer(1));
                Ok(Object::Null)
            }
        }

        let mut table = FontTable::new();
        let mut store = ObjectStore::new();
        let result = table.get_font(
            &Font::new("Helvetica", 12.0),
            &StandardFontResolver,
            &NullMaterializer,
            &mut store,
        );
        assert!(matches!(result, Err(Error::Materializer(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_sanitize_base_font() {
        assert_eq!(sanitize_base_font("Noto Sans (Bold)"), "NotoSansBold");
        assert_eq!(sanitize_base_font("ABCDEF+Arial-Bold"), "ABCDEF+Arial-Bold");
        assert_eq!(sanitize_base_font("   "), "EmbeddedFont");
    }
}
