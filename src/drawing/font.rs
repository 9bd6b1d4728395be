//! Drawing-layer fonts.

use bytes::Bytes;

use super::typeface::{FontStretch, FontStyle, FontWeight, Typeface};
use super::{fingerprint, Fingerprint};

/// Raw font program bytes (TTF/OTF) with their content fingerprint.
///
/// Cloning is cheap; clones share the bytes.
#[derive(Clone)]
pub struct FontProgram {
    data: Bytes,
    fingerprint: Fingerprint,
}

impl FontProgram {
    /// Wrap raw font file data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let fingerprint = fingerprint(&[&data[..]]);
        Self { data, fingerprint }
    }

    /// Load a program from a file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read(path.as_ref())?))
    }

    /// The raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the bytes.
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Content fingerprint.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

impl PartialEq for FontProgram {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for FontProgram {}

impl std::fmt::Debug for FontProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontProgram")
            .field("len", &self.data.len())
            .field("fingerprint", &format_args!("{:02x?}", &self.fingerprint[..4]))
            .finish()
    }
}

/// A font as requested by drawing code: a typeface at a size, optionally
/// backed by an explicit font program.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    typeface: Typeface,
    size: f32,
    program: Option<FontProgram>,
}

impl Font {
    /// Font of a named family at `size` points, regular style.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self::from_typeface(Typeface::new(family), size)
    }

    /// Font for a typeface.
    pub fn from_typeface(typeface: Typeface, size: f32) -> Self {
        Self {
            typeface,
            size,
            program: None,
        }
    }

    /// Attach an explicit font program, bypassing typeface resolution.
    pub fn with_program(mut self, program: FontProgram) -> Self {
        self.program = Some(program);
        self
    }

    /// The typeface.
    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    /// Size in points.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Explicit font program, if any.
    pub fn program(&self) -> Option<&FontProgram> {
        self.program.as_ref()
    }

    /// Equality key in the document's font table.
    ///
    /// The size is not part of the key: one font dictionary serves every size.
    pub fn key(&self) -> FontKey {
        FontKey::Typeface {
            family: self.typeface.family().name().to_string(),
            composite: self.typeface.family().is_composite(),
            style: self.typeface.style(),
            weight: self.typeface.weight(),
            stretch: self.typeface.stretch(),
            program: self.program.as_ref().map(|p| *p.fingerprint()),
        }
    }
}

/// Equality key for canonical fonts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontKey {
    /// Font requested through a typeface
    Typeface {
        /// Family name
        family: String,
        /// Whether the family is composite
        composite: bool,
        /// Style
        style: FontStyle,
        /// Weight
        weight: FontWeight,
        /// Stretch
        stretch: FontStretch,
        /// Fingerprint of an explicit program
        program: Option<Fingerprint>,
    },
    /// Font requested as raw data under an identifying name
    Raw {
        /// Caller-chosen identifier
        id_name: String,
        /// Fingerprint of the data
        fingerprint: Fingerprint,
    },
}

impl FontKey {
    /// Key for the raw-data overload.
    pub fn raw(id_name: &str, program: &FontProgram) -> Self {
        FontKey::Raw {
            id_name: id_name.to_string(),
            fingerprint: *program.fingerprint(),
        }
    }
}
