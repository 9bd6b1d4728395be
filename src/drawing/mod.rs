//! Drawing-layer resources.
//!
//! Values supplied by callers composing a page: fonts, raster images and
//! reusable forms. None of these are part of the serialized object graph;
//! the document turns them into canonical objects on first use.

mod font;
mod form;
mod image;
mod typeface;

pub use font::{Font, FontKey, FontProgram};
pub use form::{Form, FormId};
pub use image::{ColorSpace, Image, ImageData, ImageError, ImageFormat};
pub use typeface::{
    FontCollection, FontFamily, FontStretch, FontStyle, FontWeight, GlyphSource,
    GlyphSourceResolver, StandardFontResolver, Typeface,
};

use sha2::{Digest, Sha256};

/// SHA-256 content fingerprint used as an equality key for byte-backed resources.
pub type Fingerprint = [u8; 32];

/// Fingerprint a sequence of byte slices.
///
/// Each part is length-prefixed so that `["ab", "c"]` and `["a", "bc"]`
/// fingerprint differently.
pub(crate) fn fingerprint(parts: &[&[u8]]) -> Fingerprint {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hasher.finalize().into()
}
