//! Resource naming and object generation.
//!
//! ## Architecture
//!
//! ```text
//! Font / Image / Form            (drawing layer)
//!     ↓
//! [FontTable / ImageTable / FormTable]   one canonical object per document
//!     ↓
//! [ResourceRegistry]             local names (/F1, /Im1, /Fm1) per dictionary
//!     ↓
//! [ContentStreamDictionary]      /Resources + content bytes
//!     ↓
//! [ObjectSerializer]             PDF bytes
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use pdf_resources::{Document, drawing::Font, writer::ContentStreamDictionary};
//!
//! let mut doc = Document::new();
//! let mut page = ContentStreamDictionary::new(&doc);
//! let mut writer = page.writer();
//! writer
//!     .set_font(&mut doc, &Font::new("Helvetica", 12.0))?
//!     .text("Hello, World!", 72.0, 720.0);
//! writer.finish()?;
//! ```

mod canonical;
mod content_stream;
mod font_table;
mod form_table;
mod image_table;
mod object_serializer;
mod resources;

pub use canonical::CanonicalTable;
pub use content_stream::{ContentStream, ContentStreamDictionary, ContentStreamOp, ContentWriter};
pub use font_table::{
    CanonicalFont, DefaultFontMaterializer, FontMaterializer, FontSource, FontTable,
};
pub use form_table::{CanonicalFormObject, DefaultFormMaterializer, FormMaterializer, FormTable};
pub use image_table::{CanonicalImage, DefaultImageMaterializer, ImageMaterializer, ImageTable};
pub use object_serializer::ObjectSerializer;
pub use resources::{is_valid_resource_name, ResourceCategory, ResourceKind, ResourceRegistry};
