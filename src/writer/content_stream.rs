//! Content-stream dictionaries.
//!
//! A [`ContentStreamDictionary`] is any dictionary that owns a content
//! stream and a `/Resources` dictionary: a page, a form XObject, an
//! appearance stream. Drawing code asks it for the local name of a font,
//! image or form; it obtains the canonical object from the document and
//! registers it in its own resources.
//!
//! [`ContentWriter`] builds the operators (ISO 32000-1 Sections 8-9) and asks
//! its owner for names as it goes, so a stream can never refer to a name
//! missing from its resources.

use std::io::Write;

use bytes::{Bytes, BytesMut};

use crate::document::Document;
use crate::drawing::{Font, Form, Image};
use crate::error::{Error, Result};
use crate::fonts::truetype::winansi_to_char;
use crate::object::{Dictionary, Object};

use super::font_table::CanonicalFont;
use super::form_table::CanonicalFormObject;
use super::image_table::CanonicalImage;
use super::object_serializer::write_escaped_bytes;
use super::resources::{ResourceKind, ResourceRegistry};

/// A dictionary owning a content stream and its resources.
#[derive(Debug, Clone)]
pub struct ContentStreamDictionary {
    /// Entries other than `/Resources` and `/Length`
    elements: Dictionary,
    /// Content stream bytes
    content: Bytes,
    registry: ResourceRegistry,
}

impl ContentStreamDictionary {
    /// Create an empty content-stream dictionary for `doc`.
    pub fn new(doc: &Document) -> Self {
        Self {
            elements: Dictionary::new(),
            content: Bytes::new(),
            registry: ResourceRegistry::new(doc.config()),
        }
    }

    /// Wrap an existing dictionary.
    ///
    /// An existing `/Resources` entry, inline or by reference, is adopted:
    /// its names stay valid and are reused.
    pub fn from_dictionary(doc: &Document, mut elements: Dictionary) -> Result<Self> {
        elements.shift_remove("Length");
        let registry = match elements.shift_remove("Resources") {
            None => ResourceRegistry::new(doc.config()),
            Some(Object::Dictionary(resources)) => {
                ResourceRegistry::from_dictionary(doc.config(), resources, doc.store())?
            },
            Some(reference @ Object::Reference(_)) => {
                let target = doc.store().resolve(&reference)?;
                let resources = target.as_dict().ok_or_else(|| Error::InvalidObjectType {
                    expected: "Dictionary".to_string(),
                    found: target.type_name().to_string(),
                })?;
                ResourceRegistry::from_dictionary(doc.config(), resources.clone(), doc.store())?
            },
            Some(other) => {
                return Err(Error::InvalidObjectType {
                    expected: "Dictionary".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        };
        Ok(Self {
            elements,
            content: Bytes::new(),
            registry,
        })
    }

    /// Entries of the dictionary itself.
    pub fn elements(&self) -> &Dictionary {
        &self.elements
    }

    /// Mutable access to the dictionary's own entries.
    pub fn elements_mut(&mut self) -> &mut Dictionary {
        &mut self.elements
    }

    /// Content stream bytes.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Replace the content stream bytes.
    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        self.content = content.into();
    }

    /// Append bytes after the existing content.
    pub fn append_content(&mut self, content: impl Into<Bytes>) {
        let content = content.into();
        if self.content.is_empty() {
            self.content = content;
            return;
        }
        let mut buf = BytesMut::with_capacity(self.content.len() + content.len());
        buf.extend_from_slice(&self.content);
        buf.extend_from_slice(&content);
        self.content = buf.freeze();
    }

    /// The resource registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The `/Resources` dictionary, absent until a resource is named.
    pub fn resources(&self) -> Option<&Dictionary> {
        self.registry.resources()
    }

    /// Local name of a font, materializing it in `doc` on first use.
    pub fn font_name(&mut self, doc: &mut Document, font: &Font) -> Result<(String, CanonicalFont)> {
        let canonical = doc.canonical_font(font)?;
        let name = self.registry.register(ResourceKind::Font, canonical.reference());
        Ok((name, canonical))
    }

    /// Local name of a font given as raw data under an identifying name.
    pub fn font_name_from_data(
        &mut self,
        doc: &mut Document,
        id_name: &str,
        data: &[u8],
    ) -> Result<(String, CanonicalFont)> {
        let canonical = doc.canonical_font_from_data(id_name, data)?;
        let name = self.registry.register(ResourceKind::Font, canonical.reference());
        Ok((name, canonical))
    }

    /// Local name of an image.
    pub fn image_name(
        &mut self,
        doc: &mut Document,
        image: &Image,
    ) -> Result<(String, CanonicalImage)> {
        let canonical = doc.canonical_image(image)?;
        let name = self.registry.register(ResourceKind::Image, canonical.reference());
        Ok((name, canonical))
    }

    /// Local name of a form.
    pub fn form_name(
        &mut self,
        doc: &mut Document,
        form: &Form,
    ) -> Result<(String, CanonicalFormObject)> {
        let canonical = doc.canonical_form(form)?;
        let name = self.registry.register(ResourceKind::Form, canonical.reference());
        Ok((name, canonical))
    }

    /// Start writing operators into this dictionary's content stream.
    pub fn writer(&mut self) -> ContentWriter<'_, Self> {
        ContentWriter::new(self)
    }

    /// The dictionary as a stream object, `/Resources` included only if present.
    pub fn to_object(&self) -> Object {
        let mut dict = self.elements.clone();
        if let Some(resources) = self.registry.resources() {
            dict.insert("Resources".to_string(), Object::Dictionary(resources.clone()));
        }
        dict.insert("Length".to_string(), Object::Integer(self.content.len() as i64));
        Object::Stream {
            dict,
            data: self.content.clone(),
        }
    }

    /// Turn the content into a reusable form with the given bounding box.
    pub fn to_form(&self, bbox: [f32; 4]) -> Form {
        let form = Form::new(bbox, self.content.clone());
        match self.registry.resources() {
            Some(resources) => form.with_resources(resources.clone()),
            None => form,
        }
    }
}

/// Anything that owns a content stream and names resources for it.
///
/// Implementors must name resources exactly as the corresponding
/// [`ContentStreamDictionary`] methods do.
pub trait ContentStream {
    /// The `/Resources` dictionary, if any.
    fn resources(&self) -> Option<&Dictionary>;

    /// Append finished content bytes after whatever the owner already holds.
    fn append_content(&mut self, content: Bytes);

    /// See [`ContentStreamDictionary::font_name`].
    fn font_name(&mut self, doc: &mut Document, font: &Font) -> Result<(String, CanonicalFont)>;

    /// See [`ContentStreamDictionary::font_name_from_data`].
    fn font_name_from_data(
        &mut self,
        doc: &mut Document,
        id_name: &str,
        data: &[u8],
    ) -> Result<(String, CanonicalFont)>;

    /// See [`ContentStreamDictionary::image_name`].
    fn image_name(&mut self, doc: &mut Document, image: &Image)
        -> Result<(String, CanonicalImage)>;

    /// See [`ContentStreamDictionary::form_name`].
    fn form_name(
        &mut self,
        doc: &mut Document,
        form: &Form,
    ) -> Result<(String, CanonicalFormObject)>;
}

impl ContentStream for ContentStreamDictionary {
    fn resources(&self) -> Option<&Dictionary> {
        ContentStreamDictionary::resources(self)
    }

    fn append_content(&mut self, content: Bytes) {
        ContentStreamDictionary::append_content(self, content)
    }

    fn font_name(&mut self, doc: &mut Document, font: &Font) -> Result<(String, CanonicalFont)> {
        ContentStreamDictionary::font_name(self, doc, font)
    }

    fn font_name_from_data(
        &mut self,
        doc: &mut Document,
        id_name: &str,
        data: &[u8],
    ) -> Result<(String, CanonicalFont)> {
        ContentStreamDictionary::font_name_from_data(self, doc, id_name, data)
    }

    fn image_name(
        &mut self,
        doc: &mut Document,
        image: &Image,
    ) -> Result<(String, CanonicalImage)> {
        ContentStreamDictionary::image_name(self, doc, image)
    }

    fn form_name(
        &mut self,
        doc: &mut Document,
        form: &Form,
    ) -> Result<(String, CanonicalFormObject)> {
        ContentStreamDictionary::form_name(self, doc, form)
    }
}

/// Operations that can be added to a content stream.
///
/// Resource names are stored without their leading slash.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Move text position (Td)
    MoveText(f32, f32),
    /// Show text (Tj), WinAnsi-encoded bytes
    ShowText(Vec<u8>),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f32, f32, f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Stroke (S)
    Stroke,
    /// Fill (f)
    Fill,
    /// Paint XObject (Do)
    PaintXObject(String),
    /// Raw operator text
    Raw(String),
}

/// Builds a content stream for a [`ContentStream`] owner.
pub struct ContentWriter<'a, S: ContentStream + ?Sized> {
    owner: &'a mut S,
    operations: Vec<ContentStreamOp>,
    in_text_object: bool,
}

impl<'a, S: ContentStream + ?Sized> ContentWriter<'a, S> {
    /// Start writing for `owner`.
    pub fn new(owner: &'a mut S) -> Self {
        Self {
            owner,
            operations: Vec::new(),
            in_text_object: false,
        }
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations written so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Select a font (Tf), registering it in the owner's resources.
    pub fn set_font(&mut self, doc: &mut Document, font: &Font) -> Result<&mut Self> {
        let (name, _) = self.owner.font_name(doc, font)?;
        Ok(self.op(ContentStreamOp::SetFont(strip_slash(name), font.size())))
    }

    /// Select a raw-data font at `size`.
    pub fn set_font_from_data(
        &mut self,
        doc: &mut Document,
        id_name: &str,
        data: &[u8],
        size: f32,
    ) -> Result<&mut Self> {
        let (name, _) = self.owner.font_name_from_data(doc, id_name, data)?;
        Ok(self.op(ContentStreamOp::SetFont(strip_slash(name), size)))
    }

    /// Show text at the current position.
    ///
    /// Characters outside WinAnsiEncoding are written as `?`.
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.op(ContentStreamOp::ShowText(encode_winansi(text)))
    }

    /// Move to `(x, y)` and show text, opening a text object if needed.
    pub fn text(&mut self, text: &str, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::MoveText(x, y));
        self.show_text(text)
    }

    /// Set fill color with RGB values.
    pub fn set_fill_color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.op(ContentStreamOp::SetFillColorRGB(r, g, b))
    }

    /// Set stroke color with RGB values.
    pub fn set_stroke_color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.op(ContentStreamOp::SetStrokeColorRGB(r, g, b))
    }

    /// Set line width.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Add a rectangle to the path.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    /// Fill the path.
    pub fn fill(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Fill)
    }

    /// Stroke the path.
    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    /// Save graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate a matrix onto the CTM.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> &mut Self {
        self.op(ContentStreamOp::Transform(a, b, c, d, e, f))
    }

    /// Draw an image scaled into the rectangle at `(x, y)`.
    pub fn draw_image(
        &mut self,
        doc: &mut Document,
        image: &Image,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<&mut Self> {
        let (name, _) = self.owner.image_name(doc, image)?;
        self.end_text();
        self.save_state();
        self.transform(width, 0.0, 0.0, height, x, y);
        self.op(ContentStreamOp::PaintXObject(strip_slash(name)));
        Ok(self.restore_state())
    }

    /// Draw a form with its origin at `(x, y)`.
    pub fn draw_form(&mut self, doc: &mut Document, form: &Form, x: f32, y: f32) -> Result<&mut Self> {
        let (name, _) = self.owner.form_name(doc, form)?;
        self.end_text();
        self.save_state();
        self.transform(1.0, 0.0, 0.0, 1.0, x, y);
        self.op(ContentStreamOp::PaintXObject(strip_slash(name)));
        Ok(self.restore_state())
    }

    /// Serialize the operations written so far.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        Ok(buf)
    }

    /// Close any open text object and append the bytes to the owner's content.
    ///
    /// Returns the bytes written by this writer only.
    pub fn finish(mut self) -> Result<Bytes> {
        self.end_text();
        let bytes = Bytes::from(self.build()?);
        log::trace!("Content stream finished: {} ops, {} bytes", self.operations.len(), bytes.len());
        self.owner.append_content(bytes.clone());
        Ok(bytes)
    }
}

fn strip_slash(name: String) -> String {
    match name.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Encode text for a WinAnsi-encoded simple font.
fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if (c as u32) < 0x80 {
                return c as u8;
            }
            (0x80..=0xFFu8)
                .find(|&code| winansi_to_char(code) == Some(c))
                .unwrap_or(b'?')
        })
        .collect()
}

/// Write a single operation to the buffer.
fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", a, b, c, d, e, f)
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, size),
        ContentStreamOp::MoveText(tx, ty) => write!(w, "{} {} Td", tx, ty),
        ContentStreamOp::ShowText(text) => {
            write!(w, "(")?;
            write_escaped_bytes(w, text)?;
            write!(w, ") Tj")
        },
        ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} {} {} rg", r, g, b),
        ContentStreamOp::SetStrokeColorRGB(r, g, b) => write!(w, "{} {} {} RG", r, g, b),
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", width),
        ContentStreamOp::Rectangle(x, y, w_val, h) => {
            write!(w, "{} {} {} {} re", x, y, w_val, h)
        },
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::Fill => write!(w, "f"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
        ContentStreamOp::Raw(raw) => write!(w, "{}", raw),
    }
}
