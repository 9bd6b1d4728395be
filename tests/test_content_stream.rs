//! Integration tests for content-stream dictionaries and the content writer.

use bytes::Bytes;
use pdf_resources::drawing::{ColorSpace, Font, Form, Image, ImageData};
use pdf_resources::writer::{
    CanonicalFont, CanonicalFormObject, CanonicalImage, ContentWriter, ObjectSerializer,
    ResourceCategory,
};
use pdf_resources::{
    ContentStream, ContentStreamDictionary, Dictionary, Document, Object, Result,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A page type that owns a content-stream dictionary and forwards to it.
struct Page {
    media_box: [f32; 4],
    contents: ContentStreamDictionary,
}

impl Page {
    fn new(doc: &Document) -> Self {
        Self {
            media_box: [0.0, 0.0, 612.0, 792.0],
            contents: doc.new_content_stream(),
        }
    }
}

impl ContentStream for Page {
    fn resources(&self) -> Option<&Dictionary> {
        self.contents.resources()
    }

    fn append_content(&mut self, content: Bytes) {
        self.contents.append_content(content)
    }

    fn font_name(&mut self, doc: &mut Document, font: &Font) -> Result<(String, CanonicalFont)> {
        self.contents.font_name(doc, font)
    }

    fn font_name_from_data(
        &mut self,
        doc: &mut Document,
        id_name: &str,
        data: &[u8],
    ) -> Result<(String, CanonicalFont)> {
        self.contents.font_name_from_data(doc, id_name, data)
    }

    fn image_name(&mut self, doc: &mut Document, image: &Image) -> Result<(String, CanonicalImage)> {
        self.contents.image_name(doc, image)
    }

    fn form_name(
        &mut self,
        doc: &mut Document,
        form: &Form,
    ) -> Result<(String, CanonicalFormObject)> {
        self.contents.form_name(doc, form)
    }
}

fn gray_image() -> Image {
    Image::new(ImageData::new(2, 2, ColorSpace::DeviceGray, vec![10, 20, 30, 40]))
}

#[test]
fn test_trait_object_names_like_inherent_calls() {
    init_logging();
    let mut doc = Document::new();
    let mut direct = doc.new_content_stream();
    let mut page = Page::new(&doc);

    let font = Font::new("Helvetica", 12.0);
    let image = gray_image();
    let form = Form::new([0.0, 0.0, 5.0, 5.0], &b"q Q"[..]);

    let via_trait: &mut dyn ContentStream = &mut page;
    let t_font = via_trait.font_name(&mut doc, &font).unwrap();
    let t_image = via_trait.image_name(&mut doc, &image).unwrap();
    let t_form = via_trait.form_name(&mut doc, &form).unwrap();

    let d_font = direct.font_name(&mut doc, &font).unwrap();
    let d_image = direct.image_name(&mut doc, &image).unwrap();
    let d_form = direct.form_name(&mut doc, &form).unwrap();

    assert_eq!(t_font, d_font);
    assert_eq!(t_image, d_image);
    assert_eq!(t_form, d_form);
    assert_eq!(page.resources(), direct.resources());
    assert_eq!(page.media_box[2], 612.0);
}

#[test]
fn test_writer_produces_consistent_stream() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();
    let logo = Form::new([0.0, 0.0, 20.0, 20.0], &b"0 0 20 20 re f"[..]);

    let mut writer = page.writer();
    writer
        .set_font(&mut doc, &Font::new("Times", 14.0))
        .unwrap()
        .text("Title", 72.0, 740.0)
        .set_font(&mut doc, &Font::new("Courier", 9.0))
        .unwrap()
        .text("code", 72.0, 700.0);
    writer.draw_image(&mut doc, &gray_image(), 72.0, 500.0, 144.0, 144.0).unwrap();
    writer.draw_form(&mut doc, &logo, 300.0, 500.0).unwrap();
    writer.draw_form(&mut doc, &logo, 400.0, 500.0).unwrap();
    let content = String::from_utf8(writer.finish().unwrap().to_vec()).unwrap();

    assert_eq!(
        content,
        "/F1 14 Tf\nBT\n72 740 Td\n(Title) Tj\n/F2 9 Tf\n72 700 Td\n(code) Tj\nET\n\
         q\n144 0 0 144 72 500 cm\n/Im1 Do\nQ\n\
         q\n1 0 0 1 300 500 cm\n/Fm1 Do\nQ\n\
         q\n1 0 0 1 400 500 cm\n/Fm1 Do\nQ\n"
    );

    // Every name used in the stream resolves in the stream's resources
    let registry = page.registry();
    for name in ["/F1", "/F2"] {
        assert!(registry.resolve(ResourceCategory::Font, name).is_some());
    }
    for name in ["/Im1", "/Fm1"] {
        assert!(registry.resolve(ResourceCategory::XObject, name).is_some());
    }
    assert_eq!(registry.len(), 4);
}

#[test]
fn test_writer_on_custom_owner() {
    let mut doc = Document::new();
    let mut page = Page::new(&doc);

    let mut writer = ContentWriter::new(&mut page);
    writer
        .set_font(&mut doc, &Font::new("Helvetica", 10.0))
        .unwrap()
        .text("hi", 0.0, 0.0);
    writer.finish().unwrap();

    assert_eq!(&page.contents.content()[..], b"/F1 10 Tf\nBT\n0 0 Td\n(hi) Tj\nET\n");
    assert!(page.resources().is_some());
}

#[test]
fn test_second_writer_appends_to_content() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();

    let mut first = page.writer();
    first
        .set_font(&mut doc, &Font::new("Helvetica", 12.0))
        .unwrap()
        .text("first", 0.0, 0.0);
    first.finish().unwrap();

    let mut second = page.writer();
    second
        .set_font(&mut doc, &Font::new("Times", 12.0))
        .unwrap()
        .text("second", 0.0, 20.0);
    let written = second.finish().unwrap();
    assert_eq!(&written[..], b"/F2 12 Tf\nBT\n0 20 Td\n(second) Tj\nET\n");

    let content = String::from_utf8(page.content().to_vec()).unwrap();
    assert_eq!(
        content,
        "/F1 12 Tf\nBT\n0 0 Td\n(first) Tj\nET\n\
         /F2 12 Tf\nBT\n0 20 Td\n(second) Tj\nET\n"
    );

    // Every registered font is used by the accumulated stream
    for (name, _) in page.registry().entries(ResourceCategory::Font) {
        assert!(content.contains(&format!("{} 12 Tf", name)), "{} unused", name);
    }
}

#[test]
fn test_failed_font_leaves_writer_and_resources_untouched() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();

    let mut writer = page.writer();
    let result = writer.set_font(&mut doc, &Font::new("No Such Family", 12.0));
    assert!(result.is_err());
    assert!(writer.operations().is_empty());
    drop(writer);

    assert!(page.resources().is_none());
}

#[test]
fn test_stream_object_shape() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();
    page.elements_mut()
        .insert("Type".to_string(), Object::name("XObject"));

    let empty = ObjectSerializer::compact().serialize_to_string(&page.to_object());
    assert_eq!(empty, "<</Type /XObject /Length 0>>\nstream\n\nendstream");

    let mut writer = page.writer();
    writer.set_font(&mut doc, &Font::new("Helvetica", 12.0)).unwrap();
    writer.finish().unwrap();

    let font_ref = page
        .registry()
        .resolve(ResourceCategory::Font, "/F1")
        .unwrap();
    let serialized = ObjectSerializer::compact().serialize_to_string(&page.to_object());
    assert!(serialized.starts_with(&format!(
        "<</Type /XObject /Resources <</Font <</F1 {}>>>> /Length 10>>",
        font_ref
    )));
}

#[test]
fn test_nested_form_resources() {
    let mut doc = Document::new();

    // Build a badge whose content uses its own font
    let mut badge = doc.new_content_stream();
    let mut writer = badge.writer();
    writer
        .set_font(&mut doc, &Font::new("Helvetica", 8.0))
        .unwrap()
        .text("OK", 2.0, 2.0);
    writer.finish().unwrap();
    let badge_form = badge.to_form([0.0, 0.0, 30.0, 12.0]);

    let mut page = doc.new_content_stream();
    let (name, canonical) = page.form_name(&mut doc, &badge_form).unwrap();
    assert_eq!(name, "/Fm1");

    let obj = doc.get(canonical.reference()).unwrap();
    let resources = obj
        .as_dict()
        .and_then(|d| d.get("Resources"))
        .and_then(Object::as_dict)
        .unwrap();
    assert!(resources.contains_key("Font"));
    assert!(obj.stream_data().unwrap().starts_with(b"/F1 8 Tf\nBT"));
}
