//! Integration tests for per-dictionary resource naming.
//!
//! Covers name assignment, stability and uniqueness, lazy creation of
//! `/Resources`, and the serialized shape of the resource dictionary.

use pdf_resources::drawing::{ColorSpace, Font, Form, Image, ImageData};
use pdf_resources::writer::{
    is_valid_resource_name, ObjectSerializer, ResourceCategory, ResourceKind, ResourceRegistry,
};
use pdf_resources::{Dictionary, Document, Object, ObjectRef, RegistryConfig};
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_first_font_is_f1() {
    init_logging();
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();

    let (name, _) = page.font_name(&mut doc, &Font::new("Helvetica", 12.0)).unwrap();
    assert_eq!(name, "/F1");
}

#[test]
fn test_name_is_stable_per_dictionary() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();

    let (first, a) = page.font_name(&mut doc, &Font::new("Times", 12.0)).unwrap();
    let (second, b) = page.font_name(&mut doc, &Font::new("Times", 18.0)).unwrap();
    assert_eq!(first, second);
    assert_eq!(a.reference(), b.reference());
    assert_eq!(page.registry().len(), 1);
}

#[test]
fn test_distinct_fonts_get_distinct_names() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();

    let names: Vec<String> = ["Helvetica", "Times", "Courier", "Symbol"]
        .iter()
        .map(|family| page.font_name(&mut doc, &Font::new(*family, 10.0)).unwrap().0)
        .collect();
    assert_eq!(names, ["/F1", "/F2", "/F3", "/F4"]);
}

#[test]
fn test_names_are_local_to_each_dictionary() {
    let mut doc = Document::new();
    let mut page1 = doc.new_content_stream();
    let mut page2 = doc.new_content_stream();

    page1.font_name(&mut doc, &Font::new("Helvetica", 12.0)).unwrap();
    let (p1_times, t1) = page1.font_name(&mut doc, &Font::new("Times", 12.0)).unwrap();
    let (p2_times, t2) = page2.font_name(&mut doc, &Font::new("Times", 12.0)).unwrap();

    // Same canonical object, different local names
    assert_eq!(t1.reference(), t2.reference());
    assert_eq!(p1_times, "/F2");
    assert_eq!(p2_times, "/F1");
}

#[test]
fn test_interleaved_font_image_font() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();
    let image = Image::new(ImageData::new(1, 1, ColorSpace::DeviceRGB, vec![255, 0, 0]));

    let (f1, helvetica) = page.font_name(&mut doc, &Font::new("Helvetica", 12.0)).unwrap();
    let (im1, red) = page.image_name(&mut doc, &image).unwrap();
    let (f2, courier) = page.font_name(&mut doc, &Font::new("Courier", 12.0)).unwrap();
    assert_eq!([f1.as_str(), im1.as_str(), f2.as_str()], ["/F1", "/Im1", "/F2"]);

    let registry = page.registry();
    assert_eq!(
        registry.entries(ResourceCategory::Font),
        vec![
            ("/F1".to_string(), helvetica.reference()),
            ("/F2".to_string(), courier.reference()),
        ]
    );
    assert_eq!(
        registry.entries(ResourceCategory::XObject),
        vec![("/Im1".to_string(), red.reference())]
    );
}

#[test]
fn test_resources_created_lazily() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();
    assert!(page.resources().is_none());

    let form = Form::new([0.0, 0.0, 10.0, 10.0], &b"0 0 10 10 re f"[..]);
    page.form_name(&mut doc, &form).unwrap();

    let resources = page.resources().unwrap();
    assert!(resources.contains_key("XObject"));
    assert!(!resources.contains_key("Font"));
}

#[test]
fn test_serialized_resources_shape() {
    let mut doc = Document::new();
    let mut page = doc.new_content_stream();
    let helvetica = page.font_name(&mut doc, &Font::new("Helvetica", 12.0)).unwrap().1;
    let courier = page.font_name(&mut doc, &Font::new("Courier", 12.0)).unwrap().1;
    let form = Form::new([0.0, 0.0, 1.0, 1.0], &b""[..]);
    let fm = page.form_name(&mut doc, &form).unwrap().1;

    let serialized = ObjectSerializer::compact()
        .serialize_to_string(&Object::Dictionary(page.resources().unwrap().clone()));
    assert_eq!(
        serialized,
        format!(
            "<</Font <</F1 {} /F2 {}>> /XObject <</Fm1 {}>>>>",
            helvetica.reference(),
            courier.reference(),
            fm.reference()
        )
    );
}

#[test]
fn test_custom_prefixes() {
    let config = RegistryConfig::default()
        .with_font_prefix("Font")
        .with_image_prefix("Img")
        .with_form_prefix("Frm");
    let mut doc = Document::with_config(config).unwrap();
    let mut page = doc.new_content_stream();

    let (font, _) = page.font_name(&mut doc, &Font::new("Courier", 8.0)).unwrap();
    let form = Form::new([0.0, 0.0, 1.0, 1.0], &b""[..]);
    let (form_name, _) = page.form_name(&mut doc, &form).unwrap();
    assert_eq!(font, "/Font1");
    assert_eq!(form_name, "/Frm1");
}

#[test]
fn test_adopted_names_are_not_reused() {
    let mut xobjects = Dictionary::new();
    xobjects.insert("Im1".to_string(), Object::Reference(ObjectRef::new(50, 0)));
    xobjects.insert("Fm1".to_string(), Object::Reference(ObjectRef::new(51, 0)));
    let mut resources = Dictionary::new();
    resources.insert("XObject".to_string(), Object::Dictionary(xobjects));

    let doc = Document::new();
    let mut registry =
        ResourceRegistry::from_dictionary(doc.config(), resources, doc.store()).unwrap();

    assert_eq!(registry.register(ResourceKind::Form, ObjectRef::new(51, 0)), "/Fm1");
    assert_eq!(registry.register(ResourceKind::Image, ObjectRef::new(60, 0)), "/Im2");
    assert_eq!(registry.register(ResourceKind::Form, ObjectRef::new(61, 0)), "/Fm2");
    assert_eq!(
        registry.resolve(ResourceCategory::XObject, "/Im2"),
        Some(ObjectRef::new(60, 0))
    );
}

fn kind_strategy() -> impl Strategy<Value = ResourceKind> {
    prop_oneof![
        Just(ResourceKind::Font),
        Just(ResourceKind::Image),
        Just(ResourceKind::Form),
    ]
}

proptest! {
    #[test]
    fn prop_names_unique_and_stable(
        ops in prop::collection::vec((kind_strategy(), 1u32..20), 1..60)
    ) {
        let mut registry = ResourceRegistry::new(&RegistryConfig::default());
        let mut seen: std::collections::HashMap<(ResourceCategory, ObjectRef), String> =
            std::collections::HashMap::new();

        for (kind, id) in ops {
            let reference = ObjectRef::new(id, 0);
            let name = registry.register(kind, reference);
            prop_assert!(is_valid_resource_name(&name));

            let key = (kind.category(), reference);
            if let Some(previous) = seen.get(&key) {
                prop_assert_eq!(previous, &name);
            }
            seen.insert(key, name.clone());
            prop_assert_eq!(registry.resolve(kind.category(), &name), Some(reference));
        }

        for category in [ResourceCategory::Font, ResourceCategory::XObject] {
            let entries = registry.entries(category);
            let mut names: Vec<_> = entries.iter().map(|(n, _)| n.clone()).collect();
            let total = names.len();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), total);

            let mut refs: Vec<_> = entries.iter().map(|(_, r)| *r).collect();
            refs.sort();
            refs.dedup();
            prop_assert_eq!(refs.len(), total);
        }
        prop_assert_eq!(registry.len(), seen.len());
    }
}
