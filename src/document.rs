//! Document context.
//!
//! A [`Document`] owns the object store and the canonical tables for
//! fonts, images and forms. Every content-stream dictionary of the document
//! names its resources through it, so equal drawing resources end up as one
//! shared object however many pages use them.
//!
//! Documents are not internally synchronized. [`SharedDocument`] wraps one
//! in a mutex for builders running on several threads; each naming call
//! then holds the lock for the whole lookup-or-materialize step.

use std::sync::{Arc, Mutex};

use crate::config::RegistryConfig;
use crate::drawing::{Font, Form, GlyphSourceResolver, Image, StandardFontResolver};
use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use crate::store::ObjectStore;
use crate::writer::{
    CanonicalFont, CanonicalFormObject, CanonicalImage, ContentStreamDictionary,
    DefaultFontMaterializer, DefaultFormMaterializer, DefaultImageMaterializer, FontMaterializer,
    FontTable, FormMaterializer, FormTable, ImageMaterializer, ImageTable,
};

/// A PDF document under construction.
pub struct Document {
    config: RegistryConfig,
    store: ObjectStore,
    fonts: FontTable,
    images: ImageTable,
    forms: FormTable,
    font_resolver: Box<dyn GlyphSourceResolver>,
    font_materializer: Box<dyn FontMaterializer>,
    image_materializer: Box<dyn ImageMaterializer>,
    form_materializer: Box<dyn FormMaterializer>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("config", &self.config)
            .field("objects", &self.store.len())
            .field("fonts", &self.fonts.len())
            .field("images", &self.images.len())
            .field("forms", &self.forms.len())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create an empty document with default naming and materializers.
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
            store: ObjectStore::new(),
            fonts: FontTable::new(),
            images: ImageTable::new(),
            forms: FormTable::new(),
            font_resolver: Box::new(StandardFontResolver),
            font_materializer: Box::new(DefaultFontMaterializer),
            image_materializer: Box::new(DefaultImageMaterializer),
            form_materializer: Box::new(DefaultFormMaterializer),
        }
    }

    /// Create a document with custom resource naming.
    ///
    /// Fails if a prefix would not produce valid resource names.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Use `resolver` to turn typefaces into glyph sources.
    pub fn with_font_resolver(mut self, resolver: impl GlyphSourceResolver + 'static) -> Self {
        self.font_resolver = Box::new(resolver);
        self
    }

    /// Replace the font materializer.
    pub fn with_font_materializer(mut self, materializer: impl FontMaterializer + 'static) -> Self {
        self.font_materializer = Box::new(materializer);
        self
    }

    /// Replace the image materializer.
    pub fn with_image_materializer(
        mut self,
        materializer: impl ImageMaterializer + 'static,
    ) -> Self {
        self.image_materializer = Box::new(materializer);
        self
    }

    /// Replace the form materializer.
    pub fn with_form_materializer(mut self, materializer: impl FormMaterializer + 'static) -> Self {
        self.form_materializer = Box::new(materializer);
        self
    }

    /// Naming configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Mutable access to the object store, for objects outside the canonical tables.
    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    /// Add an indirect object.
    pub fn add_object(&mut self, obj: Object) -> ObjectRef {
        self.store.insert(obj)
    }

    /// Dereference an indirect reference.
    pub fn get(&self, r: ObjectRef) -> Result<&Object> {
        self.store.get(r)
    }

    /// New content-stream dictionary using this document's naming.
    pub fn new_content_stream(&self) -> ContentStreamDictionary {
        ContentStreamDictionary::new(self)
    }

    /// Canonical font for `font`, materialized on first use.
    pub fn canonical_font(&mut self, font: &Font) -> Result<CanonicalFont> {
        self.fonts.get_font(
            font,
            &*self.font_resolver,
            &*self.font_materializer,
            &mut self.store,
        )
    }

    /// Canonical font for raw font data identified by `id_name`.
    pub fn canonical_font_from_data(&mut self, id_name: &str, data: &[u8]) -> Result<CanonicalFont> {
        self.fonts.get_font_from_data(
            id_name,
            data,
            &*self.font_materializer,
            &mut self.store,
        )
    }

    /// Canonical image XObject for `image`.
    pub fn canonical_image(&mut self, image: &Image) -> Result<CanonicalImage> {
        self.images
            .get_image(image, &*self.image_materializer, &mut self.store)
    }

    /// Canonical form XObject for `form`.
    pub fn canonical_form(&mut self, form: &Form) -> Result<CanonicalFormObject> {
        self.forms
            .get_form(form, &*self.form_materializer, &mut self.store)
    }

    /// The font table.
    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    /// Number of canonical images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Number of canonical forms.
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    /// Share the document between threads.
    pub fn into_shared(self) -> SharedDocument {
        SharedDocument::new(self)
    }
}

/// A document shared between builders on several threads.
///
/// Cloning is cheap; clones refer to the same document.
#[derive(Clone, Debug)]
pub struct SharedDocument {
    inner: Arc<Mutex<Document>>,
}

impl SharedDocument {
    /// Wrap a document.
    pub fn new(doc: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(doc)),
        }
    }

    /// Run `f` with exclusive access to the document.
    ///
    /// ```ignore
    /// let (name, _) = shared.with(|doc| page.font_name(doc, &font))?;
    /// ```
    pub fn with<R>(&self, f: impl FnOnce(&mut Document) -> Result<R>) -> Result<R> {
        let mut doc = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        f(&mut *doc)
    }

    /// Take the document back once every other handle is gone.
    pub fn into_inner(self) -> Result<Document> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().map_err(|_| Error::LockPoisoned),
            Err(inner) => Err(Error::StillShared(Arc::strong_count(&inner) - 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{ColorSpace, ImageData};

    #[test]
    fn test_with_config_validates() {
        let bad = RegistryConfig::default().with_font_prefix("9");
        assert!(matches!(
            Document::with_config(bad),
            Err(Error::InvalidResourceName(_))
        ));
        let good = Document::with_config(RegistryConfig::default().with_font_prefix("Font")).unwrap();
        assert_eq!(good.config().font_prefix, "Font");
    }

    #[test]
    fn test_canonical_objects_are_shared() {
        let mut doc = Document::new();
        let a = doc.canonical_font(&Font::new("Helvetica", 10.0)).unwrap();
        let b = doc.canonical_font(&Font::new("Helvetica", 20.0)).unwrap();
        assert_eq!(a.reference(), b.reference());

        let image = Image::new(ImageData::new(1, 1, ColorSpace::DeviceGray, vec![0]));
        let i1 = doc.canonical_image(&image).unwrap();
        let i2 = doc.canonical_image(&image.clone()).unwrap();
        assert_eq!(i1, i2);
        assert_eq!(doc.fonts().len(), 1);
        assert_eq!(doc.image_count(), 1);
        assert_eq!(doc.store().len(), 2);
    }

    #[test]
    fn test_custom_resolver() {
        struct Nothing;
        impl GlyphSourceResolver for Nothing {
            fn resolve(&self, _: &crate::drawing::Typeface) -> Option<crate::drawing::GlyphSource> {
                None
            }
        }

        let mut doc = Document::new().with_font_resolver(Nothing);
        assert!(matches!(
            doc.canonical_font(&Font::new("Helvetica", 12.0)),
            Err(Error::Font(_))
        ));
    }

    #[test]
    fn test_shared_into_inner() {
        let shared = Document::new().into_shared();
        let other = shared.clone();
        shared
            .with(|doc| doc.canonical_font(&Font::new("Courier", 10.0)))
            .unwrap();

        let shared = match shared.into_inner() {
            Err(Error::StillShared(1)) => other,
            result => panic!("unexpected: {:?}", result.map(|_| ())),
        };
        let doc = shared.into_inner().unwrap();
        assert_eq!(doc.fonts().len(), 1);
    }
}
