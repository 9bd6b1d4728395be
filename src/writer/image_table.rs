//! Canonical image table.

use bytes::Bytes;

use crate::drawing::{Fingerprint, Image};
use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use crate::store::ObjectStore;

use super::canonical::CanonicalTable;

/// The canonical image XObject of one image in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage {
    reference: ObjectRef,
    width: u32,
    height: u32,
}

impl CanonicalImage {
    /// Indirect reference to the image XObject.
    pub fn reference(&self) -> ObjectRef {
        self.reference
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Builds image XObjects for the image table.
pub trait ImageMaterializer: Send + Sync {
    /// Build the image XObject stream for `image`.
    ///
    /// A soft mask, if any, may be inserted into `store` beforehand.
    fn materialize_image(&self, image: &Image, store: &mut ObjectStore) -> Result<Object>;
}

/// Default image materializer: one image XObject plus an optional `/SMask`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImageMaterializer;

impl ImageMaterializer for DefaultImageMaterializer {
    fn materialize_image(&self, image: &Image, store: &mut ObjectStore) -> Result<Object> {
        let data = image.data();
        let mut dict = data.build_xobject_dict();

        if let (Some(mask_dict), Some(mask)) = (data.build_soft_mask_dict(), &data.soft_mask) {
            let smask = store.insert(Object::Stream {
                dict: mask_dict,
                data: Bytes::copy_from_slice(mask),
            });
            dict.insert("SMask".to_string(), Object::Reference(smask));
        }

        Ok(Object::Stream {
            dict,
            data: Bytes::copy_from_slice(&data.data),
        })
    }
}

/// The document's image table, keyed by content fingerprint.
#[derive(Debug, Clone, Default)]
pub struct ImageTable {
    table: CanonicalTable<Fingerprint, CanonicalImage>,
}

impl ImageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical image XObject for `image`.
    pub fn get_image(
        &mut self,
        image: &Image,
        materializer: &dyn ImageMaterializer,
        store: &mut ObjectStore,
    ) -> Result<CanonicalImage> {
        let key = *image.fingerprint();
        if let Some(existing) = self.table.get(&key) {
            log::trace!("Image table hit -> {}", existing.reference);
            return Ok(existing.clone());
        }

        self.table.get_or_try_insert_with(key, || {
            let mark = store.mark();
            let obj = match materializer
                .materialize_image(image, store)
                .and_then(check_image_object)
            {
                Ok(obj) => obj,
                Err(e) => {
                    store.rollback(mark);
                    return Err(e);
                },
            };
            let reference = store.insert(obj);
            log::debug!(
                "Materialized {}x{} image as {}",
                image.width(),
                image.height(),
                reference
            );
            Ok(CanonicalImage {
                reference,
                width: image.width(),
                height: image.height(),
            })
        })
    }

    /// Number of canonical images.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if no image has been materialized.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn check_image_object(obj: Object) -> Result<Object> {
    let is_image = matches!(&obj, Object::Stream { dict, .. }
        if dict.get("Subtype").and_then(Object::as_name) == Some("Image"));
    if is_image {
        Ok(obj)
    } else {
        Err(Error::Materializer(format!(
            "image materializer returned {} instead of an image XObject stream",
            obj.type_name()
        )))
    }
}
