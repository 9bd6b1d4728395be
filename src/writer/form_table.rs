//! Canonical form table.

use crate::drawing::{Form, FormId};
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::store::ObjectStore;

use super::canonical::CanonicalTable;

/// The canonical form XObject of one form in one document.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalFormObject {
    reference: ObjectRef,
    bbox: [f32; 4],
}

impl CanonicalFormObject {
    /// Indirect reference to the form XObject.
    pub fn reference(&self) -> ObjectRef {
        self.reference
    }

    /// Bounding box of the form.
    pub fn bbox(&self) -> [f32; 4] {
        self.bbox
    }
}

/// Builds form XObjects for the form table.
pub trait FormMaterializer: Send + Sync {
    /// Build the form XObject stream for `form`.
    fn materialize_form(&self, form: &Form, store: &mut ObjectStore) -> Result<Object>;
}

/// Default form materializer (ISO 32000-1 Section 8.10, FormType 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormMaterializer;

impl FormMaterializer for DefaultFormMaterializer {
    fn materialize_form(&self, form: &Form, _store: &mut ObjectStore) -> Result<Object> {
        let mut dict = Dictionary::new();
        dict.insert("Type".to_string(), Object::name("XObject"));
        dict.insert("Subtype".to_string(), Object::name("Form"));
        dict.insert("FormType".to_string(), Object::Integer(1));
        dict.insert("BBox".to_string(), Object::reals(&form.bbox()));
        if let Some(matrix) = form.matrix() {
            dict.insert("Matrix".to_string(), Object::reals(&matrix));
        }
        if let Some(resources) = form.resources() {
            dict.insert("Resources".to_string(), Object::Dictionary(resources.clone()));
        }
        dict.insert(
            "Length".to_string(),
            Object::Integer(form.content().len() as i64),
        );
        Ok(Object::Stream {
            dict,
            data: form.content().clone(),
        })
    }
}

/// The document's form table, keyed by form identity.
#[derive(Debug, Clone, Default)]
pub struct FormTable {
    table: CanonicalTable<FormId, CanonicalFormObject>,
}

impl FormTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form XObject for `form`.
    pub fn get_form(
        &mut self,
        form: &Form,
        materializer: &dyn FormMaterializer,
        store: &mut ObjectStore,
    ) -> Result<CanonicalFormObject> {
        if let Some(existing) = self.table.get(&form.id()) {
            log::trace!("Form table hit for form {} -> {}", form.id().get(), existing.reference);
            return Ok(existing.clone());
        }

        self.table.get_or_try_insert_with(form.id(), || {
            let mark = store.mark();
            let obj = match materializer
                .materialize_form(form, store)
                .and_then(check_form_object)
            {
                Ok(obj) => obj,
                Err(e) => {
                    store.rollback(mark);
                    return Err(e);
                },
            };
            let reference = store.insert(obj);
            log::debug!("Materialized form {} as {}", form.id().get(), reference);
            Ok(CanonicalFormObject {
                reference,
                bbox: form.bbox(),
            })
        })
    }

    /// Number of canonical forms.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if no form has been materialized.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn check_form_object(obj: Object) -> Result<Object> {
    let is_form = matches!(&obj, Object::Stream { dict, .. }
        if dict.get("Subtype").and_then(Object::as_name) == Some("Form"));
    if is_form {
        Ok(obj)
    } else {
        Err(Error::Materializer(format!(
            "form materializer returned {} instead of a form XObject stream",
            obj.type_name()
        )))
    }
}
