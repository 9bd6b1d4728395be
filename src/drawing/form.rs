//! Drawing-layer forms (reusable content).

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use crate::object::Dictionary;

static NEXT_FORM_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a form. Allocated once at construction; clones share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(u64);

impl FormId {
    fn next() -> Self {
        FormId(NEXT_FORM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A reusable piece of page content, embedded as a form XObject.
///
/// Forms are deduplicated by identity, not content: two forms built
/// separately from the same operators are distinct resources.
#[derive(Debug, Clone)]
pub struct Form {
    id: FormId,
    bbox: [f32; 4],
    matrix: Option<[f32; 6]>,
    content: Bytes,
    resources: Option<Dictionary>,
}

impl Form {
    /// Create a form with a bounding box (llx, lly, urx, ury) and content operators.
    pub fn new(bbox: [f32; 4], content: impl Into<Bytes>) -> Self {
        Self {
            id: FormId::next(),
            bbox,
            matrix: None,
            content: content.into(),
            resources: None,
        }
    }

    /// Set the form matrix.
    pub fn with_matrix(mut self, matrix: [f32; 6]) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Set the `/Resources` the form's content refers to.
    pub fn with_resources(mut self, resources: Dictionary) -> Self {
        self.resources = Some(resources);
        self
    }

    /// The form's identity.
    pub fn id(&self) -> FormId {
        self.id
    }

    /// Bounding box in form space.
    pub fn bbox(&self) -> [f32; 4] {
        self.bbox
    }

    /// Form matrix, if set.
    pub fn matrix(&self) -> Option<[f32; 6]> {
        self.matrix
    }

    /// Content stream bytes.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Resources of the form's content, if any.
    pub fn resources(&self) -> Option<&Dictionary> {
        self.resources.as_ref()
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }
}
