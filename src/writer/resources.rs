//! Per-dictionary resource registry.
//!
//! Every content stream names the resources it uses through its own
//! `/Resources` dictionary. The registry assigns those local names and
//! keeps the dictionary in sync:
//!
//! ```text
//! <</Font <</F1 4 0 R /F2 5 0 R>> /XObject <</Im1 6 0 R /Fm1 7 0 R>>>>
//! ```
//!
//! Names are unique within a category and stable: registering the same
//! canonical object again yields the name it already has. The dictionary
//! is only created on the first registration, so a stream that never
//! uses a resource carries no `/Resources` at all.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::store::ObjectStore;

lazy_static! {
    /// Resource names as written in content streams: `/F1`, `/Im12`
    static ref RE_RESOURCE_NAME: Regex = Regex::new(r"^/[A-Za-z][A-Za-z0-9]*$").unwrap();
}

/// Check that `name` (with its leading slash) is a usable resource name.
pub fn is_valid_resource_name(name: &str) -> bool {
    RE_RESOURCE_NAME.is_match(name)
}

/// Subdictionary of `/Resources` a resource is listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    /// `/Font`
    Font,
    /// `/XObject`
    XObject,
}

impl ResourceCategory {
    /// Key of the subdictionary.
    pub fn key(&self) -> &'static str {
        match self {
            ResourceCategory::Font => "Font",
            ResourceCategory::XObject => "XObject",
        }
    }
}

/// Kind of resource being registered.
///
/// Images and forms share the `/XObject` category but are numbered
/// independently (`/Im1`, `/Fm1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Font dictionary
    Font,
    /// Image XObject
    Image,
    /// Form XObject
    Form,
}

impl ResourceKind {
    /// Category the kind is listed in.
    pub fn category(&self) -> ResourceCategory {
        match self {
            ResourceKind::Font => ResourceCategory::Font,
            ResourceKind::Image | ResourceKind::Form => ResourceCategory::XObject,
        }
    }

    fn index(&self) -> usize {
        match self {
            ResourceKind::Font => 0,
            ResourceKind::Image => 1,
            ResourceKind::Form => 2,
        }
    }
}

/// Assigns local resource names for one dictionary.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    /// Name prefixes, indexed by [`ResourceKind::index`]
    prefixes: [String; 3],
    /// Last number handed out per kind
    counters: [u32; 3],
    /// The `/Resources` dictionary, created on first registration
    resources: Option<Dictionary>,
    /// Reverse index: canonical object -> local name (without slash)
    names: HashMap<(ResourceCategory, ObjectRef), String>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            prefixes: [
                config.font_prefix.clone(),
                config.image_prefix.clone(),
                config.form_prefix.clone(),
            ],
            counters: [0; 3],
            resources: None,
            names: HashMap::new(),
        }
    }

    /// Adopt an existing `/Resources` dictionary.
    ///
    /// Existing `/Font` and `/XObject` entries keep their names and are
    /// reused when the same object is registered again. Category
    /// subdictionaries held by reference are copied inline so that
    /// registering new names never mutates a dictionary shared with other
    /// streams. Other categories are carried through untouched.
    pub fn from_dictionary(
        config: &RegistryConfig,
        mut resources: Dictionary,
        store: &ObjectStore,
    ) -> Result<Self> {
        let mut registry = Self::new(config);

        for category in [ResourceCategory::Font, ResourceCategory::XObject] {
            let Some(entry) = resources.get_mut(category.key()) else {
                continue;
            };

            if let Object::Reference(r) = *entry {
                let target = store.resolve(entry)?;
                let dict = target.as_dict().cloned().ok_or_else(|| Error::InvalidObjectType {
                    expected: "Dictionary".to_string(),
                    found: target.type_name().to_string(),
                })?;
                log::debug!("Inlining /{} subdictionary from {}", category.key(), r);
                *entry = Object::Dictionary(dict);
            }

            let dict = match entry {
                Object::Dictionary(d) => d,
                other => {
                    return Err(Error::InvalidObjectType {
                        expected: "Dictionary".to_string(),
                        found: other.type_name().to_string(),
                    })
                },
            };

            for (name, value) in dict.iter() {
                match value.as_reference() {
                    Some(r) => {
                        registry
                            .names
                            .entry((category, r))
                            .or_insert_with(|| name.clone());
                    },
                    None => log::warn!(
                        "Keeping non-reference /{} entry /{} ({})",
                        category.key(),
                        name,
                        value.type_name()
                    ),
                }
            }
        }

        registry.resources = Some(resources);
        Ok(registry)
    }

    /// Register a canonical object and return its local name (`/F1`).
    ///
    /// Returns the existing name if the object is already registered in
    /// its category.
    pub fn register(&mut self, kind: ResourceKind, reference: ObjectRef) -> String {
        let category = kind.category();
        if let Some(name) = self.names.get(&(category, reference)) {
            log::trace!("Reusing /{} for {}", name, reference);
            return format!("/{}", name);
        }

        let name = self.next_name(kind);
        let resources = self.resources.get_or_insert_with(Dictionary::new);
        let entry = resources
            .entry(category.key().to_string())
            .or_insert_with(|| Object::Dictionary(Dictionary::new()));
        if !matches!(entry, Object::Dictionary(_)) {
            log::warn!(
                "Replacing malformed /{} entry ({})",
                category.key(),
                entry.type_name()
            );
            *entry = Object::Dictionary(Dictionary::new());
        }
        if let Object::Dictionary(dict) = entry {
            dict.insert(name.clone(), Object::Reference(reference));
        }
        self.names.insert((category, reference), name.clone());

        log::debug!("Registered {} as /{}", reference, name);
        format!("/{}", name)
    }

    /// Next unused name for `kind`.
    ///
    /// Numbers already taken in the category (adopted entries, or another
    /// kind sharing a prefix) are skipped.
    fn next_name(&mut self, kind: ResourceKind) -> String {
        let idx = kind.index();
        loop {
            self.counters[idx] += 1;
            let candidate = format!("{}{}", self.prefixes[idx], self.counters[idx]);
            if !self.contains_name(kind.category(), &candidate) {
                return candidate;
            }
        }
    }

    fn contains_name(&self, category: ResourceCategory, name: &str) -> bool {
        self.category_dict(category)
            .is_some_and(|dict| dict.contains_key(name))
    }

    fn category_dict(&self, category: ResourceCategory) -> Option<&Dictionary> {
        self.resources
            .as_ref()
            .and_then(|r| r.get(category.key()))
            .and_then(Object::as_dict)
    }

    /// Local name of an already registered object.
    pub fn name_of(&self, kind: ResourceKind, reference: ObjectRef) -> Option<String> {
        self.names
            .get(&(kind.category(), reference))
            .map(|name| format!("/{}", name))
    }

    /// Object a local name refers to. The leading slash is optional.
    pub fn resolve(&self, category: ResourceCategory, name: &str) -> Option<ObjectRef> {
        let name = name.strip_prefix('/').unwrap_or(name);
        self.category_dict(category)
            .and_then(|dict| dict.get(name))
            .and_then(Object::as_reference)
    }

    /// Entries of a category in registration order, names with slash.
    pub fn entries(&self, category: ResourceCategory) -> Vec<(String, ObjectRef)> {
        self.category_dict(category)
            .map(|dict| {
                dict.iter()
                    .filter_map(|(name, value)| {
                        value.as_reference().map(|r| (format!("/{}", name), r))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of registered objects across all categories.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The `/Resources` dictionary, if any resource has been registered
    /// or one was adopted.
    pub fn resources(&self) -> Option<&Dictionary> {
        self.resources.as_ref()
    }

    /// Take the `/Resources` dictionary.
    pub fn into_resources(self) -> Option<Dictionary> {
        self.resources
    }
}
