//! Configuration for resource naming.

use crate::error::{Error, Result};
use crate::writer::is_valid_resource_name;

/// Resource naming configuration.
///
/// Prefixes are combined with a per-dictionary counter to form local
/// resource names (`F1`, `Im1`, `Fm1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Prefix for font resources.
    pub font_prefix: String,

    /// Prefix for image XObjects.
    pub image_prefix: String,

    /// Prefix for form XObjects.
    pub form_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            font_prefix: "F".to_string(),
            image_prefix: "Im".to_string(),
            form_prefix: "Fm".to_string(),
        }
    }

    /// Set the font name prefix.
    pub fn with_font_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.font_prefix = prefix.into();
        self
    }

    /// Set the image name prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    /// Set the form name prefix.
    pub fn with_form_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.form_prefix = prefix.into();
        self
    }

    /// Check that every prefix yields valid resource names.
    pub fn validate(&self) -> Result<()> {
        for prefix in [&self.font_prefix, &self.image_prefix, &self.form_prefix] {
            if !is_valid_resource_name(&format!("/{}1", prefix)) {
                return Err(Error::InvalidResourceName(format!(
                    "prefix '{}' does not form a valid name",
                    prefix
                )));
            }
        }
        Ok(())
    }
}
