//! Error types for the resource registry.
//!
//! This module defines all error types that can occur while materializing
//! canonical objects and naming them in content-stream resources.

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building document resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Referenced object not found in the document's object store
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Reference chain too long or cyclic
    #[error("Circular reference detected at {0} {1} R")]
    CircularReference(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Font could not be materialized (unresolved typeface, malformed font program)
    #[error("Font error: {0}")]
    Font(String),

    /// Image could not be decoded or encoded
    #[error("Image error: {0}")]
    Image(String),

    /// A materializer broke its contract by returning an unusable object.
    ///
    /// This is a defect in the materializer, not a recoverable condition.
    #[error("Materializer contract violated: {0}")]
    Materializer(String),

    /// Resource name or name prefix does not form a valid PDF name token
    #[error("Invalid resource name: {0}")]
    InvalidResourceName(String),

    /// The document-wide lock was poisoned by a panicking builder
    #[error("Document lock poisoned")]
    LockPoisoned,

    /// The shared document still has other live handles
    #[error("Document still shared by {0} other handle(s)")]
    StillShared(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_not_found_error() {
        let err = Error::ObjectNotFound(10, 0);
        let msg = format!("{}", err);
        assert!(msg.contains("10 0 R"));
    }

    #[test]
    fn test_invalid_object_type_error() {
        let err = Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: "Array".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Dictionary"));
        assert!(msg.contains("Array"));
    }

    #[test]
    fn test_materializer_error() {
        let err = Error::Materializer("font materializer returned Null".to_string());
        assert!(err.to_string().contains("returned Null"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
