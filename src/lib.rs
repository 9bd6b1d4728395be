// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Resources
//!
//! Content-stream resource naming for a PDF object model.
//!
//! ## Core Features
//!
//! - **Canonical objects**: one font dictionary, image XObject or form
//!   XObject per distinct resource per document, however many pages use it
//! - **Local names**: per-dictionary `/Resources` with stable, collision-free
//!   names (`/F1`, `/Im1`, `/Fm1`)
//! - **Typefaces**: standard-14 fonts and embedded TrueType programs, with
//!   pluggable resolution (composite families stay unresolved)
//! - **Concurrency**: [`SharedDocument`] serializes naming across threads
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_resources::{Document, drawing::Font};
//!
//! # fn main() -> pdf_resources::Result<()> {
//! let mut doc = Document::new();
//! let mut page = doc.new_content_stream();
//!
//! let (name, font) = page.font_name(&mut doc, &Font::new("Helvetica", 12.0))?;
//! assert_eq!(name, "/F1");
//!
//! let mut writer = page.writer();
//! writer
//!     .set_font(&mut doc, &Font::new("Helvetica", 12.0))?
//!     .text("Hello, World!", 72.0, 720.0);
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object graph
pub mod object;
pub mod store;

// Configuration
pub mod config;

// Fonts
pub mod fonts;

// Drawing layer
pub mod drawing;

// Resource naming and object generation
pub mod writer;

// Document context
pub mod document;

pub use config::RegistryConfig;
pub use document::{Document, SharedDocument};
pub use error::{Error, Result};
pub use object::{Dictionary, Object, ObjectRef};
pub use writer::{ContentStream, ContentStreamDictionary};
