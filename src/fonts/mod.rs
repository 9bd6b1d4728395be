//! Font program handling.
//!
//! Parsing of embedded TrueType/OpenType programs and the standard-14 font
//! set used when a typeface resolves without embedded data.

mod standard;
pub mod truetype;

pub use standard::StandardFont;
pub use truetype::{TrueTypeError, TrueTypeMetrics};
