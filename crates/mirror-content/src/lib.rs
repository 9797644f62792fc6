//! Content-level transformations for exported markdown
//!
//! The renderer downstream treats `{…}` and bare tags as syntax, so exported
//! prose has to be escaped into inline or fenced literals. Only the
//! document body is touched; a leading header block is left verbatim.

pub mod error;
pub mod escape;
pub mod header;
pub mod placeholder;
mod scan;

pub use error::{Error, Result};
pub use escape::{escape_block_hazards, escape_inline_hazards, wrap_angle_brackets, wrap_braces, wrap_raw_html};
pub use header::{DocHeader, split_header};
pub use placeholder::{is_placeholder, is_placeholder_content, is_placeholder_name};
