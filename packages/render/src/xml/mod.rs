//! XML reading: DOM helpers and the code document reader.

mod reader;
mod utils;

pub use reader::{parse_document, validate};
pub use utils::{element_children, full_text, get_tag_name, get_text};
