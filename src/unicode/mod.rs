//! Unicode utilities: grapheme handling, visible width and styled text layout.

mod cache;
mod grapheme;
mod width;
mod wrap;

pub use cache::{WIDTH_CACHE_CAPACITY, WidthCache, global_width_cache};
pub use grapheme::{grapheme_indices, grapheme_width, graphemes, is_printable_ascii};
pub use width::{measure_width, visible_width};
pub use wrap::{ELLIPSIS, truncate_to_width, wrap_text_with_ansi};
