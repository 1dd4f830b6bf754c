//! Request extractors shared by every handler style.

mod format;
mod identity;
mod payload;

pub use format::{strip_format_suffix, Format, RequestedFormat};
pub use identity::Identity;
pub use payload::Payload;
