//! Domain records reconstructed from provider responses

mod book;
mod chapter;
mod highlight;
mod read_info;
mod review;

pub use book::{Book, BookMetadata};
pub use chapter::Chapter;
pub use highlight::{sort_chronologically, Highlight};
pub use read_info::{ReadInfo, ReadingStatus};
pub use review::{Review, ReviewKind};
