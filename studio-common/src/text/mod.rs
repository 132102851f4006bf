//! Caption, hashtag and slug generation

pub mod caption;
pub mod hashtags;
pub mod slug;

pub use caption::{build_caption, GeneratedText};
pub use hashtags::build_hashtags;
pub use slug::{safe_folder_name, slugify};
