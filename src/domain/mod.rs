pub mod feed;
pub mod post;

pub use feed::{Feed, FeedMeta};
pub use post::Post;
