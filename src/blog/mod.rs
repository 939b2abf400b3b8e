pub mod draft;
pub mod engagement;
pub mod feed;
pub mod format;

pub use draft::{Draft, DraftError, TagSet};
pub use engagement::LikeState;
pub use feed::{Feed, FeedOrder};
