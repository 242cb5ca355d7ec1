//! Application services built on the ports.

mod accounts;
mod authoring;
mod feed;

pub use accounts::{AccountService, PASSWORD_MIN_LEN, Session};
pub use authoring::{PostAuthoring, PostForm, WriteOutcome};
pub use feed::{FeedService, GroupFeed, PostDetail, ProfileFeed};
