//! Domain entities - the core business objects.

mod group;
mod page;
mod post;
mod principal;
mod user;

pub use group::{GROUP_TITLE_MAX_LEN, Group, is_valid_slug};
pub use page::{Page, PageNumber, PageRequest, PageWindow};
pub use post::{Post, PostEntry};
pub use principal::Principal;
pub use user::{Author, USERNAME_MAX_LEN, User, validate_username};
