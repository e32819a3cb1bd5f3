//! Core review services: change-set resolution, image retrieval, and the
//! comment relay. Each service takes the GitHub gateway (and, for the
//! resolver, a cache instance) by injection.

pub mod change_set;
pub mod comments;
pub mod image;

pub use change_set::{CHANGE_SET_TTL, ChangeSet, ChangeSetResolver, ChangedImage};
pub use comments::CommentRelay;
pub use image::{IMAGE_CONTENT_TYPE, ImageRetrieval};
