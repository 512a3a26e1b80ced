pub mod articles;
pub mod categories;
pub mod client;
pub mod error;
pub mod existence;
pub mod media;
pub mod retry;
pub mod types;

pub use articles::ArticleDefaults;
pub use categories::CategoryResolver;
pub use client::{CmsClient, CmsPolicies};
pub use error::CmsError;
pub use media::UploadedMedia;
