//! Shared domain types for the brand console.
//!
//! These are the wire shapes exchanged with the brand admin backend. They
//! carry no I/O and no lifecycle rules; the `brand-console` crate owns the
//! transition engine and the profile editor built on top of them.

pub mod brand;
pub mod post;
pub mod timestamp;

pub use brand::{BotCredentials, Brand, BrandCategory, BrandId};
pub use post::{
    CalendarEntry, MediaKind, PostFailure, PostId, PostRecord, PostStatus, QualityFlags,
    VariantPreview,
};
