//! Contribution intake and admin moderation for the plant catalog.
//!
//! Users submit plants through [`submit`]; they wait as `pending` until an
//! administrator approves or rejects them through an [`AdminSession`]. The
//! public catalog ([`list_public`]) only ever shows approved records.

pub mod catalog;
pub mod error;
pub mod intake;
pub mod session;
mod workflow;

pub use catalog::{ListRequest, list_public};
pub use error::ModerationError;
pub use intake::submit;
pub use session::{Actor, AdminSession, ModerationStats};
