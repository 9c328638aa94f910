//! Wire and domain types shared across ChambaYa crates.
//!
//! Field names follow the remote API (camelCase JSON). Optional server
//! fields stay `Option` so that "absent" never collapses into `false`.

pub mod envelope;
pub mod notification;
pub mod rating;
pub mod user;
pub mod work;

pub use envelope::{ApiEnvelope, DataEnvelope, MessageResponse, SuccessEnvelope};
pub use notification::{
    Notification, NotificationKind, NotificationStats, Priority, RelatedModel,
};
pub use rating::{NewRating, RatingTarget};
pub use user::{
    Credentials, LoginResponse, ProfileUpdate, RegisterRequest, RegisteredUser, Role, User,
};
pub use work::{ActiveWork, ApplyRequest, CompletionStatus, NewWork, Work, WorkStatusSnapshot};
