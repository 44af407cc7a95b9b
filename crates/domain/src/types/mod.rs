//! Domain types

pub mod account;
pub mod attendance;
pub mod message;
pub mod role;

pub use account::{AccountToken, SessionCredential};
pub use attendance::{AttendanceOutcome, Reward};
pub use message::{Message, MessageLevel, MessageLog};
pub use role::{composite_role_id, Role};
