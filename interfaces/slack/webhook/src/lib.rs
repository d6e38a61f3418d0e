//! Slack incoming-webhook delivery
//!
//! - `message`: block-kit payload types
//! - `index`: the webhook client

pub mod index;
pub mod message;

pub use index::{SendMessageError, SlackWebhookClient, WebhookUrl, WebhookUrlError};
pub use message::{Block, NotificationMessage, TextObject};
