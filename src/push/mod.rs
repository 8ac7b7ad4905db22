//! Push delivery.
//!
//! `PushSender` is the seam between the dispatcher and the actual transport.
//! `WebPushSender` is the production implementation.

mod sender;
mod webpush_sender;

pub use sender::{PushError, PushReceipt, PushSender};
pub use webpush_sender::WebPushSender;
