//! Protocol messages exchanged between proposers and acceptors.
//!
//! A [`Message`] is an addressed envelope around a [`Payload`]. Payloads
//! are a closed set of six kinds; handlers dispatch on them by pattern
//! matching and the engine renders them into trace lines.

mod message;
mod payload;

pub use message::Message;
pub use payload::Payload;
