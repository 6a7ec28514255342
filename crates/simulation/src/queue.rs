//! Pending-message queue.

use paxos_sim_messages::Message;
use paxos_sim_types::NodeId;
use std::collections::VecDeque;

/// Result of pulling from a [`PendingQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// The earliest message whose endpoints are both up.
    Message(Message),
    /// Messages are waiting, but every one touches a failed node.
    NoneEligible,
    /// Nothing is in flight.
    Empty,
}

/// Messages in flight, in the order they were sent.
///
/// Extraction is "first eligible", not strict FIFO: messages whose source
/// or destination is down stay where they are and keep their place for a
/// later tick.
#[derive(Debug, Default, Clone)]
pub struct PendingQueue {
    messages: VecDeque<Message>,
}

impl PendingQueue {
    /// Create a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the back.
    pub fn push(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    /// Remove and return the earliest message with no failed endpoint.
    ///
    /// `is_failed` is asked about the destination and, when present, the
    /// source of each message, front to back.
    pub fn extract(&mut self, is_failed: impl Fn(NodeId) -> bool) -> Extracted {
        if self.messages.is_empty() {
            return Extracted::Empty;
        }

        let eligible = self.messages.iter().position(|m| {
            !is_failed(m.destination()) && m.source().map_or(true, |from| !is_failed(from))
        });

        match eligible.and_then(|i| self.messages.remove(i)) {
            Some(message) => Extracted::Message(message),
            None => Extracted::NoneEligible,
        }
    }

    /// Messages in send order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Get the number of messages in flight.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Extend<Message> for PendingQueue {
    fn extend<I: IntoIterator<Item = Message>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}
