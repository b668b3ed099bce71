//! Ordering of overlapping collaborator responses.
//!
//! Each network-bound update takes a [`Ticket`] for a logical [`Slot`] before
//! the call. When the response arrives it is applied only if no newer ticket
//! was issued for the same slot in the meantime.

use crate::comment::CommentId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Top-level comment pages of a post
    Comments(String),
    Replies(CommentId),
    Reaction(CommentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    slot: Slot,
    seq: u64,
}

impl Ticket {
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    next_seq: u64,
    latest: HashMap<Slot, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier ticket for `slot`.
    pub fn issue(&mut self, slot: Slot) -> Ticket {
        self.next_seq += 1;
        self.latest.insert(slot.clone(), self.next_seq);
        Ticket {
            slot,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.slot) == Some(&ticket.seq)
    }

    /// Consumes a ticket. Returns `true` when its response should be applied.
    pub fn complete(&mut self, ticket: &Ticket) -> bool {
        if self.is_current(ticket) {
            self.latest.remove(&ticket.slot);
            true
        } else {
            tracing::debug!(
                "[Sequencer] discarding stale response for {:?} (seq {})",
                ticket.slot,
                ticket.seq
            );
            false
        }
    }

    /// Whether a request for `slot` is still outstanding.
    pub fn in_flight(&self, slot: &Slot) -> bool {
        self.latest.contains_key(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut seq = RequestSequencer::new();
        let slot = Slot::Reaction(CommentId(5));
        let first = seq.issue(slot.clone());
        let second = seq.issue(slot.clone());

        assert!(!seq.is_current(&first));
        assert!(seq.complete(&second));
        assert!(!seq.complete(&first));
        assert!(!seq.in_flight(&slot));
    }

    #[test]
    fn slots_are_independent() {
        let mut seq = RequestSequencer::new();
        let a = seq.issue(Slot::Reaction(CommentId(1)));
        let b = seq.issue(Slot::Reaction(CommentId(2)));
        let c = seq.issue(Slot::Replies(CommentId(1)));
        assert!(seq.complete(&b));
        assert!(seq.complete(&a));
        assert!(seq.complete(&c));
    }

    #[test]
    fn completed_ticket_is_not_applied_twice() {
        let mut seq = RequestSequencer::new();
        let t = seq.issue(Slot::Comments("post-1".into()));
        assert!(seq.in_flight(t.slot()));
        assert!(seq.complete(&t));
        assert!(!seq.complete(&t));
    }
}
