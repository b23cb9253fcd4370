//! Owned, cancellable scheduling handles
//!
//! The host (requestAnimationFrame, setTimeout, or a native loop) decides
//! *when* a callback runs; these handles decide *whether* it may still
//! act. Every scheduled callback carries a `Ticket`. Cancelling bumps the
//! generation, so a callback that fires after teardown finds its ticket
//! stale and does nothing.

/// Proof that a callback was scheduled by the current generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
}

/// One in-flight callback slot (a tick loop or a single timeout)
#[derive(Debug, Default)]
pub struct Schedule {
    generation: u64,
    armed: bool,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next callback, superseding any earlier ticket
    pub fn arm(&mut self) -> Ticket {
        self.generation += 1;
        self.armed = true;
        Ticket {
            generation: self.generation,
        }
    }

    /// Invalidate whatever is in flight
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_live(&self, ticket: Ticket) -> bool {
        self.armed && ticket.generation == self.generation
    }

    /// Consume a ticket as its callback runs. False means the callback is
    /// stale and must not touch the session.
    pub fn take(&mut self, ticket: Ticket) -> bool {
        if self.is_live(ticket) {
            self.armed = false;
            true
        } else {
            false
        }
    }
}

/// A cancellable one-shot delay measured on the host clock
#[derive(Debug, Default)]
pub struct Timer {
    schedule: Schedule,
    due_ms: Option<f64>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the delay
    pub fn set(&mut self, now_ms: f64, delay_ms: f64) -> Ticket {
        self.due_ms = Some(now_ms + delay_ms);
        self.schedule.arm()
    }

    pub fn cancel(&mut self) {
        self.due_ms = None;
        self.schedule.cancel();
    }

    /// Pending ticket and its due time
    pub fn pending(&self) -> Option<(Ticket, f64)> {
        let due = self.due_ms?;
        self.schedule.is_armed().then_some((
            Ticket {
                generation: self.schedule.generation,
            },
            due,
        ))
    }

    pub fn is_pending(&self) -> bool {
        self.schedule.is_armed()
    }

    /// Host callback for `ticket` ran at `now_ms`. True if the timer fires.
    pub fn fire(&mut self, ticket: Ticket, now_ms: f64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due && self.schedule.take(ticket) => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Polling variant for hosts without callbacks
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.pending() {
            Some((ticket, _)) => self.fire(ticket, now_ms),
            None => false,
        }
    }
}
