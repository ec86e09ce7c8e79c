use std::cell::{Cell, RefCell};

/// Countdown that opens once every chart in the group reported ready.
///
/// Each chart is counted once, no matter how often it reports. Opening
/// happens exactly once regardless of the order charts report in.
#[derive(Debug)]
pub(super) struct ReadinessBarrier {
    arrived: RefCell<Vec<bool>>,
    remaining: Cell<usize>,
}

impl ReadinessBarrier {
    pub(super) fn new(count: usize) -> Self {
        Self {
            arrived: RefCell::new(vec![false; count]),
            remaining: Cell::new(count),
        }
    }

    pub(super) fn remaining(&self) -> usize {
        self.remaining.get()
    }

    /// Records chart `index` as ready. Returns `true` for the notification that
    /// opens the barrier; repeated or unknown indices never do.
    pub(super) fn arrive(&self, index: usize) -> bool {
        let mut arrived = self.arrived.borrow_mut();
        match arrived.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
        let remaining = self.remaining.get().saturating_sub(1);
        self.remaining.set(remaining);
        remaining == 0
    }
}
