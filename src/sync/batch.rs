//! Pending rows of one sheet plus the countdown deciding when to flush them

/// Rows waiting to be appended to one sheet.
///
/// The countdown starts at `capacity` and drops by one per pushed row; the
/// batch is due once it reaches zero. Taking the rows resets the countdown,
/// carrying over any overflow so flush boundaries stay on multiples of
/// `capacity`.
#[derive(Debug)]
pub struct Batch<T> {
    pending: Vec<T>,
    capacity: usize,
    remaining: i64,
    retried: bool,
}

impl<T> Batch<T> {
    /// Create an empty batch. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: Vec::new(),
            capacity,
            remaining: to_count(capacity),
            retried: false,
        }
    }

    pub fn push(&mut self, row: T) {
        self.pending.push(row);
        self.remaining -= 1;
    }

    pub fn is_due(&self) -> bool {
        self.remaining <= 0
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rows still accepted before the batch is due; negative when overfull
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn pending(&self) -> &[T] {
        &self.pending
    }

    /// Drain the pending rows, leaving an empty batch with a reset countdown
    pub fn take(&mut self) -> Vec<T> {
        let capacity = to_count(self.capacity);
        self.remaining = if self.remaining > 0 {
            capacity
        } else {
            capacity - (-self.remaining) % capacity
        };
        std::mem::take(&mut self.pending)
    }

    /// Whether rows are currently held back for a retry
    pub fn retry_used(&self) -> bool {
        self.retried
    }

    /// Put rows back at the front for one more attempt on the next check
    pub fn retain_for_retry(&mut self, mut rows: Vec<T>) {
        rows.append(&mut self.pending);
        self.pending = rows;
        self.remaining = self.remaining.min(0);
        self.retried = true;
    }

    /// Forget a previous retry once its rows were written or abandoned
    pub fn clear_retry(&mut self) {
        self.retried = false;
    }
}

fn to_count(capacity: usize) -> i64 {
    i64::try_from(capacity).unwrap_or(i64::MAX)
}
