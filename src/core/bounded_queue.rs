//! Fixed-capacity ring buffer of byte payloads
//!
//! Any number of producers call [`BoundedEventQueue::put`]; exactly one
//! consumer calls [`BoundedEventQueue::take`] (or `take_into`). Slot buffers
//! are allocated once and reused for the queue's lifetime.

use super::error::{LoggerError, Result};
use parking_lot::{Condvar, Mutex};

/// Default number of slots in an event queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct RingState {
    items: Vec<Vec<u8>>,
    count: usize,
    put_index: usize,
    take_index: usize,
    closed: bool,
}

impl RingState {
    #[inline]
    fn capacity(&self) -> usize {
        self.items.len()
    }

    fn debug_check(&self) {
        debug_assert!(self.count <= self.capacity());
        debug_assert!(self.put_index < self.capacity());
        debug_assert!(self.take_index < self.capacity());
    }
}

pub struct BoundedEventQueue {
    state: Mutex<RingState>,
    not_empty: Condvar,
}

impl BoundedEventQueue {
    /// Create a queue with `capacity` pre-allocated slots
    ///
    /// Returns an error for a zero capacity.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config(
                "BoundedEventQueue",
                "capacity must be greater than zero",
            ));
        }

        Ok(Self {
            state: Mutex::new(RingState {
                items: (0..capacity).map(|_| Vec::new()).collect(),
                count: 0,
                put_index: 0,
                take_index: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().capacity()
    }

    /// Number of buffered payloads
    pub fn len(&self) -> usize {
        self.state.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free slots left; producers use this to decide whether to drop
    pub fn remaining_capacity(&self) -> usize {
        let state = self.state.lock();
        state.capacity() - state.count
    }

    /// Copy `item` into the next free slot and wake the consumer
    ///
    /// Never blocks. Fails when every slot is occupied or the queue has been
    /// closed.
    pub fn put(&self, item: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        self.put_locked(&mut state, item)
    }

    /// Enqueue only if more than `guard_band` slots would remain free first
    ///
    /// The capacity check and the insert happen under one lock acquisition.
    /// Returns `Ok(false)` when the payload was discarded.
    pub fn put_if_above(&self, item: &[u8], guard_band: usize) -> Result<bool> {
        let mut state = self.state.lock();
        if state.capacity() - state.count <= guard_band {
            return Ok(false);
        }
        self.put_locked(&mut state, item)?;
        Ok(true)
    }

    fn put_locked(&self, state: &mut RingState, item: &[u8]) -> Result<()> {
        if state.closed {
            return Err(LoggerError::QueueClosed);
        }
        if state.count == state.capacity() {
            return Err(LoggerError::queue_full(state.count, state.capacity()));
        }

        let index = state.put_index;
        let slot = &mut state.items[index];
        slot.clear();
        slot.extend_from_slice(item);

        state.put_index = (index + 1) % state.capacity();
        state.count += 1;
        state.debug_check();

        self.not_empty.notify_one();
        Ok(())
    }

    /// Block until a payload is available and move it into `out`
    ///
    /// `out`'s previous allocation takes the emptied slot's place, so no
    /// buffer is freed or reallocated. Returns `false` once the queue is
    /// closed and fully drained.
    pub fn take_into(&self, out: &mut Vec<u8>) -> bool {
        let mut state = self.state.lock();
        while state.count == 0 {
            if state.closed {
                return false;
            }
            self.not_empty.wait(&mut state);
        }

        let index = state.take_index;
        out.clear();
        std::mem::swap(&mut state.items[index], out);

        state.take_index = (index + 1) % state.capacity();
        state.count -= 1;
        state.debug_check();
        true
    }

    /// Block until a payload is available and return a copy of it
    ///
    /// Returns `None` once the queue is closed and fully drained.
    pub fn take(&self) -> Option<Vec<u8>> {
        let mut state = self.state.lock();
        while state.count == 0 {
            if state.closed {
                return None;
            }
            self.not_empty.wait(&mut state);
        }

        let index = state.take_index;
        let slot = &mut state.items[index];
        let data = slot.clone();
        slot.clear();

        state.take_index = (index + 1) % state.capacity();
        state.count -= 1;
        state.debug_check();
        Some(data)
    }

    /// Stop accepting payloads and wake a blocked consumer
    ///
    /// Already buffered payloads can still be taken.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl std::fmt::Debug for BoundedEventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedEventQueue")
            .field("capacity", &state.capacity())
            .field("count", &state.count)
            .field("put_index", &state.put_index)
            .field("take_index", &state.take_index)
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            BoundedEventQueue::new(0),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_fifo_order() {
        let queue = BoundedEventQueue::new(8).unwrap();
        for i in 0..8 {
            queue.put(format!("item-{}", i).as_bytes()).unwrap();
        }
        assert_eq!(queue.remaining_capacity(), 0);

        for i in 0..8 {
            assert_eq!(queue.take().unwrap(), format!("item-{}", i).into_bytes());
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_indices_wrap_around() {
        let queue = BoundedEventQueue::new(3).unwrap();
        let mut out = Vec::new();

        for round in 0..10 {
            queue.put(format!("a{}", round).as_bytes()).unwrap();
            queue.put(format!("b{}", round).as_bytes()).unwrap();
            assert!(queue.take_into(&mut out));
            assert_eq!(out, format!("a{}", round).into_bytes());
            assert!(queue.take_into(&mut out));
            assert_eq!(out, format!("b{}", round).into_bytes());
        }
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.remaining_capacity(), 3);
    }

    #[test]
    fn test_put_on_full_queue_fails() {
        let queue = BoundedEventQueue::new(2).unwrap();
        queue.put(b"one").unwrap();
        queue.put(b"two").unwrap();

        let err = queue.put(b"three").unwrap_err();
        assert!(matches!(err, LoggerError::QueueFull { current: 2, max: 2 }));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_put_if_above_respects_guard_band() {
        let queue = BoundedEventQueue::new(4).unwrap();
        assert!(queue.put_if_above(b"x", 2).unwrap());
        assert!(queue.put_if_above(b"y", 2).unwrap());
        // 4 - 2 = 2 remaining, which is not above the guard band
        assert!(!queue.put_if_above(b"z", 2).unwrap());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_shorter_payload_does_not_leak_previous_bytes() {
        let queue = BoundedEventQueue::new(1).unwrap();
        queue.put(b"a long first payload").unwrap();
        assert_eq!(queue.take().unwrap(), b"a long first payload".to_vec());
        queue.put(b"short").unwrap();
        assert_eq!(queue.take().unwrap(), b"short".to_vec());
    }

    #[test]
    fn test_take_blocks_until_put() {
        let queue = Arc::new(BoundedEventQueue::new(4).unwrap());
        let consumer_queue = Arc::clone(&queue);

        let consumer = thread::spawn(move || consumer_queue.take());

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());

        queue.put(b"wake up").unwrap();
        assert_eq!(consumer.join().unwrap(), Some(b"wake up".to_vec()));
    }

    #[test]
    fn test_close_drains_then_stops() {
        let queue = BoundedEventQueue::new(4).unwrap();
        queue.put(b"pending").unwrap();
        queue.close();

        assert!(queue.is_closed());
        assert!(matches!(queue.put(b"late"), Err(LoggerError::QueueClosed)));
        assert_eq!(queue.take(), Some(b"pending".to_vec()));
        assert_eq!(queue.take(), None);
    }

    #[test]
    fn test_close_wakes_blocked_consumer() {
        let queue = Arc::new(BoundedEventQueue::new(4).unwrap());
        let consumer_queue = Arc::clone(&queue);

        let consumer = thread::spawn(move || {
            let mut out = Vec::new();
            consumer_queue.take_into(&mut out)
        });

        thread::sleep(Duration::from_millis(50));
        queue.close();
        assert!(!consumer.join().unwrap());
    }
}
