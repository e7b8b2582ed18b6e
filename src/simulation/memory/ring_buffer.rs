//! Generic fixed-size ring buffer for short-term memory.

/// A fixed-size circular buffer that overwrites old elements when full.
///
/// Holds recent luminance samples without heap allocation, so a controller
/// instance has the same footprint no matter how long it stays in one state.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T, const N: usize> {
    buffer: [T; N],
    head: usize,
    len: usize,
}

impl<T: Default + Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Copy, const N: usize> RingBuffer<T, N> {
    /// Creates a new empty ring buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: [T::default(); N],
            head: 0,
            len: 0,
        }
    }

    /// Pushes a new item, overwriting the oldest if full.
    pub fn push(&mut self, item: T) {
        self.buffer[self.head] = item;
        self.head = (self.head + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Gets an item by age order (0 = oldest, len-1 = newest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let start = if self.len < N { 0 } else { self.head };
        Some(&self.buffer[(start + index) % N])
    }

    /// Gets an item counting back from the newest (0 = newest).
    #[must_use]
    pub fn recent(&self, back: usize) -> Option<&T> {
        if back >= self.len {
            return None;
        }
        self.get(self.len - 1 - back)
    }

    /// Returns the most recently added item.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.recent(0)
    }

    /// The three newest items as `[newest, previous, oldest]`, if there are three.
    #[must_use]
    pub fn last_three(&self) -> Option<[T; 3]> {
        Some([*self.recent(0)?, *self.recent(1)?, *self.recent(2)?])
    }

    /// Returns an iterator over items from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
