//! Growth policy for the chunk's append-only buffers.

/// Capacity of a buffer's first allocation.
pub const MIN_CAPACITY: usize = 8;

/// The next capacity for a full buffer: at least `MIN_CAPACITY`, doubling after that.
pub fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        capacity * 2
    }
}

/// Append `item`, growing the buffer by the doubling policy when it is full.
pub fn push_with_growth<T>(buffer: &mut Vec<T>, item: T) {
    if buffer.len() == buffer.capacity() {
        let target = grow_capacity(buffer.capacity());
        buffer.reserve_exact(target - buffer.len());
    }
    buffer.push(item);
}
