use crate::registry::{BoxId, Runtime};

/// Per-box secondary allocation region, for arguments and returns too large
/// to pass by value across the boundary. Plain bump allocation: `push`
/// reserves the next `size` bytes, `pop` releases the most recent `size`.
pub struct DataStack {
    region: Vec<u8>,
    used: usize,
}

impl DataStack {
    pub fn new(bytes: usize) -> Self {
        Self {
            region: vec![0; bytes],
            used: 0,
        }
    }

    /// Reserve `size` bytes, returning the offset of the allocation. `None`
    /// on overflow: an ordinary allocation failure, never a fault.
    pub fn push(&mut self, size: usize) -> Option<usize> {
        let end = self.used.checked_add(size)?;
        if end > self.region.len() {
            return None;
        }
        let offset = self.used;
        self.used = end;
        Some(offset)
    }

    /// Release the most recently pushed `size` bytes. Popping more than was
    /// pushed is a contract violation.
    pub fn pop(&mut self, size: usize) {
        assert!(
            size <= self.used,
            "data stack pop of {size} bytes with only {} pushed",
            self.used
        );
        self.used -= size;
    }

    pub fn free(&self) -> usize {
        self.region.len() - self.used
    }

    /// Access a pushed allocation.
    pub fn bytes_mut(&mut self, offset: usize, size: usize) -> &mut [u8] {
        &mut self.region[offset..offset + size]
    }
}

impl Runtime {
    /// Allocate on the box's data stack. In the minimal profile (no region
    /// configured) this always fails safely.
    pub fn stack_push(&mut self, id: BoxId, size: usize) -> Option<usize> {
        self.record_mut(id).stack.as_mut()?.push(size)
    }

    /// Release the most recent `size` bytes of the box's data stack. In the
    /// minimal profile there is nothing to pop and no lower-level recovery:
    /// calling this is fatal.
    pub fn stack_pop(&mut self, id: BoxId, size: usize) {
        match self.record_mut(id).stack.as_mut() {
            Some(stack) => stack.pop(size),
            None => panic!("{id}: data stack pop in the minimal profile"),
        }
    }

    /// Free space remaining in the box's data stack region, if it has one.
    pub fn stack_free(&self, id: BoxId) -> Option<usize> {
        self.record(id).stack.as_ref().map(DataStack::free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_restore_free_space() {
        let mut stack = DataStack::new(128);
        let before = stack.free();
        let offset = stack.push(64).expect("fits");
        assert_eq!(offset, 0);
        assert_eq!(stack.free(), before - 64);
        stack.pop(64);
        assert_eq!(stack.free(), before);
    }

    #[test]
    fn push_fails_on_overflow() {
        let mut stack = DataStack::new(32);
        assert_eq!(stack.push(16), Some(0));
        assert_eq!(stack.push(17), None);
        // a failed push reserves nothing
        assert_eq!(stack.free(), 16);
    }

    #[test]
    fn absurd_push_fails_instead_of_wrapping() {
        let mut stack = DataStack::new(64);
        stack.push(32).unwrap();
        assert_eq!(stack.push(usize::MAX), None);
        assert_eq!(stack.push(usize::MAX - 31), None);
        // the failed pushes reserved nothing
        assert_eq!(stack.free(), 32);
    }

    #[test]
    fn allocations_nest() {
        let mut stack = DataStack::new(64);
        let a = stack.push(16).unwrap();
        let b = stack.push(16).unwrap();
        assert_eq!(a, 0);
        assert_eq!(b, 16);
        stack.bytes_mut(b, 16).fill(0xaa);
        stack.pop(16);
        stack.pop(16);
        assert_eq!(stack.free(), 64);
    }

    #[test]
    #[should_panic(expected = "data stack pop")]
    fn pop_underflow_is_fatal() {
        let mut stack = DataStack::new(64);
        stack.push(8).unwrap();
        stack.pop(9);
    }
}
