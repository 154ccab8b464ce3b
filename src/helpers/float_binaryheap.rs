use ordered_float::{FloatIsNan, NotNan};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// Entries with equal keys come out in push order, so `seq` breaks ties.
struct HeapEntry<T> {
    key: NotNan<f64>,
    seq: u64,
    value: T,
}

impl<T> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &HeapEntry<T>) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<T> Eq for HeapEntry<T> {}

impl<T> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &HeapEntry<T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for HeapEntry<T> {
    fn cmp(&self, other: &HeapEntry<T>) -> Ordering {
        other.key.cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> HeapEntry<T> {
    fn to_tuple(&self) -> (f64, &T) {
        (self.key.into_inner(), &self.value)
    }
}

/// Min-heap on `f64` keys that is stable for equal keys.
pub struct FloatBinaryHeap<T> {
    heap: BinaryHeap<HeapEntry<T>>,
    next_seq: u64,
}

impl<T> Default for FloatBinaryHeap<T> {
    fn default() -> Self {
        FloatBinaryHeap::new()
    }
}

impl<T> FloatBinaryHeap<T> {
    pub fn new () -> FloatBinaryHeap<T> {
        FloatBinaryHeap {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push (&mut self, key: f64, value: T) -> Result<(), FloatIsNan> {
        let key = NotNan::new(key)?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(HeapEntry { key, seq, value });
        Ok(())
    }

    pub fn peek(&self) -> Option<(f64, &T)> {
        self.heap.peek().map(|r| r.to_tuple())
    }

    pub fn pop (&mut self) -> Option<(f64, T)> {
        self.heap.pop().map(|r| (r.key.into_inner(), r.value))
    }

    pub fn len (&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_smallest_key_first() {
        let mut heap = FloatBinaryHeap::new();
        heap.push(3.0, 'c').unwrap();
        heap.push(1.0, 'a').unwrap();
        heap.push(2.0, 'b').unwrap();

        assert_eq!(heap.peek(), Some((1.0, &'a')));
        assert_eq!(heap.pop(), Some((1.0, 'a')));
        assert_eq!(heap.pop(), Some((2.0, 'b')));
        assert_eq!(heap.pop(), Some((3.0, 'c')));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn equal_keys_keep_push_order() {
        let mut heap = FloatBinaryHeap::new();
        for i in 0..50 {
            heap.push(5.0, i).unwrap();
        }
        heap.push(1.0, 100).unwrap();

        assert_eq!(heap.pop(), Some((1.0, 100)));
        for i in 0..50 {
            assert_eq!(heap.pop(), Some((5.0, i)));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn nan_key_is_rejected() {
        let mut heap = FloatBinaryHeap::new();
        assert!(heap.push(f64::NAN, ()).is_err());
        assert_eq!(heap.len(), 0);
    }
}
