use crate::error::{Result, SimError};
use crate::helpers::float_binaryheap::FloatBinaryHeap;
use crate::queues::JobId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    Departure,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub time: f64,
    pub job: JobId,
}

impl Event {
    pub fn arrival(time: f64, job: JobId) -> Self {
        Event { kind: EventKind::Arrival, time, job }
    }

    pub fn departure(time: f64, job: JobId) -> Self {
        Event { kind: EventKind::Departure, time, job }
    }
}

/// Pending events, earliest first; simultaneous events leave in insertion order.
#[derive(Default)]
pub struct EventQueue {
    heap: FloatBinaryHeap<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue { heap: FloatBinaryHeap::new() }
    }

    pub fn insert(&mut self, event: Event) -> Result<()> {
        if !(event.time >= 0.) {
            return Err(SimError::InvalidEventTime { time: event.time, job: event.job });
        }
        self.heap.push(event.time, event)
            .map_err(|_| SimError::InvalidEventTime { time: event.time, job: event.job })
    }

    pub fn pop_earliest(&mut self) -> Option<Event> {
        self.heap.pop().map(|(_, e)| e)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_then_insertion_order() {
        let mut q = EventQueue::new();
        q.insert(Event::departure(2., 0)).unwrap();
        q.insert(Event::arrival(1., 1)).unwrap();
        q.insert(Event::arrival(2., 2)).unwrap();
        q.insert(Event::departure(1., 3)).unwrap();

        let order: Vec<JobId> = std::iter::from_fn(|| q.pop_earliest()).map(|e| e.job).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert!(q.is_empty());
        assert_eq!(q.pop_earliest(), None);
    }

    #[test]
    fn rejects_negative_and_nan_times() {
        let mut q = EventQueue::new();
        assert!(matches!(q.insert(Event::arrival(-0.5, 0)), Err(SimError::InvalidEventTime { .. })));
        assert!(q.insert(Event::arrival(f64::NAN, 0)).is_err());
        assert!(q.is_empty());
    }
}
