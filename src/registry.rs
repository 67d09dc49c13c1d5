//! `Registry<V>`: a `NodeId -> V` binding table that frees each entry the
//! moment its last consumer has read it.
//!
//! Grounded in `original_source/daft`'s execution loop, which tracks a
//! `part_set: Dict[int, PartitionSet]` and does `del part_set[child.id()]`
//! as soon as a node's output has been consumed by every parent that
//! needed it — deterministic release, not reference counting via `Arc`
//! drop timing.

use crate::error::EngineError;
use crate::plan::NodeId;
use std::collections::HashMap;

pub struct Registry<V> {
    bindings: HashMap<NodeId, V>,
    remaining_consumers: HashMap<NodeId, usize>,
}

impl<V> Registry<V> {
    /// `fan_out` gives, for every node expected to be bound, how many
    /// times its output will be read (usually the number of parents in
    /// the plan DAG; at least 1 for the root).
    pub fn new(fan_out: HashMap<NodeId, usize>) -> Self {
        Self {
            bindings: HashMap::new(),
            remaining_consumers: fan_out,
        }
    }

    pub fn insert(&mut self, id: NodeId, value: V) {
        self.bindings.insert(id, value);
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.bindings.contains_key(&id)
    }
}

impl<V: Clone> Registry<V> {
    /// Read `id`'s binding, decrementing its remaining-consumer count.
    /// Frees the binding once the count reaches zero.
    pub fn consume(&mut self, id: NodeId) -> Result<V, EngineError> {
        let count = self
            .remaining_consumers
            .get_mut(&id)
            .ok_or_else(|| EngineError::missing_binding(id))?;
        if *count == 0 {
            return Err(EngineError::missing_binding(id));
        }
        *count -= 1;
        if *count == 0 {
            self.remaining_consumers.remove(&id);
            self.bindings.remove(&id).ok_or_else(|| EngineError::missing_binding(id))
        } else {
            self.bindings.get(&id).cloned().ok_or_else(|| EngineError::missing_binding(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_binding_after_last_consumer() {
        let mut fan_out = HashMap::new();
        fan_out.insert(NodeId(0), 2);
        let mut reg: Registry<i32> = Registry::new(fan_out);
        reg.insert(NodeId(0), 42);

        assert_eq!(reg.consume(NodeId(0)).unwrap(), 42);
        assert!(reg.contains(NodeId(0)));
        assert_eq!(reg.consume(NodeId(0)).unwrap(), 42);
        assert!(!reg.contains(NodeId(0)));
        assert!(reg.consume(NodeId(0)).is_err());
    }
}
