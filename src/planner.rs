//! Splits a [`LogicalPlan`] into the alternating sequence of
//! partition-local pipeline segments and global barrier segments the
//! engine drives in order (spec.md §5).
//!
//! Grounded in the teacher's `build_plan`/linear `backwalk_linear`
//! (`planner.rs`), generalized from a single linear chain anchored at one
//! terminal to a dependency-ordered walk of a DAG (a `Join` node has two
//! children instead of one predecessor).

use crate::error::EngineError;
use crate::plan::{LogicalPlan, NodeId};
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub struct Segment {
    pub is_global: bool,
    pub nodes: Vec<NodeId>,
}

/// Topological order (every child before its parents) of every node
/// reachable from the plan's root.
pub fn topological_order(plan: &LogicalPlan) -> Result<Vec<NodeId>, EngineError> {
    let root = plan
        .root
        .ok_or_else(|| EngineError::plan("plan has no root node".to_string()))?;
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut visiting = HashSet::new();
    visit(root, plan, &mut visited, &mut visiting, &mut order)?;
    Ok(order)
}

fn visit(
    id: NodeId,
    plan: &LogicalPlan,
    visited: &mut HashSet<NodeId>,
    visiting: &mut HashSet<NodeId>,
    order: &mut Vec<NodeId>,
) -> Result<(), EngineError> {
    if visited.contains(&id) {
        return Ok(());
    }
    if !visiting.insert(id) {
        return Err(EngineError::plan(format!("cycle detected at node {id:?}")));
    }
    let node = plan
        .node(id)
        .ok_or_else(|| EngineError::plan(format!("dangling node reference {id:?}")))?;
    for &child in &node.children {
        visit(child, plan, visited, visiting, order)?;
    }
    visiting.remove(&id);
    visited.insert(id);
    order.push(id);
    Ok(())
}

/// Group the topological order into maximal runs of same-locality
/// (local vs. global) nodes.
pub fn segment(plan: &LogicalPlan) -> Result<Vec<Segment>, EngineError> {
    let order = topological_order(plan)?;
    let mut segments: Vec<Segment> = Vec::new();
    for id in order {
        let node = plan.node(id).expect("topological_order only returns bound ids");
        let is_global = node.op.is_global();
        match segments.last_mut() {
            Some(seg) if seg.is_global == is_global => seg.nodes.push(id),
            _ => segments.push(Segment {
                is_global,
                nodes: vec![id],
            }),
        }
    }
    Ok(segments)
}

/// How many times each node's output will be read — the root counts as
/// one extra read so the engine's final result stays bound until the
/// caller receives it.
pub fn fan_out(plan: &LogicalPlan) -> HashMap<NodeId, usize> {
    let mut counts: HashMap<NodeId, usize> = HashMap::new();
    for node in plan.nodes.values() {
        for &child in &node.children {
            *counts.entry(child).or_insert(0) += 1;
        }
    }
    if let Some(root) = plan.root {
        *counts.entry(root).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{LogicalPlanBuilder, Operator, SourceInfo};
    use crate::schema::{Field, Schema};
    use crate::value::DataType;

    #[test]
    fn scan_then_sort_splits_into_two_segments() {
        let mut builder = LogicalPlanBuilder::new();
        let schema = Schema::arc(vec![Field::new(0, "v", DataType::Int64)]);
        let scan = builder.add(
            vec![],
            schema.clone(),
            1,
            Operator::Scan {
                source: SourceInfo::InMemory {
                    columns: std::collections::HashMap::new(),
                    num_partitions: 1,
                },
            },
        );
        let sort = builder.add(
            vec![scan],
            schema,
            1,
            Operator::Sort {
                keys: vec![],
                num_partitions: 1,
            },
        );
        builder.set_root(sort);
        let plan = builder.finish();

        let segments = segment(&plan).unwrap();
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_global);
        assert!(segments[1].is_global);
    }
}
