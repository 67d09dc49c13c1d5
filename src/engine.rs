//! [`Engine`]: the top-level driver that walks a [`LogicalPlan`] in
//! dependency order, executing local segments per-partition and global
//! segments as barriers, and freeing registry bindings as soon as every
//! consumer has read them (spec.md §5).
//!
//! Grounded in the teacher's `Runner`/`ExecMode` (`runner.rs`):
//! `Sequential` walks partitions with a plain iterator, `Parallel` hands
//! them to `rayon`. Unlike the teacher's single linear chain over one
//! type, this drives a DAG of differently-shaped columnar nodes, so the
//! "chain" here is the planner's topological node order rather than a
//! `Vec<Node>` the runner folds over directly.

use crate::error::EngineError;
use crate::local;
#[cfg(feature = "metrics")]
use crate::metrics::{self, MetricsCollector};
use crate::partition::Partition;
use crate::partition_set::PartitionSet;
use crate::plan::{LogicalPlan, Operator, RepartitionScheme};
use crate::planner;
use crate::registry::Registry;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Sequential,
    Parallel,
}

/// Tunables that would otherwise be scattered `usize` arguments — no
/// config-file crate, mirroring the teacher's bare `Runner { mode,
/// default_partitions }` shape (this engine has no CLI/env/persisted
/// state to load).
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub mode: ExecMode,
    pub default_partitions: usize,
    pub sort_sample_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel,
            default_partitions: 2 * num_cpus::get().max(2),
            sort_sample_size: crate::sampler::SAMPLE_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_default_partitions(mut self, n: usize) -> Self {
        self.default_partitions = n;
        self
    }
}

pub struct Engine {
    pub mode: ExecMode,
    pub default_partitions: usize,
    #[cfg(feature = "metrics")]
    pub metrics: Option<MetricsCollector>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}

impl Engine {
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            mode: config.mode,
            default_partitions: config.default_partitions,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self) -> Self {
        self.metrics = Some(MetricsCollector::new());
        self
    }

    pub fn execute(&self, plan: &LogicalPlan) -> anyhow::Result<PartitionSet> {
        let root = plan
            .root
            .ok_or_else(|| EngineError::plan("plan has no root node".to_string()))?;
        let segments = planner::segment(plan)?;
        let mut registry: Registry<Vec<Partition>> = Registry::new(planner::fan_out(plan));

        for seg in &segments {
            #[cfg(feature = "metrics")]
            if seg.is_global {
                if let Some(m) = &self.metrics {
                    m.increment(metrics::BARRIERS_EXECUTED, seg.nodes.len() as u64);
                }
            }
            for &id in &seg.nodes {
                let node = plan
                    .node(id)
                    .ok_or_else(|| EngineError::plan(format!("dangling node reference {id:?}")))?;
                let output = self.execute_node(node, &mut registry)?;
                crate::testing::trace(format!(
                    "{} ({:?}) -> {} partitions",
                    node.op.name(),
                    id,
                    output.len()
                ));
                registry.insert(id, output);
            }
        }

        let partitions = registry.consume(root)?;
        let schema = plan
            .node(root)
            .ok_or_else(|| EngineError::plan("root node missing after execution".to_string()))?
            .schema
            .clone();
        PartitionSet::new(schema, partitions)
    }

    fn map_partitions<F>(&self, partitions: &[Partition], f: F) -> Result<Vec<Partition>, EngineError>
    where
        F: Fn(&Partition) -> Result<Partition, EngineError> + Sync,
    {
        match self.mode {
            ExecMode::Sequential => partitions.iter().map(&f).collect(),
            ExecMode::Parallel => partitions.par_iter().map(&f).collect(),
        }
    }

    fn execute_node(
        &self,
        node: &crate::plan::LogicalNode,
        registry: &mut Registry<Vec<Partition>>,
    ) -> Result<Vec<Partition>, EngineError> {
        match &node.op {
            Operator::Scan { source } => {
                let ids: Vec<usize> = (0..node.num_partitions).collect();
                let results: Vec<Partition> = match self.mode {
                    ExecMode::Sequential => ids
                        .iter()
                        .map(|&pid| local::scan::execute(source, pid, node.schema.clone()))
                        .collect::<Result<_, _>>()?,
                    ExecMode::Parallel => ids
                        .par_iter()
                        .map(|&pid| local::scan::execute(source, pid, node.schema.clone()))
                        .collect::<Result<_, _>>()?,
                };
                #[cfg(feature = "metrics")]
                if let Some(m) = &self.metrics {
                    let rows: usize = results.iter().map(Partition::len).sum();
                    m.increment(metrics::ROWS_SCANNED, rows as u64);
                }
                Ok(results)
            }
            Operator::Projection { exprs } => {
                let input = registry.consume(node.children[0])?;
                self.map_partitions(&input, |p| local::project::execute(p, exprs, node.schema.clone()))
            }
            Operator::Filter { predicate } => {
                let input = registry.consume(node.children[0])?;
                self.map_partitions(&input, |p| local::filter::execute(p, predicate))
            }
            Operator::LocalLimit { limit } => {
                let input = registry.consume(node.children[0])?;
                self.map_partitions(&input, |p| Ok(local::limit::execute(p, *limit)))
            }
            Operator::LocalAggregate { aggs, group_by } => {
                let input = registry.consume(node.children[0])?;
                self.map_partitions(&input, |p| {
                    local::aggregate::execute(p, aggs, group_by, node.schema.clone())
                })
            }
            Operator::Join { left_on, right_on, how } => {
                let left = registry.consume(node.children[0])?;
                let right = registry.consume(node.children[1])?;
                if left.len() != right.len() {
                    return Err(EngineError::plan(format!(
                        "join: co-partitioned inputs must have equal partition counts, got {} and {}",
                        left.len(),
                        right.len()
                    )));
                }
                match self.mode {
                    ExecMode::Sequential => left
                        .iter()
                        .zip(right.iter())
                        .map(|(l, r)| l.join(r, left_on, right_on, *how, node.schema.clone()))
                        .collect(),
                    ExecMode::Parallel => left
                        .par_iter()
                        .zip(right.par_iter())
                        .map(|(l, r)| l.join(r, left_on, right_on, *how, node.schema.clone()))
                        .collect(),
                }
            }
            Operator::GlobalLimit { limit } => {
                let input = registry.consume(node.children[0])?;
                Ok(crate::global::limit::execute(&input, *limit))
            }
            Operator::Repartition {
                scheme,
                exprs,
                num_partitions,
            } => {
                let input = registry.consume(node.children[0])?;
                let out = match scheme {
                    RepartitionScheme::Random => crate::global::repartition::random(&input, *num_partitions)?,
                    RepartitionScheme::Hash => {
                        crate::global::repartition::hash(&input, exprs, *num_partitions)?
                    }
                };
                #[cfg(feature = "metrics")]
                if let Some(m) = &self.metrics {
                    m.increment(metrics::PARTITIONS_SHUFFLED, out.len() as u64);
                }
                Ok(out)
            }
            Operator::Sort { keys, num_partitions } => {
                let input = registry.consume(node.children[0])?;
                let out = crate::global::sort::execute(&input, keys, *num_partitions)?;
                #[cfg(feature = "metrics")]
                if let Some(m) = &self.metrics {
                    m.increment(metrics::PARTITIONS_SHUFFLED, out.len() as u64);
                }
                Ok(out)
            }
            Operator::Coalesce { num_partitions } => {
                let input = registry.consume(node.children[0])?;
                crate::global::coalesce::execute(&input, *num_partitions)
            }
        }
    }
}
