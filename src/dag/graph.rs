// src/dag/graph.rs

use std::collections::BTreeMap;

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::dag::TaskNode;
use crate::errors::{AssetdagError, Result};

/// Ordering constraints implied by a [`TaskNode`] tree, flattened into a
/// graph of primitive task names.
///
/// Edge direction: `a -> b` means `a` must complete before `b` starts.
/// A sequence links every exit of one child to every entry of the next;
/// parallel children get no edges between them.
#[derive(Debug, Clone)]
pub struct ExecutionGraph<'a> {
    graph: DiGraphMap<&'a str, ()>,
}

/// Entry and exit tasks of a sub-tree.
#[derive(Debug, Default)]
struct Span<'a> {
    entries: Vec<&'a str>,
    exits: Vec<&'a str>,
}

impl<'a> ExecutionGraph<'a> {
    pub fn from_node(node: &'a TaskNode) -> Self {
        let mut graph = DiGraphMap::new();
        add_node(&mut graph, node);
        Self { graph }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, task: &str) -> bool {
        self.node(task).is_some()
    }

    fn node(&self, task: &str) -> Option<&'a str> {
        self.graph.nodes().find(|n| *n == task)
    }

    /// Whether `before` is guaranteed to finish before `after` starts.
    pub fn must_precede(&self, before: &str, after: &str) -> bool {
        match (self.node(before), self.node(after)) {
            (Some(b), Some(a)) if b != a => has_path_connecting(&self.graph, b, a, None),
            _ => false,
        }
    }

    /// Direct predecessors of `task`, sorted.
    pub fn dependencies_of(&self, task: &str) -> Vec<&'a str> {
        let Some(task) = self.node(task) else {
            return Vec::new();
        };
        let mut deps: Vec<_> = self
            .graph
            .neighbors_directed(task, petgraph::Direction::Incoming)
            .collect();
        deps.sort_unstable();
        deps
    }

    /// A valid execution order of all primitives.
    pub fn topological_order(&self) -> Result<Vec<&'a str>> {
        toposort(&self.graph, None).map_err(|cycle| {
            AssetdagError::DagCycle(format!(
                "task '{}' is ordered after itself",
                cycle.node_id()
            ))
        })
    }

    /// Group tasks into stages: every task in stage `n` only waits on tasks
    /// in earlier stages. Tasks within a stage are sorted by name.
    pub fn stages(&self) -> Result<Vec<Vec<&'a str>>> {
        let order = self.topological_order()?;
        let mut level: BTreeMap<&'a str, usize> = BTreeMap::new();

        for &task in &order {
            let depth = self
                .graph
                .neighbors_directed(task, petgraph::Direction::Incoming)
                .filter_map(|dep| level.get(dep))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            level.insert(task, depth);
        }

        let mut stages: Vec<Vec<&'a str>> = Vec::new();
        for (task, depth) in level {
            if stages.len() <= depth {
                stages.resize_with(depth + 1, Vec::new);
            }
            stages[depth].push(task);
        }
        Ok(stages)
    }
}

fn add_node<'a>(graph: &mut DiGraphMap<&'a str, ()>, node: &'a TaskNode) -> Span<'a> {
    match node {
        TaskNode::Task(task) => {
            let name = task.name();
            graph.add_node(name);
            Span {
                entries: vec![name],
                exits: vec![name],
            }
        }
        TaskNode::Sequence { children, .. } => {
            let mut span = Span::default();
            let mut first = true;
            for child in children.iter() {
                let child_span = add_node(graph, child);
                if child_span.entries.is_empty() {
                    continue;
                }
                for &before in &span.exits {
                    for &after in &child_span.entries {
                        graph.add_edge(before, after, ());
                    }
                }
                if first {
                    span.entries = child_span.entries;
                    first = false;
                }
                span.exits = child_span.exits;
            }
            span
        }
        TaskNode::Parallel { children, .. } => {
            let mut span = Span::default();
            for child in children.iter() {
                let child_span = add_node(graph, child);
                span.entries.extend(child_span.entries);
                span.exits.extend(child_span.exits);
            }
            span
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::dag::{parallel, sequence};
    use crate::task::Task;
    use crate::types::Feature;

    fn leaf(name: &str) -> TaskNode {
        Task::new(name, Feature::Copy, Settings::default(), || async {
            Ok::<(), anyhow::Error>(())
        })
        .into()
    }

    #[test]
    fn sequence_then_parallel_fans_out() {
        let node = sequence([leaf("clean"), parallel([leaf("a"), leaf("b")]), leaf("z")]);
        let graph = ExecutionGraph::from_node(&node);

        assert_eq!(graph.len(), 4);
        assert!(graph.must_precede("clean", "a"));
        assert!(graph.must_precede("clean", "z"));
        assert!(graph.must_precede("b", "z"));
        assert!(!graph.must_precede("a", "b"));
        assert!(!graph.must_precede("b", "a"));
        assert_eq!(graph.dependencies_of("z"), ["a", "b"]);
    }

    #[test]
    fn stages_follow_dependency_depth() {
        let node = sequence([leaf("clean"), parallel([leaf("b"), leaf("a")]), leaf("z")]);
        let graph = ExecutionGraph::from_node(&node);

        assert_eq!(
            graph.stages().unwrap(),
            vec![vec!["clean"], vec!["a", "b"], vec!["z"]]
        );
    }

    #[test]
    fn empty_composites_do_not_break_chains() {
        let node = sequence([leaf("a"), parallel(Vec::new()), leaf("b")]);
        let graph = ExecutionGraph::from_node(&node);
        assert!(graph.must_precede("a", "b"));
    }

    #[test]
    fn repeated_task_in_sequence_is_a_cycle() {
        let node = sequence([leaf("a"), leaf("b"), leaf("a")]);
        let graph = ExecutionGraph::from_node(&node);
        assert!(matches!(
            graph.topological_order(),
            Err(AssetdagError::DagCycle(_))
        ));
    }
}
