// src/dag/node.rs

use std::sync::Arc;

use crate::task::Task;
use crate::types::TaskName;

/// A composable unit of execution.
///
/// Leaves are primitive tasks. `Sequence` runs its children one after the
/// other and stops at the first failure; `Parallel` starts every child
/// together and waits for all of them. Children are shared, so the same
/// primitive can appear in several composites without being rebuilt.
#[derive(Debug, Clone)]
pub enum TaskNode {
    Task(Arc<Task>),
    Sequence {
        name: Option<TaskName>,
        children: Arc<[TaskNode]>,
    },
    Parallel {
        name: Option<TaskName>,
        children: Arc<[TaskNode]>,
    },
}

/// Run `children` strictly in order.
pub fn sequence(children: impl IntoIterator<Item = TaskNode>) -> TaskNode {
    TaskNode::Sequence {
        name: None,
        children: children.into_iter().collect(),
    }
}

/// Run `children` concurrently.
pub fn parallel(children: impl IntoIterator<Item = TaskNode>) -> TaskNode {
    TaskNode::Parallel {
        name: None,
        children: children.into_iter().collect(),
    }
}

impl From<Arc<Task>> for TaskNode {
    fn from(task: Arc<Task>) -> Self {
        TaskNode::Task(task)
    }
}

impl From<Task> for TaskNode {
    fn from(task: Task) -> Self {
        TaskNode::Task(Arc::new(task))
    }
}

impl TaskNode {
    /// Attach a name to a composite. Leaves keep their task name.
    pub fn named(self, label: impl Into<TaskName>) -> Self {
        match self {
            TaskNode::Task(_) => self,
            TaskNode::Sequence { children, .. } => TaskNode::Sequence {
                name: Some(label.into()),
                children,
            },
            TaskNode::Parallel { children, .. } => TaskNode::Parallel {
                name: Some(label.into()),
                children,
            },
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TaskNode::Task(task) => Some(task.name()),
            TaskNode::Sequence { name, .. } | TaskNode::Parallel { name, .. } => name.as_deref(),
        }
    }

    /// Human-readable label for logs.
    pub fn label(&self) -> &str {
        match self {
            TaskNode::Task(task) => task.name(),
            TaskNode::Sequence { name, .. } => name.as_deref().unwrap_or("<sequence>"),
            TaskNode::Parallel { name, .. } => name.as_deref().unwrap_or("<parallel>"),
        }
    }

    pub fn children(&self) -> &[TaskNode] {
        match self {
            TaskNode::Task(_) => &[],
            TaskNode::Sequence { children, .. } | TaskNode::Parallel { children, .. } => children,
        }
    }

    /// Every primitive under this node, depth-first, in declaration order.
    pub fn tasks(&self) -> Vec<&Arc<Task>> {
        let mut out = Vec::new();
        self.collect_tasks(&mut out);
        out
    }

    fn collect_tasks<'a>(&'a self, out: &mut Vec<&'a Arc<Task>>) {
        match self {
            TaskNode::Task(task) => out.push(task),
            _ => self.children().iter().for_each(|c| c.collect_tasks(out)),
        }
    }

    /// Indented tree rendering, used by `--dry-run`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(0, &mut out);
        out
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self {
            TaskNode::Task(task) => {
                let state = if task.is_enabled() { "" } else { " (disabled)" };
                out.push_str(&format!("{indent}- {}{state}\n", task.name()));
            }
            TaskNode::Sequence { .. } | TaskNode::Parallel { .. } => {
                let kind = if matches!(self, TaskNode::Sequence { .. }) {
                    "sequence"
                } else {
                    "parallel"
                };
                match self.name() {
                    Some(name) => out.push_str(&format!("{indent}{kind} {name}:\n")),
                    None => out.push_str(&format!("{indent}{kind}:\n")),
                }
                for child in self.children() {
                    child.render_into(depth + 1, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::types::Feature;

    fn leaf(name: &str) -> TaskNode {
        Task::new(name, Feature::Copy, Settings::default(), || async {
            Ok::<(), anyhow::Error>(())
        })
        .into()
    }

    #[test]
    fn tasks_are_listed_depth_first() {
        let node = sequence([leaf("a"), parallel([leaf("b"), leaf("c")]), leaf("d")]);
        let names: Vec<_> = node.tasks().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }

    #[test]
    fn naming_leaves_is_a_no_op() {
        assert_eq!(leaf("a").named("other").name(), Some("a"));
        assert_eq!(parallel([leaf("a")]).named("group").name(), Some("group"));
    }

    #[test]
    fn render_shows_structure() {
        let node = sequence([leaf("a"), parallel([leaf("b")])]).named("default");
        assert_eq!(node.render(), "sequence default:\n  - a\n  parallel:\n    - b\n");
    }
}
