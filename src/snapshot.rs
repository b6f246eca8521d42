//! Read-only views of a tree's last evaluation, for debug overlays and logs.

use crate::{BehaviorTree, Node, NodeState};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeSnapshot {
    pub path: String,
    pub kind: &'static str,
    pub name: Option<String>,
    pub state: Option<NodeState>,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    fn capture(node: &Node) -> Self {
        Self {
            path: node.path().to_owned(),
            kind: node.kind().label(),
            name: node.name().map(str::to_owned),
            state: node.last_state(),
            children: node.children().iter().map(NodeSnapshot::capture).collect(),
        }
    }

    /// Finds the node at `path`, e.g. `root/1/0`.
    pub fn find(&self, path: &str) -> Option<&NodeSnapshot> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }

    /// Paths of the `Running` nodes in this subtree, depth first.
    pub fn running_paths(&self) -> Vec<&str> {
        let mut out = vec![];
        self.collect_running(&mut out);
        out
    }

    fn collect_running<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.state == Some(NodeState::Running) {
            out.push(&self.path);
        }
        for child in &self.children {
            child.collect_running(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeSnapshot {
    pub ticks: u64,
    pub root: NodeSnapshot,
}

impl TreeSnapshot {
    pub(crate) fn capture(tree: &BehaviorTree) -> Self {
        Self {
            ticks: tree.ticks(),
            root: NodeSnapshot::capture(tree.root()),
        }
    }
}
