use crate::error::BindError;
use crate::node::NodeKind;
use crate::{Blackboard, Node, NodeState, TreeSnapshot};

/// Owns a root node and the blackboard its leaves share.
///
/// Construction walks the whole tree once to give every node its path and to
/// report leaves that have no callback. After that, the host calls
/// [`tick`](Self::tick) once per game step; a tree is dropped along with its
/// agent and has no teardown of its own.
pub struct BehaviorTree {
    root: Node,
    blackboard: Blackboard,
    node_count: usize,
    ticks: u64,
}

impl BehaviorTree {
    pub fn new(root: Node) -> Self {
        Self::with_blackboard(root, Blackboard::new())
    }

    /// Like [`new`](Self::new), but starts from an already seeded blackboard.
    pub fn with_blackboard(mut root: Node, blackboard: Blackboard) -> Self {
        let mut unbound = 0;
        let node_count = assign_paths(&mut root, "root".to_owned(), &mut unbound);
        ::log::debug!(
            "[npc_behavior_tree]: built tree with {} nodes, {} unbound",
            node_count,
            unbound
        );
        Self {
            root,
            blackboard,
            node_count,
            ticks: 0,
        }
    }

    /// Evaluates the root once. The root's result is not returned; read it with
    /// `root().last_state()` if needed.
    pub fn tick(&mut self) {
        self.root.evaluate(&mut self.blackboard);
        self.ticks += 1;
    }

    /// Number of completed calls to [`tick`](Self::tick).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    /// Attaches `callback` to every action placeholder created with
    /// [`Node::action_slot`] under `slot`. Each matching leaf gets its own clone.
    pub fn bind_action<F>(&mut self, slot: &str, callback: F) -> Result<usize, BindError>
    where
        F: FnMut(&mut Blackboard) -> NodeState + Clone + 'static,
    {
        let bound = visit_mut(&mut self.root, &mut |node: &mut Node| match &mut node.kind {
            NodeKind::Action {
                slot: Some(name),
                callback: cb,
            } if name.as_str() == slot => {
                *cb = Some(Box::new(callback.clone()));
                true
            }
            _ => false,
        });
        if bound == 0 {
            return Err(BindError::UnknownAction(slot.to_owned()));
        }
        Ok(bound)
    }

    /// Condition counterpart of [`bind_action`](Self::bind_action).
    pub fn bind_condition<F>(&mut self, slot: &str, callback: F) -> Result<usize, BindError>
    where
        F: FnMut(&mut Blackboard) -> bool + Clone + 'static,
    {
        let bound = visit_mut(&mut self.root, &mut |node: &mut Node| match &mut node.kind {
            NodeKind::Condition {
                slot: Some(name),
                callback: cb,
            } if name.as_str() == slot => {
                *cb = Some(Box::new(callback.clone()));
                true
            }
            _ => false,
        });
        if bound == 0 {
            return Err(BindError::UnknownCondition(slot.to_owned()));
        }
        Ok(bound)
    }

    /// Paths of leaves that still have no callback.
    pub fn unbound_leaves(&self) -> Vec<&str> {
        let mut found = vec![];
        collect_unbound(&self.root, &mut found);
        found
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(self)
    }
}

fn assign_paths(node: &mut Node, path: String, unbound: &mut usize) -> usize {
    if node.is_unbound() {
        ::log::warn!(
            "[npc_behavior_tree]: {} leaf {} has no callback and will always fail",
            node.kind.label(),
            path
        );
        *unbound += 1;
    }
    let mut count = 1;
    for (i, child) in node.children_mut().iter_mut().enumerate() {
        count += assign_paths(child, format!("{}/{}", path, i), unbound);
    }
    node.path = path;
    count
}

/// Applies `f` to every node, depth first. Returns how many calls returned `true`.
fn visit_mut(node: &mut Node, f: &mut dyn FnMut(&mut Node) -> bool) -> usize {
    let mut hits = f(node) as usize;
    for child in node.children_mut() {
        hits += visit_mut(child, f);
    }
    hits
}

fn collect_unbound<'a>(node: &'a Node, found: &mut Vec<&'a str>) {
    if node.is_unbound() {
        found.push(node.path());
    }
    for child in node.children() {
        collect_unbound(child, found);
    }
}
