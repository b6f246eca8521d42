use std::fmt::{self, Debug, Formatter};

use crate::blackboard::{scratch_get, EntryMap};
use crate::error::BlackboardResult;
use crate::{Blackboard, NodeState, Symbol};

pub type ActionFn = Box<dyn FnMut(&mut Blackboard) -> NodeState>;
pub type ConditionFn = Box<dyn FnMut(&mut Blackboard) -> bool>;

/// How many times a [`Node::repeater`] lets its child settle before finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Times(usize),
    Forever,
}

impl From<i32> for RepeatCount {
    /// `-1` means forever. Any other negative count finishes on the first
    /// settlement, the same as `Times(0)`.
    fn from(n: i32) -> Self {
        match n {
            -1 => RepeatCount::Forever,
            n if n < 0 => RepeatCount::Times(0),
            n => RepeatCount::Times(n as usize),
        }
    }
}

impl From<usize> for RepeatCount {
    fn from(n: usize) -> Self {
        RepeatCount::Times(n)
    }
}

pub enum NodeKind {
    Action {
        slot: Option<String>,
        callback: Option<ActionFn>,
    },
    Condition {
        slot: Option<String>,
        callback: Option<ConditionFn>,
    },
    Sequence(Vec<Node>),
    Selector(Vec<Node>),
    Parallel {
        children: Vec<Node>,
        required_successes: usize,
        required_failures: usize,
    },
    Inverter(Box<Node>),
    Repeater {
        child: Box<Node>,
        repeat_count: RepeatCount,
        completed: usize,
    },
    UntilFail(Box<Node>),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Action { .. } => "Action",
            NodeKind::Condition { .. } => "Condition",
            NodeKind::Sequence(_) => "Sequence",
            NodeKind::Selector(_) => "Selector",
            NodeKind::Parallel { .. } => "Parallel",
            NodeKind::Inverter(_) => "Inverter",
            NodeKind::Repeater { .. } => "Repeater",
            NodeKind::UntilFail(_) => "UntilFail",
        }
    }
}

/// One node of a behavior tree.
///
/// Shape is fixed at construction: composites take their children as a `Vec`,
/// decorators take exactly one child, and there is no API to attach, detach or
/// reorder children afterwards. Children are evaluated in the order given.
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) name: Option<String>,
    pub(crate) path: String,
    pub(crate) last_state: Option<NodeState>,
    pub(crate) local: EntryMap,
}

impl Node {
    fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            path: String::new(),
            last_state: None,
            local: EntryMap::new(),
        }
    }

    pub fn action(callback: impl FnMut(&mut Blackboard) -> NodeState + 'static) -> Self {
        Self::from_kind(NodeKind::Action {
            slot: None,
            callback: Some(Box::new(callback)),
        })
    }

    pub fn condition(callback: impl FnMut(&mut Blackboard) -> bool + 'static) -> Self {
        Self::from_kind(NodeKind::Condition {
            slot: None,
            callback: Some(Box::new(callback)),
        })
    }

    /// An action leaf with no callback yet, to be filled in by
    /// [`BehaviorTree::bind_action`](crate::BehaviorTree::bind_action).
    /// Until then it evaluates to `Failure`.
    pub fn action_slot(slot: impl Into<String>) -> Self {
        let slot = slot.into();
        Self::from_kind(NodeKind::Action {
            slot: Some(slot.clone()),
            callback: None,
        })
        .named(slot)
    }

    /// A condition leaf with no predicate yet; see [`Node::action_slot`].
    pub fn condition_slot(slot: impl Into<String>) -> Self {
        let slot = slot.into();
        Self::from_kind(NodeKind::Condition {
            slot: Some(slot.clone()),
            callback: None,
        })
        .named(slot)
    }

    pub fn sequence(children: Vec<Node>) -> Self {
        Self::from_kind(NodeKind::Sequence(children))
    }

    pub fn selector(children: Vec<Node>) -> Self {
        Self::from_kind(NodeKind::Selector(children))
    }

    pub fn parallel(children: Vec<Node>, required_successes: usize, required_failures: usize) -> Self {
        Self::from_kind(NodeKind::Parallel {
            children,
            required_successes,
            required_failures,
        })
    }

    pub fn inverter(child: Node) -> Self {
        Self::from_kind(NodeKind::Inverter(Box::new(child)))
    }

    pub fn repeater(child: Node, repeat_count: impl Into<RepeatCount>) -> Self {
        Self::from_kind(NodeKind::Repeater {
            child: Box::new(child),
            repeat_count: repeat_count.into(),
            completed: 0,
        })
    }

    pub fn until_fail(child: Node) -> Self {
        Self::from_kind(NodeKind::UntilFail(Box::new(child)))
    }

    /// Attaches a display name, used in log lines and snapshots.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Position in the tree, e.g. `root/0/2`. Empty until the node is owned by a
    /// [`BehaviorTree`](crate::BehaviorTree).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Result of the most recent evaluation, `None` if never evaluated.
    pub fn last_state(&self) -> Option<NodeState> {
        self.last_state
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Action { .. } | NodeKind::Condition { .. } => &[],
            NodeKind::Sequence(children)
            | NodeKind::Selector(children)
            | NodeKind::Parallel { children, .. } => children.as_slice(),
            NodeKind::Inverter(child)
            | NodeKind::Repeater { child, .. }
            | NodeKind::UntilFail(child) => std::slice::from_ref(&**child),
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        match &mut self.kind {
            NodeKind::Action { .. } | NodeKind::Condition { .. } => &mut [],
            NodeKind::Sequence(children)
            | NodeKind::Selector(children)
            | NodeKind::Parallel { children, .. } => children.as_mut_slice(),
            NodeKind::Inverter(child)
            | NodeKind::Repeater { child, .. }
            | NodeKind::UntilFail(child) => std::slice::from_mut(&mut **child),
        }
    }

    /// Whether this is a leaf still waiting for its callback.
    pub fn is_unbound(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Action { callback: None, .. } | NodeKind::Condition { callback: None, .. }
        )
    }

    /// Reads this node's private scratch data, returning `default` when absent.
    ///
    /// # Panics
    ///
    /// Panics if the key holds a value of a different type.
    pub fn get_local_data<T: Clone + 'static>(&self, key: impl Into<Symbol>, default: T) -> T {
        match self.try_get_local_data::<T>(key) {
            Ok(v) => v.cloned().unwrap_or(default),
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_get_local_data<T: 'static>(
        &self,
        key: impl Into<Symbol>,
    ) -> BlackboardResult<Option<&T>> {
        scratch_get(&self.local, key)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_size).sum::<usize>()
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut s = f.debug_struct(self.kind.label());
        if let Some(name) = &self.name {
            s.field("name", name);
        }
        s.field("path", &self.path)
            .field("last_state", &self.last_state)
            .field("children", &self.children())
            .finish()
    }
}
