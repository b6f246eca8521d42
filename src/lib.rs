//! # npc-behavior-tree
//!
//! A small behavior tree interpreter for driving game NPCs (pigs, guards, enemies)
//! one game step at a time.
//!
//! ## Overview
//!
//! A behavior tree is a hierarchy of decisions. Leaves either check something
//! about the world (conditions) or do something to it (actions); interior nodes
//! combine their children's results with priority, sequencing, repetition or
//! parallel semantics. Every evaluation yields a [`NodeState`]: `Success`,
//! `Failure`, or `Running` for work that continues on a later tick.
//!
//! All nodes of one tree share a [`Blackboard`], a key-value store the host seeds
//! with world state and the leaves use to hand data to each other.
//!
//! ## How it looks like
//!
//! Build the tree out of nodes wired to your own closures:
//!
//! ```rust
//! use npc_behavior_tree::*;
//!
//! let root = Node::selector(vec![
//!     Node::sequence(vec![
//!         Node::condition(|bb| bb.get_or("EnemyDistance", f32::MAX) < 2.),
//!         Node::action(|bb| {
//!             bb.set("Attacking", true);
//!             NodeState::Success
//!         }),
//!     ]),
//!     Node::action(|bb| {
//!         bb.set("Attacking", false);
//!         NodeState::Running
//!     }),
//! ]);
//!
//! let mut tree = BehaviorTree::new(root);
//! tree.blackboard_mut().set("EnemyDistance", 1.5f32);
//! tree.tick();
//! assert_eq!(tree.blackboard().get::<bool>("Attacking"), Some(&true));
//! ```
//!
//! and call [`BehaviorTree::tick`] once per game step. The tree keeps no clock of
//! its own.
//!
//! ## Node types
//!
//! | Node | Children | Result |
//! |---|---|---|
//! | `Action` | 0 | whatever the callback returns |
//! | `Condition` | 0 | `Success` if the predicate holds, else `Failure` |
//! | `Sequence` | n | first non-`Success` child, or `Success` |
//! | `Selector` | n | first non-`Failure` child, or `Failure` |
//! | `Parallel` | n | ticks all children, then compares counts to thresholds |
//! | `Inverter` | 1 | swaps `Success` and `Failure` |
//! | `Repeater` | 1 | `Running` until the child has settled N times |
//! | `UntilFail` | 1 | `Running` until the child fails, then `Success` |
//!
//! ## Binding leaves after building the shape
//!
//! A tree can be declared first with named placeholder leaves and have its
//! callbacks attached afterwards:
//!
//! ```rust
//! use npc_behavior_tree::*;
//!
//! let mut tree = BehaviorTree::new(Node::sequence(vec![
//!     Node::condition_slot("is_hungry"),
//!     Node::action_slot("eat"),
//! ]));
//! tree.bind_condition("is_hungry", |bb| bb.get_or("Hunger", 0u32) > 5).unwrap();
//! tree.bind_action("eat", |bb| {
//!     bb.set("Hunger", 0u32);
//!     NodeState::Success
//! })
//! .unwrap();
//! ```
//!
//! A leaf that never receives a callback logs an error and evaluates to
//! `Failure`; the rest of the tree keeps working.
//!
//! ## Node-local data
//!
//! Each leaf has private scratch storage that persists across ticks. While its
//! callback runs, it is reachable through [`Blackboard::local_or`] and
//! [`Blackboard::set_local`]:
//!
//! ```rust
//! use npc_behavior_tree::*;
//!
//! let wait_three = Node::action(|bb| {
//!     let waited = bb.local_or("waited", 0u32) + 1;
//!     bb.set_local("waited", waited);
//!     if waited >= 3 { NodeState::Success } else { NodeState::Running }
//! });
//! let mut tree = BehaviorTree::new(wait_three);
//! tree.tick();
//! tree.tick();
//! assert_eq!(tree.root().last_state(), Some(NodeState::Running));
//! tree.tick();
//! assert_eq!(tree.root().last_state(), Some(NodeState::Success));
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and installs no
//! logger. Missing callbacks are reported at `error`, unbound leaves found while
//! constructing a tree at `warn`, and each node evaluation at `trace`.
//!
//! ## Features
//!
//! * `serde`: `Serialize`/`Deserialize` for [`NodeState`], [`Symbol`] and the
//!   math types, and `Serialize` for [`TreeSnapshot`].

pub mod blackboard;
pub mod builder;
pub mod error;
pub mod math;
mod node;
mod nodes;
mod snapshot;
mod symbol;
mod tree;

use std::fmt::{self, Display, Formatter};

pub use crate::blackboard::Blackboard;
pub use crate::math::{Transform, Vec3};
pub use crate::node::{ActionFn, ConditionFn, Node, NodeKind, RepeatCount};
pub use crate::snapshot::{NodeSnapshot, TreeSnapshot};
pub use crate::symbol::Symbol;
pub use crate::tree::BehaviorTree;
pub use ::once_cell::sync::Lazy;

/// Result of evaluating a node for one tick.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeState {
    /// The node has not finished and should be ticked again next step
    Running,
    /// The node finished and achieved what it set out to do
    Success,
    /// The node finished without achieving it, or could not run at all
    Failure,
}

impl NodeState {
    pub fn is_running(self) -> bool {
        matches!(self, NodeState::Running)
    }

    /// `Success` or `Failure`.
    pub fn is_settled(self) -> bool {
        !self.is_running()
    }

    /// Swaps `Success` and `Failure`; `Running` stays `Running`.
    pub fn invert(self) -> Self {
        match self {
            NodeState::Running => NodeState::Running,
            NodeState::Success => NodeState::Failure,
            NodeState::Failure => NodeState::Success,
        }
    }
}

impl From<bool> for NodeState {
    fn from(b: bool) -> Self {
        if b {
            NodeState::Success
        } else {
            NodeState::Failure
        }
    }
}

impl Display for NodeState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            NodeState::Running => "Running",
            NodeState::Success => "Success",
            NodeState::Failure => "Failure",
        };
        f.write_str(s)
    }
}

/// Builds a [`Blackboard`] from `key => value` pairs.
///
/// ```
/// use npc_behavior_tree::blackboard;
///
/// let bb = blackboard!("WalkSpeed" => 2f32, "PatrolIndex" => 0usize);
/// assert_eq!(bb.get_or("WalkSpeed", 0f32), 2.);
/// ```
#[macro_export]
macro_rules! blackboard {
    () => {
        $crate::Blackboard::new()
    };
    ($($name: expr => $val: expr),+ $(,)?) => {{
        let mut bb = $crate::Blackboard::new();
        $(bb.set($name, $val);)+
        bb
    }};
}
