//! Evaluation of every node kind.
//!
//! A tick is one depth-first walk starting at the root. Nothing here suspends:
//! work that spans several game steps is expressed by returning
//! [`NodeState::Running`] and being evaluated again on the next tick. Composites
//! always restart from their first child.

use crate::blackboard::EntryMap;
use crate::node::{ActionFn, ConditionFn, NodeKind, RepeatCount};
use crate::{Blackboard, Node, NodeState};

impl Node {
    /// Evaluates this node (and, through it, its subtree) once against `bb`,
    /// records the result as [`last_state`](Node::last_state) and returns it.
    pub fn evaluate(&mut self, bb: &mut Blackboard) -> NodeState {
        let path = &self.path;
        let state = match &mut self.kind {
            NodeKind::Action { callback, .. } => {
                tick_action(callback.as_mut(), &mut self.local, path, bb)
            }
            NodeKind::Condition { callback, .. } => {
                tick_condition(callback.as_mut(), &mut self.local, path, bb)
            }
            NodeKind::Sequence(children) => tick_sequence(children, bb),
            NodeKind::Selector(children) => tick_selector(children, bb),
            NodeKind::Parallel {
                children,
                required_successes,
                required_failures,
            } => tick_parallel(children, *required_successes, *required_failures, bb),
            NodeKind::Inverter(child) => child.evaluate(bb).invert(),
            NodeKind::Repeater {
                child,
                repeat_count,
                completed,
            } => tick_repeater(child, *repeat_count, completed, bb),
            NodeKind::UntilFail(child) => match child.evaluate(bb) {
                NodeState::Failure => NodeState::Success,
                NodeState::Success | NodeState::Running => NodeState::Running,
            },
        };
        ::log::trace!("[npc_behavior_tree]: {} -> {}", self.path, state);
        self.last_state = Some(state);
        state
    }
}

/// Runs `f` with the leaf's private scratch swapped into the blackboard.
/// Whatever view was there before (normally none) is restored afterwards.
fn with_scratch<R>(
    local: &mut EntryMap,
    bb: &mut Blackboard,
    f: impl FnOnce(&mut Blackboard) -> R,
) -> R {
    let outer = bb.local.replace(std::mem::take(local));
    let res = f(bb);
    *local = std::mem::replace(&mut bb.local, outer).unwrap_or_default();
    res
}

fn tick_action(
    callback: Option<&mut ActionFn>,
    local: &mut EntryMap,
    path: &str,
    bb: &mut Blackboard,
) -> NodeState {
    match callback {
        Some(action) => with_scratch(local, bb, |bb| action(bb)),
        None => {
            ::log::error!("[npc_behavior_tree]: action {} has no callback assigned", path);
            NodeState::Failure
        }
    }
}

fn tick_condition(
    callback: Option<&mut ConditionFn>,
    local: &mut EntryMap,
    path: &str,
    bb: &mut Blackboard,
) -> NodeState {
    match callback {
        Some(predicate) => with_scratch(local, bb, |bb| predicate(bb)).into(),
        None => {
            ::log::error!("[npc_behavior_tree]: condition {} has no callback assigned", path);
            NodeState::Failure
        }
    }
}

fn tick_sequence(children: &mut [Node], bb: &mut Blackboard) -> NodeState {
    for child in children {
        match child.evaluate(bb) {
            NodeState::Success => (),
            // Stop before later steps get a chance to act this tick.
            state => return state,
        }
    }
    NodeState::Success
}

fn tick_selector(children: &mut [Node], bb: &mut Blackboard) -> NodeState {
    for child in children {
        match child.evaluate(bb) {
            NodeState::Failure => (),
            state => return state,
        }
    }
    NodeState::Failure
}

fn tick_parallel(
    children: &mut [Node],
    required_successes: usize,
    required_failures: usize,
    bb: &mut Blackboard,
) -> NodeState {
    let (mut successes, mut failures, mut running) = (0, 0, 0);
    for child in children {
        match child.evaluate(bb) {
            NodeState::Success => successes += 1,
            NodeState::Failure => failures += 1,
            NodeState::Running => running += 1,
        }
    }

    // Success is checked first, so it wins when both thresholds are met.
    if successes >= required_successes {
        NodeState::Success
    } else if failures >= required_failures {
        NodeState::Failure
    } else if running > 0 {
        NodeState::Running
    } else {
        NodeState::Failure
    }
}

fn tick_repeater(
    child: &mut Node,
    repeat_count: RepeatCount,
    completed: &mut usize,
    bb: &mut Blackboard,
) -> NodeState {
    let state = child.evaluate(bb);
    if state.is_running() {
        return NodeState::Running;
    }

    // The counter is never reset and the child is not restarted; it is simply
    // evaluated again on the next tick.
    *completed = completed.saturating_add(1);
    match repeat_count {
        RepeatCount::Times(n) if *completed >= n => state,
        _ => NodeState::Running,
    }
}

#[cfg(test)]
mod test;
