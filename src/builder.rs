//! Shorthands for building trees.
//!
//! Instead of `Node::sequence(vec![Node::condition(..), Node::action(..)])` you
//! can write `sequence(vec![condition(..), action(..)])`.

use crate::{Blackboard, Node, NodeState, RepeatCount};

#[inline]
pub fn action(f: impl FnMut(&mut Blackboard) -> NodeState + 'static) -> Node {
    Node::action(f)
}

#[inline]
pub fn condition(f: impl FnMut(&mut Blackboard) -> bool + 'static) -> Node {
    Node::condition(f)
}

#[inline]
pub fn sequence(children: Vec<Node>) -> Node {
    Node::sequence(children)
}

#[inline]
pub fn selector(children: Vec<Node>) -> Node {
    Node::selector(children)
}

#[inline]
pub fn parallel(children: Vec<Node>, required_successes: usize, required_failures: usize) -> Node {
    Node::parallel(children, required_successes, required_failures)
}

#[inline]
pub fn inverter(child: Node) -> Node {
    Node::inverter(child)
}

#[inline]
pub fn repeater(child: Node, repeat_count: impl Into<RepeatCount>) -> Node {
    Node::repeater(child, repeat_count)
}

/// Repeats `child` without limit.
#[inline]
pub fn forever(child: Node) -> Node {
    Node::repeater(child, RepeatCount::Forever)
}

#[inline]
pub fn until_fail(child: Node) -> Node {
    Node::until_fail(child)
}

/// Action that always returns `state`.
pub fn constant(state: NodeState) -> Node {
    Node::action(move |_| state)
}
