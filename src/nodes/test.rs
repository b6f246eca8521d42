use std::cell::RefCell;
use std::rc::Rc;

use crate::builder::*;
use crate::{Blackboard, Node, NodeState, RepeatCount};

type Trace = Rc<RefCell<Vec<&'static str>>>;

/// Action that records its name each time it is evaluated.
fn traced(trace: &Trace, name: &'static str, state: NodeState) -> Node {
    let trace = trace.clone();
    Node::action(move |_| {
        trace.borrow_mut().push(name);
        state
    })
}

/// Action that returns the scripted states in order, repeating the last one.
fn scripted(states: Vec<NodeState>) -> Node {
    let mut i = 0;
    Node::action(move |_| {
        let state = states[i.min(states.len() - 1)];
        i += 1;
        state
    })
}

fn eval(node: &mut Node) -> NodeState {
    node.evaluate(&mut Blackboard::new())
}

use NodeState::{Failure, Running, Success};

#[test]
fn test_sequence() {
    let trace = Trace::default();
    let mut tree = sequence(vec![
        traced(&trace, "a", Success),
        traced(&trace, "b", Success),
        traced(&trace, "c", Success),
    ]);
    assert_eq!(eval(&mut tree), Success);
    assert_eq!(*trace.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn test_sequence_stops_on_failure() {
    let trace = Trace::default();
    let mut tree = sequence(vec![
        traced(&trace, "a", Success),
        traced(&trace, "b", Failure),
        traced(&trace, "c", Success),
    ]);
    assert_eq!(eval(&mut tree), Failure);
    assert_eq!(*trace.borrow(), vec!["a", "b"]);
}

#[test]
fn test_sequence_suspend() {
    let trace = Trace::default();
    let mut tree = sequence(vec![
        traced(&trace, "a", Success),
        traced(&trace, "b", Running),
        traced(&trace, "c", Success),
    ]);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(*trace.borrow(), vec!["a", "b"]);

    // No resumption: the next tick starts over from the first child.
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(*trace.borrow(), vec!["a", "b", "a", "b"]);
}

#[test]
fn test_empty_composites() {
    assert_eq!(eval(&mut sequence(vec![])), Success);
    assert_eq!(eval(&mut selector(vec![])), Failure);
}

#[test]
fn test_selector() {
    let trace = Trace::default();
    let mut tree = selector(vec![
        traced(&trace, "a", Failure),
        traced(&trace, "b", Success),
        traced(&trace, "c", Success),
    ]);
    assert_eq!(eval(&mut tree), Success);
    assert_eq!(*trace.borrow(), vec!["a", "b"]);
}

#[test]
fn test_selector_suspend() {
    let trace = Trace::default();
    let mut tree = selector(vec![
        traced(&trace, "a", Failure),
        traced(&trace, "b", Running),
        traced(&trace, "c", Success),
    ]);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(*trace.borrow(), vec!["a", "b"]);
}

#[test]
fn test_selector_all_fail() {
    let trace = Trace::default();
    let mut tree = selector(vec![
        traced(&trace, "a", Failure),
        traced(&trace, "b", Failure),
    ]);
    assert_eq!(eval(&mut tree), Failure);
    assert_eq!(*trace.borrow(), vec!["a", "b"]);
}

#[test]
fn test_selector_of_sequences() {
    let trace = Trace::default();
    let mut tree = selector(vec![
        sequence(vec![
            traced(&trace, "a1", Success),
            traced(&trace, "a2", Failure),
            traced(&trace, "a3", Success),
        ]),
        sequence(vec![
            traced(&trace, "b1", Success),
            traced(&trace, "b2", Success),
        ]),
        traced(&trace, "c", Success),
    ]);
    assert_eq!(eval(&mut tree), Success);
    assert_eq!(*trace.borrow(), vec!["a1", "a2", "b1", "b2"]);
}

fn parallel_of(states: &[NodeState], successes: usize, failures: usize) -> NodeState {
    let children = states.iter().map(|s| constant(*s)).collect();
    eval(&mut parallel(children, successes, failures))
}

#[test]
fn test_parallel_thresholds() {
    assert_eq!(parallel_of(&[Success, Success, Running], 2, 1), Success);
    assert_eq!(parallel_of(&[Success, Failure, Running], 2, 1), Failure);
    assert_eq!(parallel_of(&[Success, Failure, Running], 2, 2), Running);
    // Nothing running and neither threshold met.
    assert_eq!(parallel_of(&[Success, Failure], 2, 2), Failure);
    // Success wins a tie.
    assert_eq!(parallel_of(&[Success, Failure], 1, 1), Success);
    // A zero threshold is met by nothing at all.
    assert_eq!(parallel_of(&[], 0, 1), Success);
    assert_eq!(parallel_of(&[Running], 1, 0), Failure);
}

#[test]
fn test_parallel_ticks_every_child() {
    let trace = Trace::default();
    let mut tree = parallel(
        vec![
            traced(&trace, "a", Success),
            traced(&trace, "b", Failure),
            traced(&trace, "c", Running),
            traced(&trace, "d", Success),
        ],
        1,
        1,
    );
    assert_eq!(eval(&mut tree), Success);
    assert_eq!(*trace.borrow(), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_inverter() {
    assert_eq!(eval(&mut inverter(constant(Success))), Failure);
    assert_eq!(eval(&mut inverter(constant(Failure))), Success);
    assert_eq!(eval(&mut inverter(constant(Running))), Running);

    for state in [Success, Failure].iter() {
        assert_eq!(eval(&mut inverter(inverter(constant(*state)))), *state);
    }
}

#[test]
fn test_repeat() {
    let mut tree = repeater(scripted(vec![Success, Success, Failure]), 3);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Failure);
}

#[test]
fn test_repeat_running_does_not_count() {
    let mut tree = repeater(scripted(vec![Running, Success, Running, Success]), 2);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Success);
}

#[test]
fn test_repeat_keeps_counter_after_limit() {
    let mut tree = repeater(scripted(vec![Success, Failure, Success]), 1);
    assert_eq!(eval(&mut tree), Success);
    // The counter is never reset, so every later settlement is terminal.
    assert_eq!(eval(&mut tree), Failure);
    assert_eq!(eval(&mut tree), Success);
}

#[test]
fn test_repeat_forever() {
    let mut tree = forever(constant(Failure));
    for _ in 0..100 {
        assert_eq!(eval(&mut tree), Running);
    }
    let mut tree = repeater(constant(Success), -1);
    assert_eq!(eval(&mut tree), Running);
}

#[test]
fn test_repeat_count_from_i32() {
    assert_eq!(RepeatCount::from(-1), RepeatCount::Forever);
    assert_eq!(RepeatCount::from(-5), RepeatCount::Times(0));
    assert_eq!(RepeatCount::from(4), RepeatCount::Times(4));

    let mut tree = repeater(constant(Failure), 0);
    assert_eq!(eval(&mut tree), Failure);
}

#[test]
fn test_until_fail() {
    let mut tree = until_fail(scripted(vec![Success, Running, Success, Failure]));
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Running);
    assert_eq!(eval(&mut tree), Success);
}

#[test]
fn test_condition() {
    assert_eq!(eval(&mut condition(|_| true)), Success);
    assert_eq!(eval(&mut condition(|_| false)), Failure);
}

#[test]
fn test_condition_gates_action() {
    let trace = Trace::default();
    let mut tree = sequence(vec![condition(|_| true), traced(&trace, "act", Success)]);
    assert_eq!(eval(&mut tree), Success);
    assert_eq!(*trace.borrow(), vec!["act"]);

    let trace = Trace::default();
    let mut tree = sequence(vec![condition(|_| false), traced(&trace, "act", Success)]);
    assert_eq!(eval(&mut tree), Failure);
    assert!(trace.borrow().is_empty());
}

#[test]
fn test_unbound_leaves_fail() {
    assert_eq!(eval(&mut Node::action_slot("attack")), Failure);
    assert_eq!(eval(&mut Node::condition_slot("can_see")), Failure);

    // The rest of the tree keeps working.
    let mut tree = selector(vec![Node::action_slot("attack"), constant(Success)]);
    assert_eq!(eval(&mut tree), Success);
}

#[test]
fn test_blackboard_flows_between_siblings() {
    let mut tree = sequence(vec![
        condition(|bb| {
            bb.set("TargetPosition", 42i32);
            true
        }),
        action(|bb| match bb.get::<i32>("TargetPosition") {
            Some(42) => Success,
            _ => Failure,
        }),
    ]);
    assert_eq!(eval(&mut tree), Success);
}

#[test]
fn test_last_state() {
    let mut tree = sequence(vec![constant(Failure), constant(Success)]);
    assert_eq!(tree.last_state(), None);
    eval(&mut tree);
    assert_eq!(tree.last_state(), Some(Failure));
    assert_eq!(tree.children()[0].last_state(), Some(Failure));
    assert_eq!(tree.children()[1].last_state(), None);
}

fn counter() -> Node {
    action(|bb| {
        let n = bb.local_or("count", 0u32) + 1;
        bb.set_local("count", n);
        Success
    })
}

#[test]
fn test_local_data_is_private_and_persistent() {
    let mut tree = sequence(vec![counter(), counter()]);
    let mut bb = Blackboard::new();
    tree.evaluate(&mut bb);
    tree.evaluate(&mut bb);
    tree.evaluate(&mut bb);

    assert_eq!(tree.children()[0].get_local_data("count", 0u32), 3);
    assert_eq!(tree.children()[1].get_local_data("count", 0u32), 3);
    assert_eq!(tree.get_local_data("count", 0u32), 0);

    // Scratch never leaks into the shared blackboard.
    assert!(!bb.contains("count"));
    assert_eq!(bb.local::<u32>("count"), None);
}

#[test]
fn test_local_data_outside_callback() {
    let mut bb = Blackboard::new();

    // No leaf is running, so there is nowhere for the write to go.
    bb.set_local("stray", 1u32);
    assert_eq!(bb.local::<u32>("stray"), None);
    assert_eq!(bb.local_or("stray", 0u32), 0);
    assert!(!bb.clear_local("stray"));

    let mut leaf = action(|bb| {
        if bb.local::<u32>("stray").is_some() {
            return Failure;
        }
        bb.set_local("own", 5u32);
        Success
    });
    assert_eq!(leaf.evaluate(&mut bb), Success);
    assert_eq!(leaf.get_local_data("own", 0u32), 5);

    // The leaf's scratch is parked back on the node, not left in the blackboard.
    assert_eq!(bb.local::<u32>("own"), None);
}
