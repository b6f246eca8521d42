//! The key-value store shared by every node of one tree.
//!
//! Values are stored as `Box<dyn Any>` keyed by [`Symbol`], so a blackboard can
//! hold host types the library knows nothing about (scene handles, patrol routes,
//! timers). Readers and writers are expected to agree on the stored type; asking
//! for the wrong one is a host bug and the panicking accessors treat it as one.
//! [`Blackboard::try_get`] is there for callers that would rather inspect it.
//!
//! Every `&str` key passed to an accessor is interned into a [`Symbol`] first, so
//! hot paths should keep their keys in `static KEY: Lazy<Symbol>` (see
//! [`crate::blackboard::SELF_TRANSFORM`] and friends) rather than rebuild them.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

use ::once_cell::sync::Lazy;

use crate::error::{BlackboardError, BlackboardResult};
use crate::math::{Transform, Vec3};
use crate::Symbol;

pub(crate) struct Entry {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl Entry {
    fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    fn downcast_ref<T: 'static>(&self, key: Symbol) -> BlackboardResult<&T> {
        let found = self.type_name;
        self.value
            .downcast_ref()
            .ok_or(BlackboardError::TypeMismatch {
                key,
                expected: type_name::<T>(),
                found,
            })
    }

    fn downcast_mut<T: 'static>(&mut self, key: Symbol) -> BlackboardResult<&mut T> {
        let found = self.type_name;
        self.value
            .downcast_mut()
            .ok_or(BlackboardError::TypeMismatch {
                key,
                expected: type_name::<T>(),
                found,
            })
    }
}

/// Untyped storage shared by the blackboard proper and node-local scratch.
pub(crate) type EntryMap = HashMap<Symbol, Entry>;

pub static SELF_TRANSFORM: Lazy<Symbol> = Lazy::new(|| "SelfTransform".into());
pub static TARGET_ENEMY: Lazy<Symbol> = Lazy::new(|| "TargetEnemy".into());
pub static MOVE_TO_POSITION: Lazy<Symbol> = Lazy::new(|| "MoveToPosition".into());
pub static TIMER: Lazy<Symbol> = Lazy::new(|| "Timer".into());
pub static SIGHT_RANGE: Lazy<Symbol> = Lazy::new(|| "SightRange".into());
pub static HEARING_RANGE: Lazy<Symbol> = Lazy::new(|| "HearingRange".into());

pub const DEFAULT_SIGHT_RANGE: f32 = 15.;
pub const DEFAULT_HEARING_RANGE: f32 = 20.;

#[derive(Default)]
pub struct Blackboard {
    data: EntryMap,
    /// Scratch of the leaf currently being evaluated, swapped in and out by the
    /// evaluator. `None` whenever no leaf callback is running.
    pub(crate) local: Option<EntryMap>,
}

fn lookup<T: 'static>(map: &EntryMap, key: Symbol) -> BlackboardResult<Option<&T>> {
    match map.get(&key) {
        Some(entry) => entry.downcast_ref(key).map(Some),
        None => Ok(None),
    }
}

fn or_panic<T>(res: BlackboardResult<T>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => panic!("{}", e),
    }
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value at `key`. Replacing may change the stored type.
    pub fn set<T: 'static>(&mut self, key: impl Into<Symbol>, val: T) {
        self.data.insert(key.into(), Entry::new(val));
    }

    /// Returns the value at `key`, or `None` if the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if the key holds a value of a different type.
    pub fn get<T: 'static>(&self, key: impl Into<Symbol>) -> Option<&T> {
        or_panic(self.try_get(key))
    }

    /// Like [`get`](Self::get), but reports a type mismatch instead of panicking.
    pub fn try_get<T: 'static>(&self, key: impl Into<Symbol>) -> BlackboardResult<Option<&T>> {
        lookup(&self.data, key.into())
    }

    /// Returns a copy of the value at `key`, or `default` when the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if the key holds a value of a different type.
    pub fn get_or<T: Clone + 'static>(&self, key: impl Into<Symbol>, default: T) -> T {
        self.get::<T>(key).cloned().unwrap_or(default)
    }

    /// # Panics
    ///
    /// Panics if the key holds a value of a different type.
    pub fn get_mut<T: 'static>(&mut self, key: impl Into<Symbol>) -> Option<&mut T> {
        let key = key.into();
        match self.data.get_mut(&key) {
            Some(entry) => Some(or_panic(entry.downcast_mut(key))),
            None => None,
        }
    }

    /// Removes the value at `key`. Returns whether anything was removed.
    pub fn clear(&mut self, key: impl Into<Symbol>) -> bool {
        self.data.remove(&key.into()).is_some()
    }

    pub fn contains(&self, key: impl Into<Symbol>) -> bool {
        self.data.contains_key(&key.into())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All keys currently set, in sorted order.
    pub fn keys(&self) -> Vec<Symbol> {
        let mut keys: Vec<_> = self.data.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Name of the type stored at `key`, for diagnostics.
    pub fn type_name_of(&self, key: impl Into<Symbol>) -> Option<&'static str> {
        self.data.get(&key.into()).map(|entry| entry.type_name)
    }

    pub fn self_transform(&self) -> Option<Transform> {
        self.get::<Transform>(*SELF_TRANSFORM).copied()
    }

    pub fn set_self_transform(&mut self, transform: Transform) {
        self.set(*SELF_TRANSFORM, transform);
    }

    pub fn target_enemy(&self) -> Option<Transform> {
        self.get::<Transform>(*TARGET_ENEMY).copied()
    }

    pub fn set_target_enemy(&mut self, transform: Option<Transform>) {
        match transform {
            Some(transform) => self.set(*TARGET_ENEMY, transform),
            None => {
                self.clear(*TARGET_ENEMY);
            }
        }
    }

    pub fn move_to_position(&self) -> Vec3 {
        self.get_or(*MOVE_TO_POSITION, Vec3::ZERO)
    }

    pub fn set_move_to_position(&mut self, pos: Vec3) {
        self.set(*MOVE_TO_POSITION, pos);
    }

    pub fn timer(&self) -> f32 {
        self.get_or(*TIMER, 0.)
    }

    pub fn set_timer(&mut self, timer: f32) {
        self.set(*TIMER, timer);
    }

    pub fn sight_range(&self) -> f32 {
        self.get_or(*SIGHT_RANGE, DEFAULT_SIGHT_RANGE)
    }

    pub fn set_sight_range(&mut self, range: f32) {
        self.set(*SIGHT_RANGE, range);
    }

    pub fn hearing_range(&self) -> f32 {
        self.get_or(*HEARING_RANGE, DEFAULT_HEARING_RANGE)
    }

    pub fn set_hearing_range(&mut self, range: f32) {
        self.set(*HEARING_RANGE, range);
    }

    /// Reads the evaluating leaf's private scratch value at `key`.
    ///
    /// Scratch data survives across ticks but is visible only to the leaf that
    /// wrote it. Outside a leaf callback there is no scratch and this returns
    /// `None`.
    ///
    /// # Panics
    ///
    /// Panics if the key holds a value of a different type.
    pub fn local<T: 'static>(&self, key: impl Into<Symbol>) -> Option<&T> {
        let local = self.local.as_ref()?;
        or_panic(lookup(local, key.into()))
    }

    /// # Panics
    ///
    /// Panics if the key holds a value of a different type.
    pub fn local_or<T: Clone + 'static>(&self, key: impl Into<Symbol>, default: T) -> T {
        self.local::<T>(key).cloned().unwrap_or(default)
    }

    /// Writes to the evaluating leaf's scratch. Outside a leaf callback the
    /// write is dropped with a warning.
    pub fn set_local<T: 'static>(&mut self, key: impl Into<Symbol>, val: T) {
        let key = key.into();
        match &mut self.local {
            Some(local) => {
                local.insert(key, Entry::new(val));
            }
            None => ::log::warn!(
                "[npc_behavior_tree]: set_local({:?}) outside a leaf callback is ignored",
                key
            ),
        }
    }

    pub fn clear_local(&mut self, key: impl Into<Symbol>) -> bool {
        match &mut self.local {
            Some(local) => local.remove(&key.into()).is_some(),
            None => false,
        }
    }
}

impl Debug for Blackboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.keys() {
            map.entry(&key, &self.data[&key].type_name);
        }
        map.finish()
    }
}

/// Reads `key` from an entry map owned by a node, outside of evaluation.
pub(crate) fn scratch_get<T: 'static>(
    map: &EntryMap,
    key: impl Into<Symbol>,
) -> BlackboardResult<Option<&T>> {
    lookup(map, key.into())
}
