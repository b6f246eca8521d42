//! Interned blackboard keys.
//!
//! Every key handed to a [`Blackboard`](crate::Blackboard) is interned once into a
//! process-wide table, after which hashing and equality are pointer-sized
//! operations. Leaves that read the same key every tick can cache it:
//!
//! ```
//! use npc_behavior_tree::{Lazy, Symbol};
//!
//! static TARGET: Lazy<Symbol> = Lazy::new(|| "TargetPosition".into());
//! assert_eq!(TARGET.as_str(), "TargetPosition");
//! ```
//!
//! Interned strings are never freed, and interning a new `&str` takes a
//! process-wide lock. Keys should come from a small fixed vocabulary; building
//! them on the fly (say `format!("enemy_{}", id)`) grows the table for the life
//! of the process. Store per-entity data under one key in a collection instead.

use ::once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Mutex;

static INTERNED: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// An interned string with O(1) equality.
#[derive(Clone, Copy)]
pub struct Symbol {
    s: &'static str,
}

impl Symbol {
    pub fn new(s: &str) -> Self {
        // A poisoned table still holds valid leaked strings.
        let mut table = INTERNED.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = table.get(s) {
            return Symbol { s: existing };
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.insert(leaked);
        Symbol { s: leaked }
    }

    pub fn as_str(self) -> &'static str {
        self.s
    }

    /// Number of distinct keys interned so far.
    pub fn count() -> usize {
        INTERNED.lock().map(|t| t.len()).unwrap_or_else(|e| e.into_inner().len())
    }

    fn addr(self) -> usize {
        self.s.as_ptr() as usize
    }
}

impl<S: AsRef<str>> From<S> for Symbol {
    fn from(s: S) -> Symbol {
        Symbol::new(s.as_ref())
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state)
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            self.s.cmp(other.s)
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.s == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.s == *other
    }
}

impl Deref for Symbol {
    type Target = str;
    fn deref(&self) -> &str {
        self.s
    }
}

impl Debug for Symbol {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        Debug::fmt(self.s, fmt)
    }
}

impl Display for Symbol {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str(self.s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(self.s)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Symbol, D::Error> {
        String::deserialize(de).map(Symbol::from)
    }
}

#[cfg(test)]
mod test;
