//! Path components

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OPAQUE: AtomicU64 = AtomicU64::new(0);

/// One component of a binding path.
///
/// Named keys come from source text. Opaque keys are generated, never
/// collide, and give list scopes their slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A name written in source
    Name(String),

    /// A generated key
    Opaque(u64),
}

impl Key {
    /// A fresh opaque key, unique for the life of the process.
    pub fn gensym() -> Self {
        Key::Opaque(NEXT_OPAQUE.fetch_add(1, Ordering::Relaxed))
    }

    /// Split a dotted name into named keys; empty components are dropped.
    pub fn dotted(path: &str) -> Vec<Key> {
        path.split('.')
            .filter(|component| !component.is_empty())
            .map(Key::from)
            .collect()
    }

    /// Whether this key was generated.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Key::Opaque(_))
    }

    /// The name, for named keys.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Opaque(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Opaque(n) => write!(f, "#{}", n),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}
