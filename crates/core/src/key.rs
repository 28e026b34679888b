//! Keys, accessor kinds and slot addressing
//!
//! Keys form a closed set declared at compile time with [`define_keys!`].
//! A key never addresses storage on its own: the address of a slot (and of
//! its notification topic) is the pair `(AccessorKind, key name)`, so a
//! primitive and a structured accessor for the same key never collide.

use std::fmt;
use std::hash::Hash;

/// Separator between the kind prefix and the key name in a rendered slot id.
pub const SLOT_SEP: char = '/';

/// A closed, enumerable set of setting names
///
/// Implement with [`define_keys!`] rather than by hand.
pub trait SettingKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every key in the set, in declaration order
    const ALL: &'static [Self];

    /// Stable storage name of this key
    fn name(&self) -> &'static str;
}

/// Declare a key enum together with its [`SettingKey`] impl.
///
/// ```
/// keeper_core::define_keys! {
///     pub enum AppKey {
///         Theme => "theme",
///         LaunchCount => "launch_count",
///     }
/// }
///
/// use keeper_core::SettingKey;
/// assert_eq!(AppKey::ALL.len(), 2);
/// assert_eq!(AppKey::Theme.name(), "theme");
/// ```
///
/// Names must be non-empty and unique within the set, otherwise two keys
/// would share one slot. Both are checked at compile time:
///
/// ```compile_fail
/// keeper_core::define_keys! {
///     enum Clash {
///         Theme => "theme",
///         Colour => "theme",
///     }
/// }
/// ```
///
/// ```compile_fail
/// keeper_core::define_keys! {
///     enum Blank {
///         Nothing => "",
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::SettingKey for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }
        }

        const _: () = assert!(
            $crate::key::key_names_are_valid(&[ $( $key ),+ ]),
            "define_keys!: key names must be non-empty and unique"
        );
    };
}

/// Check a key name list: every name non-empty, no name repeated.
///
/// Evaluated in const context by [`define_keys!`].
#[doc(hidden)]
pub const fn key_names_are_valid(names: &[&str]) -> bool {
    let mut i = 0;
    while i < names.len() {
        if names[i].is_empty() {
            return false;
        }
        let mut j = i + 1;
        while j < names.len() {
            if str_eq(names[i], names[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Which family of accessor owns a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessorKind {
    /// Values stored natively by the backing store
    Primitive,
    /// Values serialized through a structured format
    Structured,
}

impl AccessorKind {
    /// All accessor kinds
    pub const ALL: [AccessorKind; 2] = [AccessorKind::Primitive, AccessorKind::Structured];

    /// Prefix used when rendering a slot id
    pub fn prefix(&self) -> &'static str {
        match self {
            AccessorKind::Primitive => "primitive",
            AccessorKind::Structured => "structured",
        }
    }

    /// Parse a prefix produced by [`AccessorKind::prefix`]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Address of one storage slot and of its change topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    /// Accessor family
    pub kind: AccessorKind,
    /// Key name
    pub name: &'static str,
}

/// Change bus address. Same value as the slot it reports on.
pub type Topic = SlotId;

impl SlotId {
    /// Address for `key` under `kind`
    pub fn new<K: SettingKey>(kind: AccessorKind, key: K) -> Self {
        Self {
            kind,
            name: key.name(),
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind.prefix(), SLOT_SEP, self.name)
    }
}
