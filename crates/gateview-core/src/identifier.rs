//! Signal identifiers backed by a global string interner.
//!
//! Every signal name in a netlist (inputs, outputs, flip-flop and gate
//! outputs, gate subtypes) is stored once and referenced through the
//! copyable [`Id`] handle, which keeps edge pairs and node sets cheap.

use std::{
    cmp::Ordering,
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for signal names.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier of a netlist signal.
///
/// Equality and hashing work on the interned symbol. Use [`Id::cmp_by_name`]
/// when an ordering by the textual name is required, e.g. to make layouts
/// independent of insertion order.
///
/// # Examples
///
/// ```
/// use gateview_core::identifier::Id;
///
/// let a = Id::new("G10");
/// let b: Id = "G10".into();
///
/// assert_eq!(a, b);
/// assert_eq!(a, "G10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a signal name, interning it if necessary.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Compares two identifiers by their textual names.
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use gateview_core::identifier::Id;
    ///
    /// assert_eq!(Id::new("G2").cmp_by_name(&Id::new("G10")), Ordering::Greater);
    /// ```
    pub fn cmp_by_name(&self, other: &Id) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        let interner = interner();
        let lhs = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let rhs = interner
            .resolve(other.0)
            .expect("Symbol should exist in interner");
        lhs.cmp(rhs)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner
            .resolve(self.0)
            .is_some_and(|self_str| self_str == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
