//! State identifiers for tabular MDPs

use std::fmt::Debug;
use std::hash::Hash;

/// Marker trait for state identifiers.
///
/// Tabular solvers treat states as opaque keys: anything cloneable,
/// hashable and equality-comparable qualifies, so the trait is blanket
/// implemented. Grid coordinates, interned ids and small enums all work
/// without further ceremony.
pub trait State: Clone + Debug + Eq + Hash + Send + Sync {}

impl<T: Clone + Debug + Eq + Hash + Send + Sync> State for T {}
