//! Action identifiers for tabular MDPs

use std::fmt::Debug;
use std::hash::Hash;

/// Marker trait for actions.
///
/// Like [`crate::State`], actions are opaque keys to the solvers; the
/// trait is blanket implemented for every type with the right bounds.
/// Terminal states have no real action — solvers model their no-op
/// sentinel as `Option::<A>::None` rather than a distinguished variant.
pub trait Action: Clone + Debug + Eq + Hash + Send + Sync {}

impl<T: Clone + Debug + Eq + Hash + Send + Sync> Action for T {}
