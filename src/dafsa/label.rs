//! The alphabet an automaton is built over.

use std::fmt::Debug;
use std::hash::Hash;

/// A symbol on a transition.
///
/// Blanket-implemented, so `char` (the default), bytes and the other integer
/// types qualify without glue code. What each bound is needed for:
///
/// | Bound | Needed by |
/// |---|---|
/// | `Copy` | `(label, target)` pairs stored inline in a state |
/// | `Ord` | the input order check and sorted transition lists |
/// | `Hash` | state signatures in the register |
/// | `Debug` | words quoted in [`BuildError`](super::BuildError) |
/// | `Default` | the unused label slot of the root on the open branch |
pub trait Label: Copy + Ord + Hash + Debug + Default {}

impl<T: Copy + Ord + Hash + Debug + Default> Label for T {}
