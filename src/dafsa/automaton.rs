use std::fmt;

use super::label::Label;
use super::state::{State, StateId};

/// A finished, minimal DAFSA.
///
/// The automaton is a table of [`State`]s plus the id of its root. Transition
/// targets always have smaller ids than their source, so the table is stored
/// in topological order (leaves first, root last).
///
/// A `Dafsa` is immutable; it can be shared between threads and queried
/// concurrently.
///
/// # Examples
///
/// ```
/// use dafsa::build;
///
/// let dafsa = build(["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"]).unwrap();
/// assert!(dafsa.contains("CAKE"));
/// assert!(!dafsa.contains("AKE"));
///
/// // All five words end in the same "AKE" states.
/// assert_eq!(dafsa.state_count(), 5);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Dafsa<C: Label = char> {
    states: Vec<State<C>>,
    root: StateId,
    len: usize,
}

impl<C: Label> Dafsa<C> {
    pub(crate) fn from_parts(states: Vec<State<C>>, root: StateId, len: usize) -> Self {
        debug_assert_eq!(root.index() + 1, states.len(), "root must be registered last");
        Dafsa { states, root, len }
    }

    /// Assembles an automaton from a topologically ordered state table,
    /// counting the accepted words.
    pub(crate) fn from_states(states: Vec<State<C>>, root: StateId) -> Self {
        let len = count_words(&states, root);
        Self::from_parts(states, root, len)
    }

    /// Returns the id of the root state.
    #[inline]
    pub fn root(&self) -> StateId {
        self.root
    }

    /// Returns the root state.
    #[inline]
    pub fn root_state(&self) -> &State<C> {
        self.state(self.root)
    }

    /// Returns the state with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this automaton.
    #[inline]
    pub fn state(&self, id: StateId) -> &State<C> {
        &self.states[id.index()]
    }

    /// Returns an iterator over all states with their ids, leaves first.
    pub fn states(&self) -> impl ExactSizeIterator<Item = (StateId, &State<C>)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (StateId::from_index(i), state))
    }

    /// Returns the number of unique states in the automaton.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of words the automaton accepts.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the automaton accepts no words at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<C: Label> fmt::Debug for Dafsa<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dafsa")
            .field("words", &self.len)
            .field("state_count", &self.state_count())
            .finish()
    }
}

/// Counts accepting paths from `root`.
///
/// Relies on the table being topologically ordered: every target is computed
/// before the states that point at it.
fn count_words<C: Label>(states: &[State<C>], root: StateId) -> usize {
    let mut words = vec![0usize; states.len()];
    for (i, state) in states.iter().enumerate().take(root.index() + 1) {
        let below = state
            .transitions()
            .fold(usize::from(state.is_terminal()), |acc, (_, target)| {
                acc.saturating_add(words[target.index()])
            });
        words[i] = below;
    }
    words[root.index()]
}

#[cfg(test)]
mod test {
    use super::super::builder::build;
    use super::*;

    #[test]
    fn empty_input_yields_bare_root() {
        let dafsa = build::<char, &str>([]).unwrap();
        assert_eq!(dafsa.state_count(), 1);
        assert!(!dafsa.root_state().is_terminal());
        assert_eq!(dafsa.root_state().transition_count(), 0);
        assert!(dafsa.is_empty());
    }

    #[test]
    fn root_is_last_in_the_table() {
        let dafsa = build(["ab", "b"]).unwrap();
        assert_eq!(dafsa.root().index(), dafsa.state_count() - 1);
        for (id, state) in dafsa.states() {
            for (_, target) in state.transitions() {
                assert!(target < id, "{target} must precede {id}");
            }
        }
    }

    #[test]
    fn word_count_follows_shared_paths() {
        let dafsa = build(["bake", "baked", "cake", "caked", "fake"]).unwrap();
        assert_eq!(dafsa.len(), 5);
        let recounted = Dafsa::from_states(dafsa.states.clone(), dafsa.root());
        assert_eq!(recounted, dafsa);
    }

    #[test]
    fn debug_output_is_a_summary() {
        let dafsa = build(["ab", "b"]).unwrap();
        assert_eq!(format!("{dafsa:?}"), "Dafsa { words: 2, state_count: 3 }");
    }

    #[test]
    fn dafsa_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dafsa<char>>();
        assert_send_sync::<Dafsa<u8>>();
    }
}
