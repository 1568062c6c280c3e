use std::fmt;

use smallvec::SmallVec;

use super::label::Label;

/// Largest number of states an automaton can hold: one per `u32` id.
pub const MAX_STATES: usize = (u32::MAX as usize).saturating_add(1);

/// Index of a state in a [`Dafsa`](super::Dafsa)'s state table.
///
/// Ids are handed out once, when a state is finalized, and are never reused.
/// Every transition target has a smaller id than the state it leaves from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    /// Returns the position of this state in the state table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Callers keep state tables within [`MAX_STATES`] entries.
    pub(crate) fn from_index(index: usize) -> Self {
        StateId(u32::try_from(index).expect("state table exceeds MAX_STATES entries"))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A state of the automaton: a terminal flag and its outgoing transitions.
///
/// Transitions are kept sorted by label. Words reach the builder in sorted
/// order, so new transitions are always appended at the end and the last one
/// is the only transition that can still lead to an unfinished subtree.
///
/// The derived `Eq` and `Hash` compare transition targets by [`StateId`], not by
/// structure. That is exactly the register's signature: children are finalized
/// bottom-up, so two states with equal targets are behaviorally identical.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State<C: Label> {
    transitions: SmallVec<[(C, StateId); 2]>,
    terminal: bool,
}

impl<C: Label> State<C> {
    /// Creates a state without transitions.
    ///
    /// # Arguments
    ///
    /// * `terminal` - Whether a word ends at this state
    pub fn new(terminal: bool) -> Self {
        State {
            transitions: SmallVec::new(),
            terminal,
        }
    }

    /// True if some word ends at this state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub(crate) fn set_terminal(&mut self) {
        self.terminal = true;
    }

    /// Returns the target of the transition labelled `label`, if any.
    #[inline]
    pub fn get(&self, label: C) -> Option<StateId> {
        // Most states have one or two transitions; a scan beats the bisection there.
        if self.transitions.len() <= 4 {
            return self
                .transitions
                .iter()
                .find(|&&(c, _)| c == label)
                .map(|&(_, target)| target);
        }
        self.transitions
            .binary_search_by(|&(c, _)| c.cmp(&label))
            .ok()
            .map(|i| self.transitions[i].1)
    }

    /// Returns the transition at position `index` in label order.
    #[inline]
    pub fn transition(&self, index: usize) -> Option<(C, StateId)> {
        self.transitions.get(index).copied()
    }

    /// Returns an iterator over `(label, target)` pairs in ascending label order.
    #[inline]
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = (C, StateId)> + '_ {
        self.transitions.iter().copied()
    }

    /// Returns the number of outgoing transitions.
    #[inline]
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Returns the label of the most recently added transition.
    pub fn last_label(&self) -> Option<C> {
        self.transitions.last().map(|&(c, _)| c)
    }

    /// Appends a transition. `label` must sort after every existing label.
    pub(crate) fn push(&mut self, label: C, target: StateId) {
        debug_assert!(
            self.last_label().is_none_or(|last| last < label),
            "transition {label:?} appended out of order"
        );
        self.transitions.push((label, target));
    }

    /// Two states are equivalent when they agree on the terminal flag and every
    /// label leads to the identical target state in both.
    ///
    /// Only meaningful when both states' targets are already canonical.
    pub fn is_equivalent(&self, other: &State<C>) -> bool {
        self.terminal == other.terminal
            && self.transition_count() == other.transition_count()
            && self
                .transitions()
                .all(|(label, target)| other.get(label) == Some(target))
    }
}
