//! The register: one canonical state per equivalence class.

use std::hash::BuildHasher;

use hashbrown::{DefaultHashBuilder, HashTable};

use super::label::Label;
use super::state::{State, StateId};

/// Maps state signatures to the canonical [`StateId`] of their class.
///
/// The table stores ids only; signatures are hashed and compared through the
/// state table the ids point into, so every state is stored exactly once.
pub(crate) struct Register {
    classes: HashTable<StateId>,
    hasher: DefaultHashBuilder,
    hits: usize,
}

impl Register {
    pub(crate) fn new() -> Self {
        Register {
            classes: HashTable::new(),
            hasher: DefaultHashBuilder::default(),
            hits: 0,
        }
    }

    /// Returns the id of the canonical state equivalent to `state`.
    ///
    /// If no equivalent state is registered, `state` is appended to `states`
    /// and becomes the representative of its class. Otherwise `state` is
    /// dropped. All of `state`'s targets must already be canonical.
    pub(crate) fn replace_or_register<C: Label>(
        &mut self,
        states: &mut Vec<State<C>>,
        state: State<C>,
    ) -> StateId {
        debug_assert!(
            state.transitions().all(|(_, target)| target.index() < states.len()),
            "Cannot register a state unless all its targets are registered"
        );

        let hash = self.hasher.hash_one(&state);
        if let Some(&existing) = self
            .classes
            .find(hash, |&id| states[id.index()] == state)
        {
            self.hits += 1;
            return existing;
        }

        let id = StateId::from_index(states.len());
        states.push(state);
        let hasher = &self.hasher;
        self.classes
            .insert_unique(hash, id, |&id| hasher.hash_one(&states[id.index()]));
        id
    }

    /// Number of registered classes.
    pub(crate) fn len(&self) -> usize {
        self.classes.len()
    }

    /// Number of states that were replaced by an existing representative.
    pub(crate) fn hits(&self) -> usize {
        self.hits
    }
}
