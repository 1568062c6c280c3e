//! Bincode serializer for the compact graph form.

use std::io::{Read, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{DafsaSerializer, SerializationError};
use crate::dafsa::automaton::Dafsa;
use crate::dafsa::register::Register;
use crate::dafsa::state::{State, StateId};

/// Bincode serializer writing the state table, sharing included.
///
/// This is the compact format: every state is written exactly once.
pub struct BincodeSerializer;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedGraph {
    root: u32,
    states: Vec<PersistedState>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    terminal: bool,
    transitions: Vec<(char, u32)>,
}

impl PersistedGraph {
    fn from_dafsa(dafsa: &Dafsa<char>) -> Self {
        let index = |id: StateId| id.index() as u32;
        PersistedGraph {
            root: index(dafsa.root()),
            states: dafsa
                .states()
                .map(|(_, state)| PersistedState {
                    terminal: state.is_terminal(),
                    transitions: state
                        .transitions()
                        .map(|(label, target)| (label, index(target)))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Validates the graph and canonicalizes every state reachable from the root.
    ///
    /// Runs a post-order walk with an explicit stack; a target that is still on
    /// the current path is a cycle.
    fn into_dafsa(self) -> Result<Dafsa<char>, SerializationError> {
        let len = self.states.len();
        let root = self.root as usize;
        if root >= len {
            return Err(SerializationError::malformed(format!(
                "root {root} out of range for {len} states"
            )));
        }

        let mut remap: Vec<Option<StateId>> = vec![None; len];
        let mut on_path = vec![false; len];
        let mut states = Vec::new();
        let mut register = Register::new();
        // (persisted index, next transition to follow)
        let mut stack = vec![(root, 0usize)];
        on_path[root] = true;

        while let Some(&(index, next)) = stack.last() {
            let persisted = &self.states[index];
            if let Some(&(label, target)) = persisted.transitions.get(next) {
                let top = stack.len() - 1;
                stack[top].1 += 1;
                let target = target as usize;
                if target >= len {
                    return Err(SerializationError::malformed(format!(
                        "transition {label:?} of state {index} targets missing state {target}"
                    )));
                }
                if on_path[target] {
                    return Err(SerializationError::malformed(format!(
                        "cycle through state {target}"
                    )));
                }
                if remap[target].is_none() {
                    on_path[target] = true;
                    stack.push((target, 0));
                }
                continue;
            }

            stack.pop();
            on_path[index] = false;

            let mut state = State::new(persisted.terminal);
            let mut previous = None;
            for &(label, target) in &persisted.transitions {
                if previous.is_some_and(|previous| previous >= label) {
                    return Err(SerializationError::malformed(format!(
                        "labels of state {index} are not strictly ascending at {label:?}"
                    )));
                }
                previous = Some(label);
                let target = remap[target as usize].ok_or_else(|| {
                    SerializationError::malformed(format!("state {target} was never resolved"))
                })?;
                state.push(label, target);
            }
            if index != root && state.transition_count() == 0 && !state.is_terminal() {
                return Err(SerializationError::malformed(format!(
                    "state {index} has no transitions and is not terminal"
                )));
            }
            remap[index] = Some(register.replace_or_register(&mut states, state));
        }

        let root = remap[root].ok_or_else(|| SerializationError::malformed("root was never resolved"))?;
        Ok(Dafsa::from_states(states, root))
    }
}

impl DafsaSerializer for BincodeSerializer {
    fn serialize<W: Write>(dafsa: &Dafsa<char>, mut writer: W) -> Result<(), SerializationError> {
        bincode::serialize_into(&mut writer, &PersistedGraph::from_dafsa(dafsa))?;
        writer.flush()?;
        debug!(
            "wrote DAFSA with {} states as bincode graph",
            dafsa.state_count()
        );
        Ok(())
    }

    fn deserialize<R: Read>(reader: R) -> Result<Dafsa<char>, SerializationError> {
        let graph: PersistedGraph = bincode::deserialize_from(reader)?;
        let persisted = graph.states.len();
        let dafsa = graph.into_dafsa()?;
        debug!(
            "read DAFSA with {} words from {persisted} persisted states into {} states",
            dafsa.len(),
            dafsa.state_count()
        );
        Ok(dafsa)
    }
}
