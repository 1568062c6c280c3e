use std::collections::BTreeMap;
use std::fmt;

use super::automaton::Dafsa;
use super::label::Label;

/// Size summary of a [`Dafsa`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DafsaStats {
    /// Number of accepted words.
    pub words: usize,
    /// Number of unique states.
    pub states: usize,
    /// Number of transitions over all states.
    pub transitions: usize,
    /// Number of terminal states.
    pub terminals: usize,
    /// Maps an outgoing transition count to the number of states having it.
    pub transition_histogram: BTreeMap<usize, usize>,
}

impl<C: Label> Dafsa<C> {
    /// Computes state, transition and terminal counts.
    pub fn stats(&self) -> DafsaStats {
        let mut stats = DafsaStats {
            words: self.len(),
            states: self.state_count(),
            ..DafsaStats::default()
        };
        for (_, state) in self.states() {
            let count = state.transition_count();
            stats.transitions += count;
            stats.terminals += usize::from(state.is_terminal());
            *stats.transition_histogram.entry(count).or_insert(0) += 1;
        }
        stats
    }
}

impl fmt::Display for DafsaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} words in {} states ({} terminal), {} transitions",
            self.words, self.states, self.terminals, self.transitions
        )?;
        for (count, states) in &self.transition_histogram {
            writeln!(f, "  {count:>4} transitions: {states} states")?;
        }
        Ok(())
    }
}
