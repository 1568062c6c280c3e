/// The finished automaton: state table and root.
pub mod automaton;
/// DAFSA builder for constructing automata from sorted word lists.
pub mod builder;
/// Trait for types that can serve as transition labels.
pub mod label;
/// Membership, prefix and enumeration queries.
pub mod lookup;
/// Equivalence-class cache used to merge states.
pub(crate) mod register;
/// Persistence in JSON tree and bincode graph form.
#[cfg(feature = "serialization")]
pub mod serialization;
/// The state type and state ids.
pub mod state;
/// Size statistics of a finished automaton.
pub mod stats;
/// Word types accepted by the builder and the queries.
pub mod word;

pub use automaton::Dafsa;
pub use builder::{build, build_from_file, build_from_reader, BuildError, Builder, LoadError, Progress};
pub use label::Label;
pub use lookup::{contains, Words};
pub use state::{State, StateId, MAX_STATES};
pub use stats::DafsaStats;
pub use word::{IntoWord, WordBuf};
