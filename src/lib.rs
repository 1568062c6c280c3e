//! # dafsa
//!
//! Incremental construction of minimal
//! [DAFSAs](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (deterministic acyclic finite-state automata) from sorted word lists.
//!
//! A DAFSA is a trie whose equivalent subtrees have been merged, so common
//! suffixes are stored once while lookups stay O(word length). Construction
//! follows Algorithm 1 of [Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1):
//! words arrive in sorted order, the branch left behind by the previous word is
//! frozen, and each frozen state is either replaced by an equivalent registered
//! state or registered as a new one.
//!
//! ## Features
//!
//! - **Generic over label type**: works with `char`, `u8`, `u16`, or any type
//!   implementing [`Label`]
//! - **Minimal**: no two states of a finished automaton are equivalent
//! - **Index-based**: states live in a table and refer to each other by [`StateId`]
//! - **Persistent** (`serialization` feature, on by default): JSON tree and bincode
//!   graph formats
//!
//! ## Quick Start
//!
//! ```
//! use dafsa::build;
//!
//! let dafsa = build(["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"]).unwrap();
//! assert!(dafsa.contains("CAKE"));
//! assert!(!dafsa.contains("AKE"));
//! ```
//!
//! ## Generic Usage
//!
//! The automaton is generic over the transition label type:
//!
//! ```
//! use dafsa::build;
//!
//! let words: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![1, 2, 4], vec![2, 3, 4]];
//! let dafsa = build(words).unwrap();
//!
//! assert!(dafsa.contains([1, 2, 3]));
//! assert!(!dafsa.contains([1, 2, 5]));
//! ```
//!
//! ## Logging
//!
//! The crate reports build and load summaries through the [`log`] facade at
//! `debug` level, and every frozen branch at `trace` level.

#![warn(missing_docs)]

/// Core DAFSA data structure: states, builder, lookup and persistence.
pub mod dafsa;

pub use crate::dafsa::{
    build, build_from_file, build_from_reader, contains, BuildError, Builder, Dafsa, DafsaStats,
    IntoWord, Label, LoadError, Progress, State, StateId, WordBuf, Words, MAX_STATES,
};

#[cfg(feature = "serialization")]
pub use crate::dafsa::serialization;
