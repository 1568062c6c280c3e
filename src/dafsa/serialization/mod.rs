//! Persistence of finished automata.
//!
//! Two formats are provided:
//!
//! - [`JsonSerializer`]: a tree of nested JSON objects keyed by label, with the
//!   reserved key [`TERMINAL_KEY`] marking terminal states. Shared subtrees are
//!   written once per path, so the file grows like a trie, but it is easy to
//!   read and to consume from other languages.
//! - [`BincodeSerializer`]: the state table itself, preserving sharing.
//!
//! Loading either format canonicalizes the states again, so the result is
//! minimal and accepts exactly the persisted words. Words may be arbitrarily
//! long in both formats.
//!
//! [`store_json`] writes the JSON form to a new file and never overwrites one.
//!
//! # Example
//!
//! ```
//! use dafsa::serialization::{DafsaSerializer, JsonSerializer};
//!
//! let dafsa = dafsa::build(["cap", "car", "cat"]).unwrap();
//!
//! let mut buffer = Vec::new();
//! JsonSerializer::serialize(&dafsa, &mut buffer)?;
//! assert_eq!(buffer, br#"{"c":{"a":{"p":{"$":1},"r":{"$":1},"t":{"$":1}}}}"#);
//!
//! let loaded = JsonSerializer::deserialize(&buffer[..])?;
//! assert_eq!(loaded, dafsa);
//! # Ok::<(), dafsa::serialization::SerializationError>(())
//! ```

use std::io::{Read, Write};

use super::automaton::Dafsa;

mod bincode_impl;
mod json_impl;

pub use self::bincode_impl::BincodeSerializer;
pub use self::json_impl::{from_json_value, store_json, to_json_value, JsonSerializer};

/// Key marking a terminal state in the JSON tree form.
///
/// No transition label may be equal to this key's only character.
pub const TERMINAL_KEY: &str = "$";

/// Trait for serializing and deserializing automata.
pub trait DafsaSerializer {
    /// Serialize an automaton to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the automaton cannot be expressed in this format
    /// or writing fails.
    fn serialize<W: Write>(dafsa: &Dafsa<char>, writer: W) -> Result<(), SerializationError>;

    /// Deserialize an automaton from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the data is not a well-formed
    /// automaton.
    fn deserialize<R: Read>(reader: R) -> Result<Dafsa<char>, SerializationError>;
}

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during JSON encoding or decoding
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    /// Error during bincode encoding or decoding
    #[error("Bincode error")]
    Bincode(#[from] bincode::Error),
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// The data decoded but does not describe a valid automaton
    #[error("malformed persisted form: {0}")]
    Malformed(String),
    /// A transition label collides with the terminal marker
    #[error("label {0:?} collides with the terminal marker")]
    ReservedLabel(char),
}

impl SerializationError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        SerializationError::Malformed(message.into())
    }
}
