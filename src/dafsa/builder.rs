use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::Path;

use itertools::{Itertools, Position};
use log::{debug, trace};

use super::automaton::Dafsa;
use super::label::Label;
use super::register::Register;
use super::state::{State, MAX_STATES};
use super::word::IntoWord;

/// Errors that can occur when building a DAFSA.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError<C: Label> {
    /// A word was not strictly greater than the word added before it.
    ///
    /// Duplicates are reported the same way.
    #[error("words out of order: {previous:?} came before {word:?}")]
    Unsorted {
        /// The word that was accepted last.
        previous: Vec<C>,
        /// The rejected word.
        word: Vec<C>,
    },
    /// Adding the word could grow the automaton past `limit` states.
    #[error("automaton would exceed {limit} states")]
    TooManyStates {
        /// The state limit.
        limit: usize,
    },
}

/// Errors that can occur when building a DAFSA from a word list file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The word list could not be read.
    #[error("failed to read word list")]
    Io(#[from] io::Error),
    /// The word list is not sorted.
    #[error(transparent)]
    Build(#[from] BuildError<char>),
}

/// Snapshot handed to a progress callback installed with [`Builder::with_progress`].
#[derive(Clone, Copy, Debug)]
pub struct Progress<'a, C: Label> {
    /// Words added so far, including `word`.
    pub words: usize,
    /// States finalized into the state table so far.
    pub states: usize,
    /// The word that was just added.
    pub word: &'a [C],
}

struct ProgressHook<C: Label> {
    every: NonZeroUsize,
    callback: Box<dyn FnMut(Progress<'_, C>)>,
}

/// An entry of the open branch: a state that can still gain transitions,
/// together with the label of the transition its parent will use for it.
struct OpenState<C: Label> {
    label: C,
    state: State<C>,
}

/// A builder for constructing a minimal DAFSA incrementally.
///
/// Words must be added in strictly increasing lexicographic order. Only the
/// branch spelling the most recent word is open; everything to the left of it
/// has been frozen and merged with its equivalent states through the register.
///
/// ```
/// use dafsa::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_word("cap")?;
/// builder.add_word("car")?;
/// assert!(builder.add_word("bar").is_err());
///
/// let dafsa = builder.build();
/// assert!(dafsa.contains("car"));
/// assert!(!dafsa.contains("bar"));
/// # Ok::<(), dafsa::BuildError<char>>(())
/// ```
pub struct Builder<C: Label = char> {
    states: Vec<State<C>>,
    register: Register,
    /// The open branch, root first. Always holds at least the root.
    open: Vec<OpenState<C>>,
    words: usize,
    state_limit: usize,
    progress: Option<ProgressHook<C>>,
}

impl<C: Label> Default for Builder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Label> Builder<C> {
    /// Creates a new DAFSA builder.
    pub fn new() -> Self {
        Builder {
            states: Vec::new(),
            register: Register::new(),
            open: vec![OpenState {
                label: C::default(),
                state: State::new(false),
            }],
            words: 0,
            state_limit: MAX_STATES,
            progress: None,
        }
    }

    /// Installs a callback invoked after every `every` words.
    pub fn with_progress(
        mut self,
        every: NonZeroUsize,
        callback: impl FnMut(Progress<'_, C>) + 'static,
    ) -> Self {
        self.progress = Some(ProgressHook {
            every,
            callback: Box::new(callback),
        });
        self
    }

    /// Adds a word to the DAFSA being constructed.
    ///
    /// The word can be any type that implements [`IntoWord`], including `&str`,
    /// `String`, `&[u8]`, `Vec<u8>`, or fixed-size arrays like `[u8; 3]`.
    /// The empty word is accepted as the first word and makes the root terminal.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsorted`] if the word is not strictly greater than
    /// the previously added word, and [`BuildError::TooManyStates`] if the
    /// automaton could outgrow [`MAX_STATES`]. The builder is left unchanged
    /// in both cases.
    pub fn add_word(&mut self, word: impl IntoWord<C>) -> Result<(), BuildError<C>> {
        let word = word.into_labels();
        self.add_word_slice(&word)
    }

    fn add_word_slice(&mut self, word: &[C]) -> Result<(), BuildError<C>> {
        let prefix_len = self.prefix_length(word)?;
        self.check_capacity(prefix_len, word.len())?;
        self.freeze_below(prefix_len);

        let suffix = &word[prefix_len..];
        if suffix.is_empty() {
            // The whole word is already a path of the automaton.
            self.open_tail().state.set_terminal();
        } else {
            self.open
                .extend(suffix.iter().copied().with_position().map(|(position, label)| {
                    OpenState {
                        label,
                        state: State::new(matches!(position, Position::Last | Position::Only)),
                    }
                }));
        }

        self.words += 1;
        self.report_progress(word);
        Ok(())
    }

    /// Length of the prefix `word` shares with the automaton built so far.
    ///
    /// With sorted input the only states a new word can reach are those on the
    /// open branch, so the walk compares against the previous word's labels.
    fn prefix_length(&self, word: &[C]) -> Result<usize, BuildError<C>> {
        if self.words == 0 {
            return Ok(0);
        }
        let mut prefix_len = 0;
        for (&label, open) in word.iter().zip(&self.open[1..]) {
            match label.cmp(&open.label) {
                Ordering::Equal => prefix_len += 1,
                Ordering::Greater => return Ok(prefix_len),
                Ordering::Less => return Err(self.order_error(word)),
            }
        }
        // One word is a prefix of the other; only the longer one may come later.
        if prefix_len < word.len() {
            Ok(prefix_len)
        } else {
            Err(self.order_error(word))
        }
    }

    /// Every state the automaton ends up with is either registered already,
    /// about to be frozen, or on the open branch left by this word. Rejects
    /// the word if that bound exceeds the state limit.
    fn check_capacity(&self, prefix_len: usize, word_len: usize) -> Result<(), BuildError<C>> {
        let frozen = self.open.len() - 1 - prefix_len;
        let bound = self.states.len() + frozen + word_len + 1;
        if bound > self.state_limit {
            return Err(BuildError::TooManyStates {
                limit: self.state_limit,
            });
        }
        Ok(())
    }

    fn order_error(&self, word: &[C]) -> BuildError<C> {
        BuildError::Unsorted {
            previous: self.previous_word(),
            word: word.to_vec(),
        }
    }

    fn previous_word(&self) -> Vec<C> {
        self.open[1..].iter().map(|open| open.label).collect()
    }

    /// Freezes every open state deeper than `depth`.
    ///
    /// States are popped deepest first, so each one is canonicalized only after
    /// everything beneath it, and its parent's last transition is pointed at
    /// the canonical representative.
    fn freeze_below(&mut self, depth: usize) {
        let target_len = depth + 1;
        debug_assert!(self.open.len() >= target_len);

        let frozen = self.open.len() - target_len;
        while self.open.len() > target_len {
            let OpenState { label, state } = self.pop_open();
            let id = self.register.replace_or_register(&mut self.states, state);
            self.open_tail().state.push(label, id);
        }
        if frozen > 0 {
            trace!(
                "froze {frozen} states below depth {depth}, {} states registered",
                self.states.len()
            );
        }
    }

    fn pop_open(&mut self) -> OpenState<C> {
        self.open
            .pop()
            .expect("Open branch will always have at least one entry")
    }

    fn open_tail(&mut self) -> &mut OpenState<C> {
        self.open
            .last_mut()
            .expect("Open branch will always have at least one entry")
    }

    fn report_progress(&mut self, word: &[C]) {
        if let Some(hook) = &mut self.progress {
            if self.words % hook.every == 0 {
                (hook.callback)(Progress {
                    words: self.words,
                    states: self.states.len(),
                    word,
                });
            }
        }
    }

    /// Number of words added so far.
    pub fn word_count(&self) -> usize {
        self.words
    }

    /// Finalizes construction and returns the minimal automaton.
    ///
    /// This freezes the remaining open branch and registers the root.
    pub fn build(mut self) -> Dafsa<C> {
        self.freeze_below(0);
        let root = self.pop_open().state;
        let root = self.register.replace_or_register(&mut self.states, root);
        debug!(
            "built DAFSA: {} words, {} states, {} merged states",
            self.words,
            self.states.len(),
            self.register.hits()
        );
        debug_assert_eq!(self.register.len(), self.states.len());
        Dafsa::from_parts(self.states, root, self.words)
    }
}

/// Builds a DAFSA from an iterator of words.
///
/// Each word must implement [`IntoWord`], allowing this function to accept
/// `&str`, `String`, slices, vectors, arrays, or any other supported word type.
///
/// Words **must** be provided in strictly increasing lexicographic order, or
/// this function will return an error. This requirement allows the builder to
/// construct a minimal DAFSA in a single pass.
///
/// # Examples
///
/// Building from byte sequences:
///
/// ```
/// use dafsa::build;
///
/// let words: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![1, 2, 4], vec![2, 3, 4]];
/// let dafsa = build(words).unwrap();
///
/// assert!(dafsa.contains([1, 2, 3]));
/// assert!(!dafsa.contains([1, 2, 5]));
/// ```
///
/// Building from strings:
///
/// ```
/// use dafsa::build;
///
/// let dafsa = build(["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert!(dafsa.contains("BANANA"));
/// assert!(!dafsa.contains("APRICOT"));
/// ```
pub fn build<C, W>(words: impl IntoIterator<Item = W>) -> Result<Dafsa<C>, BuildError<C>>
where
    C: Label,
    W: IntoWord<C>,
{
    let mut builder = Builder::new();
    for word in words {
        builder.add_word(word)?;
    }
    Ok(builder.build())
}

/// Builds a DAFSA from a reader yielding one word per line.
///
/// Trailing whitespace is trimmed. Empty lines and lines starting with `#`
/// are skipped.
pub fn build_from_reader(mut reader: impl BufRead) -> Result<Dafsa<char>, LoadError> {
    let mut builder = Builder::new();

    // Instead of using BufRead::lines() we call read_line repeatedly, which
    // reuses the same string instead of allocating a new one for every line.
    let mut buf = String::with_capacity(80);
    loop {
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        let word = buf.trim_end();
        if !word.is_empty() && !is_comment(word) {
            builder.add_word(word)?;
        }
        buf.clear();
    }
    Ok(builder.build())
}

/// Builds a DAFSA from a word list file (one word per line).
///
/// See [`build_from_reader`] for the line format.
///
/// ```no_run
/// let dafsa = dafsa::build_from_file("words.txt").unwrap();
/// ```
pub fn build_from_file(path: impl AsRef<Path>) -> Result<Dafsa<char>, LoadError> {
    let path = path.as_ref();
    debug!("loading word list from {}", path.display());
    let file = File::open(path)?;
    build_from_reader(BufReader::new(file))
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}
