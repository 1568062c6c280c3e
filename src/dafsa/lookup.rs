//! Read-only queries: membership, prefixes and enumeration.

use super::automaton::Dafsa;
use super::word::IntoWord;
use super::label::Label;
use super::state::StateId;

impl<C: Label> Dafsa<C> {
    /// Returns `true` if the given word is in the DAFSA.
    ///
    /// Labels that never occur in the automaton simply fail to match.
    ///
    /// # Examples
    ///
    /// ```
    /// let dafsa = dafsa::build(["BAKE", "CAKE"]).unwrap();
    /// assert!(dafsa.contains("CAKE"));
    /// assert!(!dafsa.contains("FAKE"));
    /// assert!(!dafsa.contains("CAK"));
    /// ```
    pub fn contains(&self, word: impl IntoWord<C>) -> bool {
        let word = word.into_labels();
        self.walk(&word)
            .is_some_and(|id| self.state(id).is_terminal())
    }

    /// Returns `true` if any word in the DAFSA starts with `prefix`.
    ///
    /// Every state lies on the path of some word, so reaching the end of the
    /// prefix is enough. The only exception is the bare root of an automaton
    /// without words.
    pub fn has_prefix(&self, prefix: impl IntoWord<C>) -> bool {
        let prefix = prefix.into_labels();
        !self.is_empty() && self.walk(&prefix).is_some()
    }

    /// Follows `labels` from the root and returns the state reached.
    pub fn walk(&self, labels: &[C]) -> Option<StateId> {
        labels
            .iter()
            .try_fold(self.root(), |id, &label| self.state(id).get(label))
    }

    /// Returns an iterator over all accepted words in lexicographic order.
    pub fn words(&self) -> Words<'_, C> {
        Words {
            dafsa: self,
            stack: vec![(self.root(), 0)],
            prefix: Vec::new(),
            root_pending: true,
        }
    }
}

impl Dafsa<char> {
    /// Returns an iterator over all accepted words as `String`s.
    pub fn strings(&self) -> impl Iterator<Item = String> + '_ {
        self.words().map(|word| word.into_iter().collect())
    }
}

/// Returns `true` if `word` is accepted by `dafsa`.
///
/// Same as [`Dafsa::contains`].
pub fn contains<C: Label>(word: impl IntoWord<C>, dafsa: &Dafsa<C>) -> bool {
    dafsa.contains(word)
}

/// Depth-first enumeration of the words of a [`Dafsa`].
///
/// Shared states are visited once per path that reaches them.
pub struct Words<'a, C: Label> {
    dafsa: &'a Dafsa<C>,
    /// State on the current path and the index of its next transition to follow.
    stack: Vec<(StateId, usize)>,
    prefix: Vec<C>,
    root_pending: bool,
}

impl<C: Label> Iterator for Words<'_, C> {
    type Item = Vec<C>;

    fn next(&mut self) -> Option<Self::Item> {
        if std::mem::take(&mut self.root_pending) && self.dafsa.root_state().is_terminal() {
            return Some(Vec::new());
        }
        while let Some(&(id, next)) = self.stack.last() {
            let top = self.stack.len() - 1;
            match self.dafsa.state(id).transition(next) {
                Some((label, target)) => {
                    self.stack[top].1 += 1;
                    self.stack.push((target, 0));
                    self.prefix.push(label);
                    if self.dafsa.state(target).is_terminal() {
                        return Some(self.prefix.clone());
                    }
                }
                None => {
                    self.stack.pop();
                    self.prefix.pop();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::super::builder::build;
    use super::*;

    #[test]
    fn contains_basic() {
        let dafsa = build(["BAKE", "CAKE", "FAKE"]).unwrap();
        assert!(dafsa.contains("BAKE"));
        assert!(dafsa.contains("CAKE"));
        assert!(!dafsa.contains("MAKE"));
        assert!(!dafsa.contains("BAK"));
        assert!(!dafsa.contains("BAKES"));
        assert!(!dafsa.contains(""));
    }

    #[test]
    fn out_of_alphabet_labels_are_absent() {
        let dafsa = build(["cat"]).unwrap();
        assert!(!dafsa.contains("c4t"));
        assert!(!dafsa.contains("çat"));
        assert!(!contains("🐈", &dafsa));
    }

    #[test]
    fn prefixes() {
        let dafsa = build(["BAKE", "BAKED", "CAKE"]).unwrap();
        for prefix in ["", "B", "BA", "BAK", "BAKE", "BAKED", "CA"] {
            assert!(dafsa.has_prefix(prefix), "{prefix}");
        }
        for prefix in ["A", "BAKER", "CAKED", "D"] {
            assert!(!dafsa.has_prefix(prefix), "{prefix}");
        }
    }

    #[test]
    fn empty_automaton_has_no_prefixes() {
        let empty = build::<char, &str>([]).unwrap();
        assert!(!empty.has_prefix(""));
        assert!(!empty.has_prefix("a"));

        let only_empty_word = build([""]).unwrap();
        assert!(only_empty_word.has_prefix(""));
        assert!(!only_empty_word.has_prefix("a"));
    }

    #[test]
    fn words_are_enumerated_in_order() {
        let input = ["call", "cap", "car", "carrot", "cat", "tap", "taps", "top", "tops"];
        let dafsa = build(input).unwrap();
        assert_eq!(dafsa.strings().collect::<Vec<_>>(), input);
    }

    #[test]
    fn words_include_the_empty_word() {
        let dafsa = build(["", "a"]).unwrap();
        assert_eq!(dafsa.strings().collect::<Vec<_>>(), ["", "a"]);

        let empty = build::<char, &str>([]).unwrap();
        assert_eq!(empty.words().next(), None);
    }

    #[test]
    fn walk_returns_shared_state() {
        let dafsa = build(["ball", "bap", "call", "cap"]).unwrap();
        assert_eq!(dafsa.walk(&['b', 'a']), dafsa.walk(&['c', 'a']));
        assert_eq!(dafsa.walk(&['d']), None);
    }
}
