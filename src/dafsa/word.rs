//! Conversions from the usual word representations into label sequences.

use smallvec::SmallVec;

use super::label::Label;

/// The labels of one word. Words of up to 32 labels stay on the stack.
pub type WordBuf<C> = SmallVec<[C; 32]>;

/// A value that spells a word over labels of type `C`.
///
/// Text (`&str`, `String`) spells `char` words. Slices, vectors and arrays
/// spell words over their element type. Whatever
/// [`Builder::add_word`](super::Builder::add_word) accepts,
/// [`Dafsa::contains`](super::Dafsa::contains) accepts too.
pub trait IntoWord<C: Label> {
    /// Returns the labels of this word, first to last.
    fn into_labels(self) -> WordBuf<C>;
}

macro_rules! impl_text_word {
    ($($text:ty),*) => {$(
        impl IntoWord<char> for $text {
            fn into_labels(self) -> WordBuf<char> {
                self.chars().collect()
            }
        }
    )*};
}

impl_text_word!(&str, &&str, String, &String);

impl<C: Label> IntoWord<C> for &[C] {
    fn into_labels(self) -> WordBuf<C> {
        WordBuf::from_slice(self)
    }
}

impl<C: Label> IntoWord<C> for Vec<C> {
    fn into_labels(self) -> WordBuf<C> {
        WordBuf::from_vec(self)
    }
}

impl<C: Label> IntoWord<C> for &Vec<C> {
    fn into_labels(self) -> WordBuf<C> {
        WordBuf::from_slice(self)
    }
}

impl<C: Label, const N: usize> IntoWord<C> for [C; N] {
    fn into_labels(self) -> WordBuf<C> {
        WordBuf::from_slice(&self)
    }
}

impl<C: Label, const N: usize> IntoWord<C> for &[C; N] {
    fn into_labels(self) -> WordBuf<C> {
        WordBuf::from_slice(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn labels<C: Label>(word: impl IntoWord<C>) -> Vec<C> {
        word.into_labels().into_vec()
    }

    #[test]
    fn text_spells_chars() {
        let owned = String::from("naïve");
        let expected = vec!['n', 'a', 'ï', 'v', 'e'];
        assert_eq!(labels("naïve"), expected);
        assert_eq!(labels(&"naïve"), expected);
        assert_eq!(labels(&owned), expected);
        assert_eq!(labels(owned), expected);
    }

    #[test]
    fn sequences_spell_their_elements() {
        let bytes = vec![3u8, 1, 2];
        assert_eq!(labels(&bytes), [3, 1, 2]);
        assert_eq!(labels(&bytes[1..]), [1, 2]);
        assert_eq!(labels(bytes), [3, 1, 2]);
        assert_eq!(labels([7u16, 8]), [7, 8]);
        assert_eq!(labels(&[7u16, 8]), [7, 8]);
    }

    #[test]
    fn long_words_spill_to_the_heap() {
        let word = "x".repeat(100);
        let buf: WordBuf<char> = word.as_str().into_labels();
        assert_eq!(buf.len(), 100);
        assert!(buf.spilled());
    }
}
