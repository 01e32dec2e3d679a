use std::{
    collections::{HashMap, HashSet},
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};

/// Positional role of a morpheme inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Prefix,
    Stem,
    Suffix,
}

/// One value per morpheme role, indexable by [`Label`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerLabel<T> {
    pub prefix: T,
    pub stem: T,
    pub suffix: T,
}

impl<T> Index<Label> for PerLabel<T> {
    type Output = T;

    fn index(&self, label: Label) -> &T {
        match label {
            Label::Prefix => &self.prefix,
            Label::Stem => &self.stem,
            Label::Suffix => &self.suffix,
        }
    }
}

impl<T> IndexMut<Label> for PerLabel<T> {
    fn index_mut(&mut self, label: Label) -> &mut T {
        match label {
            Label::Prefix => &mut self.prefix,
            Label::Stem => &mut self.stem,
            Label::Suffix => &mut self.suffix,
        }
    }
}

/// A word's decomposition: space-joined lowercase atomic morphs per role.
/// An empty string means the word has no morpheme of that role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub prefix: String,
    pub stem: String,
    pub suffix: String,
}

impl Analysis {
    pub fn stem_only(stem: String) -> Self {
        Analysis { prefix: String::new(), stem, suffix: String::new() }
    }
}

/// Language of the processed text. Only drives the special casing rules,
/// so anything without such rules is `Generic`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Generic,
    Turkish,
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("turkish") || code.eq_ignore_ascii_case("tur") {
            Language::Turkish
        } else {
            Language::Generic
        }
    }
}

/// The artifact produced by the model builder and consumed by the segmenter.
///
/// All four maps are filled in a single pass over the parsed corpus and never
/// mutated afterwards, so a model can be shared read-only between any number
/// of segmenters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationModel {
    /// Lowercase word -> its observed analysis.
    pub word_segmentations: HashMap<String, Analysis>,

    /// Lowercase complex morph -> occurrence count. The empty string entry
    /// counts the words that have no morpheme of that role at all.
    pub morpheme_counts: PerLabel<HashMap<String, u32>>,

    /// Lowercase complex morph -> (space-joined atomic decomposition -> count).
    /// e.g. "ings" -> {"ing s": 2, "ings": 1}
    pub morpheme_compositions: PerLabel<HashMap<String, HashMap<String, u32>>>,

    /// Lowercase complex prefix (possibly "") -> complex suffixes it was
    /// observed co-occurring with.
    pub prefix_suffix_compatibility: HashMap<String, HashSet<String>>,
}

impl SegmentationModel {
    /// Number of distinct analyzed words, the denominator of the relative
    /// frequencies used when scoring split candidates.
    pub fn word_count(&self) -> usize {
        self.word_segmentations.len()
    }
}
