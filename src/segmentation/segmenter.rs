use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::core::{
    models::{Analysis, Label, Language, SegmentationModel},
    utils::{collapse_whitespace, is_new_sentence, to_lower_case, to_upper_case},
    MorphsegError,
};

use super::splits::insert_splits;

pub const DEFAULT_MIN_WORD_LENGTH: usize = 3;

const SPLIT_SEARCH_MARKER: char = '+';

/// Output formatting and skipping policy.
///
/// `split_marker` joins the morphs inside each role group; `stem_marker`
/// flanks the stem group. When both are `None` the segmenter degrades to a
/// pure stemmer and emits only the (marker-free) stem.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    pub split_marker: Option<String>,
    pub stem_marker: Option<String>,

    /// Leave capitalized words alone unless they start a sentence; they are
    /// likely proper nouns.
    pub skip_nonfirst_capitalized: bool,

    /// Words shorter than this are passed through unsegmented.
    pub min_word_length: usize,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        SegmentOptions {
            split_marker: Some(" ".to_string()),
            stem_marker: Some(" ".to_string()),
            skip_nonfirst_capitalized: false,
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
        }
    }
}

impl SegmentOptions {
    /// No markers at all: emit bare stems.
    pub fn stemming() -> Self {
        SegmentOptions { split_marker: None, stem_marker: None, ..SegmentOptions::default() }
    }
}

/// Applies a read-only [`SegmentationModel`] to words and running text.
pub struct Segmenter<'a> {
    model: &'a SegmentationModel,
    options: SegmentOptions,
    language: Language,
}

impl<'a> Segmenter<'a> {
    pub fn new(model: &'a SegmentationModel, options: SegmentOptions, language: Language) -> Self {
        Segmenter { model, options, language }
    }

    /// Segment a single word. `previous_word` is the preceding token of the
    /// running text (if any), needed to tell sentence-initial capitalization
    /// from proper nouns.
    pub fn segment_word(&self, word: &str, previous_word: Option<&str>) -> String {
        let word_lower = to_lower_case(word, self.language);
        let word_len = word.chars().count();

        // A word whose length changes under folding has casing we cannot
        // restore per character, so it is passed through like a too-short
        // word or a skipped proper noun.
        let skip = word_len != word_lower.chars().count()
            || word_len < self.options.min_word_length
            || (self.options.skip_nonfirst_capitalized
                && !is_new_sentence(previous_word)
                && word.chars().next() != word_lower.chars().next());

        if skip {
            let skipped = match (&self.options.split_marker, &self.options.stem_marker) {
                (None, None) => word.to_string(),
                (_, stem_marker) => {
                    let stem_marker = stem_marker.as_deref().unwrap_or("");
                    format!("{}{}{}", stem_marker, word, stem_marker)
                }
            };
            return collapse_whitespace(skipped.trim());
        }

        // Per-character case mask, consumed left to right when restoring.
        let casing: Vec<bool> = word
            .chars()
            .map(|ch| ch.to_lowercase().to_string() != ch.to_string())
            .collect();

        let analysis = match self.model.word_segmentations.get(&word_lower) {
            Some(found) => found.clone(),
            None => self.search(&word_lower),
        };

        let mut char_index = 0;
        let cased_prefix = self.restore_casing(&analysis.prefix, &casing, &mut char_index);
        let cased_stem = self.restore_casing(&analysis.stem, &casing, &mut char_index);
        let cased_suffix = self.restore_casing(&analysis.suffix, &casing, &mut char_index);

        let segmented = match (&self.options.split_marker, &self.options.stem_marker) {
            (None, None) => cased_stem.split_whitespace().collect::<String>(),
            (split_marker, stem_marker) => {
                let split_marker = split_marker.as_deref().unwrap_or("");
                let stem_marker = stem_marker.as_deref().unwrap_or("");
                format!(
                    "{}{}{}{}{}",
                    cased_prefix.split_whitespace().collect::<Vec<_>>().join(split_marker),
                    stem_marker,
                    cased_stem.split_whitespace().collect::<Vec<_>>().join(split_marker),
                    stem_marker,
                    cased_suffix.split_whitespace().collect::<Vec<_>>().join(split_marker),
                )
            }
        };

        collapse_whitespace(segmented.trim())
    }

    /// Best-scoring three-way split of an unseen word, or the whole word as
    /// stem when nothing survives the frequency and compatibility filters.
    fn search(&self, word_lower: &str) -> Analysis {
        let mut analysis = Analysis::stem_only(word_lower.to_string());
        let total = self.model.word_count() as f64;
        if total == 0.0 {
            return analysis;
        }

        let mut max_score = 0.0f64;
        for candidate in insert_splits(word_lower, 2, SPLIT_SEARCH_MARKER) {
            let mut segments = candidate.split(SPLIT_SEARCH_MARKER);
            let (Some(complex_prefix), Some(complex_stem), Some(complex_suffix)) =
                (segments.next(), segments.next(), segments.next())
            else {
                continue;
            };

            // Every segment must have been observed in its role...
            let counts = &self.model.morpheme_counts;
            let (Some(&prefix_count), Some(&stem_count), Some(&suffix_count)) = (
                counts.prefix.get(complex_prefix),
                counts.stem.get(complex_stem),
                counts.suffix.get(complex_suffix),
            ) else {
                continue;
            };

            // ...and the prefix/suffix pair must have co-occurred.
            let compatible = self
                .model
                .prefix_suffix_compatibility
                .get(complex_prefix)
                .map_or(false, |suffixes| suffixes.contains(complex_suffix));
            if !compatible {
                continue;
            }

            let score = (prefix_count as f64 / total)
                * (stem_count as f64 / total)
                * (suffix_count as f64 / total);

            // Strict comparison: the first candidate to reach the maximum
            // wins, in split generation order.
            if score > max_score {
                analysis.prefix = if complex_prefix.is_empty() {
                    String::new()
                } else {
                    self.majority_composition(Label::Prefix, complex_prefix)
                };
                analysis.stem = self.majority_composition(Label::Stem, complex_stem);
                analysis.suffix = if complex_suffix.is_empty() {
                    String::new()
                } else {
                    self.majority_composition(Label::Suffix, complex_suffix)
                };
                max_score = score;
            }
        }

        analysis
    }

    /// Most frequent atomic decomposition of a complex morph. Count ties go
    /// to the lexicographically smaller decomposition so results do not
    /// depend on map iteration order.
    fn majority_composition(&self, label: Label, complex: &str) -> String {
        self.model.morpheme_compositions[label]
            .get(complex)
            .and_then(|compositions| {
                compositions
                    .iter()
                    .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                    .map(|(decomposition, _)| decomposition.clone())
            })
            .unwrap_or_else(|| complex.to_string())
    }

    fn restore_casing(&self, morphs: &str, casing: &[bool], char_index: &mut usize) -> String {
        let mut cased_morphs = Vec::new();
        for morph in morphs.split_whitespace() {
            let mut cased = String::new();
            for ch in morph.chars() {
                let uppercase = casing.get(*char_index).copied().unwrap_or(false);
                let ch = ch.to_string();
                if uppercase {
                    cased.push_str(&to_upper_case(&ch, self.language));
                } else {
                    cased.push_str(&to_lower_case(&ch, self.language));
                }
                *char_index += 1;
            }
            cased_morphs.push(cased);
        }
        cased_morphs.join(" ")
    }

    /// Segment running text token by token, tracking the previous token for
    /// the sentence-start heuristic.
    pub fn segment_text(&self, text: &str) -> String {
        let mut segmented_words = Vec::new();
        let mut previous_word: Option<&str> = None;
        for word in text.split_whitespace() {
            segmented_words.push(self.segment_word(word, previous_word));
            previous_word = Some(word);
        }
        segmented_words.join(" ")
    }

    /// Segment a file line by line. With `has_id`, each line is expected to
    /// carry a leading tab-separated ID column that is passed through
    /// untouched.
    pub fn segment_file(
        &self,
        input: &Path,
        output: &Path,
        has_id: bool,
    ) -> Result<(), MorphsegError> {
        let reader = BufReader::new(File::open(input)?);
        let mut writer = BufWriter::new(File::create(output)?);

        for line in reader.lines() {
            let line = line?;
            let text = line.trim();
            if has_id {
                let (id, text) = text.split_once('\t').unwrap_or((text, ""));
                writeln!(writer, "{}\t{}", id.trim(), self.segment_text(text.trim()))?;
            } else {
                writeln!(writer, "{}", self.segment_text(text))?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}
