//! Affix statistics over a segmentation output: top-n affix extraction for
//! cascaded seeding and the per-class counting features used to compare
//! grammar variants.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{core::MorphsegError, segmentation::tree::morphs_from_tree};

/// The most frequent affixes of a segmentation output, merged across the two
/// classes by descending count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopAffixes {
    /// Frequency-merged top-n list (prefixes and suffixes interleaved).
    pub affixes: Vec<String>,
    /// The prefixes of `affixes`.
    pub prefixes: Vec<String>,
    /// The suffixes of `affixes`.
    pub suffixes: Vec<String>,
}

fn sorted_by_count(counter: HashMap<String, u32>) -> Vec<(String, u32)> {
    let mut sorted: Vec<(String, u32)> = counter.into_iter().collect();
    // Descending count, ties alphabetical so the output is stable.
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Extract the `n` most frequent affixes from parse-tree lines. Prefixes and
/// suffixes compete for the n slots on raw counts; a tie between the classes
/// goes to the suffix.
pub fn top_affixes_from<R: BufRead>(
    reader: R,
    n: usize,
    prefix_label: &str,
    suffix_label: &str,
) -> Result<TopAffixes, MorphsegError> {
    let mut prefix_counter: HashMap<String, u32> = HashMap::new();
    let mut suffix_counter: HashMap<String, u32> = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        let tree = morphs_from_tree(line.trim(), &[prefix_label, suffix_label]);
        for (label, morphs) in &tree.by_label {
            let counter =
                if label == prefix_label { &mut prefix_counter } else { &mut suffix_counter };
            for morph in morphs {
                *counter.entry(morph.clone()).or_insert(0) += 1;
            }
        }
    }

    let prefixes = sorted_by_count(prefix_counter);
    let suffixes = sorted_by_count(suffix_counter);

    let mut top = TopAffixes::default();
    let mut remaining = n.min(prefixes.len() + suffixes.len());
    let mut p = 0;
    let mut s = 0;

    while remaining > 0 {
        if p == prefixes.len() && s == suffixes.len() {
            break;
        }
        let take_prefix = !prefixes.is_empty()
            && (suffixes.is_empty() || s == suffixes.len() || {
                p < prefixes.len() && prefixes[p].1 > suffixes[s].1
            });
        if take_prefix {
            top.affixes.push(prefixes[p].0.clone());
            top.prefixes.push(prefixes[p].0.clone());
            p += 1;
        } else {
            top.affixes.push(suffixes[s].0.clone());
            top.suffixes.push(suffixes[s].0.clone());
            s += 1;
        }
        remaining -= 1;
    }

    Ok(top)
}

pub fn top_affixes(
    path: &Path,
    n: usize,
    prefix_label: &str,
    suffix_label: &str,
) -> Result<TopAffixes, MorphsegError> {
    let reader = BufReader::new(File::open(path)?);
    top_affixes_from(reader, n, prefix_label, suffix_label)
}

/// Counting features for one morph class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MorphClassFeatures {
    pub type_count: usize,
    pub average_count_per_word: f64,
    pub average_length: f64,
}

fn morph_class_features(
    counter: &HashMap<String, u32>,
    word_count: usize,
    min_appearance: u32,
) -> MorphClassFeatures {
    let mut type_count = 0usize;
    let mut token_count = 0u64;
    let mut total_length = 0usize;

    for (morph, &count) in counter {
        if count < min_appearance {
            continue;
        }
        type_count += 1;
        token_count += u64::from(count);
        total_length += morph.chars().count();
    }

    MorphClassFeatures {
        type_count,
        average_count_per_word: if word_count == 0 {
            0.0
        } else {
            token_count as f64 / word_count as f64
        },
        average_length: if type_count == 0 { 0.0 } else { total_length as f64 / type_count as f64 },
    }
}

/// Affix features of a whole segmentation output, per class. Only meaningful
/// when prefixes and suffixes use distinct nonterminals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AffixFeatures {
    pub prefix: MorphClassFeatures,
    pub suffix: MorphClassFeatures,
    pub affix: MorphClassFeatures,
    pub complex_prefix: MorphClassFeatures,
    pub complex_suffix: MorphClassFeatures,
    pub complex_affix: MorphClassFeatures,
}

pub fn affix_features_from<R: BufRead>(
    reader: R,
    prefix_label: &str,
    suffix_label: &str,
    min_appearance: u32,
) -> Result<AffixFeatures, MorphsegError> {
    let mut word_count = 0usize;

    let mut prefix_counter: HashMap<String, u32> = HashMap::new();
    let mut suffix_counter: HashMap<String, u32> = HashMap::new();
    let mut affix_counter: HashMap<String, u32> = HashMap::new();
    let mut complex_prefix_counter: HashMap<String, u32> = HashMap::new();
    let mut complex_suffix_counter: HashMap<String, u32> = HashMap::new();
    let mut complex_affix_counter: HashMap<String, u32> = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        word_count += 1;
        let tree = morphs_from_tree(line.trim(), &[prefix_label, suffix_label]);

        let mut complex_prefix = String::new();
        let mut complex_suffix = String::new();
        for (label, morphs) in &tree.by_label {
            let is_prefix = label == prefix_label;
            for morph in morphs {
                *affix_counter.entry(morph.clone()).or_insert(0) += 1;
                if is_prefix {
                    *prefix_counter.entry(morph.clone()).or_insert(0) += 1;
                    complex_prefix.push_str(morph);
                } else {
                    *suffix_counter.entry(morph.clone()).or_insert(0) += 1;
                    complex_suffix.push_str(morph);
                }
            }
        }

        if !complex_prefix.is_empty() {
            *complex_prefix_counter.entry(complex_prefix.clone()).or_insert(0) += 1;
            *complex_affix_counter.entry(complex_prefix).or_insert(0) += 1;
        }
        if !complex_suffix.is_empty() {
            *complex_suffix_counter.entry(complex_suffix.clone()).or_insert(0) += 1;
            *complex_affix_counter.entry(complex_suffix).or_insert(0) += 1;
        }
    }

    Ok(AffixFeatures {
        prefix: morph_class_features(&prefix_counter, word_count, min_appearance),
        suffix: morph_class_features(&suffix_counter, word_count, min_appearance),
        affix: morph_class_features(&affix_counter, word_count, min_appearance),
        complex_prefix: morph_class_features(&complex_prefix_counter, word_count, min_appearance),
        complex_suffix: morph_class_features(&complex_suffix_counter, word_count, min_appearance),
        complex_affix: morph_class_features(&complex_affix_counter, word_count, min_appearance),
    })
}

pub fn affix_features(
    path: &Path,
    prefix_label: &str,
    suffix_label: &str,
    min_appearance: u32,
) -> Result<AffixFeatures, MorphsegError> {
    affix_features_from(BufReader::new(File::open(path)?), prefix_label, suffix_label, min_appearance)
}
