use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::core::{
    models::{Analysis, Label, Language, PerLabel, SegmentationModel},
    utils::to_lower_case,
    MorphsegError,
};

use super::tree::{morphs_from_tree, TreeMorphs};

/// How the grammar names the morpheme roles. The inducer either uses one
/// merged nonterminal for everything ("flat" grammars like `Morph` or
/// `Compound`) or three distinct ones; a mix of the two is a configuration
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelScheme {
    Flat(String),
    Positional { prefix: String, stem: String, suffix: String },
}

impl LabelScheme {
    pub fn new(prefix: &str, stem: &str, suffix: &str) -> Result<Self, MorphsegError> {
        if prefix == stem && stem == suffix {
            Ok(LabelScheme::Flat(stem.to_string()))
        } else if prefix != stem && stem != suffix && prefix != suffix {
            Ok(LabelScheme::Positional {
                prefix: prefix.to_string(),
                stem: stem.to_string(),
                suffix: suffix.to_string(),
            })
        } else {
            Err(MorphsegError::InvalidLabelScheme)
        }
    }

    fn labels(&self) -> [&str; 3] {
        match self {
            LabelScheme::Flat(name) => [name, name, name],
            LabelScheme::Positional { prefix, stem, suffix } => [prefix, stem, suffix],
        }
    }
}

/// Per-line parse confidence. Ambiguous grammars sometimes emit the affix
/// roles swapped; such lines are still usable, but only as a plain sequence
/// of morphs without role semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrder {
    WellOrdered,
    Inverted,
}

fn collapse_runs<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut collapsed: Vec<&str> = Vec::new();
    for item in items {
        if collapsed.last() != Some(&item) {
            collapsed.push(item);
        }
    }
    collapsed
}

/// Check whether the roles were extracted in the declared relative order
/// (consecutive duplicates collapsed on both sides).
pub fn line_order(tree: &TreeMorphs, declared: &[&str; 3]) -> LineOrder {
    let extracted = collapse_runs(tree.labels_by_index.values().map(String::as_str)).join(" ");
    let declared = collapse_runs(declared.iter().copied()).join(" ");
    if declared.contains(&extracted) {
        LineOrder::WellOrdered
    } else {
        LineOrder::Inverted
    }
}

/// Build a [`SegmentationModel`] from parse-tree lines, one word per line.
///
/// When `sink` is set, each word and its space-joined segmentation are also
/// written out as two tab-separated columns (first occurrence wins), the
/// format the downstream evaluation utilities consume. Words shorter than
/// `min_word_length` go into the sink unsegmented but still feed the model.
///
/// With a flat scheme only the sink output is meaningful; the frequency
/// tables stay empty because the roles cannot be told apart.
pub fn build_model<R: BufRead>(
    reader: R,
    scheme: &LabelScheme,
    language: Language,
    min_word_length: usize,
    mut sink: Option<&mut dyn Write>,
) -> Result<SegmentationModel, MorphsegError> {
    let mut model = SegmentationModel::default();
    let mut written: HashSet<String> = HashSet::new();
    let labels = scheme.labels();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tree = morphs_from_tree(line, &labels);

        let mut word = String::new();
        let mut segmented_word = String::new();

        match line_order(&tree, &labels) {
            LineOrder::Inverted => {
                // Ambiguous-grammar artifact: ignore the role labels and fall
                // back to the plain token order.
                let tokens: Vec<&str> = tree.tokens_by_index.values().map(String::as_str).collect();
                word = tokens.concat();
                segmented_word = tokens.join(" ");
            }
            LineOrder::WellOrdered => match scheme {
                LabelScheme::Flat(name) => {
                    if let Some(morphs) = tree.by_label.get(name) {
                        word = morphs.concat();
                        segmented_word = morphs.join(" ");
                    }
                }
                LabelScheme::Positional { prefix, stem, suffix } => {
                    let mut morphs_lower = PerLabel::<String>::default();
                    let mut complex_lower = PerLabel::<String>::default();

                    let named = [
                        (Label::Prefix, prefix.as_str()),
                        (Label::Stem, stem.as_str()),
                        (Label::Suffix, suffix.as_str()),
                    ];
                    for (label, name) in named {
                        match tree.by_label.get(name).filter(|morphs| !morphs.is_empty()) {
                            Some(morphs) => {
                                if !segmented_word.is_empty() {
                                    segmented_word.push(' ');
                                }
                                let complex = morphs.concat();
                                let lower = to_lower_case(&complex, language);
                                let joined_lower = morphs
                                    .iter()
                                    .map(|morph| to_lower_case(morph, language))
                                    .collect::<Vec<_>>()
                                    .join(" ");

                                *model.morpheme_compositions[label]
                                    .entry(lower.clone())
                                    .or_default()
                                    .entry(joined_lower.clone())
                                    .or_insert(0) += 1;
                                *model.morpheme_counts[label].entry(lower.clone()).or_insert(0) +=
                                    1;

                                word.push_str(&complex);
                                segmented_word.push_str(&morphs.join(" "));
                                complex_lower[label] = lower;
                                morphs_lower[label] = joined_lower;
                            }
                            None => {
                                // "No prefix"/"no suffix" is itself countable;
                                // a missing stem is just a defective line.
                                if label != Label::Stem {
                                    *model.morpheme_counts[label]
                                        .entry(String::new())
                                        .or_insert(0) += 1;
                                }
                            }
                        }
                    }

                    model
                        .prefix_suffix_compatibility
                        .entry(complex_lower.prefix.clone())
                        .or_default()
                        .insert(complex_lower.suffix.clone());

                    model.word_segmentations.insert(
                        to_lower_case(&word, language),
                        Analysis {
                            prefix: morphs_lower.prefix,
                            stem: morphs_lower.stem,
                            suffix: morphs_lower.suffix,
                        },
                    );
                }
            },
        }

        // Too-short words are never segmented downstream.
        if word.chars().count() < min_word_length {
            segmented_word = word.clone();
        }

        if let Some(out) = sink.as_deref_mut() {
            if written.insert(word.clone()) {
                writeln!(out, "{}\t{}", word, segmented_word)?;
            }
        }
    }

    Ok(model)
}

/// Path-based convenience wrapper around [`build_model`].
pub fn build_model_from_path(
    corpus: &Path,
    scheme: &LabelScheme,
    language: Language,
    min_word_length: usize,
    segmentation_output: Option<&Path>,
) -> Result<SegmentationModel, MorphsegError> {
    let reader = BufReader::new(File::open(corpus)?);
    match segmentation_output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            let model = build_model(reader, scheme, language, min_word_length, Some(&mut out))?;
            out.flush()?;
            Ok(model)
        }
        None => build_model(reader, scheme, language, min_word_length, None),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::segmentation::test_corpus::{labeled_tree, tree_line};

    fn positional() -> LabelScheme {
        LabelScheme::new("Prefix", "Stem", "Suffix").unwrap()
    }

    fn build(lines: &[String]) -> SegmentationModel {
        let corpus = lines.join("\n");
        build_model(Cursor::new(corpus), &positional(), Language::Generic, 3, None).unwrap()
    }

    #[test]
    fn scheme_validation() {
        assert!(LabelScheme::new("Morph", "Morph", "Morph").is_ok());
        assert!(LabelScheme::new("Prefix", "Stem", "Suffix").is_ok());
        assert!(matches!(
            LabelScheme::new("Prefix", "Stem", "Stem"),
            Err(MorphsegError::InvalidLabelScheme)
        ));
        assert!(matches!(
            LabelScheme::new("Stem", "Stem", "Suffix"),
            Err(MorphsegError::InvalidLabelScheme)
        ));
    }

    #[test]
    fn counts_and_compatibility() {
        let model = build(&[
            tree_line(&["un"], &["walk"], &[]),
            tree_line(&[], &["walk"], &["ing"]),
            tree_line(&[], &["walk"], &["ed"]),
        ]);

        assert_eq!(model.morpheme_counts.prefix["un"], 1);
        assert_eq!(model.morpheme_counts.prefix[""], 2);
        assert_eq!(model.morpheme_counts.stem["walk"], 3);
        assert_eq!(model.morpheme_counts.suffix["ing"], 1);
        assert_eq!(model.morpheme_counts.suffix[""], 1);

        assert!(model.prefix_suffix_compatibility["un"].contains(""));
        assert!(model.prefix_suffix_compatibility[""].contains("ing"));
        assert!(model.prefix_suffix_compatibility[""].contains("ed"));
        assert!(!model.prefix_suffix_compatibility["un"].contains("ing"));

        assert_eq!(model.word_segmentations["unwalk"].prefix, "un");
        assert_eq!(model.word_segmentations["walking"].suffix, "ing");
        assert_eq!(model.word_count(), 3);
    }

    #[test]
    fn compositions_track_atomic_decompositions() {
        let model = build(&[
            tree_line(&[], &["talk"], &["ing", "s"]),
            tree_line(&[], &["walk"], &["ing", "s"]),
            tree_line(&[], &["fak"], &["ings"]),
        ]);

        // All three lines produce the same complex suffix with two different
        // decompositions.
        assert_eq!(model.morpheme_counts.suffix["ings"], 3);
        let compositions = &model.morpheme_compositions.suffix["ings"];
        assert_eq!(compositions["ing s"], 2);
        assert_eq!(compositions["ings"], 1);
    }

    #[test]
    fn casing_is_folded_into_the_model() {
        let model = build(&[tree_line(&[], &["Walk"], &["ing"])]);
        assert!(model.word_segmentations.contains_key("walking"));
        assert_eq!(model.morpheme_counts.stem["walk"], 1);
    }

    #[test]
    fn inverted_line_degrades_to_token_order() {
        let line = labeled_tree(&[("Suffix", &["ed"]), ("Stem", &["walk"])]);
        let tree = morphs_from_tree(&line, &["Prefix", "Stem", "Suffix"]);
        assert_eq!(line_order(&tree, &["Prefix", "Stem", "Suffix"]), LineOrder::Inverted);

        let mut sink = Vec::new();
        build_model(
            Cursor::new(line),
            &positional(),
            Language::Generic,
            3,
            Some(&mut sink),
        )
        .unwrap();

        // The inverted word is emitted in raw token order and feeds no tables.
        let output = String::from_utf8(sink).unwrap();
        assert_eq!(output, "edwalk\ted walk\n");
    }

    #[test]
    fn well_ordered_lines_allow_gaps() {
        let line = labeled_tree(&[("Stem", &["walk"]), ("Suffix", &["ing"])]);
        let tree = morphs_from_tree(&line, &["Prefix", "Stem", "Suffix"]);
        assert_eq!(line_order(&tree, &["Prefix", "Stem", "Suffix"]), LineOrder::WellOrdered);
    }

    #[test]
    fn flat_scheme_populates_no_tables() {
        let scheme = LabelScheme::new("Morph", "Morph", "Morph").unwrap();
        let line = labeled_tree(&[("Morph", &["walk", "ing"])]);

        let mut sink = Vec::new();
        let model =
            build_model(Cursor::new(line), &scheme, Language::Generic, 3, Some(&mut sink)).unwrap();

        assert!(model.word_segmentations.is_empty());
        assert!(model.morpheme_counts.stem.is_empty());
        assert_eq!(String::from_utf8(sink).unwrap(), "walking\twalk ing\n");
    }

    #[test]
    fn short_words_are_written_unsegmented() {
        let mut sink = Vec::new();
        let line = tree_line(&[], &["a"], &["t"]);
        let model =
            build_model(Cursor::new(line), &positional(), Language::Generic, 3, Some(&mut sink))
                .unwrap();

        // Still counted for the model, but the sink sees the bare word.
        assert_eq!(model.morpheme_counts.stem["a"], 1);
        assert_eq!(String::from_utf8(sink).unwrap(), "at\tat\n");
    }

    #[test]
    fn duplicate_words_are_written_once() {
        let mut sink = Vec::new();
        let lines =
            [tree_line(&[], &["walk"], &["ing"]), tree_line(&[], &["walk"], &["ing"])].join("\n");
        build_model(Cursor::new(lines), &positional(), Language::Generic, 3, Some(&mut sink))
            .unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "walking\twalk ing\n");
    }
}
