#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{
        core::models::{Language, SegmentationModel},
        segmentation::{
            model::{build_model, LabelScheme},
            segmenter::{SegmentOptions, Segmenter},
            test_corpus::tree_line,
        },
    };

    fn scheme() -> LabelScheme {
        LabelScheme::new("Prefix", "Stem", "Suffix").unwrap()
    }

    fn model_from(lines: &[String]) -> SegmentationModel {
        let corpus = lines.join("\n");
        build_model(Cursor::new(corpus), &scheme(), Language::Generic, 3, None).unwrap()
    }

    fn turkish_model_from(lines: &[String]) -> SegmentationModel {
        let corpus = lines.join("\n");
        build_model(Cursor::new(corpus), &scheme(), Language::Turkish, 3, None).unwrap()
    }

    /// walking = walk+ing, walked = walk+ed, talked = talk+ed
    fn english_model() -> SegmentationModel {
        model_from(&[
            tree_line(&[], &["walk"], &["ing"]),
            tree_line(&[], &["walk"], &["ed"]),
            tree_line(&[], &["talk"], &["ed"]),
        ])
    }

    fn spaced(model: &SegmentationModel) -> Segmenter {
        Segmenter::new(model, SegmentOptions::default(), Language::Generic)
    }

    #[test]
    fn exact_lookup_is_idempotent() {
        let model = english_model();
        let segmenter = spaced(&model);
        let first = segmenter.segment_word("walking", None);
        let second = segmenter.segment_word("walking", None);
        assert_eq!(first, "walk ing");
        assert_eq!(first, second);
    }

    #[test]
    fn casing_is_restored_per_character() {
        let model = english_model();
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("Walking", None), "Walk ing");
        assert_eq!(segmenter.segment_word("WALKING", None), "WALK ING");
        assert_eq!(segmenter.segment_word("walkING", None), "walk ING");
    }

    #[test]
    fn unseen_word_is_segmented_by_search() {
        // "talking" never occurs, but talk/ing and the empty prefix do.
        let model = english_model();
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("talking", None), "talk ing");
    }

    #[test]
    fn unseen_word_with_no_candidate_falls_back_to_stem() {
        // "s" was never observed as a suffix and the empty suffix was never
        // observed either, so every split of "walks" is filtered out.
        let model = english_model();
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("walks", None), "walks");
    }

    #[test]
    fn segmentations_reconstruct_the_word() {
        let model = english_model();
        let segmenter = spaced(&model);
        for word in ["walking", "walked", "talking", "talked", "walks"] {
            let segmented = segmenter.segment_word(word, None);
            assert_eq!(segmented.replace(' ', ""), word, "round trip for {:?}", word);
        }
    }

    #[test]
    fn incompatible_prefix_suffix_pairs_are_never_selected() {
        // "un" and "ed" are both frequent but never co-occurred.
        let model = model_from(&[
            tree_line(&["un"], &["walk"], &[]),
            tree_line(&[], &["talk"], &["ed"]),
        ]);
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("untalked", None), "untalked");

        // The same pair is picked as soon as the corpus licenses it.
        let model = model_from(&[
            tree_line(&["un"], &["walk"], &["ed"]),
            tree_line(&[], &["talk"], &["ed"]),
        ]);
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("untalked", None), "un talk ed");
    }

    #[test]
    fn empty_suffix_is_a_scoreable_candidate() {
        let model = model_from(&[
            tree_line(&["un"], &["walk"], &[]),
            tree_line(&[], &["talk"], &[]),
        ]);
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("untalk", None), "un talk");
    }

    #[test]
    fn winning_candidate_expands_to_majority_composition() {
        // "ings" decomposes to "ing"+"s" twice but stays atomic once.
        let model = model_from(&[
            tree_line(&[], &["talk"], &["ing", "s"]),
            tree_line(&[], &["walk"], &["ing", "s"]),
            tree_line(&[], &["fak"], &["ings"]),
            tree_line(&[], &["mock"], &["ed"]),
        ]);
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("mockings", None), "mock ing s");
    }

    #[test]
    fn short_words_bypass_the_model() {
        let model = model_from(&[tree_line(&[], &["a"], &["t"])]);
        let segmenter = spaced(&model);
        // "at" is in the model, but below the minimum length it is passed
        // through untouched.
        assert_eq!(segmenter.segment_word("at", None), "at");
    }

    #[test]
    fn words_with_unrestorable_casing_are_passed_through() {
        // Generic folding turns the dotted capital I into two characters,
        // so the case mask cannot line up.
        let model = english_model();
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("İstanbul", None), "İstanbul");
    }

    #[test]
    fn turkish_casing_round_trips() {
        let model = turkish_model_from(&[
            tree_line(&[], &["İstanbul"], &[]),
            tree_line(&[], &["kapı"], &["lar"]),
        ]);
        let segmenter = Segmenter::new(&model, SegmentOptions::default(), Language::Turkish);

        assert!(model.word_segmentations.contains_key("istanbul"));
        assert_eq!(segmenter.segment_word("İstanbul", None), "İstanbul");
        assert_eq!(segmenter.segment_word("KAPILAR", None), "KAPI LAR");
        assert_eq!(segmenter.segment_word("kapılar", None), "kapı lar");
    }

    #[test]
    fn capitalized_words_mid_sentence_can_be_skipped() {
        let model = english_model();
        let mut options = SegmentOptions::default();
        options.skip_nonfirst_capitalized = true;
        let segmenter = Segmenter::new(&model, options, Language::Generic);

        assert_eq!(segmenter.segment_text("Stop Walking"), "Stop Walking");
        // After sentence-ending punctuation the capital is ordinary again.
        assert_eq!(segmenter.segment_text("Stop . Walking"), "Stop . Walk ing");

        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_text("Stop Walking"), "Stop Walk ing");
    }

    #[test]
    fn stemming_mode_emits_bare_stems() {
        let model = english_model();
        let segmenter = Segmenter::new(&model, SegmentOptions::stemming(), Language::Generic);
        assert_eq!(segmenter.segment_word("walking", None), "walk");
        assert_eq!(segmenter.segment_word("Talking", None), "Talk");
        assert_eq!(segmenter.segment_word("at", None), "at");
    }

    #[test]
    fn custom_markers() {
        let model = english_model();
        let options = SegmentOptions {
            split_marker: Some("+".to_string()),
            stem_marker: Some("|".to_string()),
            ..SegmentOptions::default()
        };
        let segmenter = Segmenter::new(&model, options, Language::Generic);
        assert_eq!(segmenter.segment_word("walking", None), "|walk|ing");
        // Skipped words only get the stem wrap.
        assert_eq!(segmenter.segment_word("at", None), "|at|");
    }

    #[test]
    fn text_segmentation_joins_per_token_results() {
        let model = english_model();
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_text("walking and talked"), "walk ing and talk ed");
        assert_eq!(segmenter.segment_text(""), "");
    }

    #[test]
    fn empty_model_falls_back_for_everything() {
        let model = SegmentationModel::default();
        let segmenter = spaced(&model);
        assert_eq!(segmenter.segment_word("walking", None), "walking");
    }
}
