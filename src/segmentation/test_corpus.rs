//! Helpers to build inducer-style parse-tree lines for tests.

use crate::core::utils::string_to_hex;

/// One bracketed subtree per morph, in the given group order, e.g.
/// `(Word (Stem#1 (Chars (Char fffe7700) ...)) (Suffix#2 ...))`.
pub(crate) fn labeled_tree(groups: &[(&str, &[&str])]) -> String {
    let mut parts = vec!["(Word".to_string()];
    let mut counter = 0;
    for (label, morphs) in groups {
        for morph in *morphs {
            counter += 1;
            let chars = morph
                .chars()
                .map(|ch| format!("(Char {})", string_to_hex(&ch.to_string())))
                .collect::<Vec<_>>()
                .join(" ");
            parts.push(format!("({}#{} (Chars {}))", label, counter, chars));
        }
    }
    format!("{})", parts.join(" "))
}

/// Standard three-role line; empty slices leave the role out entirely.
pub(crate) fn tree_line(prefix: &[&str], stem: &[&str], suffix: &[&str]) -> String {
    labeled_tree(&[("Prefix", prefix), ("Stem", stem), ("Suffix", suffix)])
}
