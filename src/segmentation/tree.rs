use std::{
    collections::{BTreeMap, HashMap},
    sync::OnceLock,
};

use regex::Regex;

use crate::core::utils::hex_to_string;

/// Morphemes extracted from one parse-tree line.
#[derive(Debug, Default)]
pub struct TreeMorphs {
    /// Nonterminal -> ordered morphs found under it. A line can contain
    /// several disjoint occurrences of the same nonterminal.
    pub by_label: HashMap<String, Vec<String>>,

    /// Token index where a morph was completed -> the nonterminal found there.
    /// Used to verify that the extracted roles appear in the declared order.
    pub labels_by_index: BTreeMap<usize, String>,

    /// Token index where a morph was completed -> the morph itself.
    pub tokens_by_index: BTreeMap<usize, String>,
}

static HEX_TERMINAL: OnceLock<Regex> = OnceLock::new();

fn hex_terminal_re() -> &'static Regex {
    HEX_TERMINAL.get_or_init(|| Regex::new(r"^([0-9a-f]{4,8})\)*$").unwrap())
}

/// Extract the morphs under the given nonterminals from one bracketed
/// parse-tree line, e.g.
///
/// `(Word (Prefix#110 ^^^ (Chars (Char fffe6200) (Chars (Char fffe6500))))
///  (Stem#52 (Chars (Char fffe6300))) (Suffix#3 (Chars (Char fffe7300)) $$$))`
///
/// The scan is tolerant by construction: a nonterminal that never matches is
/// simply absent from the result, and unbalanced lines at worst truncate the
/// morph being read. Nothing here fails.
pub fn morphs_from_tree(line: &str, labels: &[&str]) -> TreeMorphs {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut result = TreeMorphs::default();

    let mut unique_labels: Vec<&str> = Vec::new();
    for label in labels {
        if !unique_labels.contains(label) {
            unique_labels.push(label);
        }
    }

    for label in unique_labels {
        // Label tokens look like "Stem", "(Stem#52" or "(Stem52" depending on
        // how the inducer numbered its nonterminals.
        let label_re = Regex::new(&format!(r"^\(?{}(#?[0-9]+)?$", regex::escape(label)))
            .expect("escaped label is a valid pattern");

        let mut reading = false;
        let mut balance: i64 = 0;
        let mut current_chars: Vec<String> = Vec::new();

        for (index, part) in parts.iter().enumerate() {
            if !reading && label_re.is_match(part) {
                reading = true;
            } else if reading {
                if let Some(caps) = hex_terminal_re().captures(part) {
                    if let Some(ch) = hex_to_string(&caps[1]) {
                        current_chars.push(ch);
                    }
                }
            }

            if reading {
                balance += part.matches('(').count() as i64;
                balance -= part.matches(')').count() as i64;
                if balance <= 0 {
                    // Subtree closed: emit the accumulated morph.
                    if !current_chars.is_empty() {
                        let morph = current_chars.concat();
                        result.by_label.entry(label.to_string()).or_default().push(morph.clone());
                        result.labels_by_index.insert(index, label.to_string());
                        result.tokens_by_index.insert(index, morph);
                    }
                    reading = false;
                    balance = 0;
                    current_chars.clear();
                }
            }
        }
    }

    result
}
