//! Grammar files for the external inducer: the `LHS --> RHS` rule format,
//! linguistic-knowledge affix lists and the seeding operations that inject
//! affixes into a base grammar.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
    sync::OnceLock,
};

use regex::Regex;

use crate::{
    analysis::top_affixes_from,
    core::{utils::string_to_hex, MorphsegError},
};

const LK_PREFIXES: &str = "###PREFIXES###";
const LK_SUFFIXES: &str = "###SUFFIXES###";

/// A grammar as an insertion-ordered multimap: one LHS, many RHS
/// alternatives. Order matters because the files are diffed and fed back to
/// the inducer as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    rules: Vec<(String, Vec<String>)>,
}

impl Grammar {
    pub fn new() -> Self {
        Grammar::default()
    }

    pub fn push(&mut self, lhs: &str, rhs: String) {
        if let Some((_, alternatives)) = self.rules.iter_mut().find(|(key, _)| key == lhs) {
            alternatives.push(rhs);
        } else {
            self.rules.push((lhs.to_string(), vec![rhs]));
        }
    }

    pub fn get(&self, lhs: &str) -> Option<&[String]> {
        self.rules
            .iter()
            .find(|(key, _)| key == lhs)
            .map(|(_, alternatives)| alternatives.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules.iter().map(|(lhs, rhs)| (lhs.as_str(), rhs.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Read a `LHS --> RHS` grammar. Blank lines and `#`/`//` comments are
/// skipped.
pub fn read_grammar_from<R: BufRead>(reader: R) -> Result<Grammar, MorphsegError> {
    let mut grammar = Grammar::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let (lhs, rhs) = line.split_once("-->").unwrap_or((line, ""));
        grammar.push(lhs.trim(), rhs.trim().to_string());
    }
    Ok(grammar)
}

pub fn read_grammar(path: &Path) -> Result<Grammar, MorphsegError> {
    read_grammar_from(BufReader::new(File::open(path)?))
}

pub fn write_grammar_to<W: Write>(grammar: &Grammar, mut writer: W) -> Result<(), MorphsegError> {
    for (lhs, alternatives) in grammar.iter() {
        for rhs in alternatives {
            writeln!(writer, "{} --> {}", lhs, rhs)?;
        }
    }
    Ok(())
}

pub fn write_grammar(grammar: &Grammar, path: &Path) -> Result<(), MorphsegError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_grammar_to(grammar, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Seed the character inventory into the grammar (default adaptor-grammar
/// parameters 1 1).
pub fn add_chars_to_grammar(grammar: &mut Grammar, hex_chars: &[String]) {
    for hex_char in hex_chars {
        grammar.push("1 1 Char", hex_char.clone());
    }
}

/// Affix lists read from a linguistic-knowledge file: marker-delimited
/// prefix and suffix sections, one affix per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinguisticKnowledge {
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
}

pub fn read_linguistic_knowledge_from<R: BufRead>(
    reader: R,
) -> Result<LinguisticKnowledge, MorphsegError> {
    let mut knowledge = LinguisticKnowledge::default();
    let mut reading_prefixes = false;
    let mut reading_suffixes = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == LK_PREFIXES {
            reading_prefixes = true;
            reading_suffixes = false;
        } else if line == LK_SUFFIXES {
            reading_prefixes = false;
            reading_suffixes = true;
        } else if line.starts_with("###") {
            // Any other marker ends the affix sections.
            break;
        } else if reading_prefixes {
            knowledge.prefixes.push(line.to_string());
        } else if reading_suffixes {
            knowledge.suffixes.push(line.to_string());
        }
    }

    Ok(knowledge)
}

pub fn read_linguistic_knowledge(path: &Path) -> Result<LinguisticKnowledge, MorphsegError> {
    read_linguistic_knowledge_from(BufReader::new(File::open(path)?))
}

fn seeded_nonterminal(nonterminal: &str, alpha_a: u32, alpha_b: u32) -> String {
    // Non-zero concentration parameters are written in front of the
    // nonterminal the affixes are seeded into.
    if alpha_a == 0 && alpha_b == 0 {
        nonterminal.to_string()
    } else {
        format!("{} {} {}", alpha_a, alpha_b, nonterminal)
    }
}

fn seed_affixes(
    grammar: &mut Grammar,
    affixes: &[String],
    out_nonterminal: &str,
    alpha_a: u32,
    alpha_b: u32,
) {
    let lhs = seeded_nonterminal(out_nonterminal, alpha_a, alpha_b);
    for affix in affixes {
        grammar.push(&lhs, string_to_hex(affix));
    }
}

/// Seed a base grammar with the prefixes and suffixes of a
/// linguistic-knowledge file (scholar seeding).
pub fn scholar_seeded_grammar(
    grammar: &mut Grammar,
    lk_path: &Path,
    out_prefix_nonterminal: &str,
    out_suffix_nonterminal: &str,
    alpha_a: u32,
    alpha_b: u32,
) -> Result<(), MorphsegError> {
    let knowledge = read_linguistic_knowledge(lk_path)?;
    seed_affixes(grammar, &knowledge.prefixes, out_prefix_nonterminal, alpha_a, alpha_b);
    seed_affixes(grammar, &knowledge.suffixes, out_suffix_nonterminal, alpha_a, alpha_b);
    Ok(())
}

/// Seed a base grammar with the `n` most frequent affixes of a previous
/// segmentation output (cascaded seeding).
#[allow(clippy::too_many_arguments)]
pub fn cascaded_grammar(
    grammar: &mut Grammar,
    segmentation_output: &Path,
    n: usize,
    in_prefix_nonterminal: &str,
    in_suffix_nonterminal: &str,
    out_prefix_nonterminal: &str,
    out_suffix_nonterminal: &str,
    alpha_a: u32,
    alpha_b: u32,
) -> Result<(), MorphsegError> {
    let reader = BufReader::new(File::open(segmentation_output)?);
    let top = top_affixes_from(reader, n, in_prefix_nonterminal, in_suffix_nonterminal)?;
    seed_affixes(grammar, &top.prefixes, out_prefix_nonterminal, alpha_a, alpha_b);
    seed_affixes(grammar, &top.suffixes, out_suffix_nonterminal, alpha_a, alpha_b);
    Ok(())
}

static CKY_HEX_TERMINAL: OnceLock<Regex> = OnceLock::new();
static TRAILING_DIGITS: OnceLock<Regex> = OnceLock::new();

fn bump(entries: &mut Vec<(String, u32)>, key: &str) {
    if let Some((_, count)) = entries.iter_mut().find(|(existing, _)| existing == key) {
        *count += 1;
    } else {
        entries.push((key.to_string(), 1));
    }
}

/// Convert an inducer output grammar into a counted rule list parsable by an
/// off-the-shelf CKY parser (used for inductive segmentation).
pub fn generate_cky_grammar_from<R: BufRead>(reader: R) -> Result<Vec<String>, MorphsegError> {
    let hex_re =
        CKY_HEX_TERMINAL.get_or_init(|| Regex::new(r"^([0-9a-f]{4,8})\)*$").unwrap());
    let digits_re = TRAILING_DIGITS.get_or_init(|| Regex::new(r"[0-9]+$").unwrap());

    let mut grammar: Vec<String> = Vec::new();
    let mut rules: Vec<(String, u32)> = Vec::new();
    let mut nonterminal_counts: Vec<(String, u32)> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.contains("-->") {
            // Only the Word expansion of the original rule section survives.
            if line.contains("Word") {
                grammar.push(line.to_string());
            }
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };
        let key = first.replace('(', "").replace('#', "");
        bump(&mut nonterminal_counts, &key);

        let terminal = !tokens[1..].concat().contains('#');
        let mut values: Vec<String> = Vec::new();
        let mut balance: i64 = 0;
        let mut catching = false;

        for token in &tokens[1..] {
            if token.contains('#') && balance == 0 {
                catching = true;
                values.push(token.replace('(', "").replace('#', ""));
            } else if terminal && hex_re.is_match(token) {
                if let Some(ch) = crate::core::utils::hex_to_string(token.trim_end_matches(')')) {
                    values.push(ch);
                }
            } else if *token == "^^^" || *token == "^^^)" || *token == "$$$)" {
                values.push(token.replace(')', ""));
            }
            if catching {
                balance += token.matches('(').count() as i64;
                balance -= token.matches(')').count() as i64;
                if balance == 0 {
                    catching = false;
                }
            }
        }

        if !values.is_empty() {
            bump(&mut rules, &format!("{} --> {}", key, values.join(" ")));
        }
    }

    for (rule, count) in &rules {
        grammar.push(format!("{} {}", count, rule));
    }
    for (nonterminal, count) in &nonterminal_counts {
        let base = digits_re.replace(nonterminal, "");
        grammar.push(format!("{} {} --> {}", count, base, nonterminal));
    }

    Ok(grammar)
}

pub fn generate_cky_grammar(path: &Path) -> Result<Vec<String>, MorphsegError> {
    generate_cky_grammar_from(BufReader::new(File::open(path)?))
}
