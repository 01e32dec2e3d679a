//! Preparation of the grammar inducer's input: word lists and their
//! hex-encoded form.

use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::core::{utils::string_to_hex, MorphsegError};

/// Unique words of a corpus together with their encoded forms and the
/// character inventory, everything sorted for reproducible inducer runs.
#[derive(Debug, Clone, Default)]
pub struct WordInventory {
    pub words: BTreeSet<String>,
    pub encoded_words: BTreeSet<String>,
    pub hex_chars: Vec<String>,
}

/// Read a word list, one word per line; `#` and `//` start comment lines.
pub fn process_words_from<R: BufRead>(reader: R) -> Result<WordInventory, MorphsegError> {
    let mut inventory = WordInventory::default();
    let mut hex_chars: BTreeSet<String> = BTreeSet::new();

    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if word.is_empty() || word.starts_with('#') || word.starts_with("//") {
            continue;
        }

        let encoded = string_to_hex(word);
        for hex_char in encoded.split_whitespace() {
            hex_chars.insert(hex_char.to_string());
        }
        inventory.words.insert(word.to_string());
        inventory.encoded_words.insert(encoded);
    }

    inventory.hex_chars = hex_chars.into_iter().collect();
    Ok(inventory)
}

pub fn process_words(path: &Path) -> Result<WordInventory, MorphsegError> {
    process_words_from(BufReader::new(File::open(path)?))
}

/// Write encoded words in the inducer's corpus format, one word per line
/// flanked by the `^^^`/`$$$` boundary markers.
pub fn write_encoded_words_to<'a, W, I>(words: I, mut writer: W) -> Result<(), MorphsegError>
where
    W: Write,
    I: IntoIterator<Item = &'a String>,
{
    for word in words {
        writeln!(writer, "^^^ {} $$$", word)?;
    }
    Ok(())
}

pub fn write_encoded_words<'a, I>(words: I, path: &Path) -> Result<(), MorphsegError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_encoded_words_to(words, &mut writer)?;
    writer.flush()?;
    Ok(())
}
