use std::sync::OnceLock;

use regex::Regex;

use super::models::Language;

/// Lowercase `text` with the language-specific rules applied first.
/// Turkish distinguishes dotted and dotless I, which plain Unicode
/// lowercasing gets wrong ('I' must become 'ı', 'İ' must become 'i').
pub fn to_lower_case(text: &str, language: Language) -> String {
    let text = match language {
        Language::Turkish => text.replace('I', "ı").replace('İ', "i"),
        Language::Generic => text.to_string(),
    };
    text.to_lowercase()
}

/// Uppercase `text` with the language-specific rules applied first.
pub fn to_upper_case(text: &str, language: Language) -> String {
    let text = match language {
        Language::Turkish => text.replace('ı', "I").replace('i', "İ"),
        Language::Generic => text.to_string(),
    };
    text.to_uppercase()
}

/// Encode a string the way the grammar inducer expects its input characters:
/// each character as the hex dump of its UTF-16 encoding (BOM included),
/// space-joined.
pub fn string_to_hex(text: &str) -> String {
    let mut hex_chars = Vec::new();
    let mut units = [0u16; 2];
    for ch in text.chars() {
        let mut hex = String::from("fffe");
        for unit in ch.encode_utf16(&mut units).iter() {
            hex.push_str(&format!("{:02x}{:02x}", unit & 0xff, unit >> 8));
        }
        hex_chars.push(hex);
    }
    hex_chars.join(" ")
}

/// Decode one hex-encoded terminal back into text. The bytes are UTF-16 code
/// units, little endian unless a BOM says otherwise; a spurious leading NUL
/// unit is dropped. Returns `None` for anything that does not decode cleanly,
/// which callers treat as "not a terminal".
pub fn hex_to_string(hex: &str) -> Option<String> {
    if hex.len() % 2 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        bytes.push(u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?);
    }

    let (little_endian, start) = match (bytes.first(), bytes.get(1)) {
        (Some(0xff), Some(0xfe)) => (true, 2),
        (Some(0xfe), Some(0xff)) => (false, 2),
        _ => (true, 0),
    };
    if (bytes.len() - start) % 2 != 0 {
        return None;
    }

    let units: Vec<u16> = bytes[start..]
        .chunks(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    let decoded: String = char::decode_utf16(units).collect::<Result<String, _>>().ok()?;
    if decoded.starts_with('\0') {
        decoded.chars().nth(1).map(|ch| ch.to_string())
    } else {
        Some(decoded)
    }
}

static SENTENCE_END: OnceLock<Regex> = OnceLock::new();

/// Heuristic sentence-boundary detection: a token starts a new sentence when
/// there is no previous token or the previous one is terminal punctuation
/// (covering the scripts the segmenter is used on).
pub fn is_new_sentence(previous_word: Option<&str>) -> bool {
    let Some(previous) = previous_word else {
        return true;
    };
    let re = SENTENCE_END.get_or_init(|| {
        Regex::new("^[\"“”'‘’`′՛·.ㆍ•?？!؟。፨።፧—‥…]+$").unwrap()
    });
    previous.is_empty() || re.is_match(previous)
}

static WHITESPACE: OnceLock<Regex> = OnceLock::new();

/// Collapse any run of whitespace to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    re.replace_all(text, " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_encoding_round_trips() {
        assert_eq!(string_to_hex("b"), "fffe6200");
        assert_eq!(hex_to_string("fffe6200").as_deref(), Some("b"));

        for word in ["becomes", "kapı", "çiçek"] {
            for hex in string_to_hex(word).split_whitespace() {
                assert!(hex_to_string(hex).is_some());
            }
            let decoded: String = string_to_hex(word)
                .split_whitespace()
                .map(|hex| hex_to_string(hex).unwrap())
                .collect();
            assert_eq!(decoded, word);
        }
    }

    #[test]
    fn hex_decoding_without_bom() {
        // Little endian is the default when no BOM is present.
        assert_eq!(hex_to_string("6200").as_deref(), Some("b"));
    }

    #[test]
    fn hex_decoding_rejects_garbage() {
        assert_eq!(hex_to_string("xyz"), None);
        assert_eq!(hex_to_string("620"), None);
    }

    #[test]
    fn leading_nul_is_dropped() {
        // 0000 6200 little endian decodes to NUL + 'b'; only 'b' survives.
        assert_eq!(hex_to_string("00006200").as_deref(), Some("b"));
    }

    #[test]
    fn turkish_casing() {
        assert_eq!(to_lower_case("İstanbul", Language::Turkish), "istanbul");
        assert_eq!(to_lower_case("KAPI", Language::Turkish), "kapı");
        assert_eq!(to_upper_case("istanbul", Language::Turkish), "İSTANBUL");
        assert_eq!(to_upper_case("kapı", Language::Turkish), "KAPI");

        // Plain folding does not know the dotless rule.
        assert_eq!(to_lower_case("KAPI", Language::Generic), "kapi");
    }

    #[test]
    fn sentence_boundaries() {
        assert!(is_new_sentence(None));
        assert!(is_new_sentence(Some(".")));
        assert!(is_new_sentence(Some("?!")));
        assert!(is_new_sentence(Some("。")));
        assert!(!is_new_sentence(Some("word")));
        assert!(!is_new_sentence(Some("word.")));
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(collapse_whitespace("a  b\t c"), "a b c");
    }
}
