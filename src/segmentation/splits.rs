use std::collections::HashSet;

/// Generate every way of inserting `count` split markers into `word`,
/// skipping any placement that would create an empty segment (two adjacent
/// markers). The output is duplicate-free and its order is deterministic:
/// depth-first by insertion position, which is the order the segmenter's
/// first-wins tie-break sees candidates in.
pub fn insert_splits(word: &str, count: usize, marker: char) -> Vec<String> {
    let mut solutions = Vec::new();
    let mut seen = HashSet::new();
    insert_splits_into(word, count, marker, &mut seen, &mut solutions);
    solutions
}

fn insert_splits_into(
    word: &str,
    count: usize,
    marker: char,
    seen: &mut HashSet<String>,
    solutions: &mut Vec<String>,
) {
    if count == 0 {
        if seen.insert(word.to_string()) {
            solutions.push(word.to_string());
        }
        return;
    }

    let adjacent: String = [marker, marker].iter().collect();
    let chars: Vec<char> = word.chars().collect();

    for position in 0..=chars.len() {
        let mut candidate = String::with_capacity(word.len() + marker.len_utf8());
        candidate.extend(&chars[..position]);
        candidate.push(marker);
        candidate.extend(&chars[position..]);

        // Markers at both ends are fine (empty prefix/suffix), empty
        // segments in the middle are not.
        if candidate.contains(&adjacent) {
            continue;
        }
        insert_splits_into(&candidate, count - 1, marker, seen, solutions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_splits_of_cat() {
        let splits = insert_splits("cat", 2, '+');
        assert_eq!(
            splits,
            vec!["+c+at", "+ca+t", "+cat+", "c+a+t", "c+at+", "ca+t+"]
        );
    }

    #[test]
    fn no_adjacent_markers() {
        for count in 1..=3 {
            for split in insert_splits("walks", count, '+') {
                assert!(!split.contains("++"), "empty segment in {:?}", split);
            }
        }
    }

    #[test]
    fn deduplicated() {
        let splits = insert_splits("aaaa", 2, '+');
        let unique: HashSet<&String> = splits.iter().collect();
        assert_eq!(unique.len(), splits.len());
    }

    #[test]
    fn splits_always_reconstruct_the_word() {
        for split in insert_splits("kapılar", 2, '+') {
            assert_eq!(split.replace('+', ""), "kapılar");
            assert_eq!(split.split('+').count(), 3);
        }
    }

    #[test]
    fn zero_splits_is_identity() {
        assert_eq!(insert_splits("cat", 0, '+'), vec!["cat"]);
    }

    #[test]
    fn single_char_word_has_no_two_way_split() {
        // Only "+a+" survives the adjacency rule.
        assert_eq!(insert_splits("a", 2, '+'), vec!["+a+"]);
    }
}
