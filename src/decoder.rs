//! Reduction of an orthographic word form to sound-class skeletons.
//!
//! A raw cell such as `*kʷer-(?)~kʷor` goes through annotation stripping,
//! symbol filtering, alternation splitting and stem cleansing before each
//! alternative is encoded. Only the first two skeleton symbols are ever
//! compared, so the encoder keeps edge laryngeals and glides but drops
//! medial vowels.

use serde::Serialize;

use crate::sound_class::{ClassRole, SoundClassTable};

/// Result of decoding one raw form.
///
/// `clean_forms`, `decoded_forms` and `without_brackets` are parallel: entry
/// `i` of each describes alternative `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedSet {
    pub clean_forms: Vec<String>,
    pub decoded_forms: Vec<String>,
    pub broomed_symbols: Vec<char>,
    pub without_brackets: Vec<String>,
}

impl DecodedSet {
    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.decoded_forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoded_forms.is_empty()
    }
}

/// Decode a raw form against the given class table.
pub fn decode_form(classes: &SoundClassTable, raw: &str) -> DecodedSet {
    let stripped = strip_annotations(raw);
    let broomed_symbols: Vec<char> = stripped
        .chars()
        .filter(|&c| !classes.is_known(c))
        .collect();

    let unmarked: String = stripped.chars().filter(|&c| c != '*').collect();
    let without_brackets = split_alternatives(&unmarked);

    let filtered: String = unmarked.chars().filter(|&c| classes.is_known(c)).collect();
    let clean_forms: Vec<String> = split_alternatives(&filtered)
        .iter()
        .map(|alt| cleanse_form(alt))
        .collect();
    let decoded_forms = clean_forms
        .iter()
        .map(|form| encode_skeleton(classes, form))
        .collect();

    DecodedSet {
        clean_forms,
        decoded_forms,
        broomed_symbols,
        without_brackets,
    }
}

/// Remove `{...}` and `(...)` annotations, shortest match first.
///
/// An opening bracket without a matching closer is kept as text.
pub fn strip_annotations(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0usize;
    while i < chars.len() {
        let closer = match chars[i] {
            '{' => Some('}'),
            '(' => Some(')'),
            _ => None,
        };
        if let Some(closer) = closer {
            if let Some(offset) = chars[i + 1..].iter().position(|&c| c == closer) {
                i += offset + 2;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Split on `~` if present, otherwise on `/`, otherwise keep one alternative.
pub fn split_alternatives(form: &str) -> Vec<String> {
    let sep = if form.contains('~') {
        '~'
    } else if form.contains('/') {
        '/'
    } else {
        return vec![form.to_string()];
    };
    form.split(sep).map(str::to_string).collect()
}

/// Keep only the stem of an alternative.
///
/// `=` discards everything accumulated so far, `-` and space end the stem.
pub fn cleanse_form(form: &str) -> String {
    let mut out = String::new();
    for c in form.trim().chars() {
        match c {
            '=' => out.clear(),
            '-' | ' ' => return out.trim().to_string(),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Encode a cleansed alternative as a sound-class skeleton.
///
/// Laryngeals and vowels count only at the word edges and only while fewer
/// than two symbols were emitted. Glides emit their own code word-initially
/// and a laryngeal word-finally under the same limit. Every other class is
/// emitted as is. A one-symbol result is padded with the vowel code.
pub fn encode_skeleton(classes: &SoundClassTable, form: &str) -> String {
    let n = form.chars().count();
    let mut skeleton: Vec<char> = Vec::with_capacity(4);

    for (pos, ch) in form.chars().enumerate() {
        let Some(code) = classes.class_of(ch) else {
            continue;
        };
        let first = pos == 0;
        let last = pos + 1 >= n;
        match classes.role(code) {
            ClassRole::Laryngeal | ClassRole::VowelOrFeature => {
                if skeleton.len() < 2 && (first || last) {
                    skeleton.extend(classes.laryngeal());
                }
            }
            ClassRole::Glide | ClassRole::LabialGlide => {
                if skeleton.len() < 2 {
                    if first {
                        skeleton.push(code);
                    }
                    if last {
                        skeleton.extend(classes.laryngeal());
                    }
                }
            }
            ClassRole::Plain => skeleton.push(code),
        }
    }

    if skeleton.len() == 1 {
        skeleton.extend(classes.vowel());
    }

    skeleton.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound_class::tests::sample_table;

    #[test]
    fn annotations_removed_non_greedy() {
        assert_eq!(strip_annotations("pa(x)ter(y)"), "pater");
        assert_eq!(strip_annotations("{old}mat{?}er"), "mater");
        assert_eq!(strip_annotations("dent(al"), "dent(al");
    }

    #[test]
    fn tilde_wins_over_slash() {
        assert_eq!(split_alternatives("a/b~c"), vec!["a/b", "c"]);
        assert_eq!(split_alternatives("a/b"), vec!["a", "b"]);
        assert_eq!(split_alternatives("ab"), vec!["ab"]);
    }

    #[test]
    fn cleanse_keeps_last_stem() {
        assert_eq!(cleanse_form("pre=stem-suffix"), "stem");
        assert_eq!(cleanse_form(" root word"), "root");
        assert_eq!(cleanse_form("a=b=c"), "c");
        assert_eq!(cleanse_form("-x"), "");
    }

    #[test]
    fn vowels_only_at_edges() {
        let table = sample_table();
        // initial vowel then two consonants
        assert_eq!(encode_skeleton(&table, "ata"), "HT");
        assert_eq!(encode_skeleton(&table, "tat"), "TT");
        assert_eq!(encode_skeleton(&table, "aaa"), "HH");
        assert_eq!(encode_skeleton(&table, "kamen"), "KMN");
    }

    #[test]
    fn glides_at_edges() {
        let table = sample_table();
        assert_eq!(encode_skeleton(&table, "wata"), "wT");
        assert_eq!(encode_skeleton(&table, "taw"), "TH");
        assert_eq!(encode_skeleton(&table, "ajat"), "HT");
    }

    #[test]
    fn single_symbol_padded() {
        let table = sample_table();
        assert_eq!(encode_skeleton(&table, "ta"), "TH");
        assert_eq!(encode_skeleton(&table, "t"), "TV");
        assert_eq!(encode_skeleton(&table, ""), "");
        assert_eq!(encode_skeleton(&table, "#!"), "");
    }

    #[test]
    fn decode_full_pipeline() {
        let table = sample_table();
        let set = decode_form(&table, "*pa(x)ter~mater3");
        assert_eq!(set.clean_forms, vec!["pater", "mater"]);
        assert_eq!(set.decoded_forms, vec!["PTR", "MTR"]);
        assert_eq!(set.broomed_symbols, vec!['*', '3']);
        assert_eq!(set.without_brackets, vec!["pater", "mater3"]);
    }

    #[test]
    fn reconstruction_marker_is_broomed_but_not_decoded() {
        let table = sample_table();
        let set = decode_form(&table, "*pater");
        assert_eq!(set.broomed_symbols, vec!['*']);
        assert_eq!(set.clean_forms, vec!["pater"]);
        assert_eq!(set.decoded_forms, vec!["PTR"]);
        assert_eq!(set.without_brackets, vec!["pater"]);
    }

    #[test]
    fn decode_prefix_and_suffix() {
        let table = sample_table();
        let set = decode_form(&table, "ne=dom-a / dam");
        assert_eq!(set.clean_forms, vec!["dom", "dam"]);
        assert_eq!(set.decoded_forms, vec!["TM", "TM"]);
        assert!(set.broomed_symbols.is_empty());
        assert_eq!(set.len(), 2);
    }
}
