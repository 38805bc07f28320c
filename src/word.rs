//! Per-slot word records, per-group wordlists and the match rule.

use std::fmt::Write as _;

use serde::Serialize;

use crate::decoder::DecodedSet;
use crate::weights::WeightTable;

/// One Swadesh slot within one language group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Word {
    pub swadesh_id: u32,
    pub gloss: String,
    pub group: String,
    /// Raw cells as they appeared in the table.
    pub forms: Vec<String>,
    pub clean_forms: Vec<String>,
    pub decoded_forms: Vec<String>,
    pub broomed_symbols: Vec<char>,
    pub without_brackets: Vec<String>,
}

impl Word {
    pub fn new(swadesh_id: u32, gloss: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            swadesh_id,
            gloss: gloss.into(),
            group: group.into(),
            ..Self::default()
        }
    }

    /// Append one decoded cell to this slot.
    pub fn push_form(&mut self, raw: &str, decoded: DecodedSet) {
        self.forms.push(raw.to_string());
        self.clean_forms.extend(decoded.clean_forms);
        self.decoded_forms.extend(decoded.decoded_forms);
        self.broomed_symbols.extend(decoded.broomed_symbols);
        self.without_brackets.extend(decoded.without_brackets);
    }

    /// Compare two slots and describe the first matching alternative pair.
    ///
    /// Alternatives are scanned with `self` outer and `other` inner. An empty
    /// skeleton in either word vetoes the whole slot, whatever the other
    /// alternatives hold.
    pub fn compare(&self, other: &Word) -> Option<String> {
        if self.decoded_forms.is_empty() || other.decoded_forms.is_empty() {
            return None;
        }
        let has_empty = |w: &Word| w.decoded_forms.iter().any(String::is_empty);
        if has_empty(self) || has_empty(other) {
            return None;
        }
        for (idx1, form1) in self.decoded_forms.iter().enumerate() {
            for (idx2, form2) in other.decoded_forms.iter().enumerate() {
                if skeletons_match(form1, form2) {
                    return Some(format!(
                        "{} {}: {} - {}",
                        self.swadesh_id,
                        self.gloss,
                        clean_or_empty(&self.clean_forms, idx1),
                        clean_or_empty(&other.clean_forms, idx2),
                    ));
                }
            }
        }
        None
    }

    /// Merge `other`'s alternatives after this word's.
    fn absorb(&mut self, other: &Word) {
        self.group = format!("{}, {}", self.group, other.group);
        self.forms.extend_from_slice(&other.forms);
        self.clean_forms.extend_from_slice(&other.clean_forms);
        self.decoded_forms.extend_from_slice(&other.decoded_forms);
        self.broomed_symbols.extend_from_slice(&other.broomed_symbols);
        self.without_brackets.extend_from_slice(&other.without_brackets);
    }

    /// Human readable decoding trace for this slot.
    pub fn transformations(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.gloss, self.group);
        let _ = writeln!(out, "Seen as: {}", self.forms.join("; "));
        out.push_str("[Transformed]\n");
        for (idx, decoded) in self.decoded_forms.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}\t-->\t{} (Total {} symbols)",
                clean_or_empty(&self.clean_forms, idx),
                decoded,
                decoded.chars().count()
            );
        }
        if !self.broomed_symbols.is_empty() {
            let broomed: Vec<String> = self
                .broomed_symbols
                .iter()
                .map(|c| c.to_string())
                .collect();
            let _ = writeln!(out, "[Broomed symbols] {}", broomed.join(" "));
        }
        out
    }
}

fn clean_or_empty(forms: &[String], idx: usize) -> &str {
    forms.get(idx).map(String::as_str).unwrap_or("")
}

/// Match rule on two skeletons.
///
/// Skeletons of two or more symbols match on their first two symbols.
/// If either is shorter, they must be identical.
pub fn skeletons_match(a: &str, b: &str) -> bool {
    let mut ca = a.chars();
    let mut cb = b.chars();
    match (ca.next(), ca.next(), cb.next(), cb.next()) {
        (Some(a0), Some(a1), Some(b0), Some(b1)) => a0 == b0 && a1 == b1,
        _ => a == b,
    }
}

/// Outcome of comparing two index-aligned wordlists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Sum of the weights of matched slots.
    pub cost: f64,
    /// One description per matched slot, in list order.
    pub matches: Vec<String>,
}

impl Comparison {
    pub fn count(&self) -> usize {
        self.matches.len()
    }
}

/// Words of one group, ascending by Swadesh ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordList {
    pub group: String,
    pub words: Vec<Word>,
}

impl WordList {
    pub fn new(group: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            group: group.into(),
            words,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Compare index-aligned slots. Lengths and IDs are the caller's
    /// responsibility; surplus entries of the longer list are ignored.
    pub fn compare(&self, other: &WordList, weights: &WeightTable) -> Comparison {
        let mut out = Comparison::default();
        for (word1, word2) in self.words.iter().zip(&other.words) {
            if let Some(desc) = word1.compare(word2) {
                out.cost += weights.get(word2.swadesh_id);
                out.matches.push(desc);
            }
        }
        out
    }

    /// Compare against `other` with this list re-ordered by `order`:
    /// position `i` pairs `self.words[order[i]]` with `other.words[i]`.
    ///
    /// Weights follow the slot of the fixed list.
    pub fn compare_reordered(
        &self,
        order: &[usize],
        other: &WordList,
        weights: &WeightTable,
    ) -> Comparison {
        let mut out = Comparison::default();
        for (&src, word2) in order.iter().zip(&other.words) {
            if let Some(desc) = self.words[src].compare(word2) {
                out.cost += weights.get(word2.swadesh_id);
                out.matches.push(desc);
            }
        }
        out
    }

    /// Ascending-ID merge join of two lists.
    ///
    /// Slots present in one list only are copied through. Slots present in
    /// both become one word whose alternatives are `self`'s followed by
    /// `other`'s.
    pub fn combine(&self, other: &WordList) -> WordList {
        let mut merged = Vec::with_capacity(self.len().max(other.len()));
        let (mut i, mut j) = (0usize, 0usize);
        while i < self.words.len() && j < other.words.len() {
            let (w1, w2) = (&self.words[i], &other.words[j]);
            if w1.swadesh_id < w2.swadesh_id {
                merged.push(w1.clone());
                i += 1;
            } else if w1.swadesh_id > w2.swadesh_id {
                merged.push(w2.clone());
                j += 1;
            } else {
                let mut word = w1.clone();
                word.absorb(w2);
                merged.push(word);
                i += 1;
                j += 1;
            }
        }
        merged.extend_from_slice(&self.words[i..]);
        merged.extend_from_slice(&other.words[j..]);

        WordList {
            group: format!("{}, {}", self.group, other.group),
            words: merged,
        }
    }

    /// Decoding traces for every word in the list.
    pub fn transformations(&self) -> String {
        self.words
            .iter()
            .map(|w| w.transformations())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fold several lists into one composite with [`WordList::combine`].
pub fn combine_all(lists: &[WordList]) -> Option<WordList> {
    let (first, rest) = lists.split_first()?;
    Some(rest.iter().fold(first.clone(), |acc, l| acc.combine(l)))
}
