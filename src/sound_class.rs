//! Sound-class table: maps every phonetic symbol to a one-character class
//! code.
//!
//! The table is built once from `(members, name)` rows and then shared
//! read-only by every decode call. Four class names carry special meaning
//! for skeleton encoding; their codes are resolved at build time.

use std::collections::{BTreeSet, HashMap};

use crate::SptError;

pub const LARYNGEALS: &str = "Laryngeals";
pub const VOWELS_AND_FEATURES: &str = "Vowels and features";
pub const GLIDES: &str = "Glides";
pub const LABIAL_GLIDES: &str = "Labial glides";

/// Characters that structure a raw form and are never reported as
/// discarded symbols. The reconstruction marker `*` is not one of them.
pub const MARKERS: &[char] = &[' ', '!', '-', ',', '=', '/', '#', '~'];

/// One row of a class-definition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRow {
    /// Every symbol belonging to the class. The first one is the class code.
    pub members: String,
    pub name: String,
}

impl ClassRow {
    pub fn new(members: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            members: members.into(),
            name: name.into(),
        }
    }
}

/// How the skeleton encoder treats a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRole {
    Laryngeal,
    VowelOrFeature,
    Glide,
    LabialGlide,
    Plain,
}

#[derive(Debug, Clone, Default)]
pub struct SoundClassTable {
    sound_to_class: HashMap<char, char>,
    laryngeal: Option<char>,
    vowel: Option<char>,
    glide: Option<char>,
    labial_glide: Option<char>,
}

impl SoundClassTable {
    /// Build the table from class rows.
    ///
    /// A symbol listed under several classes keeps the last class it was
    /// listed under. Missing special classes only produce a warning on
    /// stderr; decoding still works with reduced fidelity.
    pub fn build(rows: &[ClassRow]) -> Result<Self, SptError> {
        let mut table = SoundClassTable::default();
        for (idx, row) in rows.iter().enumerate() {
            let members = row.members.trim();
            let code = members.chars().next().ok_or_else(|| {
                SptError::table(idx + 1, 0, "class has no member symbols")
            })?;
            match row.name.trim() {
                LARYNGEALS => table.laryngeal = Some(code),
                VOWELS_AND_FEATURES => table.vowel = Some(code),
                GLIDES => table.glide = Some(code),
                LABIAL_GLIDES => table.labial_glide = Some(code),
                _ => {}
            }
            for member in members.chars() {
                table.sound_to_class.insert(member, code);
            }
        }

        for name in table.missing_classes() {
            eprintln!("WARNING: {name} not found, this might lead to incorrect behavior");
        }

        Ok(table)
    }

    /// Class code of `symbol`, if it belongs to any class.
    pub fn class_of(&self, symbol: char) -> Option<char> {
        self.sound_to_class.get(&symbol).copied()
    }

    /// Role of a class code in skeleton encoding.
    pub fn role(&self, code: char) -> ClassRole {
        let code = Some(code);
        if code == self.laryngeal {
            ClassRole::Laryngeal
        } else if code == self.vowel {
            ClassRole::VowelOrFeature
        } else if code == self.glide {
            ClassRole::Glide
        } else if code == self.labial_glide {
            ClassRole::LabialGlide
        } else {
            ClassRole::Plain
        }
    }

    pub fn laryngeal(&self) -> Option<char> {
        self.laryngeal
    }

    pub fn vowel(&self) -> Option<char> {
        self.vowel
    }

    /// Whether `symbol` is part of the configured phonetic alphabet or a
    /// structural marker.
    pub fn is_known(&self, symbol: char) -> bool {
        self.sound_to_class.contains_key(&symbol) || MARKERS.contains(&symbol)
    }

    /// Names of the special classes absent from the table.
    pub fn missing_classes(&self) -> Vec<&'static str> {
        [
            (LARYNGEALS, self.laryngeal),
            (VOWELS_AND_FEATURES, self.vowel),
            (GLIDES, self.glide),
            (LABIAL_GLIDES, self.labial_glide),
        ]
        .into_iter()
        .filter(|(_, code)| code.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// All distinct class codes, sorted.
    pub fn codes(&self) -> BTreeSet<char> {
        self.sound_to_class.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sound_to_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sound_to_class.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small class table used across the crate's unit tests.
    pub(crate) fn sample_table() -> SoundClassTable {
        SoundClassTable::build(&[
            ClassRow::new("Hʔh", LARYNGEALS),
            ClassRow::new("Vaeiou", VOWELS_AND_FEATURES),
            ClassRow::new("jy", GLIDES),
            ClassRow::new("w", LABIAL_GLIDES),
            ClassRow::new("Pbpf", "Labials"),
            ClassRow::new("Tdt", "Dentals"),
            ClassRow::new("Kgkx", "Velars"),
            ClassRow::new("Mm", "Nasal labial"),
            ClassRow::new("Nn", "Nasal dental"),
            ClassRow::new("Rrl", "Liquids"),
            ClassRow::new("Ssz", "Sibilants"),
        ])
        .unwrap()
    }

    #[test]
    fn first_member_is_class_code() {
        let table = sample_table();
        assert_eq!(table.class_of('p'), Some('P'));
        assert_eq!(table.class_of('P'), Some('P'));
        assert_eq!(table.class_of('l'), Some('R'));
        assert_eq!(table.class_of('q'), None);
    }

    #[test]
    fn special_roles_resolved() {
        let table = sample_table();
        assert_eq!(table.role('H'), ClassRole::Laryngeal);
        assert_eq!(table.role('V'), ClassRole::VowelOrFeature);
        assert_eq!(table.role('j'), ClassRole::Glide);
        assert_eq!(table.role('w'), ClassRole::LabialGlide);
        assert_eq!(table.role('T'), ClassRole::Plain);
        assert!(table.missing_classes().is_empty());
    }

    #[test]
    fn missing_classes_are_reported_not_fatal() {
        let table = SoundClassTable::build(&[ClassRow::new("Tdt", "Dentals")]).unwrap();
        assert_eq!(table.missing_classes().len(), 4);
        assert_eq!(table.laryngeal(), None);
        assert_eq!(table.role('T'), ClassRole::Plain);
    }

    #[test]
    fn empty_members_rejected_with_row() {
        let err = SoundClassTable::build(&[
            ClassRow::new("Tdt", "Dentals"),
            ClassRow::new("  ", "Broken"),
        ])
        .unwrap_err();
        assert!(matches!(err, SptError::Table { row: 2, column: 0, .. }));
    }

    #[test]
    fn markers_are_known() {
        let table = sample_table();
        assert!(table.is_known('~'));
        assert!(!table.is_known('*'));
        assert!(table.is_known('a'));
        assert!(!table.is_known('3'));
    }
}
