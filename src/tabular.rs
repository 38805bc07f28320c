//! Tables of text cells and their interpretation.
//!
//! The core never reads files itself: [`Table`] values come from
//! [`read_csv`] or from any other reader, and are turned into class rows,
//! wordlists, weights or a calibration reference sample here. Row numbers
//! in errors are 1-based, as a spreadsheet shows them.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::decoder::decode_form;
use crate::sound_class::{ClassRow, SoundClassTable};
use crate::weights::WeightTable;
use crate::word::{Word, WordList};
use crate::SptError;

const ID_COL: usize = 0;
const GLOSS_COL: usize = 1;
const GROUPS_START_COL: usize = 2;
const WEIGHT_COL: usize = 2;
const REFERENCE_COL: usize = 1;

/// Rows of trimmed text cells. Rows may differ in width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Cell text, empty when the row is shorter.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: AsRef<str>> From<&[&[S]]> for Table {
    fn from(rows: &[&[S]]) -> Self {
        Table::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.as_ref().trim().to_string()).collect())
                .collect(),
        )
    }
}

/// Read a CSV file without treating any row as a header.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table, SptError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(Table::new(rows))
}

/// Interpret every row as `(members, name, …)`.
pub fn class_rows(table: &Table) -> Result<Vec<ClassRow>, SptError> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            if row.len() < 2 {
                let message = "row has less than 2 cells";
                return Err(SptError::table(idx + 1, row.len(), message));
            }
            Ok(ClassRow::new(row[0].clone(), row[1].clone()))
        })
        .collect()
}

/// Build a sound-class table straight from a class-definition table.
pub fn sound_classes(table: &Table) -> Result<SoundClassTable, SptError> {
    SoundClassTable::build(&class_rows(table)?)
}

/// Interpret a weight table: header row, then `(id, …, weight)` rows.
pub fn weight_table(table: &Table) -> Result<WeightTable, SptError> {
    let mut pairs = Vec::with_capacity(table.len().saturating_sub(1));
    for (idx, row) in table.rows.iter().enumerate().skip(1) {
        if row.len() <= WEIGHT_COL {
            let message = "row has less than 3 cells";
            return Err(SptError::table(idx + 1, row.len(), message));
        }
        let id = parse_id(&row[ID_COL], idx + 1)?;
        let cell = &row[WEIGHT_COL];
        let weight: f64 = cell.parse().map_err(|_| {
            let message = format!("weight '{cell}' is not a number");
            SptError::table(idx + 1, WEIGHT_COL, message)
        })?;
        pairs.push((id, weight));
    }
    WeightTable::from_pairs(pairs)
}

/// Interpret a calibration reference table: header row, value in column 1.
pub fn reference_sample(table: &Table) -> Result<Vec<f64>, SptError> {
    table
        .rows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, _)| {
            let cell = table.cell(idx, REFERENCE_COL);
            cell.parse().map_err(|_| {
                SptError::table(idx + 1, REFERENCE_COL, format!("'{cell}' is not a number"))
            })
        })
        .collect()
}

/// A language-group column of a wordlist table.
struct GroupColumn {
    column: usize,
    name: String,
}

/// Decode a wordlist table into one list per group.
///
/// `selected` restricts decoding to the named groups; `None` selects all.
/// Lists come out in header order; groups without any slot are dropped.
pub fn wordlists(
    table: &Table,
    classes: &SoundClassTable,
    selected: Option<&[String]>,
) -> Result<Vec<WordList>, SptError> {
    if table.len() < 2 {
        return Err(SptError::Malformed(
            "wordlist table needs a header row and at least one body row".into(),
        ));
    }

    let header = &table.rows[0];
    let end = header
        .iter()
        .rposition(|name| !name.is_empty())
        .map_or(GROUPS_START_COL, |last| (last + 1).max(GROUPS_START_COL));

    let mut columns = Vec::new();
    for column in GROUPS_START_COL..end {
        let name = &header[column];
        if name.is_empty() || name.ends_with("NUM") {
            continue;
        }
        if selected.map_or(true, |s| s.iter().any(|g| g == name)) {
            columns.push(GroupColumn {
                column,
                name: name.clone(),
            });
        }
    }

    let mut lists: Vec<WordList> = columns
        .iter()
        .map(|g| WordList::new(g.name.clone(), Vec::new()))
        .collect();
    let by_column: HashMap<usize, usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, g)| (g.column, idx))
        .collect();

    let mut last_id: Option<u32> = None;
    for idx in 1..table.len() {
        let row_no = idx + 1;
        let id_cell = table.cell(idx, ID_COL);
        if id_cell.starts_with('0') {
            continue;
        }
        let id = parse_id(id_cell, row_no)?;
        if let Some(last) = last_id {
            if id < last {
                return Err(SptError::table(
                    row_no,
                    ID_COL,
                    format!("Swadesh ID {id} follows {last}; IDs must not decrease"),
                ));
            }
        }
        let new_slot = last_id != Some(id);
        let gloss = clean_gloss(table.cell(idx, GLOSS_COL));

        let mut column = GROUPS_START_COL;
        while column < end {
            let Some(&list_idx) = by_column.get(&column) else {
                column += 1;
                continue;
            };

            // A group column may be followed by its cognitive-index column.
            let mut consumed = 1;
            let mut ignore_form = false;
            if column + 1 < end {
                if let Ok(index) = table.cell(idx, column + 1).parse::<i64>() {
                    consumed = 2;
                    ignore_form = index < 0;
                }
            }

            let list = &mut lists[list_idx];
            if new_slot {
                let word = Word::new(id, gloss.clone(), list.group.clone());
                list.words.push(word);
            }

            let form = table.cell(idx, column);
            if !form.is_empty() && !ignore_form {
                let decoded = decode_form(classes, form);
                if let Some(word) = list.words.last_mut() {
                    word.push_form(form, decoded);
                }
            }
            column += consumed;
        }

        last_id = Some(id);
    }

    lists.retain(|l| !l.is_empty());
    Ok(lists)
}

fn parse_id(cell: &str, row_no: usize) -> Result<u32, SptError> {
    cell.parse().map_err(|_| {
        let message = format!("Swadesh ID '{cell}' is not an integer");
        SptError::table(row_no, ID_COL, message)
    })
}

/// Drop digits and a bracketed `[...]` span from a gloss.
fn clean_gloss(gloss: &str) -> String {
    let without_brackets = match (gloss.find('['), gloss.rfind(']')) {
        (Some(open), Some(close)) if open < close => {
            format!("{}{}", &gloss[..open], &gloss[close + 1..])
        }
        _ => gloss.to_string(),
    };
    without_brackets
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}
