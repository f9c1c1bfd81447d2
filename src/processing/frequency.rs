//! Script frequency statistics.
//!
//! Counts script labels of a split and computes their relative frequencies.
//!
//! Two counting modes are available (see [FrequencyMode]): the default one keeps
//! joined labels such as `"devanagari, roman"` as a single label, tracking script combinations.
//! The marginal one counts each script of a label separately.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::identifiers::SCRIPT_SEPARATOR;
use crate::processing::split::SplitName;

/// How script labels are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyMode {
    /// Each distinct joined label is counted as is.
    #[default]
    Combination,
    /// Each script of a joined label is counted once.
    /// Articles with no detected script are not counted.
    Marginal,
}

impl FromStr for FrequencyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "combination" => Ok(Self::Combination),
            "marginal" => Ok(Self::Marginal),
            other => Err(Error::Config(format!(
                "unknown frequency mode {:?} (expected combination or marginal)",
                other
            ))),
        }
    }
}

/// Label counter. Holds label counts and the total number of counted labels.
#[derive(Debug, Default)]
pub struct ScriptCounter {
    mode: FrequencyMode,
    counts: HashMap<String, u64>,
    total: u64,
}

impl ScriptCounter {
    pub fn new(mode: FrequencyMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Convenience function to add 1 to a label count.
    /// Creates the entry if the label is not counted yet.
    #[inline]
    fn add_in_counts(&mut self, label: &str) {
        self.counts
            .entry(label.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);

        self.total += 1;
    }

    /// Count a (possibly joined) script label.
    pub fn add_label(&mut self, label: &str) {
        match self.mode {
            FrequencyMode::Combination => self.add_in_counts(label),
            FrequencyMode::Marginal => label
                .split(SCRIPT_SEPARATOR)
                .filter(|script| !script.is_empty())
                .for_each(|script| self.add_in_counts(script)),
        }
    }

    /// Compute frequencies.
    ///
    /// Fails with [Error::EmptyInput] if nothing has been counted.
    pub fn frequencies(self) -> Result<ScriptFrequencies, Error> {
        if self.total == 0 {
            return Err(Error::EmptyInput);
        }

        let relative = self
            .counts
            .iter()
            .map(|(label, count)| (label.clone(), *count as f64 / self.total as f64))
            .collect();

        Ok(ScriptFrequencies {
            relative,
            absolute: self.counts,
            total: self.total,
        })
    }
}

/// Relative and absolute frequencies of script labels.
///
/// The default value is an empty table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScriptFrequencies {
    relative: HashMap<String, f64>,
    absolute: HashMap<String, u64>,
    total: u64,
}

/// A serializable row of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: u64,
    pub frequency: f64,
}

impl ScriptFrequencies {
    /// Label -> count / total.
    pub fn relative(&self) -> &HashMap<String, f64> {
        &self.relative
    }

    /// Label -> count.
    pub fn absolute(&self) -> &HashMap<String, u64> {
        &self.absolute
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn into_parts(self) -> (HashMap<String, f64>, HashMap<String, u64>) {
        (self.relative, self.absolute)
    }

    /// Rows sorted by decreasing count, ties broken by label.
    pub fn entries(&self) -> Vec<FrequencyEntry> {
        self.absolute
            .iter()
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .map(|(label, count)| FrequencyEntry {
                label: label.clone(),
                count: *count,
                frequency: self.relative[label],
            })
            .collect()
    }
}

/// One `label: 66.67% : 2` line per label.
impl fmt::Display for ScriptFrequencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            writeln!(
                f,
                "{}: {:.2}% : {}",
                entry.label,
                entry.frequency * 100.0,
                entry.count
            )?;
        }
        Ok(())
    }
}

/// Count script labels in combination mode.
pub fn calculate_script_frequencies<I, S>(labels: I) -> Result<ScriptFrequencies, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    calculate_script_frequencies_with(labels, FrequencyMode::Combination)
}

/// Count script labels using the provided [FrequencyMode].
pub fn calculate_script_frequencies_with<I, S>(
    labels: I,
    mode: FrequencyMode,
) -> Result<ScriptFrequencies, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counter = ScriptCounter::new(mode);
    for label in labels {
        counter.add_label(label.as_ref());
    }
    counter.frequencies()
}

#[derive(Serialize)]
struct CsvRow<'a> {
    split: &'a str,
    label: &'a str,
    count: u64,
    frequency: f64,
}

/// Write the frequency tables of every split in a single csv located at `dst`.
pub fn write_csv(dst: &Path, reports: &[(SplitName, ScriptFrequencies)]) -> Result<(), Error> {
    let mut out = csv::WriterBuilder::new().from_path(dst)?;

    for (split, frequencies) in reports {
        for entry in frequencies.entries() {
            out.serialize(CsvRow {
                split: split.name(),
                label: &entry.label,
                count: entry.count,
                frequency: entry.frequency,
            })?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_frequencies() {
        let freqs = calculate_script_frequencies(["roman", "roman", "devanagari"]).unwrap();

        assert_eq!(freqs.absolute()["roman"], 2);
        assert_eq!(freqs.absolute()["devanagari"], 1);
        assert!((freqs.relative()["roman"] - 2.0 / 3.0).abs() < f64::EPSILON);
        assert!((freqs.relative()["devanagari"] - 1.0 / 3.0).abs() < f64::EPSILON);

        let sum: f64 = freqs.relative().values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(freqs.total(), 3);
    }

    #[test]
    fn empty() {
        let labels: Vec<String> = Vec::new();
        assert!(matches!(
            calculate_script_frequencies(labels),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn combination_labels_are_atomic() {
        let labels = ["devanagari, roman", "devanagari", "roman", "devanagari, roman"];
        let freqs = calculate_script_frequencies(labels).unwrap();

        assert_eq!(freqs.absolute().len(), 3);
        assert_eq!(freqs.absolute()["devanagari, roman"], 2);
        assert_eq!(freqs.absolute()["devanagari"], 1);
    }

    #[test]
    fn empty_label_is_a_label() {
        let freqs = calculate_script_frequencies(["", "roman"]).unwrap();
        assert_eq!(freqs.absolute()[""], 1);
        assert_eq!(freqs.total(), 2);
    }

    #[test]
    fn marginal() {
        let labels = ["devanagari, roman", "devanagari", "", "kannada, roman"];
        let freqs = calculate_script_frequencies_with(labels, FrequencyMode::Marginal).unwrap();

        assert_eq!(freqs.total(), 5);
        assert_eq!(freqs.absolute()["devanagari"], 2);
        assert_eq!(freqs.absolute()["roman"], 2);
        assert_eq!(freqs.absolute()["kannada"], 1);
        assert!(!freqs.absolute().contains_key(""));

        let sum: f64 = freqs.relative().values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn marginal_without_scripts() {
        assert!(matches!(
            calculate_script_frequencies_with(["", ""], FrequencyMode::Marginal),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn entries_order_and_display() {
        let freqs = calculate_script_frequencies(["roman", "devanagari", "roman", "kannada"]).unwrap();
        let labels: Vec<_> = freqs.entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["roman", "devanagari", "kannada"]);

        assert_eq!(
            freqs.to_string(),
            "roman: 50.00% : 2\ndevanagari: 25.00% : 1\nkannada: 25.00% : 1\n"
        );
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(
            "marginal".parse::<FrequencyMode>().unwrap(),
            FrequencyMode::Marginal
        );
        assert_eq!(FrequencyMode::default(), FrequencyMode::Combination);
        assert!("both".parse::<FrequencyMode>().is_err());
    }

    #[test]
    fn csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("frequencies.csv");
        let train = calculate_script_frequencies(["roman", "roman", "devanagari"]).unwrap();
        let test = calculate_script_frequencies(["kannada"]).unwrap();

        write_csv(&dst, &[(SplitName::Train, train), (SplitName::Test, test)]).unwrap();

        let content = std::fs::read_to_string(&dst).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "split,label,count,frequency");
        assert!(lines[1].starts_with("train,roman,2,0.66"));
        assert_eq!(lines[3], "test,kannada,1,1.0");
        assert_eq!(lines.len(), 4);
    }
}
