/*! Train/validation/test splitting

Two-stage seeded shuffle split:

1. the articles are shuffled and the first `floor(train * n)` go to the train split,
2. the remainder is shuffled again (with the same seed) and `ceil(test / (validation + test) * r)`
   of those `r` articles go to the test split, the rest to the validation split.

Using the same seed and the same input always gives the same partition.
!*/
use std::fmt;

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Dataset split identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitName {
    Train,
    Validation,
    Test,
}

impl SplitName {
    pub const ALL: [SplitName; 3] = [SplitName::Train, SplitName::Validation, SplitName::Test];

    pub fn name(&self) -> &'static str {
        match self {
            SplitName::Train => "train",
            SplitName::Validation => "validation",
            SplitName::Test => "test",
        }
    }
}

impl fmt::Display for SplitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Proportions of each split. They have to be in `]0, 1[` and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl SplitRatios {
    pub fn new(train: f64, validation: f64, test: f64) -> Result<Self, Error> {
        let ratios = Self {
            train,
            validation,
            test,
        };
        ratios.validate()?;
        Ok(ratios)
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (name, ratio) in [
            ("train", self.train),
            ("validation", self.validation),
            ("test", self.test),
        ] {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(Error::Config(format!(
                    "{} ratio must be in ]0, 1[, got {}",
                    name, ratio
                )));
            }
        }

        let sum = self.train + self.validation + self.test;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(Error::Config(format!(
                "split ratios must sum to 1, got {}",
                sum
            )));
        }
        Ok(())
    }

    /// Share of the test split in what remains after the train split is taken.
    fn test_share(&self) -> f64 {
        self.test / (self.validation + self.test)
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            validation: 0.1,
            test: 0.1,
        }
    }
}

/// Three disjoint partitions of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Splits<T> {
    pub train: Vec<T>,
    pub validation: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Splits<T> {
    pub fn get(&self, split: SplitName) -> &[T] {
        match split {
            SplitName::Train => &self.train,
            SplitName::Validation => &self.validation,
            SplitName::Test => &self.test,
        }
    }

    /// Iterate over splits in train, validation, test order.
    pub fn iter(&self) -> impl Iterator<Item = (SplitName, &[T])> {
        SplitName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shuffle `items` and cut them in two, the first part having `first_len` items.
fn shuffle_split<T>(mut items: Vec<T>, first_len: usize, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
    let second = items.split_off(first_len.min(items.len()));
    (items, second)
}

/// Split `items` into train/validation/test.
///
/// Fails with [Error::InsufficientData] if there is nothing to split
/// or if any of the splits would end up empty.
pub fn split<T>(items: Vec<T>, ratios: &SplitRatios, seed: u64) -> Result<Splits<T>, Error> {
    ratios.validate()?;

    let total = items.len();
    if total == 0 {
        return Err(Error::InsufficientData("no articles to split".to_string()));
    }

    let nb_train = (ratios.train * total as f64).floor() as usize;
    let (train, rest) = shuffle_split(items, nb_train, seed);

    let nb_test = (ratios.test_share() * rest.len() as f64).ceil() as usize;
    let nb_validation = rest.len().saturating_sub(nb_test);
    let (validation, test) = shuffle_split(rest, nb_validation, seed);

    let splits = Splits {
        train,
        validation,
        test,
    };

    if let Some((empty, _)) = splits.iter().find(|(_, items)| items.is_empty()) {
        return Err(Error::InsufficientData(format!(
            "{} articles leave the {} split empty (train: {}, validation: {}, test: {})",
            total,
            empty,
            splits.train.len(),
            splits.validation.len(),
            splits.test.len()
        )));
    }

    info!(
        "Data split as follows: Train: {}, Validation: {}, Test: {}",
        splits.train.len(),
        splits.validation.len(),
        splits.test.len()
    );
    Ok(splits)
}
