use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fmt;
use std::str::FromStr;

/// Three 1-based band indices mapped onto the red, green and blue channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandSelection([usize; 3]);

#[derive(Debug, PartialEq, Eq)]
pub enum BandSelectionError {
    Count(usize),
    Zero,
    NotAnInteger(String),
}

impl fmt::Display for BandSelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandSelectionError::Count(n) => {
                write!(f, "expected exactly 3 band indices, found {}", n)
            }
            BandSelectionError::Zero => write!(f, "band indices are 1-based, 0 is not allowed"),
            BandSelectionError::NotAnInteger(s) => {
                write!(f, "could not convert band index '{}' to an integer", s)
            }
        }
    }
}

impl std::error::Error for BandSelectionError {}

impl BandSelection {
    pub fn new(indices: &[usize]) -> Result<Self, BandSelectionError> {
        let indices: [usize; 3] = indices
            .try_into()
            .map_err(|_| BandSelectionError::Count(indices.len()))?;

        if indices.contains(&0) {
            return Err(BandSelectionError::Zero);
        }

        Ok(BandSelection(indices))
    }

    pub fn indices(&self) -> [usize; 3] {
        self.0
    }
}

impl FromStr for BandSelection {
    type Err = BandSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<usize>()
                    .map_err(|_| BandSelectionError::NotAnInteger(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        BandSelection::new(&indices)
    }
}

impl<'de> Deserialize<'de> for BandSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let indices = Vec::<usize>::deserialize(deserializer)?;
        BandSelection::new(&indices).map_err(D::Error::custom)
    }
}

impl fmt::Display for BandSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{},{},{}", r, g, b)
    }
}
