use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 1-based (row, column) position in a worksheet.
/// Displays and parses in A1 notation, e.g. `CellRef::new(12, 7)` is `G12`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CellRef {
    row: u32,
    col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    /// The `$G$12` form of this reference.
    pub fn absolute(&self) -> String {
        format!("${}${}", column_letters(self.col), self.row)
    }
}

/// Converts a 1-based column index to its letters: 1 -> `A`, 27 -> `AA`.
pub fn column_letters(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().replace('$', "");
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| anyhow::anyhow!("Cell reference has no row number: {s}"))?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!("Cell reference must start with column letters, got: {s}");
        }

        let col = letters
            .to_ascii_uppercase()
            .bytes()
            .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A' + 1));
        let row = digits
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid row number in {s}: {e}"))?;
        if row == 0 {
            anyhow::bail!("Row numbers start at 1, got: {s}");
        }

        Ok(CellRef::new(row, col))
    }
}

impl Serialize for CellRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CellRef::from_str(&s).map_err(serde::de::Error::custom)
    }
}
