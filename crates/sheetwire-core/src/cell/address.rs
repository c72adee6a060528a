//! A1 address translation
//!
//! Column letters use bijective base-26 ("A" = 1 ... "Z" = 26, "AA" = 27). There is
//! no zero digit, so every encoding step decrements before dividing.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert a 1-based column number to its letters (1 = A, 26 = Z, 27 = AA, ...)
///
/// # Examples
/// ```
/// use sheetwire_core::column_number_to_letters;
///
/// assert_eq!(column_number_to_letters(28).unwrap(), "AB");
/// assert!(column_number_to_letters(0).is_err());
/// ```
pub fn column_number_to_letters(n: u32) -> Result<String> {
    if n < 1 {
        return Err(Error::malformed("column number must be >= 1"));
    }

    Ok(encode_column(u64::from(n)))
}

/// Bijective base-26 encoding of a column number that is already known to be >= 1
fn encode_column(mut n: u64) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();

    // only ASCII uppercase bytes were pushed
    letters.into_iter().map(char::from).collect()
}

/// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27, ...)
///
/// Case-insensitive.
pub fn letters_to_column_number(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::malformed("empty column letters"));
    }

    let mut n: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::malformed(format!("invalid column letter '{}'", c)));
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        n = n
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| Error::malformed(format!("column '{}' is too large", letters)))?;
    }

    Ok(n)
}

/// Quote a sheet title for use as an A1 range prefix (`'My Sheet'`)
pub fn a1_sheet_name(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Format a reference, or a `start:end` range when `end` is a different cell
pub fn format_a1_range(start: CellAddress, end: Option<CellAddress>) -> String {
    match end {
        Some(end) if end != start => format!("{}:{}", start, end),
        _ => start.to_a1_string(),
    }
}

/// A cell coordinate (e.g., "B7" is row 6, column 1)
///
/// Both axes are 0-based internally and 1-based in A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address from 0-based indices
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// The input must be exactly one run of letters followed by one run of digits.
    ///
    /// # Examples
    /// ```
    /// use sheetwire_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("B7").unwrap();
    /// assert_eq!(addr.row, 6);
    /// assert_eq!(addr.col, 1);
    ///
    /// assert!(CellAddress::parse("B0").is_err());
    /// assert!(CellAddress::parse("$B$7").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() {
            return Err(Error::malformed(format!("no column letters in '{}'", s)));
        }
        if digits.is_empty() {
            return Err(Error::malformed(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::malformed(format!(
                "expected letters followed by digits in '{}'",
                s
            )));
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::malformed(format!("invalid row number in '{}'", s)))?;
        if row == 0 {
            return Err(Error::malformed(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let col = letters_to_column_number(letters)?;

        Ok(Self {
            row: row - 1,
            col: col - 1,
        })
    }

    /// Column letters of this address ("B" for column 1)
    pub fn a1_column(&self) -> String {
        encode_column(u64::from(self.col) + 1)
    }

    /// 1-based row number of this address
    pub fn a1_row(&self) -> u64 {
        u64::from(self.row) + 1
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", self.a1_column(), self.a1_row())
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An A1 range string, optionally qualified with a sheet name
///
/// Accepts `A1`, `A1:C4`, `'My Sheet'!A1:C4` and `Sheet1!B2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct A1Range {
    /// Sheet title, unquoted
    pub sheet: Option<String>,
    /// First cell
    pub start: CellAddress,
    /// Last cell, if this is a multi-cell range
    pub end: Option<CellAddress>,
}

impl A1Range {
    /// Range covering a single cell
    pub fn single(addr: CellAddress) -> Self {
        Self {
            sheet: None,
            start: addr,
            end: None,
        }
    }

    /// Range spanning two cells
    pub fn spanning(start: CellAddress, end: CellAddress) -> Self {
        Self {
            sheet: None,
            start,
            end: (start != end).then_some(end),
        }
    }

    /// Qualify the range with a sheet title
    pub fn on_sheet<S: Into<String>>(mut self, title: S) -> Self {
        self.sheet = Some(title.into());
        self
    }

    /// Parse an A1 range string
    pub fn parse(s: &str) -> Result<Self> {
        let (sheet, refs) = match s.rfind('!') {
            Some(bang) => (Some(Self::parse_sheet_name(&s[..bang])?), &s[bang + 1..]),
            None => (None, s),
        };

        let (start, end) = match refs.split_once(':') {
            Some((start, end)) => (CellAddress::parse(start)?, Some(CellAddress::parse(end)?)),
            None => (CellAddress::parse(refs)?, None),
        };

        Ok(Self {
            sheet,
            start,
            end: end.filter(|end| *end != start),
        })
    }

    fn parse_sheet_name(raw: &str) -> Result<String> {
        if raw.is_empty() {
            return Err(Error::malformed("empty sheet name"));
        }
        match raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
            Some(quoted) => Ok(quoted.replace("''", "'")),
            None if raw.contains('\'') => {
                Err(Error::malformed(format!("unbalanced quotes in '{}'", raw)))
            }
            None => Ok(raw.to_string()),
        }
    }

    /// Format without the sheet prefix
    pub fn cells_a1(&self) -> String {
        format_a1_range(self.start, self.end)
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            Some(title) => write!(f, "{}!{}", a1_sheet_name(title), self.cells_a1()),
            None => write!(f, "{}", self.cells_a1()),
        }
    }
}

impl FromStr for A1Range {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
