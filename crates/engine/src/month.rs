use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// A calendar month in `YYYY-MM` form.
///
/// Envelopes are scoped to one month; incomes are distributed over the
/// envelope set of the month their date falls in. Keeping the value as a
/// validated string means it can be compared and stored without timezone
/// ambiguity.
///
/// # Examples
///
/// ```rust
/// use engine::Month;
///
/// let month: Month = "2025-03".parse().unwrap();
/// assert_eq!(month.as_str(), "2025-03");
/// assert!("2025-13".parse::<Month>().is_err());
/// assert!("march".parse::<Month>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(String);

impl Month {
    /// The month a date falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn year_month(&self) -> (i32, u32) {
        let year = self.0[..4].parse().unwrap_or(1970);
        let month = self.0[5..].parse().unwrap_or(1);
        (year, month)
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        let (year, month) = self.year_month();
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = self.year_month();
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        next.and_then(|d| d.pred_opt()).unwrap_or(NaiveDate::MAX)
    }

    /// The following month.
    #[must_use]
    pub fn next(&self) -> Self {
        let (year, month) = self.year_month();
        if month == 12 {
            Self(format!("{:04}-01", year + 1))
        } else {
            Self(format!("{year:04}-{:02}", month + 1))
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Month {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("invalid month: {s}"));

        let trimmed = s.trim();
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let month_num: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month_num) {
            return Err(invalid());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for Month {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(value: Month) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(Month::from_date(date).as_str(), "2025-03");
    }

    #[test]
    fn day_bounds() {
        let month: Month = "2025-02".parse().unwrap();
        assert_eq!(
            month.first_day(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
        assert_eq!(
            month.last_day(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );

        let december: Month = "2024-12".parse().unwrap();
        assert_eq!(
            december.last_day(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn next_rolls_over_year() {
        let december: Month = "2024-12".parse().unwrap();
        assert_eq!(december.next().as_str(), "2025-01");
        let june: Month = "2025-06".parse().unwrap();
        assert_eq!(june.next().as_str(), "2025-07");
    }

    #[test]
    fn rejects_malformed() {
        assert!("2025".parse::<Month>().is_err());
        assert!("2025-00".parse::<Month>().is_err());
        assert!("2025-13".parse::<Month>().is_err());
        assert!("25-01".parse::<Month>().is_err());
    }
}
