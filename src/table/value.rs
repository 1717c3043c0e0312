use calamine::Data;
use chrono::{NaiveDateTime, Timelike};
use std::fmt::Display;

/// Field spellings treated as missing data, compared case-insensitively
/// after trimming. Matches the NA sentinels dataframe tools emit when they
/// serialize missing cells to CSV.
const NA_SENTINELS: [&str; 9] = [
    "nan", "-nan", "null", "none", "n/a", "na", "<na>", "#n/a", "#na",
];

/// A single scalar value from a raw-data or mapping table.
///
/// Values keep their source type so the filler can write native number and
/// boolean cells instead of flattening everything to text.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Blank cell or missing field
    #[default]
    Empty,
    /// Textual values
    Text(String),
    /// Numeric values (integers are carried as f64, like spreadsheet cells)
    Number(f64),
    /// Boolean values
    Bool(bool),
    /// Date/time values
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns true for blank cells and for text that trims to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Parses a CSV field into a value: blank fields and NA sentinels become
    /// `Empty`, numeric fields become `Number`, everything else stays text.
    pub(crate) fn from_csv_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() || is_na_sentinel(trimmed) {
            return Value::Empty;
        }
        if let Ok(number) = trimmed.parse::<f64>() {
            if number.is_finite() {
                return Value::Number(number);
            }
        }
        Value::Text(field.to_owned())
    }
}

fn is_na_sentinel(trimmed: &str) -> bool {
    NA_SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

impl From<&Data> for Value {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Value::Empty,
            Data::String(text) => Value::Text(text.clone()),
            Data::Float(number) => Value::Number(*number),
            Data::Int(number) => Value::Number(*number as f64),
            Data::Bool(flag) => Value::Bool(*flag),
            Data::DateTime(stamp) => match stamp.as_datetime() {
                Some(datetime) => Value::DateTime(datetime),
                None => Value::Number(stamp.as_f64()),
            },
            Data::DateTimeIso(text) | Data::DurationIso(text) => Value::Text(text.clone()),
            Data::Error(error) => Value::Text(error.to_string()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(text) => write!(f, "{}", text),
            Value::Number(number) => {
                if number.fract() == 0.0 && number.abs() < 1e15 {
                    write!(f, "{}", *number as i64)
                } else {
                    write!(f, "{}", number)
                }
            }
            Value::Bool(flag) => write!(f, "{}", flag),
            Value::DateTime(datetime) => {
                let time = datetime.time();
                if time.num_seconds_from_midnight() == 0 && time.nanosecond() == 0 {
                    write!(f, "{}", datetime.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}
