use std::fs::File;
use std::io::Read;
use std::path::Path;
use csv::ReaderBuilder;
use tracing::debug;

use crate::utils::logging::{self, FileIOType, OperationCategory};

#[derive(Debug)]
pub enum TemperatureProfileError {
    IoError(std::io::Error),
    CsvError(csv::Error),
    InvalidTemperature { line: usize, value: String },
    LengthMismatch { expected: usize, found: usize },
}

impl From<std::io::Error> for TemperatureProfileError {
    fn from(err: std::io::Error) -> Self {
        TemperatureProfileError::IoError(err)
    }
}

impl From<csv::Error> for TemperatureProfileError {
    fn from(err: csv::Error) -> Self {
        TemperatureProfileError::CsvError(err)
    }
}

impl std::fmt::Display for TemperatureProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemperatureProfileError::IoError(e) => write!(f, "IO error: {}", e),
            TemperatureProfileError::CsvError(e) => write!(f, "CSV error: {}", e),
            TemperatureProfileError::InvalidTemperature { line, value } => {
                write!(f, "Invalid temperature '{}' on line {}", value, line)
            }
            TemperatureProfileError::LengthMismatch { expected, found } => write!(
                f,
                "Expected {} lines (plant lifetime x timesteps per year + 1), found {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for TemperatureProfileError {}

/// Reads a reservoir output profile: `time,temperature` rows without a header.
pub fn load_temperature_profile(
    path: impl AsRef<Path>,
    expected_len: usize,
) -> Result<Vec<f64>, TemperatureProfileError> {
    let _timing = logging::start_timing(
        "load_temperature_profile",
        OperationCategory::FileIO { subcategory: FileIOType::ProfileLoad },
    );

    let mut file = File::open(path.as_ref())?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    debug!("Read reservoir profile from {}", path.as_ref().display());
    parse_temperature_profile(&content, expected_len)
}

/// Parses profile content already in memory. Column 0 is a time marker and is ignored.
pub fn parse_temperature_profile(
    content: &str,
    expected_len: usize,
) -> Result<Vec<f64>, TemperatureProfileError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut temperatures = Vec::with_capacity(expected_len);
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let field = record.get(1).unwrap_or("");
        let value = field.parse::<f64>().map_err(|_| TemperatureProfileError::InvalidTemperature {
            line: index + 1,
            value: field.to_string(),
        })?;
        if !value.is_finite() {
            return Err(TemperatureProfileError::InvalidTemperature {
                line: index + 1,
                value: field.to_string(),
            });
        }
        temperatures.push(value);
    }

    if temperatures.len() != expected_len {
        return Err(TemperatureProfileError::LengthMismatch {
            expected: expected_len,
            found: temperatures.len(),
        });
    }
    Ok(temperatures)
}
