//! Frequency-response tables (`frequency_hz,magnitude_db`).

use crate::{Error, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use synthscope_analysis::FrequencyResponse;

const HEADER: &str = "frequency_hz,magnitude_db";

/// Write a response as CSV with a header row.
pub fn write_response_csv<P: AsRef<Path>>(path: P, response: &FrequencyResponse) -> Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    writeln!(file, "{HEADER}")?;
    for (freq, db) in response.iter() {
        writeln!(file, "{:.6},{:.6}", freq, db)?;
    }
    file.flush()?;

    Ok(())
}

/// Read a response written by [`write_response_csv`].
///
/// The header, blank lines and `#` comments are skipped. Any other line that
/// does not hold two numbers is an error, as is a non-ascending frequency
/// column.
pub fn read_response_csv<P: AsRef<Path>>(path: P) -> Result<FrequencyResponse> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let malformed = |message: String| Error::Response {
        path: path.to_path_buf(),
        message,
    };

    let mut frequencies = Vec::new();
    let mut magnitude_db = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line == HEADER {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [freq, db, ..] => match (freq.parse::<f64>(), db.parse::<f64>()) {
                (Ok(freq), Ok(db)) => {
                    frequencies.push(freq);
                    magnitude_db.push(db);
                }
                _ => return Err(malformed(format!("line {}: not numeric: {line}", number + 1))),
            },
            _ => return Err(malformed(format!("line {}: expected two columns", number + 1))),
        }
    }

    FrequencyResponse::new(frequencies, magnitude_db).map_err(|e| malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_roundtrip() {
        let response =
            FrequencyResponse::new(vec![10.0, 20.5, 40.0], vec![0.0, -3.25, -12.125]).unwrap();
        let file = NamedTempFile::new().unwrap();

        write_response_csv(file.path(), &response).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("frequency_hz,magnitude_db\n"));

        let loaded = read_response_csv(file.path()).unwrap();
        assert_eq!(loaded, response);
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "frequency_hz,magnitude_db\n100,0\n200,loud\n").unwrap();

        let err = read_response_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn test_unordered_frequencies_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "200,0\n100,-3\n").unwrap();
        assert!(matches!(
            read_response_csv(file.path()),
            Err(Error::Response { .. })
        ));
    }
}
