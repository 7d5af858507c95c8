//! Plain-text trajectory files.
//!
//! Each point of a trajectory becomes one line: its inputs followed by its
//! objective values, every number written with two decimal places and
//! separated by a single space.
//!
//! ```text
//! 1.30 0.70 -495.81 -141.04
//! ```
//!
//! One file is written per run, named `trajectory{run_id}.csv`.

use std::{
    fs::File,
    io::{self, BufRead, BufWriter, Write},
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use descent_core::Point;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when saving or reading a trajectory.
#[derive(Debug, Error)]
pub enum Error {
    #[error("trajectory I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: cannot parse {field:?}: {source}")]
    Parse {
        line: usize,
        field: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("line {line}: expected more than {n_vars} columns, found {found}")]
    Columns {
        line: usize,
        n_vars: usize,
        found: usize,
    },
}

/// One parsed trajectory line.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub inputs: Vec<f64>,
    pub objectives: Vec<f64>,
}

/// Writes the row for a single point, including the trailing newline.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_point<W: Write>(writer: &mut W, point: &Point) -> io::Result<()> {
    let mut fields = point.inputs().iter().chain(point.objective_values());

    if let Some(first) = fields.next() {
        write!(writer, "{first:.2}")?;
    }
    for value in fields {
        write!(writer, " {value:.2}")?;
    }
    writeln!(writer)
}

/// Writes every point of `trajectory`, one line each.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_trajectory<W: Write>(mut writer: W, trajectory: &[Point]) -> io::Result<()> {
    for point in trajectory {
        write_point(&mut writer, point)?;
    }
    writer.flush()
}

/// Returns the file name used for run `run_id`.
#[must_use]
pub fn file_name(run_id: usize) -> String {
    format!("trajectory{run_id}.csv")
}

/// Saves `trajectory` to `dir/trajectory{run_id}.csv` and returns the path.
///
/// An existing file with the same name is overwritten.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn save_trajectory(
    dir: impl AsRef<Path>,
    run_id: usize,
    trajectory: &[Point],
) -> Result<PathBuf, Error> {
    let path = dir.as_ref().join(file_name(run_id));
    let file = File::create(&path)?;
    write_trajectory(BufWriter::new(file), trajectory)?;

    debug!(path = %path.display(), points = trajectory.len(), "saved trajectory");
    Ok(path)
}

/// Reads trajectory rows written by [`write_trajectory`].
///
/// The first `n_vars` columns of each line are inputs and the rest are
/// objective values. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if reading fails, a field is not a number, or a line has
/// no objective columns.
pub fn read_trajectory<R: BufRead>(reader: R, n_vars: usize) -> Result<Vec<Row>, Error> {
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut values = line
            .split_whitespace()
            .map(|field| {
                field.parse::<f64>().map_err(|source| Error::Parse {
                    line: index + 1,
                    field: field.to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() <= n_vars {
            return Err(Error::Columns {
                line: index + 1,
                n_vars,
                found: values.len(),
            });
        }

        let objectives = values.split_off(n_vars);
        rows.push(Row {
            inputs: values,
            objectives,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{fs, io::Cursor};

    use approx::assert_relative_eq;
    use descent_core::catalog;

    fn sample() -> Vec<Point> {
        let problem = catalog::polynomial_pair();
        [[1.3, 0.7], [-3.0, 3.0], [0.018_52, -0.537_04]]
            .into_iter()
            .map(|x| problem.evaluate(x.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn writes_two_decimal_space_delimited_rows() {
        let problem = catalog::polynomial_pair();
        let point = problem.evaluate(vec![1.0, -1.0]).unwrap();

        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, &[point]).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "1.00 -1.00 -492.00 -138.00\n"
        );
    }

    #[test]
    fn round_trips_to_two_decimals() {
        let trajectory = sample();

        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, &trajectory).unwrap();
        let rows = read_trajectory(Cursor::new(buffer), 2).unwrap();

        assert_eq!(rows.len(), trajectory.len());
        for (row, point) in rows.iter().zip(&trajectory) {
            for (parsed, value) in row.inputs.iter().zip(point.inputs()) {
                assert_relative_eq!(*parsed, *value, epsilon = 0.005 + 1e-9);
            }
            for (parsed, value) in row.objectives.iter().zip(point.objective_values()) {
                assert_relative_eq!(*parsed, *value, epsilon = 0.005 + 1e-9);
            }
            assert_eq!(row.inputs.len(), 2);
            assert_eq!(row.objectives.len(), 2);
        }
    }

    #[test]
    fn saves_one_file_per_run() {
        let dir = std::env::temp_dir().join(format!("descent-trajectory-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let trajectory = sample();

        let first = save_trajectory(&dir, 1, &trajectory).unwrap();
        let second = save_trajectory(&dir, 2, &trajectory[..1]).unwrap();

        assert_eq!(first.file_name().unwrap(), "trajectory1.csv");
        assert_eq!(second.file_name().unwrap(), "trajectory2.csv");

        let contents = fs::read_to_string(&first).unwrap();
        assert_eq!(contents.lines().count(), 3);
        let contents = fs::read_to_string(&second).unwrap();
        assert_eq!(contents.lines().count(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn skips_blank_lines() {
        let rows = read_trajectory(Cursor::new("1.00 2.00 3.00\n\n4.00 5.00 6.00\n"), 2).unwrap();

        assert_eq!(
            rows,
            vec![
                Row {
                    inputs: vec![1.0, 2.0],
                    objectives: vec![3.0],
                },
                Row {
                    inputs: vec![4.0, 5.0],
                    objectives: vec![6.0],
                },
            ]
        );
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let error = read_trajectory(Cursor::new("1.00 x 3.00\n"), 2).unwrap_err();

        assert!(matches!(error, Error::Parse { line: 1, ref field, .. } if field == "x"));
    }

    #[test]
    fn rejects_rows_without_objectives() {
        let error = read_trajectory(Cursor::new("1.00 2.00\n"), 2).unwrap_err();

        assert!(matches!(
            error,
            Error::Columns {
                line: 1,
                n_vars: 2,
                found: 2
            }
        ));
    }
}
