use std::io::{self, Write};

use descent_core::{Observer, Point};
use tracing::warn;

use crate::{
    traits::{CanStopEarly, HasPoint},
    trajectory::write_point,
};

/// An observer that streams trajectory rows to a writer during a run.
///
/// Every event's point is written as one row in the format of
/// [`write_trajectory`](crate::trajectory::write_trajectory). If a write
/// fails, the error is kept and the observer asks the run to stop early.
/// Call [`finish`](Self::finish) after the run to flush and surface it.
///
/// # Example
///
/// ```ignore
/// let mut writer = TrajectoryWriter::new(File::create("trajectory1.csv")?);
/// let solution = descent::run(&mut optimizer, &mut writer)?;
/// writer.finish()?;
/// ```
pub struct TrajectoryWriter<W> {
    writer: W,
    rows: usize,
    error: Option<io::Error>,
}

impl<W: Write> TrajectoryWriter<W> {
    /// Creates a writer that streams rows to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            rows: 0,
            error: None,
        }
    }

    /// Writes the row for `point`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn record(&mut self, point: &Point) -> io::Result<()> {
        write_point(&mut self.writer, point)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of rows written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns the first write error seen while observing, or the flush error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W, E, A> Observer<E, A> for TrajectoryWriter<W>
where
    W: Write,
    E: HasPoint,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if self.error.is_some() {
            return Some(A::stop_early());
        }
        match self.record(event.point()) {
            Ok(()) => None,
            Err(error) => {
                warn!(%error, rows = self.rows, "trajectory write failed, stopping run");
                self.error = Some(error);
                Some(A::stop_early())
            }
        }
    }
}

/// Allows `&mut TrajectoryWriter<W>` to be passed to runs that take an
/// observer by value, so [`TrajectoryWriter::finish`] can be called after
/// the run completes.
impl<W, E, A> Observer<E, A> for &mut TrajectoryWriter<W>
where
    W: Write,
    E: HasPoint,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}
