//! Time-window overlap check for agenda submissions.
//!
//! Windows are validated per day, in the order given. A window is accepted
//! when both times are non-blank, its end is strictly greater than its start,
//! and its start is strictly greater than the end of every window accepted
//! before it on the same day. Times compare as plain strings, so callers are
//! expected to send zero-padded `HH:MM` values.

use crate::models::{DayAgenda, TimeWindow};
use crate::validation::ValidationError;

/// Validate one day's windows. Returns the accepted windows in order, or the
/// first violation.
pub fn validate_day(day: usize, windows: &[TimeWindow]) -> Result<Vec<&TimeWindow>, ValidationError> {
    windows
        .iter()
        .enumerate()
        .try_fold(Vec::with_capacity(windows.len()), |mut accepted: Vec<&TimeWindow>, (index, window)| {
            check_window(day, index, window)?;

            // accepted[i] is window i: any earlier rejection would have stopped the fold
            if let Some(previous) = accepted
                .iter()
                .position(|earlier| earlier.end_time >= window.start_time)
            {
                return Err(ValidationError::Overlap {
                    day,
                    window: index,
                    previous,
                    start: window.start_time.clone(),
                    previous_end: accepted[previous].end_time.clone(),
                });
            }

            accepted.push(window);
            Ok(accepted)
        })
}

/// Validate every day of a submission; the first violation wins.
pub fn validate_agendas(days: &[DayAgenda]) -> Result<(), ValidationError> {
    for (index, day) in days.iter().enumerate() {
        validate_day(index, &day.available_times)?;
    }
    Ok(())
}

fn check_window(day: usize, index: usize, window: &TimeWindow) -> Result<(), ValidationError> {
    if window.start_time.trim().is_empty() || window.end_time.trim().is_empty() {
        return Err(ValidationError::EmptyTime { day, window: index });
    }
    if window.end_time <= window.start_time {
        return Err(ValidationError::EndNotAfterStart {
            day,
            window: index,
            start: window.start_time.clone(),
            end: window.end_time.clone(),
        });
    }
    Ok(())
}
