//! Timecode generation.
//!
//! Times are kept as integers in units of 1/1800 ms. A source frame lasts
//! 1001/30 ms; a cycle keeping `k` of its 5 frames shows each for
//! `5 * 1001 / (30 * k)` ms, which is a whole number of units for every
//! `k` in 1..=5. Summing units never drifts, however long the clip.

use crate::error::{ProjectError, ProjectResult};
use crate::frames::{FrameNumberMapper, CYCLE};
use crate::models::{FrameRange, FrameRate};

/// Time units per millisecond.
const UNITS_PER_MS: u64 = 1800;

/// Duration of one output frame of a cycle that keeps `kept` frames.
fn frame_units(kept: u64) -> u64 {
    5005 * 60 / kept
}

/// Start time of every output frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    starts: Vec<u64>,
    end: u64,
}

impl Timeline {
    pub fn build(mapper: &FrameNumberMapper) -> Self {
        let mut starts = Vec::with_capacity(mapper.output_frame_count());
        let mut time = 0u64;
        for output in 0..mapper.output_frame_count() {
            // Output numbers are always valid here.
            let Ok(source) = mapper.to_source(output) else {
                break;
            };
            let dropped = mapper.cycle_drop_count(source / CYCLE) as u64;
            starts.push(time);
            time += frame_units(CYCLE as u64 - dropped);
        }
        Self { starts, end: time }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Total duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.end as f64 / UNITS_PER_MS as f64
    }

    /// Start of an output frame in milliseconds, 6 decimals.
    pub fn start_ms(&self, output: usize) -> ProjectResult<String> {
        let units = self.units(output)?;
        Ok(format_ms(units))
    }

    /// Start of an output frame as `H:MM:SS.mmm`.
    pub fn time_of(&self, output: usize) -> ProjectResult<String> {
        let units = self.units(output)?;
        Ok(format_time(units / UNITS_PER_MS))
    }

    fn units(&self, output: usize) -> ProjectResult<u64> {
        self.starts
            .get(output)
            .copied()
            .ok_or_else(|| ProjectError::out_of_range("Output frame", output, self.starts.len()))
    }

    /// Timecodes v2: one start time in milliseconds per output frame.
    pub fn timecodes_v2(&self) -> String {
        let mut out = String::from("# timecode format v2\n");
        for &units in &self.starts {
            out.push_str(&format_ms(units));
            out.push('\n');
        }
        out
    }
}

/// Milliseconds with 6 decimals, rounded half up.
fn format_ms(units: u64) -> String {
    let whole = units / UNITS_PER_MS;
    let micro = ((units % UNITS_PER_MS) * 1_000_000 + UNITS_PER_MS / 2) / UNITS_PER_MS;
    let (whole, micro) = if micro == 1_000_000 {
        (whole + 1, 0)
    } else {
        (whole, micro)
    };
    format!("{}.{:06}", whole, micro)
}

/// Format whole milliseconds as `H:MM:SS.mmm`.
pub fn format_time(milliseconds: u64) -> String {
    let hours = milliseconds / 3_600_000;
    let minutes = milliseconds / 60_000 % 60;
    let seconds = milliseconds / 1000 % 60;
    let millis = milliseconds % 1000;
    format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Timecodes v1: the NTSC rate is assumed, and every output range with a
/// different rate is listed.
pub fn timecodes_v1(mapper: &FrameNumberMapper) -> String {
    let assumed = FrameRate::NTSC_VIDEO;
    let mut out = format!("# timecode format v1\nAssume {:.6}\n", assumed.as_f64());
    for range in mapper.frame_rates().ranges() {
        if range.rate == assumed {
            continue;
        }
        let kept = mapper.kept_in(FrameRange::new(range.first, range.last));
        if kept == 0 {
            continue;
        }
        let Ok(first) = mapper.to_output(range.first) else {
            continue;
        };
        out.push_str(&format!(
            "{},{},{:.6}\n",
            first,
            first + kept - 1,
            range.rate.as_f64()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(frame_count: usize, pattern: &[bool]) -> FrameNumberMapper {
        let flags: Vec<bool> = (0..frame_count).map(|i| pattern[i % pattern.len()]).collect();
        FrameNumberMapper::build(&flags)
    }

    #[test]
    fn undecimated_timecodes() {
        let timeline = Timeline::build(&mapper(3, &[false]));
        assert_eq!(
            timeline.timecodes_v2(),
            "# timecode format v2\n0.000000\n33.366667\n66.733333\n"
        );
    }

    #[test]
    fn film_rate_stays_exact() {
        let frames = 5 * 100_000;
        let timeline = Timeline::build(&mapper(frames, &[false, false, false, false, true]));
        assert_eq!(timeline.len(), 4 * 100_000);
        // 100000 cycles of 5005/30 ms each.
        let expected_units = 100_000u64 * 5005 * 60;
        assert_eq!(timeline.end, expected_units);
        assert_eq!(
            timeline.start_ms(4 * 100_000 - 1).unwrap(),
            format_ms(expected_units - 5005 * 60 / 4)
        );
        // Every 4 output frames end on a whole cycle of 166.833333 ms.
        assert_eq!(timeline.start_ms(4).unwrap(), "166.833333");
        assert_eq!(timeline.start_ms(1).unwrap(), "41.708333");
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0), "0:00:00.000");
        assert_eq!(format_time(3_723_004), "1:02:03.004");
        let timeline = Timeline::build(&mapper(100, &[false]));
        assert_eq!(timeline.time_of(30).unwrap(), "0:00:01.001");
        assert!(timeline.time_of(100).is_err());
    }

    #[test]
    fn v1_lists_non_ntsc_ranges() {
        let mut flags = vec![false; 20];
        flags[14] = true;
        flags[19] = true;
        let mapper = FrameNumberMapper::build(&flags);
        assert_eq!(
            timecodes_v1(&mapper),
            "# timecode format v1\nAssume 29.970030\n10,17,23.976024\n"
        );
    }
}
