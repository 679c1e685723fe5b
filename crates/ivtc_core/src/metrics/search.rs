//! Range-producing searches over matches and fades.

use crate::models::{FrameRange, InterlacedFade, Match};

/// Runs of at least `minimum` consecutive `c` matches.
///
/// Long runs of `c` in telecined material usually mean the field matcher
/// missed a pattern.
pub fn c_match_sequences(matches: &[Match], minimum: usize) -> Vec<FrameRange> {
    let minimum = minimum.max(1);
    let mut sequences = Vec::new();
    let mut start = None;

    for (frame, &m) in matches.iter().enumerate() {
        match (m == Match::C, start) {
            (true, None) => start = Some(frame),
            (false, Some(first)) => {
                if frame - first >= minimum {
                    sequences.push(FrameRange::new(first, frame - 1));
                }
                start = None;
            }
            _ => {}
        }
    }

    if let Some(first) = start {
        if matches.len() - first >= minimum {
            sequences.push(FrameRange::new(first, matches.len() - 1));
        }
    }

    sequences
}

/// Group fade frames into ranges, bridging gaps of up to `ignore_gaps`
/// frames.
pub fn group_fades(fades: &[InterlacedFade], ignore_gaps: usize) -> Vec<FrameRange> {
    let mut frames: Vec<usize> = fades.iter().map(|f| f.frame).collect();
    frames.sort_unstable();
    frames.dedup();

    let mut ranges: Vec<FrameRange> = Vec::new();
    for frame in frames {
        match ranges.last_mut() {
            Some(range) if frame - range.last - 1 <= ignore_gaps => range.last = frame,
            _ => ranges.push(FrameRange::single(frame)),
        }
    }
    ranges
}
