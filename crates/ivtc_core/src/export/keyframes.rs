//! Keyframe files.

use std::collections::BTreeSet;

use crate::frames::FrameNumberMapper;
use crate::sections::SectionTable;

/// Keyframes v1: the output frame of every section start.
///
/// Sections whose starts collapse onto the same output frame are listed
/// once.
pub fn keyframes_v1(mapper: &FrameNumberMapper, sections: &SectionTable) -> String {
    let keyframes: BTreeSet<usize> = sections
        .starts()
        .into_iter()
        .filter_map(|start| mapper.to_output(start).ok())
        .filter(|&output| output < mapper.output_frame_count())
        .collect();

    let mut out = String::from("# keyframe format v1\nfps 0\n");
    for frame in keyframes {
        out.push_str(&frame.to_string());
        out.push('\n');
    }
    out
}
