//! Files derived from decimation and sections for use by muxers and
//! encoders.
//!
//! - **timecodes**: v1 and v2 timecode files and frame times
//! - **keyframes**: v1 keyframe files from section starts

mod keyframes;
mod timecodes;

pub use keyframes::keyframes_v1;
pub use timecodes::{format_time, timecodes_v1, Timeline};

use crate::error::ProjectResult;
use crate::project::Project;

impl Project {
    /// Exact output timeline of the current decimation.
    pub fn timeline(&self) -> Timeline {
        Timeline::build(self.mapper())
    }

    pub fn timecodes_v1(&self) -> String {
        timecodes_v1(self.mapper())
    }

    pub fn timecodes_v2(&self) -> String {
        self.timeline().timecodes_v2()
    }

    pub fn keyframes_v1(&self) -> String {
        keyframes_v1(self.mapper(), self.sections())
    }

    /// Presentation time of an output frame as `H:MM:SS.mmm`.
    pub fn frame_to_time(&self, output_frame: usize) -> ProjectResult<String> {
        self.timeline().time_of(output_frame)
    }
}
