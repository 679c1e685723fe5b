//! Source clip metadata.

use serde::{Deserialize, Serialize};

/// A rational frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub num: u64,
    pub den: u64,
}

impl FrameRate {
    /// NTSC video rate, the rate of the undecimated source.
    pub const NTSC_VIDEO: FrameRate = FrameRate {
        num: 30000,
        den: 1001,
    };

    pub fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }

    /// Output rate of a 5-frame cycle with `dropped` frames removed.
    pub fn for_dropped(dropped: usize) -> FrameRate {
        let kept = 5usize.saturating_sub(dropped) as u64;
        FrameRate {
            num: kept * 6000,
            den: 1001,
        }
    }

    pub fn as_f64(&self) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        self.num as f64 / self.den as f64
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::NTSC_VIDEO
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// What the project was built from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Path of the input video.
    pub path: String,
    /// Source filter used to open it (e.g. "lsmas.LWLibavSource").
    pub filter: String,
    #[serde(default)]
    pub frame_rate: FrameRate,
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_rates() {
        assert_eq!(FrameRate::for_dropped(0), FrameRate::new(30000, 1001));
        assert_eq!(FrameRate::for_dropped(1), FrameRate::new(24000, 1001));
        assert_eq!(FrameRate::for_dropped(4), FrameRate::new(6000, 1001));
        assert_eq!(FrameRate::for_dropped(5).num, 0);
    }

    #[test]
    fn display_is_fraction() {
        assert_eq!(FrameRate::NTSC_VIDEO.to_string(), "30000/1001");
        assert!((FrameRate::for_dropped(1).as_f64() - 23.976).abs() < 0.001);
    }
}
