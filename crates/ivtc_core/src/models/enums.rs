//! Core enums used throughout the engine.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, ProjectResult};

/// Field-matching decision for a single frame.
///
/// Under top-field-first field matching, `c` keeps both of the frame's own
/// fields, `p`/`n` replace the bottom field with the previous/next frame's,
/// and `b`/`u` replace the top field with the previous/next frame's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Match {
    #[serde(rename = "p")]
    P,
    #[default]
    #[serde(rename = "c")]
    C,
    #[serde(rename = "n")]
    N,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "u")]
    U,
}

impl Match {
    /// All matches in mic order (`p`, `c`, `n`, `b`, `u`).
    pub const ALL: [Match; 5] = [Match::P, Match::C, Match::N, Match::B, Match::U];

    /// Parse a match from its single-character symbol.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'p' => Some(Match::P),
            'c' => Some(Match::C),
            'n' => Some(Match::N),
            'b' => Some(Match::B),
            'u' => Some(Match::U),
            _ => None,
        }
    }

    /// The single-character symbol.
    pub fn as_char(&self) -> char {
        match self {
            Match::P => 'p',
            Match::C => 'c',
            Match::N => 'n',
            Match::B => 'b',
            Match::U => 'u',
        }
    }

    /// Index into a five-entry mics array.
    pub fn mic_index(&self) -> usize {
        match self {
            Match::P => 0,
            Match::C => 1,
            Match::N => 2,
            Match::B => 3,
            Match::U => 4,
        }
    }

    /// Index into a three-entry DMetrics array (`p`, `c`, `n`).
    ///
    /// `b` and `u` take the same source field as `p` and `n` respectively.
    pub fn dmetric_index(&self) -> usize {
        match self {
            Match::P | Match::B => 0,
            Match::C => 1,
            Match::N | Match::U => 2,
        }
    }

    /// Next match in the `c -> b -> n -> c` cycle.
    ///
    /// `p` and `u` are not part of the cycle and are returned unchanged.
    pub fn cycled(&self) -> Self {
        match self {
            Match::C => Match::B,
            Match::B => Match::N,
            Match::N => Match::C,
            Match::P => Match::P,
            Match::U => Match::U,
        }
    }

    /// Offset of the neighbour this match borrows a field from, if any.
    pub fn partner_offset(&self) -> Option<isize> {
        match self {
            Match::P | Match::B => Some(-1),
            Match::N | Match::U => Some(1),
            Match::C => None,
        }
    }

    /// The frame's own field that this match replaces.
    pub fn replaced_field(&self) -> Option<FieldKind> {
        match self {
            Match::P | Match::N => Some(FieldKind::Bottom),
            Match::B | Match::U => Some(FieldKind::Top),
            Match::C => None,
        }
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parse a match pattern string (e.g. `"cccnn"`).
pub fn parse_match_pattern(pattern: &str) -> ProjectResult<Vec<Match>> {
    pattern
        .chars()
        .map(|c| {
            Match::from_char(c).ok_or_else(|| {
                ProjectError::invalid_pattern(pattern, format!("'{}' is not a match", c))
            })
        })
        .collect()
}

/// Parse a decimation pattern string over `k` (keep) and `d` (drop).
pub fn parse_decimation_pattern(pattern: &str) -> ProjectResult<Vec<bool>> {
    pattern
        .chars()
        .map(|c| match c {
            'k' => Ok(false),
            'd' => Ok(true),
            other => Err(ProjectError::invalid_pattern(
                pattern,
                format!("'{}' is neither 'k' nor 'd'", other),
            )),
        })
        .collect()
}

/// Which field of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Top,
    Bottom,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Top => write!(f, "top"),
            FieldKind::Bottom => write!(f, "bottom"),
        }
    }
}

/// Where a custom list is injected into the generated pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionInFilterChain {
    #[default]
    PostSource,
    PostFieldMatch,
    PostDecimate,
}

impl std::fmt::Display for PositionInFilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionInFilterChain::PostSource => write!(f, "Post source"),
            PositionInFilterChain::PostFieldMatch => write!(f, "Post field match"),
            PositionInFilterChain::PostDecimate => write!(f, "Post decimate"),
        }
    }
}

/// When guessing from matches, whether to use a third `n` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseThirdNMatch {
    /// Always write `ccnnn`.
    Always,
    /// Always write `cccnn`.
    Never,
    /// Write `ccnnn` for a cycle only if it has the lower mic.
    #[default]
    IfPrettier,
}

/// Which of a cycle's two duplicate frames gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropDuplicate {
    DropFirstDuplicate,
    DropSecondDuplicate,
    #[default]
    DropUglierPerCycle,
    DropUglierPerSection,
}

/// Match pattern families available to metric-based guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternFamily {
    #[serde(rename = "cccnn")]
    Cccnn,
    #[serde(rename = "ccnnn")]
    Ccnnn,
    #[serde(rename = "ccccn")]
    Ccccn,
    #[serde(rename = "ccccc")]
    Ccccc,
}

impl PatternFamily {
    pub const ALL: [PatternFamily; 4] = [
        PatternFamily::Cccnn,
        PatternFamily::Ccnnn,
        PatternFamily::Ccccn,
        PatternFamily::Ccccc,
    ];

    /// The canonical five-frame match cycle of this family.
    pub fn matches(&self) -> [Match; 5] {
        use Match::{C, N};
        match self {
            PatternFamily::Cccnn => [C, C, C, N, N],
            PatternFamily::Ccnnn => [C, C, N, N, N],
            PatternFamily::Ccccn => [C, C, C, C, N],
            PatternFamily::Ccccc => [C, C, C, C, C],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PatternFamily::Cccnn => "cccnn",
            PatternFamily::Ccnnn => "ccnnn",
            PatternFamily::Ccccn => "ccccn",
            PatternFamily::Ccccc => "ccccc",
        }
    }
}

/// Source of the scores used to guess a section's patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessMethod {
    #[default]
    FromMatches,
    FromMics,
    FromDMetrics,
    FromMicsAndDMetrics,
}

impl std::fmt::Display for GuessMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuessMethod::FromMatches => write!(f, "matches"),
            GuessMethod::FromMics => write!(f, "mics"),
            GuessMethod::FromDMetrics => write!(f, "dmetrics"),
            GuessMethod::FromMicsAndDMetrics => write!(f, "mics and dmetrics"),
        }
    }
}

impl std::str::FromStr for GuessMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "matches" => Ok(GuessMethod::FromMatches),
            "mics" => Ok(GuessMethod::FromMics),
            "dmetrics" => Ok(GuessMethod::FromDMetrics),
            "both" | "mics_and_dmetrics" => Ok(GuessMethod::FromMicsAndDMetrics),
            other => Err(format!("unknown guessing method '{}'", other)),
        }
    }
}

/// Why guessing failed for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessFailureReason {
    SectionTooShort,
    AmbiguousPattern,
}

impl std::fmt::Display for GuessFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuessFailureReason::SectionTooShort => write!(f, "Section too short"),
            GuessFailureReason::AmbiguousPattern => write!(f, "Ambiguous pattern"),
        }
    }
}

/// How decimation is expressed in the generated pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimationFunction {
    /// Whichever of the two forms has fewer entries.
    #[default]
    Auto,
    SelectEvery,
    DeleteFrames,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_c_b_n() {
        assert_eq!(Match::C.cycled(), Match::B);
        assert_eq!(Match::B.cycled(), Match::N);
        assert_eq!(Match::N.cycled(), Match::C);
    }

    #[test]
    fn cycle_leaves_p_and_u_alone() {
        assert_eq!(Match::P.cycled(), Match::P);
        assert_eq!(Match::U.cycled(), Match::U);
    }

    #[test]
    fn match_chars_roundtrip() {
        for m in Match::ALL {
            assert_eq!(Match::from_char(m.as_char()), Some(m));
        }
        assert_eq!(Match::from_char('x'), None);
    }

    #[test]
    fn pattern_parsing_rejects_bad_symbols() {
        assert_eq!(parse_match_pattern("cccnn").unwrap().len(), 5);
        assert!(parse_match_pattern("cccxn").is_err());
        assert_eq!(
            parse_decimation_pattern("kkkkd").unwrap(),
            vec![false, false, false, false, true]
        );
        assert!(parse_decimation_pattern("kkkkx").is_err());
    }

    #[test]
    fn guess_method_parses_cli_names() {
        assert_eq!("mics".parse::<GuessMethod>(), Ok(GuessMethod::FromMics));
        assert_eq!("both".parse::<GuessMethod>(), Ok(GuessMethod::FromMicsAndDMetrics));
        assert!("nope".parse::<GuessMethod>().is_err());
    }

    #[test]
    fn match_serializes_as_symbol() {
        let json = serde_json::to_string(&vec![Match::C, Match::N]).unwrap();
        assert_eq!(json, "[\"c\",\"n\"]");
    }
}
