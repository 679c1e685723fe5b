//! Choosing which duplicate of each cycle to drop.
//!
//! The duplicate pair of a cycle is its last frame and the first frame of
//! the next cycle. A pair cut off by the section end drops its first frame;
//! a lone second frame at the section start is kept.

use crate::frames::CYCLE;
use crate::models::{DropDuplicate, FrameRange, Match};

/// Ugliness of a frame shown under a match; higher is uglier.
pub(crate) type Ugliness<'a> = &'a dyn Fn(usize, Match) -> i64;

/// Drop flags for every frame of `section`.
///
/// `assigned[i]` is the match of `section.first + i`; `phase` places frame
/// `section.first + i` at cycle slot `(i + phase) % 5`. Without an ugliness
/// function the uglier-duplicate policies drop the first duplicate.
pub(crate) fn choose_drops(
    section: FrameRange,
    phase: usize,
    assigned: &[Match],
    policy: DropDuplicate,
    ugliness: Option<Ugliness<'_>>,
) -> Vec<bool> {
    let len = assigned.len();
    let mut drops = vec![false; len];

    let pairs: Vec<(usize, Option<usize>)> = (0..len)
        .filter(|i| (i + phase) % CYCLE == CYCLE - 1)
        .map(|i| (i, (i + 1 < len).then_some(i + 1)))
        .collect();

    let ugly = |i: usize| -> i64 {
        ugliness
            .map(|u| u(section.first + i, assigned[i]))
            .unwrap_or(0)
    };

    let drop_second_everywhere = match policy {
        DropDuplicate::DropSecondDuplicate => true,
        DropDuplicate::DropUglierPerSection => {
            let (first, second) = pairs
                .iter()
                .filter_map(|&(a, b)| b.map(|b| (ugly(a), ugly(b))))
                .fold((0i64, 0i64), |(fa, fb), (a, b)| (fa + a, fb + b));
            second > first
        }
        _ => false,
    };

    for (first, second) in pairs {
        let target = match second {
            None => first,
            Some(second) => {
                let drop_second = match policy {
                    DropDuplicate::DropUglierPerCycle => ugly(second) > ugly(first),
                    _ => drop_second_everywhere,
                };
                if drop_second {
                    second
                } else {
                    first
                }
            }
        };
        drops[target] = true;
    }

    drops
}
