//! Joins the unordered segments of one level into maximal chains.
//!
//! Segment endpoints produced for the same grid edge are bit-identical, so chains are joined by
//! exact endpoint matching through a hash index. Every segment ends up in exactly one chain.

use std::collections::{HashMap, VecDeque};

use glam::DVec2;

use crate::{
    config::ChainOrder,
    segment::{PointKey, Segment},
};

/// A polyline built from joined segments.
///
/// A closed chain (polygon) repeats its first point as its last point. An open chain ends where
/// no further segment could be joined, which for finite grids is on the grid boundary.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    /// The points in walking order. At least two.
    pub points: Vec<DVec2>,
}

impl Chain {
    /// Whether the chain returns to its first point.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Number of points, including the repeated closing point of a polygon.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the chain has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The first point, if any.
    #[inline]
    pub fn first(&self) -> Option<DVec2> {
        self.points.first().copied()
    }

    /// The last point, if any.
    #[inline]
    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }
}

/// Assembles the segments of one level into chains.
///
/// Chains are seeded from unused segments in emission order. Each chain first grows at its tail,
/// then at its head, always taking the earliest emitted unused segment that shares the current
/// end point. Growth stops when no segment matches or when the chain returns to its start.
pub fn assemble_chains(segments: &[Segment], order: ChainOrder) -> Vec<Chain> {
    let mut endpoints: HashMap<PointKey, Vec<usize>> = HashMap::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        for point in segment.endpoints() {
            endpoints.entry(PointKey::from(point)).or_default().push(i);
        }
    }

    let mut used = vec![false; segments.len()];
    let mut chains = Vec::new();
    for (seed, segment) in segments.iter().enumerate() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let mut points = VecDeque::from([segment.start, segment.end]);

        let mut closed = false;
        while let Some(&tail) = points.back() {
            let Some(next) = take_joining(segments, &endpoints, &mut used, tail) else {
                break;
            };
            points.push_back(next);
            if Some(&next) == points.front() {
                closed = true;
                break;
            }
        }
        if !closed {
            while let Some(&head) = points.front() {
                let Some(previous) = take_joining(segments, &endpoints, &mut used, head) else {
                    break;
                };
                points.push_front(previous);
                if Some(&previous) == points.back() {
                    break;
                }
            }
        }
        chains.push(Chain {
            points: points.into(),
        });
    }

    match order {
        ChainOrder::Encounter => chains,
        ChainOrder::ClosedFirst => {
            let (mut closed, open): (Vec<_>, Vec<_>) =
                chains.into_iter().partition(Chain::is_closed);
            closed.extend(open);
            closed
        }
    }
}

/// Marks the earliest unused segment touching `at` as used and returns its other endpoint.
fn take_joining(
    segments: &[Segment],
    endpoints: &HashMap<PointKey, Vec<usize>>,
    used: &mut [bool],
    at: DVec2,
) -> Option<DVec2> {
    let candidates = endpoints.get(&PointKey::from(at))?;
    let &i = candidates.iter().find(|&&i| !used[i])?;
    used[i] = true;
    let segment = &segments[i];
    Some(if segment.start == at {
        segment.end
    } else {
        segment.start
    })
}
