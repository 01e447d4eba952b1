//! Movement-penalty smoothing.
//!
//! A separable box blur: one horizontal and one vertical pass, each a
//! sliding-window running sum, so the cost is linear in the cell count
//! regardless of the blur radius. Samples past the grid edge clamp to the
//! edge row or column.

use crate::grid::Grid;

/// Smallest and largest movement penalty in a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyRange {
    pub min: i32,
    pub max: i32,
}

impl PenaltyRange {
    /// Fold `penalties` into their range. Empty input gives `0..=0`.
    pub fn of(penalties: impl IntoIterator<Item = i32>) -> Self {
        penalties
            .into_iter()
            .fold(None, |acc: Option<Self>, p| {
                Some(match acc {
                    Some(r) => Self {
                        min: r.min.min(p),
                        max: r.max.max(p),
                    },
                    None => Self { min: p, max: p },
                })
            })
            .unwrap_or_default()
    }

    /// Position of `penalty` within the range, in `[0, 1]`.
    pub fn normalize(&self, penalty: i32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        ((penalty - self.min) as f32 / (self.max - self.min) as f32).clamp(0.0, 1.0)
    }
}

/// Running-sum box filter over one line of `len` samples read through `at`.
fn blur_line(len: usize, radius: usize, at: impl Fn(usize) -> i64, out: &mut impl FnMut(usize, i64)) {
    let last = len - 1;
    let clamp = |i: isize| i.clamp(0, last as isize) as usize;
    let r = radius as isize;

    let mut sum: i64 = (-r..=r).map(|k| at(clamp(k))).sum();
    out(0, sum);
    for i in 1..len {
        let i = i as isize;
        sum += at(clamp(i + r)) - at(clamp(i - r - 1));
        out(i as usize, sum);
    }
}

/// Integer average, ties to even like the rest of the grid rounding.
#[inline]
fn average(sum: i64, count: i64) -> i32 {
    (sum as f64 / count as f64).round_ties_even() as i32
}

impl Grid {
    /// Replace every movement penalty with the average over the
    /// `(2·blur_radius + 1)²` window around it, and record the resulting
    /// penalty range.
    ///
    /// A radius of zero leaves penalties unchanged. Must run before any
    /// search that should see the smoothed costs.
    pub fn smooth_penalties(&mut self, blur_radius: usize) -> PenaltyRange {
        let size = self.size();
        let (w, h) = (size.x as usize, size.y as usize);

        if blur_radius > 0 && w > 0 && h > 0 {
            let kernel = (2 * blur_radius + 1) as i64;
            let nodes = self.nodes_mut();

            let mut horizontal = vec![0i64; w * h];
            for y in 0..h {
                let row = y * w;
                blur_line(
                    w,
                    blur_radius,
                    |x| nodes[row + x].movement_penalty() as i64,
                    &mut |x, sum| horizontal[row + x] = sum,
                );
            }

            for x in 0..w {
                blur_line(
                    h,
                    blur_radius,
                    |y| horizontal[y * w + x],
                    &mut |y, sum| nodes[y * w + x].set_movement_penalty(average(sum, kernel * kernel)),
                );
            }
        }

        self.penalty_range = PenaltyRange::of(self.nodes().map(|n| n.movement_penalty()));
        self.penalty_range
    }
}
