//! # Terrain Module
//!
//! Diamond-square height maps for filling test and demo worlds.

use fastrand::Rng;
use log::debug;

/// Square grid of column heights, `(1 << size_bits) + 1` cells per side.
///
/// Heights are non-negative; the lowest column has height 0.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    size: usize,
    heights: Vec<i32>,
}

impl HeightMap {
    /// Generates a height map with the diamond-square algorithm.
    ///
    /// The first displacement range is half the map side. `roughness` scales the range after
    /// every subdivision: small values give smooth hills, values near 1 give noisy terrain.
    /// The same `seed` always produces the same map.
    pub fn diamond_square(size_bits: u32, roughness: f32, seed: u64) -> Self {
        let mut rng = Rng::with_seed(seed);
        let size = (1usize << size_bits) + 1;
        let mut values = vec![0f32; size * size];
        let mut scale = (size - 1) as f32 * 0.5;

        let last = size - 1;
        for (x, z) in [(0, 0), (last, 0), (0, last), (last, last)] {
            values[z * size + x] = rng.f32() * scale;
        }

        let mut step = last;
        while step > 1 {
            let half = step / 2;

            // diamond: square centers from their four corners
            for z in (half..size).step_by(step) {
                for x in (half..size).step_by(step) {
                    let sum = values[(z - half) * size + x - half]
                        + values[(z - half) * size + x + half]
                        + values[(z + half) * size + x - half]
                        + values[(z + half) * size + x + half];
                    values[z * size + x] = sum / 4.0 + displacement(&mut rng, scale);
                }
            }

            // square: edge midpoints from up to four neighbors
            for z in (0..size).step_by(half) {
                let first = if (z / half) % 2 == 0 { half } else { 0 };
                for x in (first..size).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0.0;
                    if x >= half {
                        sum += values[z * size + x - half];
                        count += 1.0;
                    }
                    if x + half < size {
                        sum += values[z * size + x + half];
                        count += 1.0;
                    }
                    if z >= half {
                        sum += values[(z - half) * size + x];
                        count += 1.0;
                    }
                    if z + half < size {
                        sum += values[(z + half) * size + x];
                        count += 1.0;
                    }
                    values[z * size + x] = sum / count + displacement(&mut rng, scale);
                }
            }

            scale *= roughness;
            step = half;
        }

        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let heights: Vec<i32> = values.iter().map(|v| (v - min).round() as i32).collect();
        debug!(
            "Generated {}x{} height map (seed {}), max height {}",
            size,
            size,
            seed,
            heights.iter().copied().max().unwrap_or(0)
        );
        HeightMap { size, heights }
    }

    /// Cells per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Height of column `(x, z)`.
    ///
    /// # Panics
    /// Panics if `x` or `z` is not below [`size`](Self::size).
    pub fn height(&self, x: usize, z: usize) -> i32 {
        assert!(x < self.size && z < self.size, "({x}, {z}) outside height map");
        self.heights[z * self.size + x]
    }

    pub fn max_height(&self) -> i32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }
}

fn displacement(rng: &mut Rng, scale: f32) -> f32 {
    (rng.f32() * 2.0 - 1.0) * scale
}
