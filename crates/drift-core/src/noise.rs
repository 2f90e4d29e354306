//! Tileable blue-noise approximation.
//!
//! A golden-ratio lattice plus a periodic integer hash gives a well-spread
//! field; a wrapped 8-neighbour high-pass removes the low frequencies and a
//! rank pass spreads the result evenly over 0..=255. Every step indexes
//! modulo the tile size, so opposite edges continue into each other.

use crate::constants::GOLDEN_ANGLE;
use fnv::FnvHashMap;
use std::rc::Rc;

const PHI: f64 = 1.618_033_988_749_895;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlueNoise {
    size: u32,
    data: Vec<u8>,
}

impl BlueNoise {
    pub fn generate(size: u32) -> Self {
        let n = size.max(1);
        let a = lattice_step(n, PHI);
        let b = lattice_step(n, PHI * PHI);

        let mut field = Vec::with_capacity((n * n) as usize);
        for y in 0..n {
            for x in 0..n {
                let base = ((x as u64 * a as u64 + y as u64 * b as u64) % n as u64) as f32 / n as f32;
                let h = hash(x, y) as f32 / u32::MAX as f32;
                field.push((base + h * GOLDEN_ANGLE).fract());
            }
        }

        let at = |x: i64, y: i64| -> f32 {
            let xi = x.rem_euclid(n as i64) as u32;
            let yi = y.rem_euclid(n as i64) as u32;
            field[(yi * n + xi) as usize]
        };
        let mut high = Vec::with_capacity(field.len());
        for y in 0..n as i64 {
            for x in 0..n as i64 {
                let mut sum = 0.0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx != 0 || dy != 0 {
                            sum += at(x + dx, y + dy);
                        }
                    }
                }
                high.push(at(x, y) - sum / 8.0);
            }
        }

        let mut order: Vec<usize> = (0..high.len()).collect();
        order.sort_by(|&i, &j| high[i].total_cmp(&high[j]).then(i.cmp(&j)));
        let mut data = vec![0u8; high.len()];
        let denom = (high.len().max(2) - 1) as f32;
        for (rank, &idx) in order.iter().enumerate() {
            data[idx] = (rank as f32 / denom * 255.0).round() as u8;
        }
        Self { size: n, data }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major R8 texels.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Texel lookup with repeat addressing.
    pub fn sample(&self, x: i64, y: i64) -> u8 {
        let n = self.size as i64;
        let xi = x.rem_euclid(n);
        let yi = y.rem_euclid(n);
        self.data[(yi * n + xi) as usize]
    }
}

/// Integer nearest to `n / ratio` that is coprime with `n`, so the lattice
/// visits every residue.
fn lattice_step(n: u32, ratio: f64) -> u32 {
    if n <= 2 {
        return 1;
    }
    let mut s = ((n as f64 / ratio).round() as u32).clamp(1, n - 1);
    while gcd(s, n) != 1 {
        s += 1;
        if s >= n {
            s = 1;
        }
    }
    s
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x8da6_b343) ^ y.wrapping_mul(0xd816_3841);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^ (h >> 15)
}

/// Size-keyed cache; the same size returns the same instance until
/// [`BlueNoiseCache::dispose`].
#[derive(Default)]
pub struct BlueNoiseCache {
    entries: FnvHashMap<u32, Rc<BlueNoise>>,
}

impl BlueNoiseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, size: u32) -> Rc<BlueNoise> {
        let size = size.max(1);
        self.entries
            .entry(size)
            .or_insert_with(|| {
                log::debug!("[noise] generating {size}x{size} blue noise");
                Rc::new(BlueNoise::generate(size))
            })
            .clone()
    }

    pub fn contains(&self, size: u32) -> bool {
        self.entries.contains_key(&size.max(1))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dispose(&mut self) {
        self.entries.clear();
    }
}
