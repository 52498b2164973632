//! # Noise Field
//!
//! Deterministic 2D scalar field used for terrain height and biome choice.
//!
//! The underlying generator is 2D simplex noise over a seeded permutation
//! table. [`NoiseField::sample`] remaps it to `[0, 1]`, and
//! [`NoiseField::octave_sample`] accumulates layers with halving amplitude and
//! doubling frequency, normalized by the total amplitude.
//!
//! ## Determinism
//!
//! Only integer shuffles and `f64` arithmetic are involved; the same
//! [`WorldSeed`] yields the same values on every platform.

/// Frequency of the first octave in [`NoiseField::octave_sample`].
pub const BASE_FREQUENCY: f64 = 0.01;

/// Octave count used for terrain height.
pub const DEFAULT_OCTAVES: u32 = 4;

/// World seed. Everything random in a world is derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a seed from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Hashes a text phrase into a seed.
    ///
    /// Uses the classic `h = h * 31 + c` string hash over UTF-16 code units
    /// in 32-bit wrapping arithmetic, then takes the absolute value, so a
    /// phrase maps to the same world players already know it by.
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        let hash = phrase
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self(u64::from(hash.unsigned_abs()))
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for `purpose`.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0 ^ purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(123_456)
    }
}

/// 256-entry permutation, doubled so corner lookups never wrap.
#[derive(Clone)]
struct Permutation {
    table: [u8; 512],
}

impl Permutation {
    /// Gradient directions for 2D simplex corners.
    const GRADIENTS: [[f64; 2]; 12] = [
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [-1.0, 1.0],
        [-1.0, 0.0],
        [-1.0, -1.0],
        [0.0, -1.0],
        [1.0, -1.0],
        [1.0, 0.0],
        [0.0, 1.0],
        [-1.0, 0.0],
        [0.0, -1.0],
    ];

    fn shuffled(seed: WorldSeed) -> Self {
        let mut table = [0u8; 512];
        for (i, slot) in table.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // xorshift64 must not start at zero
        let mut state = match seed.derive(0x7065_726d).value() {
            0 => 0x9e37_79b9_7f4a_7c15,
            mixed => mixed,
        };
        for i in (1..256usize).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            table.swap(i, j);
        }

        table.copy_within(0..256, 256);
        Self { table }
    }

    #[inline]
    fn at(&self, index: usize) -> usize {
        usize::from(self.table[index & 511])
    }

    #[inline]
    fn gradient(&self, i: usize, j: usize) -> [f64; 2] {
        Self::GRADIENTS[self.at(i + self.at(j)) % 12]
    }
}

/// Seeded 2D noise field with values in `[0, 1]`.
#[derive(Clone)]
pub struct NoiseField {
    perm: Permutation,
}

impl NoiseField {
    /// Skew factor, `(sqrt(3) - 1) / 2`.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskew factor, `(3 - sqrt(3)) / 6`.
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a field for `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm: Permutation::shuffled(seed),
        }
    }

    /// Raw simplex value in roughly `[-1, 1]`.
    #[must_use]
    pub fn simplex(&self, x: f64, z: f64) -> f64 {
        let skew = (x + z) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(z + skew);

        let unskew = i.wrapping_add(j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let z0 = z - (j as f64 - unskew);

        let (i1, j1) = if x0 > z0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let z1 = z0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let z2 = z0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let n0 = corner(x0, z0, self.perm.gradient(ii, jj));
        let n1 = corner(x1, z1, self.perm.gradient(ii + i1 as usize, jj + j1 as usize));
        let n2 = corner(x2, z2, self.perm.gradient(ii + 1, jj + 1));

        70.0 * (n0 + n1 + n2)
    }

    /// Single-octave sample in `[0, 1]`.
    #[must_use]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        ((self.simplex(x, z) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Multi-octave sample in `[0, 1]` starting at [`BASE_FREQUENCY`].
    #[must_use]
    pub fn octave_sample(&self, x: f64, z: f64, octaves: u32) -> f64 {
        self.octave_sample_with(x, z, octaves, BASE_FREQUENCY)
    }

    /// Multi-octave sample in `[0, 1]` with an explicit first-octave frequency.
    ///
    /// Zero octaves yields `0.0`.
    #[must_use]
    pub fn octave_sample_with(&self, x: f64, z: f64, octaves: u32, base_frequency: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = base_frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, z * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        }
    }
}

#[inline]
fn corner(x: f64, z: f64, gradient: [f64; 2]) -> f64 {
    let t = 0.5 - x * x - z * z;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * (x * gradient[0] + z * gradient[1])
    }
}

/// Lattice cell of a coordinate. Saturates instead of overflowing far out.
#[inline]
fn fast_floor(x: f64) -> i64 {
    x.floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let a = NoiseField::new(WorldSeed::new(123_456));
        let b = NoiseField::new(WorldSeed::new(123_456));

        for i in 0..200 {
            let x = f64::from(i) * 3.7 - 300.0;
            let z = f64::from(i) * -1.3 + 42.0;
            assert_eq!(a.sample(x, z).to_bits(), b.sample(x, z).to_bits());
            assert_eq!(
                a.octave_sample(x, z, DEFAULT_OCTAVES).to_bits(),
                b.octave_sample(x, z, DEFAULT_OCTAVES).to_bits()
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(WorldSeed::new(1));
        let b = NoiseField::new(WorldSeed::new(2));
        let differs = (0..50).any(|i| {
            let x = f64::from(i) * 0.37 + 0.1;
            a.sample(x, x * 0.5) != b.sample(x, x * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_unit_range() {
        let field = NoiseField::new(WorldSeed::new(42));
        for i in 0..10_000 {
            let x = f64::from(i) * 0.11 - 550.0;
            let z = f64::from(i) * 0.07 - 350.0;
            let single = field.sample(x, z);
            let octaves = field.octave_sample(x * 100.0, z * 100.0, DEFAULT_OCTAVES);
            assert!((0.0..=1.0).contains(&single), "sample {single} at ({x}, {z})");
            assert!((0.0..=1.0).contains(&octaves), "octaves {octaves} at ({x}, {z})");
        }
    }

    #[test]
    fn test_continuity() {
        let field = NoiseField::new(WorldSeed::new(42));
        let v1 = field.octave_sample(1000.0, 1000.0, DEFAULT_OCTAVES);
        let v2 = field.octave_sample(1000.1, 1000.0, DEFAULT_OCTAVES);
        assert!((v1 - v2).abs() < 0.05);
    }

    #[test]
    fn test_far_coordinates() {
        let field = NoiseField::new(WorldSeed::new(5));
        for &x in &[3.2e9, -3.4e10, 1.0e12] {
            let v = field.octave_sample(x, -x, 4);
            assert!((0.0..=1.0).contains(&v), "{x} -> {v}");
        }
    }

    #[test]
    fn test_zero_octaves() {
        let field = NoiseField::new(WorldSeed::new(7));
        assert!(field.octave_sample(10.0, 10.0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seed_phrase() {
        assert_eq!(WorldSeed::from_phrase("").value(), 0);
        // 'a' = 97, 'b' = 98: 97 * 31 + 98
        assert_eq!(WorldSeed::from_phrase("ab").value(), 3105);
        assert_eq!(WorldSeed::from_phrase("hello").value(), 99_162_322);
        // wraps negative, absolute value taken
        assert_eq!(
            WorldSeed::from_phrase("polygenelubricants").value(),
            2_147_483_648
        );
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        assert_eq!(base.derive(1), base.derive(1));
        assert_ne!(base.derive(1), base.derive(2));
        assert_ne!(base.derive(1), base);
    }
}
