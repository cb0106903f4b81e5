//! Shared, reseedable source of bounded random primitives.

use feign_core::{Boundaries, ConfigError, IntWidth};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Alphabet of generated strings.
pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ ";

/// Thread-safe random source with configurable boundaries.
///
/// Each draw locks the generator once, so concurrent fills never corrupt
/// its state. Output is only reproducible for a single-threaded sequence of
/// draws following [`RandomSource::seed`].
pub struct RandomSource {
    /// Seeded generator, replaced wholesale on reseed
    rng: Mutex<StdRng>,
    /// Boundaries consulted at every draw
    boundaries: RwLock<Boundaries>,
}

impl RandomSource {
    /// Create a source seeded from the operating system.
    ///
    /// Falls back to the wall clock if the OS source is unavailable.
    pub fn new() -> Self {
        let rng = StdRng::from_rng(OsRng).unwrap_or_else(|e| {
            tracing::warn!("OS entropy unavailable, seeding from clock: {e}");
            StdRng::seed_from_u64(clock_seed())
        });
        Self::from_rng(rng)
    }

    /// Create a source with a deterministic seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            boundaries: RwLock::new(Boundaries::default()),
        }
    }

    /// The process-wide source, created on first use.
    pub fn global() -> &'static RandomSource {
        static GLOBAL: OnceLock<RandomSource> = OnceLock::new();
        GLOBAL.get_or_init(RandomSource::new)
    }

    /// Replace the generator with a fresh one initialized from `seed`.
    ///
    /// Fills running concurrently keep drawing from the new generator, so
    /// callers wanting reproducible output must quiesce them first.
    pub fn seed(&self, seed: u64) {
        *self.lock() = StdRng::seed_from_u64(seed);
        tracing::debug!(seed, "Reseeded random source");
    }

    /// Currently configured boundaries.
    pub fn boundaries(&self) -> Boundaries {
        *self
            .boundaries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the boundaries after validating them.
    pub fn set_boundaries(&self, boundaries: Boundaries) -> Result<(), ConfigError> {
        boundaries.validate()?;
        *self
            .boundaries
            .write()
            .unwrap_or_else(PoisonError::into_inner) = boundaries;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the generator while holding its lock.
    ///
    /// This is the hook for callers (typically override closures) that need
    /// their own random values from the same seeded stream.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        f(&mut *self.lock())
    }

    /// A string with a length drawn from the string boundary.
    pub fn next_string(&self) -> String {
        let bounds = self.boundaries().string;
        self.with_rng(|rng| {
            let len = rng.gen_range(bounds.start..bounds.end) as usize;
            (0..len)
                .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
                .collect()
        })
    }

    /// A signed integer drawn from the int boundary, then truncated to
    /// `width` bits. Narrow widths wrap with two's-complement semantics.
    pub fn next_int(&self, width: IntWidth) -> i64 {
        let bounds = self.boundaries().int;
        let n = self.with_rng(|rng| rng.gen_range(bounds.start..bounds.end));
        truncate_signed(n, width)
    }

    /// An unsigned integer drawn from the int boundary, then truncated to
    /// `width` bits.
    pub fn next_uint(&self, width: IntWidth) -> u64 {
        let bounds = self.boundaries().int;
        let n = self.with_rng(|rng| rng.gen_range(bounds.start..bounds.end));
        truncate_unsigned(n as u64, width)
    }

    /// A uniform float in `[0, 1)`.
    pub fn next_f32(&self) -> f32 {
        self.with_rng(|rng| rng.gen())
    }

    /// A uniform float in `[0, 1)`.
    pub fn next_f64(&self) -> f64 {
        self.with_rng(|rng| rng.gen())
    }

    /// A fair coin flip.
    pub fn next_bool(&self) -> bool {
        self.with_rng(|rng| rng.gen_range(0..2) > 0)
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn next_chance(&self, probability: f64) -> bool {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self.with_rng(|rng| rng.gen_bool(p))
    }

    /// A slice or map length drawn from the collection boundary.
    pub fn next_collection_size(&self) -> usize {
        let bounds = self.boundaries().collection;
        self.with_rng(|rng| rng.gen_range(bounds.start..bounds.end)) as usize
    }

    /// A full-width signed integer.
    pub fn next_i64(&self) -> i64 {
        self.with_rng(|rng| rng.gen())
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_signed(n: i64, width: IntWidth) -> i64 {
    match width {
        IntWidth::W8 => n as i8 as i64,
        IntWidth::W16 => n as i16 as i64,
        IntWidth::W32 => n as i32 as i64,
        IntWidth::W64 => n,
    }
}

fn truncate_unsigned(n: u64, width: IntWidth) -> u64 {
    match width {
        IntWidth::W8 => n as u8 as u64,
        IntWidth::W16 => n as u16 as u64,
        IntWidth::W32 => n as u32 as u64,
        IntWidth::W64 => n,
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
