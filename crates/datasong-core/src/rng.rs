//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in pattern generation flows through this module so a run is
//! reproducible from its seed. Every track gets an independent stream derived
//! from the run seed and the track index.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives a seed for a specific track from the run seed.
///
/// Hashes the run seed concatenated with the track index (both little-endian)
/// with BLAKE3 and keeps the first four bytes.
pub fn derive_track_seed(base_seed: u32, track_index: u32) -> u32 {
    let mut input = Vec::with_capacity(8);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&track_index.to_le_bytes());

    let hash = blake3::hash(&input);

    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&hash.as_bytes()[..4]);
    u32::from_le_bytes(bytes)
}

/// Creates the RNG for one track of a pattern.
pub fn create_track_rng(base_seed: u32, track_index: u32) -> Pcg32 {
    create_rng(derive_track_seed(base_seed, track_index))
}
