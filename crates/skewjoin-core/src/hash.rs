//! Stable scalar hashing for partition routing.
//!
//! Hashes are deterministic across processes so a repartitioned collection
//! routes the same key to the same partition on every run.

use blake3::Hasher;

use crate::row::Scalar;

/// Hash a key (one scalar per key column) to a stable 64-bit value.
///
/// Each scalar is fed with a type tag so that e.g. `I32(1)` and `I64(1)`
/// hash differently. Null hashes to a fixed sentinel.
pub fn hash_scalars(values: &[Scalar]) -> u64 {
    let mut hasher = Hasher::new();
    for value in values {
        match value {
            Scalar::Null => {
                hasher.update(&[0u8]);
            }
            Scalar::Bool(b) => {
                hasher.update(&[1u8, *b as u8]);
            }
            Scalar::I32(i) => {
                hasher.update(&[2u8]);
                hasher.update(&i.to_le_bytes());
            }
            Scalar::I64(i) => {
                hasher.update(&[3u8]);
                hasher.update(&i.to_le_bytes());
            }
            Scalar::F32(f) => {
                hasher.update(&[4u8]);
                hasher.update(&f.to_bits().to_le_bytes());
            }
            Scalar::F64(f) => {
                hasher.update(&[5u8]);
                hasher.update(&f.to_bits().to_le_bytes());
            }
            Scalar::Str(s) => {
                hasher.update(&[6u8]);
                hasher.update(&(s.len() as u64).to_le_bytes());
                hasher.update(s.as_bytes());
            }
        }
    }
    let digest = hasher.finalize();
    let bytes = digest.as_bytes();
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}
