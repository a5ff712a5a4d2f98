//! Conversion between `f64` and the x87 80-bit extended-precision format used
//! by the simulator's snapshot files.
//!
//! Each extended value occupies 16 bytes on disk (the in-memory layout of a C
//! `long double` on x86-64):
//! ```text
//! bytes  0..8   significand, little-endian, with explicit integer bit (63)
//! bytes  8..10  sign (bit 15) and biased exponent (bits 0..15), little-endian
//! bytes 10..16  padding
//! ```
//! A complex value is two such records, real part first.
//!
//! Decoding rounds the 64-bit significand to nearest, so the 11 lowest
//! significand bits of a stored value are lost. Every `f64` is exactly
//! representable in the extended format, so encoding followed by decoding is
//! the identity (NaN payloads aside).

use num_complex::Complex64 as C64;

/// Size in bytes of a single stored extended-precision value.
pub const EXT_SIZE: usize = 16;

/// Size in bytes of a single stored complex value.
pub const COMPLEX_SIZE: usize = 2 * EXT_SIZE;

const EXT_BIAS: i32 = 16383;
const F64_BIAS: i32 = 1023;
const EXT_EXP_MAX: u16 = 0x7fff;
const INT_BIT: u64 = 1 << 63;
const QUIET_BIT: u64 = 1 << 62;
const F64_FRAC_MASK: u64 = (1 << 52) - 1;

// multiply `x` by 2^k without overflowing the intermediate power of two
fn scale(mut x: f64, mut k: i32) -> f64 {
    let up = f64::from_bits(((2 * F64_BIAS) as u64) << 52); // 2^1023
    let down = f64::from_bits(1_u64 << 52); // 2^-1022
    while k > F64_BIAS {
        x *= up;
        k -= F64_BIAS;
        if x.is_infinite() { return x; }
    }
    while k < 1 - F64_BIAS {
        x *= down;
        k += F64_BIAS - 1;
        if x == 0.0 { return x; }
    }
    x * f64::from_bits(((k + F64_BIAS) as u64) << 52)
}

/// Decode a single extended-precision value.
///
/// Values outside the range of `f64` decode to an infinity (or zero);
/// unnormals (nonzero exponent with a cleared integer bit) decode to NaN.
pub fn decode(bytes: &[u8; EXT_SIZE]) -> f64 {
    let mut mant_bytes = [0_u8; 8];
    mant_bytes.copy_from_slice(&bytes[..8]);
    let mant = u64::from_le_bytes(mant_bytes);
    let se = u16::from_le_bytes([bytes[8], bytes[9]]);
    let negative = se & 0x8000 != 0;
    let exp = se & EXT_EXP_MAX;
    let mag
        = match exp {
            EXT_EXP_MAX if mant << 1 == 0 => f64::INFINITY,
            EXT_EXP_MAX => f64::NAN,
            e if e != 0 && mant & INT_BIT == 0 => f64::NAN,
            e => scale(mant as f64, (e as i32).max(1) - EXT_BIAS - 63),
        };
    if negative { -mag } else { mag }
}

/// Encode a single value in extended precision.
pub fn encode(x: f64) -> [u8; EXT_SIZE] {
    let bits = x.to_bits();
    let sign: u16 = if bits >> 63 != 0 { 0x8000 } else { 0 };
    let exp = ((bits >> 52) & 0x7ff) as i32;
    let frac = bits & F64_FRAC_MASK;
    let (se, mant): (u16, u64)
        = match (exp, frac) {
            (0, 0) => (0, 0),
            (0x7ff, 0) => (EXT_EXP_MAX, INT_BIT),
            (0x7ff, f) => (EXT_EXP_MAX, INT_BIT | QUIET_BIT | (f << 11)),
            (0, f) => {
                // f64 subnormals are normal in extended precision
                let lead = 63 - f.leading_zeros() as i32;
                let e = lead - (F64_BIAS - 1) - 52 + EXT_BIAS;
                (e as u16, f << (63 - lead))
            },
            (e, f) => ((e - F64_BIAS + EXT_BIAS) as u16, INT_BIT | (f << 11)),
        };
    let mut out = [0_u8; EXT_SIZE];
    out[..8].copy_from_slice(&mant.to_le_bytes());
    out[8..10].copy_from_slice(&(se | sign).to_le_bytes());
    out
}

/// Decode a complex value stored as two consecutive extended records.
pub fn decode_complex(bytes: &[u8; COMPLEX_SIZE]) -> C64 {
    let mut re = [0_u8; EXT_SIZE];
    let mut im = [0_u8; EXT_SIZE];
    re.copy_from_slice(&bytes[..EXT_SIZE]);
    im.copy_from_slice(&bytes[EXT_SIZE..]);
    C64::new(decode(&re), decode(&im))
}

/// Encode a complex value as two consecutive extended records.
pub fn encode_complex(z: C64) -> [u8; COMPLEX_SIZE] {
    let mut out = [0_u8; COMPLEX_SIZE];
    out[..EXT_SIZE].copy_from_slice(&encode(z.re));
    out[EXT_SIZE..].copy_from_slice(&encode(z.im));
    out
}
