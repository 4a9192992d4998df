//! Fixed-width scalar types and the LCG bit-mixing transform applied to them.
//!
//! Generated benchmark programs route every scalar lvalue through a
//! non-inlinable `use` call so the compiler keeps each field access alive.
//! [`mix`] is the same transform on the Rust side.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RsbError};

/// PCG multiplier.
pub const LCG_MULTIPLIER: u64 = 0x5851_F42D_4C95_7F2D;
/// PCG increment.
pub const LCG_INCREMENT: u64 = 0x1405_7B7E_F767_814F;

/// One multiply-add step modulo 2^64.
#[inline]
pub const fn lcg_step(value: u64) -> u64 {
    value.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT)
}

mod sealed {
    /// Implemented only inside this module's parent.
    pub trait Sealed {}
}

/// Scalar types accepted by [`mix`].
///
/// Sealed: the supported set is exactly the ten fixed-width integer and
/// floating-point types.
pub trait Scalar: Copy + sealed::Sealed {
    /// Runtime descriptor of the implementing type.
    const TYPE: ScalarType;

    /// Applies the LCG step to the value's bits.
    fn mix(self) -> Self;
}

macro_rules! impl_integer_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const TYPE: ScalarType = ScalarType::$variant;

                #[inline]
                fn mix(self) -> Self {
                    // `as u64` sign-extends signed inputs; the cast back truncates.
                    lcg_step(self as u64) as $ty
                }
            }
        )*
    };
}

impl_integer_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

impl sealed::Sealed for f32 {}

impl Scalar for f32 {
    const TYPE: ScalarType = ScalarType::F32;

    #[inline]
    fn mix(self) -> Self {
        f32::from_bits(lcg_step(u64::from(self.to_bits())) as u32)
    }
}

impl sealed::Sealed for f64 {}

impl Scalar for f64 {
    const TYPE: ScalarType = ScalarType::F64;

    #[inline]
    fn mix(self) -> Self {
        f64::from_bits(lcg_step(self.to_bits()))
    }
}

/// Applies the bit-mixing transform to `value`.
///
/// ```
/// assert_eq!(rsb_core::mix(0u64), rsb_core::LCG_INCREMENT);
/// assert_eq!(rsb_core::mix(-1i8), 0x22);
/// ```
///
/// Types outside the ten fixed-width scalars do not implement [`Scalar`]:
///
/// ```compile_fail
/// rsb_core::mix(1u128);
/// ```
///
/// ```compile_fail
/// rsb_core::mix(true);
/// ```
///
/// ```compile_fail
/// rsb_core::mix(1usize);
/// ```
#[inline(never)]
pub fn mix<T: Scalar>(value: T) -> T {
    value.mix()
}

/// Runtime descriptor for the supported scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// `int8_t`.
    I8,
    /// `int16_t`.
    I16,
    /// `int32_t`.
    I32,
    /// `int64_t`.
    I64,
    /// `uint8_t`.
    U8,
    /// `uint16_t`.
    U16,
    /// `uint32_t`.
    U32,
    /// `uint64_t`.
    U64,
    /// `float`.
    F32,
    /// `double`.
    F64,
}

impl ScalarType {
    /// All supported types in declaration order.
    pub const ALL: [ScalarType; 10] = [
        ScalarType::I8,
        ScalarType::I16,
        ScalarType::I32,
        ScalarType::I64,
        ScalarType::U8,
        ScalarType::U16,
        ScalarType::U32,
        ScalarType::U64,
        ScalarType::F32,
        ScalarType::F64,
    ];

    /// Width in bytes.
    pub const fn size(self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::I64 | ScalarType::U64 | ScalarType::F64 => 8,
        }
    }

    /// Name used in the generated C++ preamble.
    pub const fn c_name(self) -> &'static str {
        match self {
            ScalarType::I8 => "int8_t",
            ScalarType::I16 => "int16_t",
            ScalarType::I32 => "int32_t",
            ScalarType::I64 => "int64_t",
            ScalarType::U8 => "uint8_t",
            ScalarType::U16 => "uint16_t",
            ScalarType::U32 => "uint32_t",
            ScalarType::U64 => "uint64_t",
            ScalarType::F32 => "f32_t",
            ScalarType::F64 => "f64_t",
        }
    }

    /// Resolves a C type name, accepting `float`/`double` as the recovery tool
    /// prints them.
    pub fn from_c_name(name: &str) -> Option<Self> {
        match name {
            "float" => Some(ScalarType::F32),
            "double" => Some(ScalarType::F64),
            _ => Self::ALL.into_iter().find(|ty| ty.c_name() == name),
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

impl FromStr for ScalarType {
    type Err = RsbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        let short = match lowered.as_str() {
            "i8" => Some(ScalarType::I8),
            "i16" => Some(ScalarType::I16),
            "i32" => Some(ScalarType::I32),
            "i64" => Some(ScalarType::I64),
            "u8" => Some(ScalarType::U8),
            "u16" => Some(ScalarType::U16),
            "u32" => Some(ScalarType::U32),
            "u64" => Some(ScalarType::U64),
            "f32" => Some(ScalarType::F32),
            "f64" => Some(ScalarType::F64),
            _ => None,
        };
        short.or_else(|| Self::from_c_name(&lowered)).ok_or_else(|| {
            RsbError::Parse(
                ErrorInfo::new("unknown-scalar-type", format!("unsupported scalar type {s:?}"))
                    .with_hint("expected one of i8..i64, u8..u64, f32, f64 or their C names"),
            )
        })
    }
}

/// A value tagged with its scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScalarValue {
    /// `int8_t` value.
    I8(i8),
    /// `int16_t` value.
    I16(i16),
    /// `int32_t` value.
    I32(i32),
    /// `int64_t` value.
    I64(i64),
    /// `uint8_t` value.
    U8(u8),
    /// `uint16_t` value.
    U16(u16),
    /// `uint32_t` value.
    U32(u32),
    /// `uint64_t` value.
    U64(u64),
    /// `float` value.
    F32(f32),
    /// `double` value.
    F64(f64),
}

impl ScalarValue {
    /// Parses `text` as a value of type `ty`.
    ///
    /// Integers accept a `0x` prefix for hexadecimal input.
    pub fn parse(ty: ScalarType, text: &str) -> Result<Self, RsbError> {
        let text = text.trim();
        let invalid = |reason: String| {
            RsbError::Parse(
                ErrorInfo::new("invalid-scalar", reason)
                    .with_context("type", ty.c_name())
                    .with_context("input", text),
            )
        };
        macro_rules! int {
            ($t:ty, $variant:ident) => {{
                let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    Some(hex) => <$t>::from_str_radix(hex, 16),
                    None => text.parse::<$t>(),
                };
                parsed
                    .map(ScalarValue::$variant)
                    .map_err(|err| invalid(err.to_string()))
            }};
        }
        match ty {
            ScalarType::I8 => int!(i8, I8),
            ScalarType::I16 => int!(i16, I16),
            ScalarType::I32 => int!(i32, I32),
            ScalarType::I64 => int!(i64, I64),
            ScalarType::U8 => int!(u8, U8),
            ScalarType::U16 => int!(u16, U16),
            ScalarType::U32 => int!(u32, U32),
            ScalarType::U64 => int!(u64, U64),
            ScalarType::F32 => text
                .parse::<f32>()
                .map(ScalarValue::F32)
                .map_err(|err| invalid(err.to_string())),
            ScalarType::F64 => text
                .parse::<f64>()
                .map(ScalarValue::F64)
                .map_err(|err| invalid(err.to_string())),
        }
    }

    /// Type tag of the value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::I8(_) => i8::TYPE,
            ScalarValue::I16(_) => i16::TYPE,
            ScalarValue::I32(_) => i32::TYPE,
            ScalarValue::I64(_) => i64::TYPE,
            ScalarValue::U8(_) => u8::TYPE,
            ScalarValue::U16(_) => u16::TYPE,
            ScalarValue::U32(_) => u32::TYPE,
            ScalarValue::U64(_) => u64::TYPE,
            ScalarValue::F32(_) => f32::TYPE,
            ScalarValue::F64(_) => f64::TYPE,
        }
    }

    /// Applies [`mix`] to the wrapped value.
    pub fn mix(self) -> Self {
        match self {
            ScalarValue::I8(v) => ScalarValue::I8(mix(v)),
            ScalarValue::I16(v) => ScalarValue::I16(mix(v)),
            ScalarValue::I32(v) => ScalarValue::I32(mix(v)),
            ScalarValue::I64(v) => ScalarValue::I64(mix(v)),
            ScalarValue::U8(v) => ScalarValue::U8(mix(v)),
            ScalarValue::U16(v) => ScalarValue::U16(mix(v)),
            ScalarValue::U32(v) => ScalarValue::U32(mix(v)),
            ScalarValue::U64(v) => ScalarValue::U64(mix(v)),
            ScalarValue::F32(v) => ScalarValue::F32(mix(v)),
            ScalarValue::F64(v) => ScalarValue::F64(mix(v)),
        }
    }

    /// Raw bit pattern, zero-extended to 64 bits.
    pub fn bits(&self) -> u64 {
        match *self {
            ScalarValue::I8(v) => u64::from(v as u8),
            ScalarValue::I16(v) => u64::from(v as u16),
            ScalarValue::I32(v) => u64::from(v as u32),
            ScalarValue::I64(v) => v as u64,
            ScalarValue::U8(v) => u64::from(v),
            ScalarValue::U16(v) => u64::from(v),
            ScalarValue::U32(v) => u64::from(v),
            ScalarValue::U64(v) => v,
            ScalarValue::F32(v) => u64::from(v.to_bits()),
            ScalarValue::F64(v) => v.to_bits(),
        }
    }
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::I8(v) => write!(f, "{v}"),
            ScalarValue::I16(v) => write!(f, "{v}"),
            ScalarValue::I32(v) => write!(f, "{v}"),
            ScalarValue::I64(v) => write!(f, "{v}"),
            ScalarValue::U8(v) => write!(f, "{v}"),
            ScalarValue::U16(v) => write!(f, "{v}"),
            ScalarValue::U32(v) => write!(f, "{v}"),
            ScalarValue::U64(v) => write!(f, "{v}"),
            ScalarValue::F32(v) => write!(f, "{v:e}"),
            ScalarValue::F64(v) => write!(f, "{v:e}"),
        }
    }
}
