#![doc = "Core types for restruc-bench: the scalar bit-mixing transform, the struct model and layout fingerprints."]
#![deny(missing_docs)]

/// Structured error families.
pub mod errors;
/// Natural layout and fingerprints.
pub mod layout;
/// Structs, fields and the struct table.
pub mod model;
/// Seeded random streams.
pub mod rng;
/// The `use` bit transform over scalar types.
pub mod scalar;

pub use errors::{ErrorInfo, RsbError};
pub use layout::{fingerprint, fingerprints, layout, Layout, Slot};
pub use model::{type_name, Field, FieldKind, Padding, Struc, StrucId, StrucTable};
pub use rng::{derive_substream_seed, RngHandle};
pub use scalar::{lcg_step, mix, Scalar, ScalarType, ScalarValue, LCG_INCREMENT, LCG_MULTIPLIER};
