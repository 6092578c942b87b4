//! Content fingerprint of a compiled [`Spec`].
//!
//! The fingerprint is the lowercase hex SHA-256 digest of a canonical byte
//! encoding of the [`Spec`]. Equations are encoded in render order and fields in
//! [`FieldKey::ALL`] order. Every string is length-prefixed and every optional
//! value is tagged, so distinct specs never share an encoding.

use sha2::{Digest, Sha256};

use super::fields::{FieldKey, Fields};
use super::{Equation, Spec};

const ENCODING_VERSION: &[u8] = b"plotmark-spec-v1";

/// Fingerprint of an already-compiled spec.
///
/// Recomputes the digest; it always equals [`Spec::fingerprint`].
#[must_use]
pub fn fingerprint(spec: &Spec) -> String {
    compute(spec.equations(), spec.fields())
}

pub(crate) fn compute(equations: &[Equation], fields: &Fields) -> String {
    let mut encoder = CanonicalEncoder::new();

    encoder.count(equations.len());
    for equation in equations {
        encoder.text(equation.expression());
        encoder.optional(equation.style().map(|style| style.name()));
        encoder.optional(equation.color().map(ToString::to_string).as_deref());
        encoder.optional(equation.restriction().as_deref());
    }

    for key in FieldKey::ALL {
        encoder.text(key.name());
        encoder.integer(fields.get(key));
    }

    encoder.finish()
}

struct CanonicalEncoder {
    hasher: Sha256,
}

impl CanonicalEncoder {
    fn new() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(ENCODING_VERSION);
        Self {
            hasher,
        }
    }

    fn count(&mut self, n: usize) {
        self.hasher.update((n as u64).to_le_bytes());
    }

    fn text(&mut self, value: &str) {
        self.count(value.len());
        self.hasher.update(value.as_bytes());
    }

    fn optional(&mut self, value: Option<&str>) {
        match value {
            Some(value) => {
                self.hasher.update([1u8]);
                self.text(value);
            }
            None => self.hasher.update([0u8]),
        }
    }

    fn integer(&mut self, value: i64) {
        self.hasher.update(value.to_le_bytes());
    }

    fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
