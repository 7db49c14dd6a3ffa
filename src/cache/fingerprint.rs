use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Keeps ASCII letters, digits and underscores.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Deterministic cache key, safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Joins the identifying parameters of a call with `_`.
///
/// Floats are written as the hex of their bit pattern: sanitising a decimal
/// rendering would drop signs and decimal points and let distinct inputs
/// collide.
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    parts: Vec<String>,
}

impl FingerprintBuilder {
    pub fn new(operation: &str) -> Self {
        Self {
            parts: vec![operation.to_string()],
        }
    }

    pub fn text(mut self, value: impl fmt::Display) -> Self {
        self.parts.push(value.to_string());
        self
    }

    pub fn float(mut self, value: f64) -> Self {
        self.parts.push(format!("{:016x}", value.to_bits()));
        self
    }

    pub fn vector(self, value: &Vector3<f64>) -> Self {
        value.iter().fold(self, |b, c| b.float(*c))
    }

    pub fn build(self) -> Fingerprint {
        Fingerprint(sanitize(&self.parts.join("_")))
    }
}
