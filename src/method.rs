//! # Authentication modality identity.
//!
//! A [`BiometricMethod`] names one authentication modality: a stable numeric
//! [`MethodId`], a human-readable name and the [`BiometricType`] it belongs to.
//! Each backend owns exactly one method; the value never changes after construction.
//!
//! ## Example
//! ```rust
//! use biovisor::{BiometricMethod, BiometricType, MethodId};
//!
//! let m = BiometricMethod::new(MethodId(42), "fingerprint-acme", BiometricType::Fingerprint);
//! assert_eq!(m.id(), MethodId(42));
//! assert_eq!(m.name(), "fingerprint-acme");
//! assert_eq!(BiometricMethod::PLACEHOLDER.kind(), BiometricType::Placeholder);
//! ```

use std::borrow::Cow;
use std::fmt;

/// Stable identifier of an authentication method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical modality family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiometricType {
    Fingerprint,
    Face,
    Iris,
    /// No hardware behind it; used as a stand-in backend.
    Placeholder,
}

/// Immutable identity of one authentication modality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BiometricMethod {
    id: MethodId,
    name: Cow<'static, str>,
    kind: BiometricType,
}

impl BiometricMethod {
    /// Stand-in modality with no hardware behind it.
    pub const PLACEHOLDER: BiometricMethod =
        BiometricMethod::from_static(0, "placeholder", BiometricType::Placeholder);
    /// Platform fingerprint API.
    pub const FINGERPRINT_API: BiometricMethod =
        BiometricMethod::from_static(1, "fingerprint-api", BiometricType::Fingerprint);
    /// Vendor fingerprint service (Flyme).
    pub const FINGERPRINT_FLYME: BiometricMethod =
        BiometricMethod::from_static(2, "fingerprint-flyme", BiometricType::Fingerprint);
    /// Vendor face unlock (Huawei).
    pub const FACE_HUAWEI: BiometricMethod =
        BiometricMethod::from_static(10, "face-huawei", BiometricType::Face);
    /// Vendor face unlock (OnePlus).
    pub const FACE_ONEPLUS: BiometricMethod =
        BiometricMethod::from_static(11, "face-oneplus", BiometricType::Face);
    /// Platform iris API.
    pub const IRIS_API: BiometricMethod =
        BiometricMethod::from_static(20, "iris-api", BiometricType::Iris);

    /// Creates a method with an owned or borrowed name.
    pub fn new(id: MethodId, name: impl Into<Cow<'static, str>>, kind: BiometricType) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    const fn from_static(id: u32, name: &'static str, kind: BiometricType) -> Self {
        Self {
            id: MethodId(id),
            name: Cow::Borrowed(name),
            kind,
        }
    }

    #[inline]
    pub fn id(&self) -> MethodId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> BiometricType {
        self.kind
    }
}

impl fmt::Display for BiometricMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}
