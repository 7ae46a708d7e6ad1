//! Registration errors

use std::fmt;

/// Why an object could not be registered with the physics world
///
/// A failed registration leaves the world unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterError {
    /// The object has no mesh attached
    MissingGeometry,
    /// The same shared object is already registered
    AlreadyRegistered,
    /// The mass is negative, NaN or infinite
    InvalidMass(f32),
    /// The mesh cannot produce a collision shape (no triangles, flat hull, ...)
    DegenerateGeometry(String),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::MissingGeometry => {
                write!(f, "Invalid registration: object has no geometry")
            }
            RegisterError::AlreadyRegistered => {
                write!(f, "Invalid registration: object is already registered")
            }
            RegisterError::InvalidMass(mass) => {
                write!(f, "Invalid registration: mass {} is not a finite non-negative value", mass)
            }
            RegisterError::DegenerateGeometry(reason) => {
                write!(f, "Invalid registration: degenerate geometry ({})", reason)
            }
        }
    }
}

impl std::error::Error for RegisterError {}
