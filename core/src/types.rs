//! Shared primitive types used across the field engine.

/// A field's identifier, parsed from the boundary placemark's `id` attribute.
pub type FieldId = i32;

/// Square meters.
pub type SquareMeters = f64;

/// Meters along the great circle.
pub type Meters = f64;
