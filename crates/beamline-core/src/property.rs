//! Well-known element/device property keys.

/// Name of a synchronizable device property.
///
/// Properties are identified by interned static strings; the
/// well-known keys live in [`keys`]. Using `&'static str` keeps the
/// model-input table and value maps cheap to key and deterministic to
/// iterate.
pub type PropertyKey = &'static str;

/// The property vocabulary shared by accessors and synchronizers.
pub mod keys {
    use super::PropertyKey;

    /// Magnetic field strength (T for dipoles/solenoids, T/m for
    /// quadrupoles, T/m² for sextupoles).
    pub const FIELD: PropertyKey = "field";
    /// RF gap amplitude (effective voltage, V).
    pub const AMPLITUDE: PropertyKey = "amplitude";
    /// RF gap phase (radians).
    pub const PHASE: PropertyKey = "phase";
    /// RF frequency (Hz); design-only, never read live.
    pub const FREQUENCY: PropertyKey = "frequency";
}
