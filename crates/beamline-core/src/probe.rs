//! Probe state: the particle species and energy a map is evaluated at.

use crate::LIGHT_SPEED;

/// A beam probe: species constants plus the evolving kinetic energy
/// and longitudinal position.
///
/// Transfer maps are pure functions of the probe's charge, rest
/// energy, and relativistic β/γ at evaluation time; trackers advance
/// `position` and `kinetic_energy` between evaluations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    /// Particle charge in units of the elementary charge (signed).
    pub charge: f64,
    /// Rest energy, eV.
    pub rest_energy: f64,
    /// Kinetic energy, eV.
    pub kinetic_energy: f64,
    /// Longitudinal position along the lattice, m.
    pub position: f64,
}

impl Probe {
    /// Create a probe at position 0.
    pub fn new(charge: f64, rest_energy: f64, kinetic_energy: f64) -> Self {
        Self {
            charge,
            rest_energy,
            kinetic_energy,
            position: 0.0,
        }
    }

    /// Lorentz factor γ = 1 + W / E_rest.
    pub fn gamma(&self) -> f64 {
        1.0 + self.kinetic_energy / self.rest_energy
    }

    /// Normalized velocity β = √(1 − 1/γ²).
    pub fn beta(&self) -> f64 {
        let g = self.gamma();
        (1.0 - 1.0 / (g * g)).sqrt()
    }

    /// The product βγ (normalized momentum).
    pub fn beta_gamma(&self) -> f64 {
        self.beta() * self.gamma()
    }

    /// Velocity in m/s.
    pub fn velocity(&self) -> f64 {
        self.beta() * LIGHT_SPEED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 1 MeV protons: γ ≈ 1.001066, β ≈ 0.04614.
    #[test]
    fn proton_kinematics() {
        let probe = Probe::new(1.0, 938.272e6, 1.0e6);
        assert!((probe.gamma() - 1.001_065_8).abs() < 1e-6);
        assert!((probe.beta() - 0.046_1).abs() < 1e-3);
    }

    #[test]
    fn beta_approaches_unity_at_high_energy() {
        let probe = Probe::new(-1.0, 0.511e6, 10.0e9);
        assert!(probe.beta() > 0.999_999);
        assert!(probe.gamma() > 1.0e4);
    }

    proptest! {
        #[test]
        fn kinematics_stay_physical(
            rest in 0.511e6..1.0e10_f64,
            kinetic in 0.0..1.0e12_f64,
        ) {
            let probe = Probe::new(1.0, rest, kinetic);
            prop_assert!(probe.gamma() >= 1.0);
            prop_assert!((0.0..1.0).contains(&probe.beta()));
            prop_assert!(probe.velocity() < crate::LIGHT_SPEED);
        }
    }
}
