//! Energy loss engines.
//!
//! A [`Target`](crate::Target) hands its composition to an [`EnergyLoss`]
//! implementation and asks it for energies after (or before) a given path
//! length. [`TabulatedStopping`] is the engine shipped with this crate: it
//! integrates tabulated stopping powers in fixed steps along the path.

use std::collections::HashMap;

use log::{debug, trace};

use crate::constants::DEFAULT_STEP_FRACTION;
use crate::error::StoppingError;
use crate::interpolation::interpolate;

/// One element of a compound target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component {
    pub z: u32,
    pub a: u32,
    pub stoich: u32,
}

impl Component {
    pub fn new(z: u32, a: u32, stoich: u32) -> Self {
        Self { z, a, stoich }
    }
}

pub trait EnergyLoss {
    /// Replace the target material. Called once per composition change.
    fn set_target_components(&mut self, components: &[Component]) -> Result<(), StoppingError>;

    /// Energy left after a projectile (zp, ap) starting at `start_energy`
    /// crosses `path_length` of the target.
    fn energy_loss(
        &self,
        zp: u32,
        ap: u32,
        start_energy: f64,
        path_length: f64,
    ) -> Result<f64, StoppingError>;

    /// Energy a projectile must have had before crossing `path_length` to
    /// leave with `final_energy`.
    fn reverse_energy_loss(
        &self,
        zp: u32,
        ap: u32,
        final_energy: f64,
        path_length: f64,
    ) -> Result<f64, StoppingError>;
}

/// Stopping power of one projectile in one element.
///
/// * energies are kinetic energies per nucleon in MeV/u, ascending
/// * stoppings are in MeV/(mg/cm^2)
#[derive(Debug, Clone, PartialEq)]
pub struct StoppingTable {
    energies: Vec<f64>,
    stoppings: Vec<f64>,
}

impl StoppingTable {
    pub fn new(energies: Vec<f64>, stoppings: Vec<f64>) -> Result<Self, StoppingError> {
        if energies.len() != stoppings.len() {
            return Err(StoppingError::TableShape {
                energies: energies.len(),
                stoppings: stoppings.len(),
            });
        }
        if energies.is_empty() {
            return Err(StoppingError::EmptyTable);
        }
        if energies.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StoppingError::InvalidArgument(
                "stopping table energies must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { energies, stoppings })
    }

    /// Parse a table with one header line followed by `energy stopping`
    /// columns.
    pub fn parse(input: &str) -> Result<Self, StoppingError> {
        let mut energies = Vec::new();
        let mut stoppings = Vec::new();
        for (idx, line) in input.lines().enumerate().skip(1) {
            let mut cols = line.split_whitespace();
            let (e, s) = match (cols.next(), cols.next()) {
                (None, _) => continue,
                (Some(e), Some(s)) => (e, s),
                (Some(_), None) => {
                    return Err(StoppingError::MalformedTable {
                        line: idx + 1,
                        reason: "expected two columns".to_string(),
                    })
                }
            };
            let parse = |tok: &str| {
                tok.parse::<f64>().map_err(|err| StoppingError::MalformedTable {
                    line: idx + 1,
                    reason: format!("'{}': {}", tok, err),
                })
            };
            energies.push(parse(e)?);
            stoppings.push(parse(s)?);
        }
        Self::new(energies, stoppings)
    }

    /// Stopping power at `energy_u` MeV/u. Never negative.
    pub fn stopping(&self, energy_u: f64) -> f64 {
        interpolate(energy_u, &self.energies, &self.stoppings)
            .value()
            .map_or(0.0, |s| s.max(0.0))
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }
}

/// Fixed-step stopping power integrator over user supplied tables.
///
/// Compound stopping follows Bragg's rule, weighting each element by its
/// mass share `stoich * a`. Path lengths are in mg/cm^2 and energies in MeV.
#[derive(Debug, Clone)]
pub struct TabulatedStopping {
    tables: HashMap<(u32, u32, u32), StoppingTable>,
    components: Vec<Component>,
    step_fraction: f64,
}

impl Default for TabulatedStopping {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
            components: Vec::new(),
            step_fraction: DEFAULT_STEP_FRACTION,
        }
    }
}

impl TabulatedStopping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of one integration step as a fraction of the path, in (0, 1].
    pub fn with_step_fraction(mut self, step_fraction: f64) -> Result<Self, StoppingError> {
        if !(step_fraction > 0.0 && step_fraction <= 1.0) {
            return Err(StoppingError::InvalidArgument(format!(
                "step fraction {} not in (0, 1]",
                step_fraction
            )));
        }
        self.step_fraction = step_fraction;
        Ok(self)
    }

    /// Register the stopping of projectile (zp, ap) in element `target_z`,
    /// replacing any earlier table for the same pair.
    pub fn insert_table(&mut self, zp: u32, ap: u32, target_z: u32, table: StoppingTable) {
        trace!("stopping table for ({}, {}) in Z={}: {} points", zp, ap, target_z, table.len());
        self.tables.insert((zp, ap, target_z), table);
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Bragg-rule stopping of the current compound at `energy_u` MeV/u.
    fn compound_stopping(&self, zp: u32, ap: u32, energy_u: f64) -> Result<f64, StoppingError> {
        let mut weighted = 0.0;
        let mut total_mass = 0.0;
        for c in &self.components {
            let table = self
                .tables
                .get(&(zp, ap, c.z))
                .ok_or(StoppingError::MissingTable { zp, ap, target_z: c.z })?;
            let mass = f64::from(c.stoich) * f64::from(c.a);
            weighted += mass * table.stopping(energy_u);
            total_mass += mass;
        }
        Ok(weighted / total_mass)
    }

    fn check(&self, ap: u32, energy: f64, path_length: f64) -> Result<(), StoppingError> {
        if self.components.is_empty() {
            return Err(StoppingError::EmptyComposition);
        }
        if ap == 0 {
            return Err(StoppingError::InvalidArgument(
                "projectile mass number must be positive".to_string(),
            ));
        }
        if !(energy >= 0.0) {
            return Err(StoppingError::InvalidArgument(format!("energy {} is negative", energy)));
        }
        if !(path_length >= 0.0) {
            return Err(StoppingError::InvalidArgument(format!(
                "path length {} is negative",
                path_length
            )));
        }
        Ok(())
    }

    fn steps(&self, path_length: f64) -> (usize, f64) {
        let n = (1.0 / self.step_fraction).round().max(1.0) as usize;
        (n, path_length / n as f64)
    }
}

impl EnergyLoss for TabulatedStopping {
    fn set_target_components(&mut self, components: &[Component]) -> Result<(), StoppingError> {
        let total: u64 = components
            .iter()
            .map(|c| u64::from(c.stoich) * u64::from(c.a))
            .sum();
        if total == 0 {
            return Err(StoppingError::EmptyComposition);
        }
        self.components = components.to_vec();
        debug!("energy loss engine set to {} components", self.components.len());
        Ok(())
    }

    fn energy_loss(
        &self,
        zp: u32,
        ap: u32,
        start_energy: f64,
        path_length: f64,
    ) -> Result<f64, StoppingError> {
        self.check(ap, start_energy, path_length)?;
        if path_length == 0.0 {
            return Ok(start_energy);
        }

        let mass = f64::from(ap);
        let (n, dx) = self.steps(path_length);
        let mut energy = start_energy;
        for _ in 0..n {
            if energy <= 0.0 {
                break;
            }
            energy -= self.compound_stopping(zp, ap, energy / mass)? * dx;
        }
        Ok(energy.max(0.0))
    }

    fn reverse_energy_loss(
        &self,
        zp: u32,
        ap: u32,
        final_energy: f64,
        path_length: f64,
    ) -> Result<f64, StoppingError> {
        self.check(ap, final_energy, path_length)?;
        if path_length == 0.0 {
            return Ok(final_energy);
        }

        let mass = f64::from(ap);
        let (n, dx) = self.steps(path_length);
        let mut energy = final_energy;
        for _ in 0..n {
            energy += self.compound_stopping(zp, ap, energy / mass)? * dx;
        }
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(s: f64) -> StoppingTable {
        StoppingTable::new(vec![0.0, 100.0], vec![s, s]).unwrap()
    }

    #[test]
    fn table_parsing() {
        let table = StoppingTable::parse("E(MeV/u) S\n1.0 0.5\n\n2.0 0.25\n").unwrap();
        assert_eq!(table.len(), 2);
        assert!((table.stopping(1.5) - 0.375).abs() < 1e-12);

        let err = StoppingTable::parse("hdr\n1.0\n").unwrap_err();
        assert_eq!(
            err,
            StoppingError::MalformedTable { line: 2, reason: "expected two columns".to_string() }
        );
        assert_eq!(StoppingTable::parse("hdr\n").unwrap_err(), StoppingError::EmptyTable);
    }

    #[test]
    fn table_shape_is_checked() {
        assert_eq!(
            StoppingTable::new(vec![1.0, 2.0], vec![1.0]).unwrap_err(),
            StoppingError::TableShape { energies: 2, stoppings: 1 }
        );
        assert!(StoppingTable::new(vec![2.0, 1.0], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn negative_extrapolation_is_clamped() {
        let table = StoppingTable::new(vec![1.0, 2.0], vec![1.0, 0.5]).unwrap();
        assert_eq!(table.stopping(10.0), 0.0);
    }

    #[test]
    fn constant_stopping_is_linear_in_path() {
        let mut engine = TabulatedStopping::new();
        engine.insert_table(2, 4, 6, flat(0.5));
        engine.set_target_components(&[Component::new(6, 12, 1)]).unwrap();

        let e = engine.energy_loss(2, 4, 10.0, 4.0).unwrap();
        assert!((e - 8.0).abs() < 1e-9);

        let e0 = engine.reverse_energy_loss(2, 4, 8.0, 4.0).unwrap();
        assert!((e0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn particle_stops_at_zero() {
        let mut engine = TabulatedStopping::new();
        engine.insert_table(1, 1, 6, flat(1.0));
        engine.set_target_components(&[Component::new(6, 12, 1)]).unwrap();
        assert_eq!(engine.energy_loss(1, 1, 1.0, 50.0).unwrap(), 0.0);
    }

    #[test]
    fn compound_uses_mass_weights() {
        let mut engine = TabulatedStopping::new();
        engine.insert_table(1, 1, 1, flat(2.0));
        engine.insert_table(1, 1, 6, flat(0.5));
        // CH2: carbon carries 12 of 14 mass units
        engine
            .set_target_components(&[Component::new(6, 12, 1), Component::new(1, 1, 2)])
            .unwrap();

        let expected = (12.0 * 0.5 + 2.0 * 2.0) / 14.0;
        let e = engine.energy_loss(1, 1, 20.0, 1.0).unwrap();
        assert!((20.0 - e - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_table_is_reported() {
        let mut engine = TabulatedStopping::new();
        engine.insert_table(2, 4, 6, flat(0.5));
        engine
            .set_target_components(&[Component::new(6, 12, 1), Component::new(8, 16, 2)])
            .unwrap();
        assert_eq!(
            engine.energy_loss(2, 4, 10.0, 1.0).unwrap_err(),
            StoppingError::MissingTable { zp: 2, ap: 4, target_z: 8 }
        );
    }

    #[test]
    fn arguments_are_validated() {
        let mut engine = TabulatedStopping::new();
        assert_eq!(engine.energy_loss(2, 4, 10.0, 1.0).unwrap_err(), StoppingError::EmptyComposition);
        assert_eq!(
            engine.set_target_components(&[Component::new(6, 12, 0)]).unwrap_err(),
            StoppingError::EmptyComposition
        );

        engine.insert_table(2, 4, 6, flat(0.5));
        engine.set_target_components(&[Component::new(6, 12, 1)]).unwrap();
        assert!(engine.energy_loss(2, 4, -1.0, 1.0).is_err());
        assert!(engine.reverse_energy_loss(2, 4, 1.0, -1.0).is_err());
        assert_eq!(engine.energy_loss(2, 4, 10.0, 0.0).unwrap(), 10.0);
        assert!(TabulatedStopping::new().with_step_fraction(0.0).is_err());
    }

    #[test]
    fn forward_then_reverse_recovers_energy() {
        let table = StoppingTable::new(vec![0.1, 1.0, 5.0, 10.0], vec![1.2, 0.6, 0.2, 0.12]).unwrap();
        let mut engine = TabulatedStopping::new().with_step_fraction(1e-4).unwrap();
        engine.insert_table(2, 4, 6, table);
        engine.set_target_components(&[Component::new(6, 12, 1)]).unwrap();

        let out = engine.energy_loss(2, 4, 20.0, 2.0).unwrap();
        assert!(out < 20.0);
        let back = engine.reverse_energy_loss(2, 4, out, 2.0).unwrap();
        assert!((back - 20.0).abs() < 1e-3, "recovered {}", back);
    }
}
