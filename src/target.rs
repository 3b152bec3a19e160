//! A target slab of known thickness and composition.

use std::f64::consts::{FRAC_PI_2, PI};

use log::debug;

use crate::error::TargetError;
use crate::stopping::{Component, EnergyLoss, TabulatedStopping};

#[derive(Debug, Clone)]
pub struct Target<E: EnergyLoss = TabulatedStopping> {
    thickness: f64,
    components: Vec<Component>,
    engine: E,
}

impl<E: EnergyLoss + Default> Target<E> {
    /// Targets must be of known thickness, in whatever unit the engine
    /// integrates over (mg/cm^2 for `TabulatedStopping`).
    pub fn new(thickness: f64) -> Self {
        Self::with_engine(thickness, E::default())
    }
}

impl<E: EnergyLoss> Target<E> {
    pub fn with_engine(thickness: f64, engine: E) -> Self {
        Self {
            thickness,
            components: Vec::new(),
            engine,
        }
    }

    /// Set the target elements from parallel Z, A and stoichiometry lists and
    /// hand them to the engine. Replaces any earlier composition.
    pub fn set_elements(&mut self, z: &[u32], a: &[u32], stoich: &[u32]) -> Result<(), TargetError> {
        if z.len() != a.len() || z.len() != stoich.len() {
            return Err(TargetError::CompositionMismatch {
                z: z.len(),
                a: a.len(),
                stoich: stoich.len(),
            });
        }
        let components = z
            .iter()
            .zip(a)
            .zip(stoich)
            .map(|((&z, &a), &s)| Component::new(z, a, s))
            .collect();
        self.set_components(components)
    }

    pub fn set_components(&mut self, components: Vec<Component>) -> Result<(), TargetError> {
        self.engine.set_target_components(&components)?;
        debug!(
            "target ({}) composition: {:?}",
            self.thickness,
            components.iter().map(|c| (c.z, c.a, c.stoich)).collect::<Vec<_>>()
        );
        self.components = components;
        Ok(())
    }

    pub fn contains_element(&self, z: u32, a: u32) -> bool {
        self.components.iter().any(|c| c.z == z && c.a == a)
    }

    /// Energy left after crossing the whole target at incidence angle
    /// `theta` (radians from the normal).
    pub fn energy_loss_total(
        &self,
        zp: u32,
        ap: u32,
        start_energy: f64,
        theta: f64,
    ) -> Result<f64, TargetError> {
        self.forward(zp, ap, start_energy, theta, 1.0)
    }

    /// As `energy_loss_total`, but only to the middle of the target.
    pub fn energy_loss_half(
        &self,
        zp: u32,
        ap: u32,
        start_energy: f64,
        theta: f64,
    ) -> Result<f64, TargetError> {
        self.forward(zp, ap, start_energy, theta, 0.5)
    }

    /// Energy a particle had before crossing the whole target, given the
    /// energy it left with.
    pub fn reverse_energy_loss_total(
        &self,
        zp: u32,
        ap: u32,
        final_energy: f64,
        theta: f64,
    ) -> Result<f64, TargetError> {
        self.reverse(zp, ap, final_energy, theta, 1.0)
    }

    pub fn reverse_energy_loss_half(
        &self,
        zp: u32,
        ap: u32,
        final_energy: f64,
        theta: f64,
    ) -> Result<f64, TargetError> {
        self.reverse(zp, ap, final_energy, theta, 0.5)
    }

    fn forward(&self, zp: u32, ap: u32, energy: f64, theta: f64, depth: f64) -> Result<f64, TargetError> {
        self.ensure_composition()?;
        match self.path_length(theta, depth) {
            Some(path) => Ok(self.engine.energy_loss(zp, ap, energy, path)?),
            None => Ok(energy),
        }
    }

    fn reverse(&self, zp: u32, ap: u32, energy: f64, theta: f64, depth: f64) -> Result<f64, TargetError> {
        self.ensure_composition()?;
        match self.path_length(theta, depth) {
            Some(path) => Ok(self.engine.reverse_energy_loss(zp, ap, energy, path)?),
            None => Ok(energy),
        }
    }

    /// Path through `depth` of the thickness. `None` when the particle runs
    /// parallel to the face; angles past 90 degrees are folded back.
    fn path_length(&self, theta: f64, depth: f64) -> Option<f64> {
        if theta == FRAC_PI_2 {
            return None;
        }
        let theta = if theta > FRAC_PI_2 { PI - theta } else { theta };
        Some(depth * self.thickness / theta.cos().abs())
    }

    fn ensure_composition(&self) -> Result<(), TargetError> {
        if self.components.is_empty() {
            Err(TargetError::NoComposition)
        } else {
            Ok(())
        }
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    pub fn number_of_elements(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn element_z(&self, index: usize) -> Result<u32, TargetError> {
        self.indexed(index).map(|c| c.z)
    }

    pub fn element_a(&self, index: usize) -> Result<u32, TargetError> {
        self.indexed(index).map(|c| c.a)
    }

    pub fn element_stoich(&self, index: usize) -> Result<u32, TargetError> {
        self.indexed(index).map(|c| c.stoich)
    }

    fn indexed(&self, index: usize) -> Result<&Component, TargetError> {
        self.components.get(index).ok_or(TargetError::IndexOutOfRange {
            index,
            len: self.components.len(),
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the engine, e.g. to register more stopping tables.
    /// Changing its composition directly bypasses `set_elements`.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
