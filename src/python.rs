use std::path::PathBuf;

use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyKeyError, PyValueError};
use pyo3::prelude::*;

use crate::constants::DEFAULT_MASS_FILE;
use crate::error::{MassError, StoppingError, TargetError};
use crate::mass::MassTable;
use crate::stopping::{StoppingTable, TabulatedStopping};
use crate::target::Target;

impl From<MassError> for PyErr {
    fn from(err: MassError) -> PyErr {
        match &err {
            MassError::DataFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                PyFileNotFoundError::new_err(err.to_string())
            }
            MassError::DataFile { .. } => PyIOError::new_err(err.to_string()),
            e if e.is_lookup() => PyKeyError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

impl From<StoppingError> for PyErr {
    fn from(err: StoppingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<TargetError> for PyErr {
    fn from(err: TargetError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pyclass(name = "MassTable")]
struct PyMassTable {
    inner: MassTable,
}

#[pymethods]
impl PyMassTable {
    #[new]
    #[pyo3(signature = (path = None))]
    fn new(path: Option<PathBuf>) -> PyResult<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_MASS_FILE));
        Ok(Self {
            inner: MassTable::from_path(path)?,
        })
    }

    /// Nuclear mass in MeV.
    fn find_mass(&self, z: u32, a: u32) -> PyResult<f64> {
        Ok(self.inner.find_mass(z, a)?)
    }

    fn find_symbol(&self, z: u32, a: u32) -> PyResult<String> {
        Ok(self.inner.find_symbol(z, a)?)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Target backed by tabulated stopping powers. Register tables with
/// `insert_table` before asking for energies.
#[pyclass(name = "Target")]
struct PyTarget {
    inner: Target<TabulatedStopping>,
}

#[pymethods]
impl PyTarget {
    #[new]
    #[pyo3(signature = (thickness, step_fraction = None))]
    fn new(thickness: f64, step_fraction: Option<f64>) -> PyResult<Self> {
        let mut engine = TabulatedStopping::new();
        if let Some(step) = step_fraction {
            engine = engine.with_step_fraction(step)?;
        }
        Ok(Self {
            inner: Target::with_engine(thickness, engine),
        })
    }

    /// Register the stopping of projectile (zp, ap) in element `target_z`.
    /// Energies in MeV/u, stopping powers in MeV/(mg/cm^2).
    fn insert_table(
        &mut self,
        zp: u32,
        ap: u32,
        target_z: u32,
        energies: Vec<f64>,
        stoppings: Vec<f64>,
    ) -> PyResult<()> {
        let table = StoppingTable::new(energies, stoppings)?;
        self.inner.engine_mut().insert_table(zp, ap, target_z, table);
        Ok(())
    }

    fn set_elements(&mut self, z: Vec<u32>, a: Vec<u32>, stoich: Vec<u32>) -> PyResult<()> {
        Ok(self.inner.set_elements(&z, &a, &stoich)?)
    }

    fn contains_element(&self, z: u32, a: u32) -> bool {
        self.inner.contains_element(z, a)
    }

    fn energy_loss_total(&self, zp: u32, ap: u32, start_energy: f64, theta: f64) -> PyResult<f64> {
        Ok(self.inner.energy_loss_total(zp, ap, start_energy, theta)?)
    }

    fn energy_loss_half(&self, zp: u32, ap: u32, start_energy: f64, theta: f64) -> PyResult<f64> {
        Ok(self.inner.energy_loss_half(zp, ap, start_energy, theta)?)
    }

    fn reverse_energy_loss_total(&self, zp: u32, ap: u32, final_energy: f64, theta: f64) -> PyResult<f64> {
        Ok(self.inner.reverse_energy_loss_total(zp, ap, final_energy, theta)?)
    }

    fn reverse_energy_loss_half(&self, zp: u32, ap: u32, final_energy: f64, theta: f64) -> PyResult<f64> {
        Ok(self.inner.reverse_energy_loss_half(zp, ap, final_energy, theta)?)
    }

    #[getter]
    fn thickness(&self) -> f64 {
        self.inner.thickness()
    }

    #[setter]
    fn set_thickness(&mut self, thickness: f64) {
        self.inner.set_thickness(thickness);
    }

    fn number_of_elements(&self) -> usize {
        self.inner.number_of_elements()
    }
}

#[pymodule]
fn spanc(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyMassTable>()?;
    m.add_class::<PyTarget>()?;
    Ok(())
}
