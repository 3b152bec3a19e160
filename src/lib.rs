//! Isotopic masses and target energy loss for SPANC-style kinematics.
//!
//! * [`MassTable`] loads AMDC masses once and answers (Z, A) queries.
//! * [`Target`] holds a slab's thickness and composition and folds the
//!   incidence angle into the path length handed to an [`EnergyLoss`]
//!   engine.
//!
//! ```no_run
//! use spanc::{MassTable, StoppingTable, TabulatedStopping, Target};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let masses = MassTable::new()?;
//! let alpha = masses.find_mass(2, 4)?;
//!
//! let mut engine = TabulatedStopping::new();
//! let table = StoppingTable::parse("E(MeV/u) S(MeV/(mg/cm2))\n1.0 1.1\n5.0 0.45\n10.0 0.27\n")?;
//! engine.insert_table(2, 4, 6, table);
//! let mut target = Target::with_engine(0.05, engine);
//! target.set_elements(&[6], &[12], &[1])?;
//! let e_out = target.energy_loss_half(2, 4, 20.0, 0.3)?;
//! # let _ = (alpha, e_out);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
mod interpolation;
pub mod mass;
#[cfg(feature = "python")]
mod python;
pub mod stopping;
pub mod target;

pub use error::{MassError, StoppingError, TargetError};
pub use interpolation::Interpolated;
pub use mass::MassTable;
pub use stopping::{Component, EnergyLoss, StoppingTable, TabulatedStopping};
pub use target::Target;
