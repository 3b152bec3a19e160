//! Physical constants and default locations.

/// Atomic mass unit in MeV.
pub const U_TO_MEV: f64 = 931.4940954;

/// Electron mass in atomic mass units.
pub const ELECTRON_MASS_U: f64 = 0.000548579909;

/// Where `MassTable::new` looks for the AMDC mass file, relative to the
/// working directory.
pub const DEFAULT_MASS_FILE: &str = "./etc/mass.txt";

/// Fraction of the path covered by one integration step in `TabulatedStopping`.
pub const DEFAULT_STEP_FRACTION: f64 = 1e-4;
