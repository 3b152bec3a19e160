use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MassError {
    #[error("could not read mass file '{path}': {source}")]
    DataFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed record on line {line} of mass file: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("mass of (Z={z}, A={a}) not found in mass table")]
    MassNotFound { z: u32, a: u32 },

    #[error("atomic number {z} not found in element table")]
    SymbolNotFound { z: u32 },
}

impl MassError {
    /// True when the error came from a query against a loaded table, as
    /// opposed to loading the table itself.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            MassError::MassNotFound { .. } | MassError::SymbolNotFound { .. }
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StoppingError {
    #[error("no stopping table for projectile (Z={zp}, A={ap}) in element Z={target_z}")]
    MissingTable { zp: u32, ap: u32, target_z: u32 },

    #[error("target composition is empty")]
    EmptyComposition,

    #[error("stopping table has no points")]
    EmptyTable,

    #[error("stopping table has {energies} energies but {stoppings} stopping powers")]
    TableShape { energies: usize, stoppings: usize },

    #[error("malformed stopping table line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum TargetError {
    #[error("element lists differ in length: {z} Z values, {a} A values, {stoich} stoichiometries")]
    CompositionMismatch { z: usize, a: usize, stoich: usize },

    #[error("target composition has not been set")]
    NoComposition,

    #[error("element index {index} out of range for target with {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("energy loss engine failed: {0}")]
    Engine(#[from] StoppingError),
}
