//! Isotopic mass lookup built from AMDC data.
//!
//! The mass file has two header lines followed by one record per isotope:
//!
//! ```text
//! <index> <Z> <A> <symbol> <mass (u)> <mass (micro-u)>
//! ```
//!
//! Electron masses are subtracted, so `find_mass` returns nuclear masses in
//! MeV.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::constants::{DEFAULT_MASS_FILE, ELECTRON_MASS_U, U_TO_MEV};
use crate::error::MassError;

const HEADER_LINES: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct MassTable {
    masses: HashMap<(u32, u32), f64>,
    symbols: HashMap<u32, String>,
}

impl MassTable {
    /// Load the table from `./etc/mass.txt`.
    pub fn new() -> Result<Self, MassError> {
        Self::from_path(DEFAULT_MASS_FILE)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MassError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MassError::DataFile {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Build a table from the contents of a mass file. `origin` only shows up
    /// in log output.
    pub fn parse(content: &str, origin: &str) -> Result<Self, MassError> {
        let mut table = MassTable::default();

        for (idx, line) in content.lines().enumerate().skip(HEADER_LINES) {
            let line_no = idx + 1;
            let mut fields = line.split_whitespace();
            if fields.next().is_none() {
                continue;
            }

            let z: u32 = next_field(&mut fields, line_no, "Z")?;
            let a: u32 = next_field(&mut fields, line_no, "A")?;
            let symbol: String = next_field(&mut fields, line_no, "element symbol")?;
            let bulk: f64 = next_field(&mut fields, line_no, "atomic mass")?;
            let fine: f64 = next_field(&mut fields, line_no, "atomic mass (micro-u)")?;

            let mass = (bulk + fine * 1e-6 - f64::from(z) * ELECTRON_MASS_U) * U_TO_MEV;
            table.masses.insert((z, a), mass);

            match table.symbols.get(&z) {
                Some(old) if *old != symbol => warn!(
                    "line {}: symbol for Z={} changed from '{}' to '{}'",
                    line_no, z, old, symbol
                ),
                _ => {}
            }
            table.symbols.insert(z, symbol);
        }

        debug!(
            "loaded {} isotopes ({} elements) from {}",
            table.masses.len(),
            table.symbols.len(),
            origin
        );
        Ok(table)
    }

    /// Nuclear mass of (Z, A) in MeV.
    pub fn find_mass(&self, z: u32, a: u32) -> Result<f64, MassError> {
        self.masses
            .get(&(z, a))
            .copied()
            .ok_or(MassError::MassNotFound { z, a })
    }

    /// Isotope label such as `"12C"`. Only Z has to be known; A is used
    /// verbatim.
    pub fn find_symbol(&self, z: u32, a: u32) -> Result<String, MassError> {
        self.symbols
            .get(&z)
            .map(|symbol| format!("{}{}", a, symbol))
            .ok_or(MassError::SymbolNotFound { z })
    }

    pub fn element_symbol(&self, z: u32) -> Option<&str> {
        self.symbols.get(&z).map(String::as_str)
    }

    pub fn contains(&self, z: u32, a: u32) -> bool {
        self.masses.contains_key(&(z, a))
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

fn next_field<'a, T, I>(fields: &mut I, line: usize, what: &str) -> Result<T, MassError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    I: Iterator<Item = &'a str>,
{
    let token = fields.next().ok_or_else(|| MassError::MalformedRecord {
        line,
        reason: format!("missing {}", what),
    })?;
    token.parse().map_err(|e| MassError::MalformedRecord {
        line,
        reason: format!("bad {} '{}': {}", what, token, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "header one\nheader two\n\
                          0 1 1 H 1 007825.03223\n\
                          2 2 4 He 4 002603.25413\n\
                          6 6 12 C 12 000000.0\n";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn masses_follow_amdc_formula() {
        let table = MassTable::parse(SAMPLE, "sample").unwrap();
        assert_eq!(table.len(), 3);

        let expected = (4.0 + 2603.25413e-6 - 2.0 * ELECTRON_MASS_U) * U_TO_MEV;
        assert!(close(table.find_mass(2, 4).unwrap(), expected));

        let carbon = (12.0 - 6.0 * ELECTRON_MASS_U) * U_TO_MEV;
        assert!(close(table.find_mass(6, 12).unwrap(), carbon));
        assert_eq!(table.find_mass(6, 12).unwrap(), table.find_mass(6, 12).unwrap());
    }

    #[test]
    fn header_lines_are_skipped_even_if_they_look_like_records() {
        let content = "0 1 1 H 1 0\n0 1 2 H 2 0\n2 2 4 He 4 002603.25413\n";
        let table = MassTable::parse(content, "sample").unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.contains(1, 1));
        assert!(table.contains(2, 4));
    }

    #[test]
    fn symbol_depends_only_on_z() {
        let table = MassTable::parse(SAMPLE, "sample").unwrap();
        assert_eq!(table.find_symbol(6, 12).unwrap(), "12C");
        assert_eq!(table.find_symbol(6, 14).unwrap(), "14C");
        assert_eq!(table.element_symbol(2), Some("He"));
    }

    #[test]
    fn missing_entries_are_lookup_errors() {
        let table = MassTable::parse(SAMPLE, "sample").unwrap();

        let err = table.find_mass(6, 14).unwrap_err();
        assert!(err.is_lookup());
        assert!(matches!(err, MassError::MassNotFound { z: 6, a: 14 }));

        let err = table.find_symbol(92, 238).unwrap_err();
        assert!(err.is_lookup());
        assert!(matches!(err, MassError::SymbolNotFound { z: 92 }));
    }

    #[test]
    fn later_records_overwrite_earlier_ones() {
        let content = "h\nh\n\
                       0 1 1 H 1 007825.0\n\
                       0 1 1 X 1 000000.0\n";
        let table = MassTable::parse(content, "dups").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.find_symbol(1, 1).unwrap(), "1X");
        let expected = (1.0 - ELECTRON_MASS_U) * U_TO_MEV;
        assert!(close(table.find_mass(1, 1).unwrap(), expected));
    }

    #[test]
    fn malformed_record_reports_its_line() {
        let content = "h\nh\n2 2 4 He 4 002603.25413\n3 3 six Li 6 0\n";
        match MassTable::parse(content, "bad") {
            Err(MassError::MalformedRecord { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected malformed record, got {:?}", other),
        }

        let truncated = "h\nh\n2 2 4 He 4\n";
        let err = MassTable::parse(truncated, "bad").unwrap_err();
        assert!(!err.is_lookup());
    }

    #[test]
    fn blank_lines_are_ignored() {
        let content = "h\nh\n\n2 2 4 He 4 002603.25413\n   \n";
        let table = MassTable::parse(content, "blank").unwrap();
        assert_eq!(table.len(), 1);
    }
}
