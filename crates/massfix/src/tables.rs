//! Residue and terminal species lookup tables
//!
//! Tables are loaded once by the caller and passed by reference into
//! peptide construction and the search. Bundled defaults use average masses.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::delta::{Delta, Kind};
use crate::Error;

const BUNDLED_RESIDUES: &str = include_str!("../data/residues.json");
const BUNDLED_TERMINI: &str = include_str!("../data/termini.json");

fn default_likelihood() -> u32 {
    1
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
/// An additional mass-losing event that can happen to a residue
pub struct Event {
    pub kind: Kind,
    pub mass: f32,
    pub description: String,
    #[serde(default = "default_likelihood")]
    pub likelihood: u32,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Residue {
    pub name: String,
    pub mass: f32,
    #[serde(default)]
    pub non_canonical: bool,
    /// Likelihood weight of this residue being deleted
    #[serde(default = "default_likelihood")]
    pub deletion_likelihood: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
}

impl Residue {
    pub fn new<S: Into<String>>(name: S, mass: f32) -> Self {
        Residue {
            name: name.into(),
            mass,
            non_canonical: false,
            deletion_likelihood: default_likelihood(),
            events: Vec::new(),
        }
    }

    /// All deltas this residue can contribute to a search catalog: a deletion,
    /// followed by any declared events
    pub fn deltas(&self, symbol: char) -> impl Iterator<Item = Delta> + '_ {
        std::iter::once(Delta::deletion(symbol, self.mass, self.deletion_likelihood)).chain(
            self.events.iter().map(move |ev| {
                Delta::new(ev.kind, ev.mass, ev.description.as_str(), ev.likelihood)
                    .on_residue(symbol)
            }),
        )
    }
}

fn check_mass(what: &str, mass: f32) -> Result<(), Error> {
    if mass.is_finite() && mass >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidMass(what.into(), mass))
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ResidueTable {
    residues: BTreeMap<char, Residue>,
}

impl ResidueTable {
    /// Average residue masses for the 20 canonical amino acids, plus a set of
    /// predefined non-canonical residues
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_RESIDUES).expect("BUG: bundled residue table is invalid")
    }

    pub fn from_json(s: &str) -> Result<Self, Error> {
        let raw: HashMap<String, Residue> = serde_json::from_str(s)?;
        let mut table = ResidueTable {
            residues: BTreeMap::new(),
        };
        for (key, residue) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => table.insert(symbol, residue)?,
                _ => return Err(Error::InvalidSymbol(key)),
            }
        }
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Insert or replace a residue definition
    pub fn insert(&mut self, symbol: char, residue: Residue) -> Result<(), Error> {
        check_mass(&residue.name, residue.mass)?;
        for ev in &residue.events {
            check_mass(&ev.description, ev.mass)?;
        }
        if let Some(prev) = self.residues.insert(symbol, residue) {
            log::debug!("residue `{}` ({}) was redefined", symbol, prev.name);
        }
        Ok(())
    }

    /// Declare a user-defined non-canonical residue, overriding any existing
    /// definition of `symbol`
    pub fn merge_non_canonical<S: Into<String>>(
        &mut self,
        symbol: char,
        name: S,
        mass: f32,
    ) -> Result<(), Error> {
        let mut residue = Residue::new(name, mass);
        residue.non_canonical = true;
        self.insert(symbol, residue)
    }

    pub fn get(&self, symbol: char) -> Result<&Residue, Error> {
        self.residues
            .get(&symbol)
            .ok_or(Error::UnknownResidue(symbol))
    }

    pub fn mass(&self, symbol: char) -> Result<f32, Error> {
        self.get(symbol).map(|r| r.mass)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.residues.contains_key(&symbol)
    }

    pub fn non_canonicals(&self) -> impl Iterator<Item = (char, &Residue)> {
        self.iter().filter(|(_, r)| r.non_canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Residue)> {
        self.residues.iter().map(|(c, r)| (*c, r))
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl Default for ResidueTable {
    fn default() -> Self {
        Self::bundled()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct TerminusTable {
    species: BTreeMap<String, f32>,
}

impl TerminusTable {
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_TERMINI).expect("BUG: bundled terminus table is invalid")
    }

    pub fn from_json(s: &str) -> Result<Self, Error> {
        let table: TerminusTable = serde_json::from_str(s)?;
        for (name, mass) in &table.species {
            if !mass.is_finite() {
                return Err(Error::InvalidMass(name.clone(), *mass));
            }
        }
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn mass(&self, species: &str) -> Result<f32, Error> {
        self.species
            .get(species)
            .copied()
            .ok_or_else(|| Error::UnknownTerminus(species.into()))
    }

    pub fn contains(&self, species: &str) -> bool {
        self.species.contains_key(species)
    }

    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }
}

impl Default for TerminusTable {
    fn default() -> Self {
        Self::bundled()
    }
}
