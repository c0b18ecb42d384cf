use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A residue missing from the chain
    Deletion,
    /// A run of residues missing from the N-terminus
    Truncation,
    /// A residue-specific loss declared in the residue table, e.g. aspartimide
    /// formation or pyroglutamate formation
    Modification,
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Kind::Deletion => "deletion",
            Kind::Truncation => "truncation",
            Kind::Modification => "modification",
        })
    }
}

#[derive(Clone, Debug, Serialize)]
/// A single mass-altering event
///
/// # Important invariants about [`Delta`]:
/// * `mass` is the amount of mass lost, and is never negative
/// * two deltas are equal if and only if their kind, mass and description
///   are equal. `residue` and `likelihood` are ignored
/// * hashing only considers `description`
pub struct Delta {
    pub mass: f32,
    pub kind: Kind,
    pub description: String,
    pub likelihood: u32,
    /// Residue the event applies to, if it applies to a single residue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residue: Option<char>,
}

impl Delta {
    pub fn new<S: Into<String>>(kind: Kind, mass: f32, description: S, likelihood: u32) -> Self {
        debug_assert!(mass >= 0.0, "BUG: negative delta mass {}", mass);
        Delta {
            mass,
            kind,
            description: description.into(),
            likelihood,
            residue: None,
        }
    }

    pub fn deletion(residue: char, mass: f32, likelihood: u32) -> Self {
        Delta {
            residue: Some(residue),
            ..Delta::new(Kind::Deletion, mass, residue, likelihood)
        }
    }

    pub fn truncation(span: &str, mass: f32, likelihood: u32) -> Self {
        Delta::new(Kind::Truncation, mass, span, likelihood)
    }

    pub fn on_residue(mut self, residue: char) -> Self {
        self.residue = Some(residue);
        self
    }
}

impl PartialEq for Delta {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.mass.to_bits() == other.mass.to_bits()
            && self.description == other.description
    }
}

impl Eq for Delta {}

impl Hash for Delta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.description.hash(state);
    }
}

impl PartialOrd for Delta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Canonical member ordering used by [`DeltaSet`]
impl Ord for Delta {
    fn cmp(&self, other: &Self) -> Ordering {
        self.description
            .cmp(&other.description)
            .then(self.kind.cmp(&other.kind))
            .then(self.mass.total_cmp(&other.mass))
    }
}

impl Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}[-{}]", self.kind, self.description, self.mass)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
/// An immutable combination of unique [`Delta`]s
///
/// Members are kept in canonical order, so two sets built from the same
/// deltas in a different order are equal and hash identically
pub struct DeltaSet {
    deltas: Vec<Delta>,
    mass: f32,
    likelihood: u32,
}

impl DeltaSet {
    pub fn new<I: IntoIterator<Item = Delta>>(deltas: I) -> Self {
        let mut deltas = deltas.into_iter().collect::<Vec<_>>();
        deltas.sort();
        deltas.dedup();
        let mass = deltas.iter().map(|d| d.mass).sum();
        let likelihood = deltas.iter().map(|d| d.likelihood).sum();
        DeltaSet {
            deltas,
            mass,
            likelihood,
        }
    }

    /// Create a new set containing all of `self`, plus `delta`
    pub fn with(&self, delta: Delta) -> DeltaSet {
        match self.deltas.binary_search(&delta) {
            Ok(_) => self.clone(),
            Err(idx) => {
                let mut deltas = Vec::with_capacity(self.deltas.len() + 1);
                deltas.extend_from_slice(&self.deltas[..idx]);
                let mass = self.mass + delta.mass;
                let likelihood = self.likelihood + delta.likelihood;
                deltas.push(delta);
                deltas.extend_from_slice(&self.deltas[idx..]);
                DeltaSet {
                    deltas,
                    mass,
                    likelihood,
                }
            }
        }
    }

    pub fn union(&self, other: &DeltaSet) -> DeltaSet {
        other
            .deltas
            .iter()
            .fold(self.clone(), |acc, delta| acc.with(delta.clone()))
    }

    pub fn contains(&self, delta: &Delta) -> bool {
        self.deltas.binary_search(delta).is_ok()
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn likelihood(&self) -> u32 {
        self.likelihood
    }

    pub fn deltas(&self) -> &[Delta] {
        &self.deltas
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Delta> {
        self.deltas.iter()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Recompute the total mass from the members
    pub fn calculate_mass(&self) -> f32 {
        self.deltas.iter().map(|d| d.mass).sum()
    }
}

impl PartialEq for DeltaSet {
    fn eq(&self, other: &Self) -> bool {
        self.deltas == other.deltas
    }
}

impl Eq for DeltaSet {}

impl Hash for DeltaSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.deltas.hash(state);
    }
}

impl<'a> IntoIterator for &'a DeltaSet {
    type Item = &'a Delta;
    type IntoIter = std::slice::Iter<'a, Delta>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.iter()
    }
}

impl Display for DeltaSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[-{}]", self.mass)?;
        for delta in &self.deltas {
            write!(f, " {}", delta)?;
        }
        Ok(())
    }
}
