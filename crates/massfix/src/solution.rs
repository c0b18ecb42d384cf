use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::delta::{DeltaSet, Kind};
use crate::peptide::Peptide;
use crate::search::{DeltaSearch, MAX_DELTAS};
use crate::tables::ResidueTable;
use crate::truncation::Truncations;
use crate::Error;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Which residues are searched for deltas once a truncation has been applied
pub enum CatalogScope {
    /// Search the full, untruncated sequence for every truncation candidate.
    /// Residues that were already removed by the truncation can be counted a
    /// second time as deletions
    #[default]
    FullSequence,
    /// Only search the residues that remain after truncation
    Remaining,
}

#[derive(Deserialize, Serialize, Default, Clone, Debug)]
/// Search parameters, as supplied by the user
pub struct Builder {
    /// Maximum number of deltas (excluding truncation) in a single solution
    pub max_deltas: Option<usize>,
    /// Likelihood weight assigned to N-terminal truncations
    pub truncation_likelihood: Option<u32>,
    pub catalog_scope: Option<CatalogScope>,
    /// Maximum number of N-terminal residues that may be truncated
    pub max_truncations: Option<usize>,
}

impl Builder {
    pub fn make_parameters(self) -> Parameters {
        Parameters {
            max_deltas: self.max_deltas.map(|x| x.max(1)).unwrap_or(MAX_DELTAS),
            truncation_likelihood: self.truncation_likelihood.unwrap_or(1),
            catalog_scope: self.catalog_scope.unwrap_or_default(),
            max_truncations: self.max_truncations,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Parameters {
    pub max_deltas: usize,
    pub truncation_likelihood: u32,
    pub catalog_scope: CatalogScope,
    pub max_truncations: Option<usize>,
}

impl Default for Parameters {
    fn default() -> Self {
        Builder::default().make_parameters()
    }
}

pub struct Solver<'a> {
    residues: &'a ResidueTable,
    parameters: Parameters,
}

impl<'a> Solver<'a> {
    pub fn new(residues: &'a ResidueTable, parameters: Parameters) -> Self {
        Solver {
            residues,
            parameters,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Enumerate every combination of truncation and deltas that explains a
    /// mass difference of `target` (expected - observed) within `confidence`.
    ///
    /// Solutions are grouped by truncation, shortest truncation first. The
    /// same combination of deltas may appear under several truncations
    pub fn solve(
        &self,
        peptide: &Peptide,
        target: f32,
        confidence: f32,
    ) -> Result<Vec<DeltaSet>, Error> {
        Ok(self
            .assemble(peptide, target, confidence, None)?
            .unwrap_or_default())
    }

    /// Like [`Solver::solve`], but stops searching once `deadline` has passed.
    /// Returns `Ok(None)` if the search was abandoned; partial results are
    /// discarded
    pub fn solve_until(
        &self,
        peptide: &Peptide,
        target: f32,
        confidence: f32,
        deadline: Instant,
    ) -> Result<Option<Vec<DeltaSet>>, Error> {
        self.assemble(peptide, target, confidence, Some(deadline))
    }

    fn assemble(
        &self,
        peptide: &Peptide,
        target: f32,
        confidence: f32,
        deadline: Option<Instant>,
    ) -> Result<Option<Vec<DeltaSet>>, Error> {
        let max_deltas = self.parameters.max_deltas;
        let full = DeltaSearch::from_sequence(&peptide.sequence, self.residues, max_deltas)?;
        let limit = self
            .parameters
            .max_truncations
            .map(|n| n.saturating_add(1))
            .unwrap_or(usize::MAX);

        let mut solutions = Vec::new();
        for truncation in Truncations::new(peptide, self.residues, target, confidence)?.take(limit)
        {
            let residual = target - truncation.removed_mass;
            let remaining;
            let search = match (self.parameters.catalog_scope, truncation.is_trivial()) {
                (CatalogScope::Remaining, false) => {
                    remaining = DeltaSearch::from_sequence(
                        &truncation.peptide.sequence,
                        self.residues,
                        max_deltas,
                    )?;
                    &remaining
                }
                _ => &full,
            };
            let found = match deadline {
                Some(deadline) => match search.search_until(residual, confidence, deadline) {
                    Some(found) => found,
                    None => return Ok(None),
                },
                None => search.search(residual, confidence),
            };

            log::debug!(
                "{}: truncation `{}` leaves {}, {} solutions",
                peptide,
                truncation.removed,
                residual,
                found.len()
            );

            match truncation.delta(self.parameters.truncation_likelihood) {
                Some(delta) => {
                    solutions.extend(found.into_iter().map(|set| set.with(delta.clone())))
                }
                None => solutions.extend(found),
            }
        }
        Ok(Some(solutions))
    }
}

/// Render the sequence predicted by a solution: truncated residues are
/// wrapped in `[]`, deleted residues in `()` and otherwise modified residues
/// in `{}`.
///
/// Deltas only identify a residue type, so each one is shown at the first
/// matching residue that is not already accounted for. Deltas with no such
/// residue left (e.g. a deletion of a residue that was already truncated)
/// are listed after the C-terminus, as in `H-[A]GCK-OH (A)`
pub fn annotate(peptide: &Peptide, set: &DeltaSet) -> String {
    let residues = peptide.sequence.chars().collect::<Vec<_>>();
    let mut marks: Vec<Option<Kind>> = vec![None; residues.len()];

    let truncated = set
        .iter()
        .filter(|d| d.kind == Kind::Truncation)
        .map(|d| d.description.chars().count())
        .max()
        .unwrap_or(0)
        .min(residues.len());
    marks[..truncated]
        .iter_mut()
        .for_each(|m| *m = Some(Kind::Truncation));

    let mut unplaced = Vec::new();
    for delta in set.iter().filter(|d| d.kind != Kind::Truncation) {
        let pos = delta.residue.and_then(|residue| {
            (truncated..residues.len()).find(|&i| residues[i] == residue && marks[i].is_none())
        });
        match pos {
            Some(pos) => marks[pos] = Some(delta.kind),
            None => unplaced.push(delta),
        }
    }

    let mut s = format!("{}-", peptide.n_terminus);
    if truncated > 0 {
        s.push('[');
        s.extend(&residues[..truncated]);
        s.push(']');
    }
    for (residue, mark) in residues.iter().zip(&marks).skip(truncated) {
        match mark {
            Some(Kind::Deletion) => {
                s.push('(');
                s.push(*residue);
                s.push(')');
            }
            Some(Kind::Modification) => {
                s.push('{');
                s.push(*residue);
                s.push('}');
            }
            Some(Kind::Truncation) | None => s.push(*residue),
        }
    }
    s.push('-');
    s.push_str(&peptide.c_terminus);
    for delta in unplaced {
        match delta.kind {
            Kind::Modification => s.push_str(&format!(" {{{}}}", delta.description)),
            _ => s.push_str(&format!(" ({})", delta.description)),
        }
    }
    s
}
