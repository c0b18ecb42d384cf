use crate::delta::Delta;
use crate::peptide::Peptide;
use crate::tables::ResidueTable;
use crate::Error;

#[derive(Debug, Clone, PartialEq)]
/// A peptide with zero or more residues removed from the N-terminus
pub struct Truncation {
    /// The truncated peptide. Termini are unchanged from the original
    pub peptide: Peptide,
    /// N-terminal residues that were removed
    pub removed: String,
    pub removed_mass: f32,
}

impl Truncation {
    /// The untruncated peptide is also a (trivial) truncation candidate
    pub fn is_trivial(&self) -> bool {
        self.removed.is_empty()
    }

    /// Delta describing the removed span, if any residues were removed
    pub fn delta(&self, likelihood: u32) -> Option<Delta> {
        match self.is_trivial() {
            true => None,
            false => Some(Delta::truncation(
                &self.removed,
                self.removed_mass,
                likelihood,
            )),
        }
    }
}

/// Lazily produce the N-terminal truncations of a peptide, shortest removal
/// first, starting with the untruncated peptide.
///
/// Iteration ends as soon as the cumulative removed mass exceeds
/// `target + confidence`; removing more residues only removes more mass, so
/// no later candidate could fall back into the acceptance window
pub struct Truncations<'a> {
    peptide: &'a Peptide,
    residues: Vec<(char, f32)>,
    ceiling: f32,
    index: usize,
    removed_mass: f32,
}

impl<'a> Truncations<'a> {
    pub fn new(
        peptide: &'a Peptide,
        table: &ResidueTable,
        target: f32,
        confidence: f32,
    ) -> Result<Self, Error> {
        let residues = peptide
            .sequence
            .chars()
            .map(|c| table.mass(c).map(|m| (c, m)))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Truncations {
            peptide,
            residues,
            ceiling: target + confidence,
            index: 0,
            removed_mass: 0.0,
        })
    }
}

impl<'a> Iterator for Truncations<'a> {
    type Item = Truncation;

    fn next(&mut self) -> Option<Self::Item> {
        // Never remove the entire sequence
        if self.index >= self.residues.len() {
            return None;
        }

        if self.index > 0 {
            self.removed_mass += self.residues[self.index - 1].1;
        }

        if self.removed_mass > self.ceiling {
            self.index = self.residues.len();
            return None;
        }

        let removed = self.residues[..self.index]
            .iter()
            .map(|(c, _)| c)
            .collect::<String>();
        let sequence = self.residues[self.index..]
            .iter()
            .map(|(c, _)| c)
            .collect::<String>();
        self.index += 1;

        Some(Truncation {
            peptide: Peptide::with_mass(
                sequence,
                self.peptide.n_terminus.as_str(),
                self.peptide.c_terminus.as_str(),
                self.peptide.mass - self.removed_mass,
            ),
            removed,
            removed_mass: self.removed_mass,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tables::TerminusTable;
    use quickcheck_macros::quickcheck;

    fn peptide(sequence: &str) -> Peptide {
        Peptide::new(
            sequence,
            "H",
            "OH",
            &ResidueTable::bundled(),
            &TerminusTable::bundled(),
        )
        .unwrap()
    }

    #[test]
    fn untruncated_first() {
        let table = ResidueTable::bundled();
        let p = peptide("ACDEF");
        let truncations = Truncations::new(&p, &table, 200.0, 1.0)
            .unwrap()
            .collect::<Vec<_>>();

        // A = 71.08, AC = 174.22, ACD = 289.31
        assert_eq!(truncations.len(), 3);
        assert!(truncations[0].is_trivial());
        assert_eq!(truncations[0].peptide, p);
        assert_eq!(truncations[0].delta(1), None);

        assert_eq!(truncations[1].removed, "A");
        assert_eq!(truncations[1].peptide.sequence, "CDEF");
        assert_eq!(truncations[2].removed, "AC");
        assert_eq!(truncations[2].peptide.sequence, "DEF");
        assert_eq!(truncations[2].peptide.n_terminus, "H");
        assert_eq!(truncations[2].peptide.c_terminus, "OH");
        assert!((truncations[2].removed_mass - 174.2176).abs() < 1e-3);
        assert!((p.mass - truncations[2].peptide.mass - 174.2176).abs() < 1e-3);

        let delta = truncations[2].delta(2).unwrap();
        assert_eq!(delta.description, "AC");
        assert_eq!(delta.likelihood, 2);
    }

    #[test]
    fn never_removes_everything() {
        let table = ResidueTable::bundled();
        let p = peptide("GGG");
        let truncations = Truncations::new(&p, &table, 10_000.0, 1.0).unwrap();
        let removed = truncations.map(|t| t.removed).collect::<Vec<_>>();
        assert_eq!(removed, vec!["", "G", "GG"]);

        let empty = peptide("");
        assert_eq!(Truncations::new(&empty, &table, 10.0, 1.0).unwrap().count(), 0);
    }

    #[test]
    fn negative_target() {
        // Observed mass is heavier than expected: nothing can be removed, and
        // even the untruncated peptide lies outside the window
        let table = ResidueTable::bundled();
        let p = peptide("ACDEF");
        assert_eq!(Truncations::new(&p, &table, -5.0, 1.0).unwrap().count(), 0);
        assert_eq!(Truncations::new(&p, &table, -1.0, 1.0).unwrap().count(), 1);
    }

    #[test]
    fn unknown_residue() {
        let table = ResidueTable::bundled();
        let p = Peptide::with_mass("AC*", "H", "OH", 100.0);
        assert!(matches!(
            Truncations::new(&p, &table, 100.0, 1.0),
            Err(Error::UnknownResidue('*'))
        ));
    }

    #[quickcheck]
    fn removed_mass_bounded(seed: Vec<u8>, target: u16, confidence: u8) -> bool {
        let table = ResidueTable::bundled();
        let alphabet = b"ACDEFGHIKLMNPQRSTVWY";
        let sequence = seed
            .iter()
            .map(|b| alphabet[*b as usize % alphabet.len()] as char)
            .collect::<String>();
        let p = peptide(&sequence);
        let (target, confidence) = (target as f32 / 10.0, confidence as f32 / 10.0);

        let truncations = Truncations::new(&p, &table, target, confidence)
            .unwrap()
            .collect::<Vec<_>>();
        truncations.len() <= sequence.len()
            && truncations.iter().enumerate().all(|(i, t)| {
                t.removed.len() == i && t.removed_mass <= target + confidence
            })
    }
}
