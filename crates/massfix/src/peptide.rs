use serde::Serialize;

use crate::tables::{ResidueTable, TerminusTable};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peptide {
    pub sequence: String,
    /// Chemical species at the N-terminus, e.g. `H`, `Acetyl N-cap`, `Fmoc`
    pub n_terminus: String,
    /// Chemical species at the C-terminus, e.g. `OH`, `NH2`
    pub c_terminus: String,
    /// Average mass of the full peptide, including both termini
    pub mass: f32,
}

impl Peptide {
    /// Build a peptide, computing its mass from the supplied tables.
    ///
    /// Fails if any residue or terminal species is missing from the tables
    pub fn new<S, T>(
        sequence: S,
        n_terminus: T,
        c_terminus: T,
        residues: &ResidueTable,
        termini: &TerminusTable,
    ) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        let sequence = sequence.into();
        let n_terminus = n_terminus.into();
        let c_terminus = c_terminus.into();

        let mut mass = termini.mass(&n_terminus)? + termini.mass(&c_terminus)?;
        for c in sequence.chars() {
            mass += residues.mass(c)?;
        }

        Ok(Peptide {
            sequence,
            n_terminus,
            c_terminus,
            mass,
        })
    }

    /// Build a peptide with a known mass, skipping table lookups
    pub fn with_mass<S, T>(sequence: S, n_terminus: T, c_terminus: T, mass: f32) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Peptide {
            sequence: sequence.into(),
            n_terminus: n_terminus.into(),
            c_terminus: c_terminus.into(),
            mass,
        }
    }

    /// Number of residues
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl std::fmt::Display for Peptide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.n_terminus, self.sequence, self.c_terminus)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn peptide(sequence: &str, n: &str, c: &str) -> Peptide {
        Peptide::new(
            sequence,
            n,
            c,
            &ResidueTable::bundled(),
            &TerminusTable::bundled(),
        )
        .unwrap()
    }

    #[test]
    fn natural_peptides() {
        assert!((peptide("KAY", "H", "OH").mass - 380.44).abs() <= 0.01);
        assert!((peptide("ACDEFGHIKLMNPQRSTWY", "H", "OH").mass - 2296.5973).abs() <= 0.01);
    }

    #[test]
    fn special_termini() {
        // K + A + Y = 362.4289
        let cases = [
            ("Fmoc", "NHNH2", 615.75),
            ("Acetyl N-cap", "MPAA", 571.4948),
            ("H", "NH2", 379.4578),
            ("H", "Dbz", 513.5058),
            ("H", "Nbz", 539.5878),
        ];
        for (n, c, expected) in cases {
            let p = peptide("KAY", n, c);
            assert!(
                (p.mass - expected).abs() <= 0.01,
                "{}: {} != {}",
                p,
                p.mass,
                expected
            );
        }
    }

    #[test]
    fn non_canonicals() {
        let p = peptide("ZXOUB", "H", "OH");
        assert!((p.mass - 1022.4653).abs() <= 0.01, "{}", p.mass);

        let p = peptide("KAYZ", "H", "MPAA");
        assert!((p.mass - 643.6328).abs() <= 0.01, "{}", p.mass);
    }

    #[test]
    fn mass_is_additive() {
        let residues = ResidueTable::bundled();
        let termini = TerminusTable::bundled();
        let p = peptide("GAVLIM", "Acetyl N-cap", "NH2");
        let expected = "GAVLIM"
            .chars()
            .map(|c| residues.mass(c).unwrap())
            .sum::<f32>()
            + termini.mass("Acetyl N-cap").unwrap()
            + termini.mass("NH2").unwrap();
        assert!((p.mass - expected).abs() < 1e-3);
        assert_eq!(p.len(), 6);
        assert_eq!(p.to_string(), "Acetyl N-cap-GAVLIM-NH2");
    }

    #[test]
    fn unknown_keys() {
        let residues = ResidueTable::bundled();
        let termini = TerminusTable::bundled();
        assert!(matches!(
            Peptide::new("KA*Y", "H", "OH", &residues, &termini),
            Err(Error::UnknownResidue('*'))
        ));
        assert!(matches!(
            Peptide::new("KAY", "Trt", "OH", &residues, &termini),
            Err(Error::UnknownTerminus(_))
        ));
    }

    #[test]
    fn supplied_mass() {
        let p = Peptide::with_mass("KAY", "H", "OH", 400.0);
        assert_eq!(p.mass, 400.0);
        assert!(Peptide::with_mass("", "H", "OH", 18.0).is_empty());
    }
}
