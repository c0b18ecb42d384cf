use massfix_core::delta::{DeltaSet, Kind};
use massfix_core::peptide::Peptide;
use massfix_core::solution::{Parameters, Solver};
use massfix_core::tables::{ResidueTable, TerminusTable};

const EXPECTED: &str = "ACDEFGHIKLMNPQRSTVWY";

fn solve(observed: &str) -> (f32, Vec<DeltaSet>) {
    let residues = ResidueTable::bundled();
    let termini = TerminusTable::bundled();

    let expected = Peptide::new(EXPECTED, "H", "OH", &residues, &termini).unwrap();
    let observed = Peptide::new(observed, "H", "OH", &residues, &termini).unwrap();
    let target = expected.mass - observed.mass;

    let solver = Solver::new(&residues, Parameters::default());
    (target, solver.solve(&expected, target, 1.0).unwrap())
}

fn has_deletion(set: &DeltaSet, residue: &str) -> bool {
    set.iter()
        .any(|d| d.kind == Kind::Deletion && d.description == residue)
}

#[test]
fn missing_methionine() {
    let (target, solutions) = solve("ACDEFGHIKLNPQRSTVWY");
    assert_eq!(solutions.len(), 1);
    assert!((solutions[0].mass() - target).abs() <= 0.01);
    assert!(has_deletion(&solutions[0], "M"));
}

#[test]
fn missing_isoleucine() {
    // Ile is isobaric with Leu, and within 1 Da of Asn
    let (target, solutions) = solve("ACDEFGHKLMNPQRSTVWY");
    assert_eq!(solutions.len(), 3);
    for solution in &solutions {
        assert!((solution.mass() - target).abs() <= 1.01);
    }
    for residue in ["I", "L", "N"] {
        assert!(solutions.iter().any(|s| has_deletion(s, residue)));
    }
}

#[test]
fn missing_proline_and_valine() {
    let (target, solutions) = solve("ACDEFGHIKLMNQRSTWY");
    assert_eq!(solutions.len(), 1);
    assert!((solutions[0].mass() - target).abs() <= 0.01);
    assert!(has_deletion(&solutions[0], "P"));
    assert!(has_deletion(&solutions[0], "V"));
}

#[test]
fn deterministic() {
    let (_, a) = solve("DEFGHIKLMNPQRSTVWY");
    let (_, b) = solve("DEFGHIKLMNPQRSTVWY");
    assert!(!a.is_empty());
    assert_eq!(a, b);
}
