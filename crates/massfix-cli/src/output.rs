use std::path::PathBuf;

use massfix_core::delta::DeltaSet;
use massfix_core::solution::annotate;

use crate::input::Query;
use crate::runner::{Outcome, Runner};

pub const HEADERS: [&str; 17] = [
    "query",
    "status",
    "sequence",
    "n_terminus",
    "c_terminus",
    "expected_mass",
    "observed_mass",
    "target",
    "confidence",
    "solution_mass",
    "predicted_mass",
    "error",
    "likelihood",
    "num_deltas",
    "kinds",
    "deltas",
    "annotated",
];

impl Runner {
    pub fn make_path(&self, name: &str) -> PathBuf {
        self.parameters.output_directory.join(name)
    }

    fn serialize_query(&self, idx: usize, status: &str, query: &Query) -> csv::ByteRecord {
        let mut record = csv::ByteRecord::new();
        record.push_field(itoa::Buffer::new().format(idx).as_bytes());
        record.push_field(status.as_bytes());
        record.push_field(query.peptide.sequence.as_bytes());
        record.push_field(query.peptide.n_terminus.as_bytes());
        record.push_field(query.peptide.c_terminus.as_bytes());
        record.push_field(ryu::Buffer::new().format(query.peptide.mass).as_bytes());
        record.push_field(ryu::Buffer::new().format(query.observed_mass).as_bytes());
        record.push_field(ryu::Buffer::new().format(query.target()).as_bytes());
        record.push_field(ryu::Buffer::new().format(query.confidence).as_bytes());
        record
    }

    pub fn serialize_solution(&self, idx: usize, query: &Query, set: &DeltaSet) -> csv::ByteRecord {
        let mut record = self.serialize_query(idx, "solved", query);
        record.push_field(ryu::Buffer::new().format(set.mass()).as_bytes());
        record.push_field(
            ryu::Buffer::new()
                .format(query.peptide.mass - set.mass())
                .as_bytes(),
        );
        record.push_field(
            ryu::Buffer::new()
                .format(set.mass() - query.target())
                .as_bytes(),
        );
        record.push_field(itoa::Buffer::new().format(set.likelihood()).as_bytes());
        record.push_field(itoa::Buffer::new().format(set.len()).as_bytes());
        record.push_field(
            set.iter()
                .map(|d| d.kind.to_string())
                .collect::<Vec<_>>()
                .join(";")
                .as_bytes(),
        );
        record.push_field(
            set.iter()
                .map(|d| d.description.as_str())
                .collect::<Vec<_>>()
                .join(";")
                .as_bytes(),
        );
        record.push_field(annotate(&query.peptide, set).as_bytes());
        record
    }

    /// Queries without solutions still get a row, so that "nothing found"
    /// and "ran out of time" can be told apart
    fn serialize_unsolved(&self, idx: usize, query: &Query, outcome: &Outcome) -> csv::ByteRecord {
        let mut record = self.serialize_query(idx, outcome.status(), query);
        for _ in record.len()..HEADERS.len() {
            record.push_field(b"");
        }
        record
    }

    pub fn write_solutions(&self, outcomes: &[Outcome]) -> anyhow::Result<String> {
        let path = self.make_path("results.massfix.tsv");

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(vec![]);

        wtr.write_byte_record(&csv::ByteRecord::from(HEADERS.to_vec()))?;
        for (idx, (query, outcome)) in self.parameters.queries.iter().zip(outcomes).enumerate() {
            match outcome {
                Outcome::Solved(solutions) if !solutions.is_empty() => {
                    for set in solutions {
                        wtr.write_byte_record(&self.serialize_solution(idx, query, set))?;
                    }
                }
                _ => wtr.write_byte_record(&self.serialize_unsolved(idx, query, outcome))?,
            }
        }

        wtr.flush()?;
        let bytes = wtr.into_inner()?;
        std::fs::write(&path, bytes)?;
        Ok(path.display().to_string())
    }

    /// Echo the effective parameters, including defaults
    pub fn write_parameters(&self) -> anyhow::Result<String> {
        let path = self.make_path("results.json");
        let bytes = serde_json::to_vec_pretty(&self.parameters)?;
        std::fs::write(&path, bytes)?;
        Ok(path.display().to_string())
    }
}
