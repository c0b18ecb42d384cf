use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::ArgMatches;
use massfix_core::{
    mass::Tolerance,
    peptide::Peptide,
    solution::{Builder, Parameters},
    tables::{ResidueTable, TerminusTable},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NonCanonical {
    pub name: String,
    pub mass: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
/// A single peptide to explain, as supplied by the user
pub struct QueryInput {
    pub sequence: String,
    pub observed_mass: f32,
    pub n_terminus: Option<String>,
    pub c_terminus: Option<String>,
    /// Overrides the top-level confidence for this query
    pub confidence: Option<Tolerance>,
}

#[derive(Serialize, Clone, Debug)]
/// A validated query
pub struct Query {
    pub peptide: Peptide,
    pub observed_mass: f32,
    /// Confidence of the observed mass, in Da
    pub confidence: f32,
}

impl Query {
    /// Mass difference to explain: expected - observed
    pub fn target(&self) -> f32 {
        self.peptide.mass - self.observed_mass
    }
}

#[derive(Serialize)]
/// Actual search parameters - may include overrides or default values not set by user
pub struct Search {
    pub version: String,
    pub search: Parameters,
    pub residue_table: Option<String>,
    pub terminus_table: Option<String>,
    pub non_canonicals: BTreeMap<String, NonCanonical>,
    pub queries: Vec<Query>,
    pub timeout: Option<u64>,

    #[serde(skip_serializing)]
    pub residues: Arc<ResidueTable>,
    #[serde(skip_serializing)]
    pub termini: Arc<TerminusTable>,
    #[serde(skip_serializing)]
    pub output_directory: PathBuf,
}

impl Search {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[derive(Deserialize, Default)]
/// Input search parameters deserialized from JSON file
pub struct Input {
    residues: Option<String>,
    termini: Option<String>,
    non_canonicals: Option<BTreeMap<String, NonCanonical>>,
    search: Option<Builder>,
    confidence: Option<Tolerance>,
    output_directory: Option<String>,
    queries: Option<Vec<QueryInput>>,
    timeout: Option<u64>,
}

impl Input {
    pub fn from_arguments(matches: ArgMatches) -> anyhow::Result<Self> {
        let mut input = match matches.get_one::<String>("parameters") {
            Some(path) => Input::load(path)
                .with_context(|| format!("Failed to read parameters from `{path}`"))?,
            None => Input::default(),
        };

        // Handle JSON configuration overrides
        if let Some(output_directory) = matches.get_one::<String>("output_directory") {
            log::trace!("overriding `output_directory` parameter.");
            input.output_directory = Some(output_directory.into());
        }
        if let Some(confidence) = matches.get_one::<f32>("confidence").copied() {
            log::trace!("overriding `confidence` parameter.");
            input.confidence = Some(Tolerance::Da(confidence));
        }
        if let Some(timeout) = matches.get_one::<u64>("timeout").copied() {
            log::trace!("overriding `timeout` parameter.");
            input.timeout = Some(timeout);
        }
        if let Some(sequence) = matches.get_one::<String>("sequence") {
            log::trace!("overriding `queries` parameter.");
            let observed_mass = matches.get_one::<f32>("observed").copied();
            ensure!(
                observed_mass.is_some(),
                "`--observed` must be set when `--sequence` is used. For more information try '--help'"
            );
            input.queries = Some(vec![QueryInput {
                sequence: sequence.into(),
                observed_mass: observed_mass.unwrap_or_default(),
                n_terminus: matches.get_one::<String>("n_terminus").cloned(),
                c_terminus: matches.get_one::<String>("c_terminus").cloned(),
                confidence: None,
            }]);
        }

        ensure!(
            input.queries.as_ref().map_or(false, |q| !q.is_empty()),
            "At least one query must be set, either in the parameter file or with `--sequence`. For more information try '--help'"
        );

        Ok(input)
    }

    pub fn load<S: AsRef<str>>(path: S) -> anyhow::Result<Self> {
        massfix_core::read_json(path.as_ref()).map_err(anyhow::Error::from)
    }

    fn check_confidence(confidence: f32) {
        if confidence > 5.0 {
            log::warn!(
                "A confidence of {} Da is unusually wide; expect many solutions and long searches",
                confidence
            );
        }
    }

    fn load_tables(&self) -> anyhow::Result<(ResidueTable, TerminusTable)> {
        let mut residues = match &self.residues {
            Some(path) => ResidueTable::load(path)
                .with_context(|| format!("Failed to read residue table from `{path}`"))?,
            None => ResidueTable::bundled(),
        };
        let termini = match &self.termini {
            Some(path) => TerminusTable::load(path)
                .with_context(|| format!("Failed to read terminus table from `{path}`"))?,
            None => TerminusTable::bundled(),
        };

        for (symbol, residue) in self.non_canonicals.iter().flatten() {
            let mut chars = symbol.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => anyhow::bail!("Non-canonical residue symbol `{symbol}` must be one character"),
            };
            if residues.contains(c) {
                log::warn!("non-canonical residue `{}` overrides an existing residue", c);
            }
            residues
                .merge_non_canonical(c, residue.name.as_str(), residue.mass)
                .with_context(|| format!("Invalid non-canonical residue `{symbol}`"))?;
        }

        Ok((residues, termini))
    }

    pub fn build(self) -> anyhow::Result<Search> {
        let (residues, termini) = self.load_tables()?;
        let default_confidence = self.confidence.unwrap_or_default();

        let mut queries = Vec::new();
        for (idx, query) in self.queries.iter().flatten().enumerate() {
            let sequence = query.sequence.trim().to_uppercase();
            ensure!(!sequence.is_empty(), "Query {idx}: sequence is empty");
            ensure!(
                query.observed_mass.is_finite() && query.observed_mass > 0.0,
                "Query {idx}: observed mass must be a positive number, got {}",
                query.observed_mass
            );

            let peptide = Peptide::new(
                sequence,
                query.n_terminus.as_deref().unwrap_or("H"),
                query.c_terminus.as_deref().unwrap_or("OH"),
                &residues,
                &termini,
            )
            .with_context(|| format!("Query {idx}: invalid peptide"))?;

            let confidence = query
                .confidence
                .unwrap_or(default_confidence)
                .confidence(query.observed_mass);
            ensure!(
                confidence.is_finite(),
                "Query {idx}: confidence must be a number"
            );
            Self::check_confidence(confidence);

            log::info!(
                "query {}: expected mass of {} is {}, delta is {}",
                idx,
                peptide,
                peptide.mass,
                peptide.mass - query.observed_mass
            );

            queries.push(Query {
                peptide,
                observed_mass: query.observed_mass,
                confidence,
            });
        }

        let search = self.search.unwrap_or_default().make_parameters();
        if search.max_deltas > 6 {
            log::warn!(
                "`max_deltas: {}` may cause very long searches. Typical usage: `max_deltas: 4`",
                search.max_deltas
            );
        }

        let output_directory = match self.output_directory {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::create_dir_all(&path).with_context(|| {
                    format!("Failed to create output directory `{}`", path.display())
                })?;
                path
            }
            None => std::env::current_dir()?,
        };

        Ok(Search {
            version: clap::crate_version!().into(),
            search,
            residue_table: self.residues,
            terminus_table: self.termini,
            non_canonicals: self.non_canonicals.unwrap_or_default(),
            queries,
            timeout: self.timeout,
            residues: Arc::new(residues),
            termini: Arc::new(termini),
            output_directory,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn input(json: &str) -> Input {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn defaults() {
        let search = input(
            r#"{
                "output_directory": "target/massfix-input-defaults",
                "queries": [{"sequence": "kay", "observed_mass": 300.0}]
            }"#,
        )
        .build()
        .unwrap();

        assert_eq!(search.queries.len(), 1);
        let query = &search.queries[0];
        assert_eq!(query.peptide.sequence, "KAY");
        assert_eq!(query.peptide.n_terminus, "H");
        assert_eq!(query.peptide.c_terminus, "OH");
        assert_eq!(query.confidence, 1.0);
        assert!((query.target() - 80.44).abs() < 0.01);
        assert_eq!(search.search, Parameters::default());
        assert_eq!(search.timeout(), None);
    }

    #[test]
    fn non_canonicals_and_ppm() {
        let search = input(
            r#"{
                "output_directory": "target/massfix-input-ppm",
                "non_canonicals": {"1": {"name": "Homoserine", "mass": 101.1051}},
                "confidence": {"ppm": 500},
                "search": {"max_deltas": 2},
                "timeout": 30,
                "queries": [
                    {"sequence": "KA1Y", "observed_mass": 400.0, "c_terminus": "NH2"},
                    {"sequence": "KAY", "observed_mass": 300.0, "confidence": {"da": 0.25}}
                ]
            }"#,
        )
        .build()
        .unwrap();

        assert!(search.residues.contains('1'));
        assert_eq!(search.search.max_deltas, 2);
        assert_eq!(search.timeout(), Some(Duration::from_secs(30)));
        assert!((search.queries[0].confidence - 0.2).abs() < 1e-6);
        assert_eq!(search.queries[1].confidence, 0.25);
    }

    #[test]
    fn invalid_queries() {
        let unknown_residue = input(
            r#"{"output_directory": "target/massfix-input-invalid",
                "queries": [{"sequence": "KA*Y", "observed_mass": 300.0}]}"#,
        );
        assert!(unknown_residue.build().is_err());

        let unknown_terminus = input(
            r#"{"output_directory": "target/massfix-input-invalid",
                "queries": [{"sequence": "KAY", "observed_mass": 300.0, "n_terminus": "Trt"}]}"#,
        );
        assert!(unknown_terminus.build().is_err());

        let negative_mass = input(
            r#"{"output_directory": "target/massfix-input-invalid",
                "queries": [{"sequence": "KAY", "observed_mass": -1.0}]}"#,
        );
        assert!(negative_mass.build().is_err());

        let bad_symbol = input(
            r#"{"output_directory": "target/massfix-input-invalid",
                "non_canonicals": {"Hse": {"name": "Homoserine", "mass": 101.1}},
                "queries": [{"sequence": "KAY", "observed_mass": 300.0}]}"#,
        );
        assert!(bad_symbol.build().is_err());
    }
}
