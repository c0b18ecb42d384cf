use std::time::{Duration, Instant};

use anyhow::Context;
use log::info;
use massfix_core::delta::DeltaSet;
use massfix_core::solution::Solver;
use rayon::prelude::*;

use crate::input::{Query, Search};

pub enum Outcome {
    Solved(Vec<DeltaSet>),
    /// The search did not finish within the configured time budget. This is
    /// not the same as finding no solutions
    TimedOut(Duration),
}

impl Outcome {
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Solved(s) if s.is_empty() => "no_solutions",
            Outcome::Solved(_) => "solved",
            Outcome::TimedOut(_) => "timed_out",
        }
    }
}

pub struct Runner {
    pub parameters: Search,
    start: Instant,
}

impl Runner {
    pub fn new(parameters: Search) -> Self {
        Runner {
            parameters,
            start: Instant::now(),
        }
    }

    fn solve(&self, query: &Query) -> anyhow::Result<Vec<DeltaSet>> {
        let solver = Solver::new(&self.parameters.residues, self.parameters.search.clone());
        Ok(solver.solve(&query.peptide, query.target(), query.confidence)?)
    }

    /// Search cooperatively checks the deadline, so an expired query stops
    /// consuming its rayon worker shortly after `timeout` elapses
    fn solve_with_deadline(&self, query: &Query, timeout: Duration) -> anyhow::Result<Outcome> {
        let solver = Solver::new(&self.parameters.residues, self.parameters.search.clone());
        let deadline = Instant::now() + timeout;
        let outcome =
            match solver.solve_until(&query.peptide, query.target(), query.confidence, deadline)? {
                Some(solutions) => Outcome::Solved(solutions),
                None => Outcome::TimedOut(timeout),
            };
        Ok(outcome)
    }

    pub fn run_query(&self, idx: usize, query: &Query) -> anyhow::Result<Outcome> {
        let start = Instant::now();
        let outcome = match self.parameters.timeout() {
            Some(timeout) => self.solve_with_deadline(query, timeout),
            None => self.solve(query).map(Outcome::Solved),
        }
        .with_context(|| format!("Failed to search query {} ({})", idx, query.peptide))?;

        match &outcome {
            Outcome::Solved(solutions) if solutions.is_empty() => {
                log::warn!(
                    "query {}: no potential solutions found, try increasing the confidence",
                    idx
                )
            }
            Outcome::Solved(solutions) => info!(
                "query {}: found {} potential solutions in {:#?}",
                idx,
                solutions.len(),
                start.elapsed()
            ),
            Outcome::TimedOut(timeout) => log::warn!(
                "query {}: no result within the {:#?} budget; try a narrower confidence or fewer `max_deltas`",
                idx,
                timeout
            ),
        }
        Ok(outcome)
    }

    pub fn run(&self) -> anyhow::Result<Vec<String>> {
        info!(
            "searching {} queries, at most {} deltas per solution",
            self.parameters.queries.len(),
            self.parameters.search.max_deltas
        );

        let outcomes = self
            .parameters
            .queries
            .par_iter()
            .enumerate()
            .map(|(idx, query)| self.run_query(idx, query))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut outputs = vec![self.write_solutions(&outcomes)?];
        outputs.push(self.write_parameters()?);

        info!("finished in {:#?}", self.start.elapsed());
        for path in &outputs {
            info!("wrote {}", path);
        }
        Ok(outputs)
    }
}
