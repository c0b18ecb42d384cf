use std::collections::VecDeque;
use std::time::Instant;

use fnv::FnvHashSet;

use crate::delta::{Delta, DeltaSet};
use crate::mass::Window;
use crate::tables::ResidueTable;
use crate::Error;

/// Default bound on the number of deltas in a single combination
pub const MAX_DELTAS: usize = 4;

/// Number of states explored between deadline checks
const DEADLINE_INTERVAL: usize = 1024;

/// Build the search catalog for a sequence: every delta each residue can
/// contribute, in sequence order. Deltas that compare equal (e.g. deletion of
/// a residue that occurs more than once) are only listed once
pub fn catalog(sequence: &str, table: &ResidueTable) -> Result<Vec<Delta>, Error> {
    let mut seen = FnvHashSet::default();
    let mut catalog = Vec::new();
    for c in sequence.chars() {
        for delta in table.get(c)?.deltas(c) {
            if seen.insert(delta.clone()) {
                catalog.push(delta);
            }
        }
    }
    Ok(catalog)
}

struct Node {
    set: DeltaSet,
    /// Index of the first catalog entry that may still be added
    next: usize,
}

/// Breadth-first search over combinations of catalog deltas
pub struct DeltaSearch {
    catalog: Vec<Delta>,
    max_deltas: usize,
}

impl DeltaSearch {
    pub fn new(mut catalog: Vec<Delta>, max_deltas: usize) -> Self {
        // Heaviest first. Stable, so ties keep catalog order
        catalog.sort_by(|a, b| b.mass.total_cmp(&a.mass));
        DeltaSearch {
            catalog,
            max_deltas,
        }
    }

    pub fn from_sequence(
        sequence: &str,
        table: &ResidueTable,
        max_deltas: usize,
    ) -> Result<Self, Error> {
        Ok(Self::new(catalog(sequence, table)?, max_deltas))
    }

    /// Catalog in search order
    pub fn catalog(&self) -> &[Delta] {
        &self.catalog
    }

    /// Return every combination of at most `max_deltas` catalog entries whose
    /// total mass lies within `[target - confidence, target + confidence]`.
    ///
    /// Smaller combinations are found before larger ones. Since every delta
    /// mass is non-negative, a combination at or above the upper bound of the
    /// window is never extended
    pub fn search(&self, target: f32, confidence: f32) -> Vec<DeltaSet> {
        self.explore(target, confidence, None).unwrap_or_default()
    }

    /// Like [`DeltaSearch::search`], but gives up once `deadline` has passed.
    /// Returns `None` if the search was abandoned
    pub fn search_until(
        &self,
        target: f32,
        confidence: f32,
        deadline: Instant,
    ) -> Option<Vec<DeltaSet>> {
        self.explore(target, confidence, Some(deadline))
    }

    fn explore(
        &self,
        target: f32,
        confidence: f32,
        deadline: Option<Instant>,
    ) -> Option<Vec<DeltaSet>> {
        let window = Window::new(target, confidence);

        let mut solutions = Vec::new();
        let mut visited = FnvHashSet::default();
        let mut queue = VecDeque::new();

        let root = DeltaSet::default();
        visited.insert(root.clone());
        queue.push_back(Node { set: root, next: 0 });

        let mut explored = 0usize;
        while let Some(node) = queue.pop_front() {
            explored += 1;
            let checkpoint = explored % DEADLINE_INTERVAL == 0;
            if checkpoint && deadline.map_or(false, |d| Instant::now() >= d) {
                log::trace!("target {}: deadline reached after {} combinations", target, explored);
                return None;
            }

            if node.set.len() < self.max_deltas && node.set.mass() < window.hi {
                for (idx, delta) in self.catalog.iter().enumerate().skip(node.next) {
                    let successor = node.set.with(delta.clone());
                    if !visited.insert(successor.clone()) {
                        continue;
                    }
                    queue.push_back(Node {
                        set: successor,
                        next: idx + 1,
                    });
                }
            }

            if window.contains(node.set.mass()) {
                solutions.push(node.set);
            }
        }

        log::trace!(
            "target {}: explored {} combinations of {} deltas, {} solutions",
            target,
            explored,
            self.catalog.len(),
            solutions.len()
        );
        Some(solutions)
    }
}
