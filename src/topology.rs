//! Full reconstruction of the set ordering and the frontier table.
//!
//! The sets are the nodes of a directed graph: within each sequence, every
//! anchor has an edge to the next anchor of that sequence. A consistent
//! collection of sets admits a topological order of this graph, which
//! [Kahn's algorithm] finds. The frontier table is then filled with one
//! forward sweep (lower bounds) and one backward sweep (upper bounds).
//!
//! [Kahn's algorithm]: https://en.wikipedia.org/wiki/Topological_sorting#Kahn's_algorithm

use std::collections::VecDeque;

use tracing::debug;

use crate::bound::Lower;
use crate::bound::Upper;
use crate::sequence::Index;
use crate::set::SetId;
use crate::set::Store;

/// An error related to a [`Topology`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The sets contradict each other: ordering them by position within each
    /// sequence forms a cycle.
    Cycle {
        /// The number of sets that could not be ordered.
        unordered: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Cycle { unordered } => write!(
                f,
                "alignment sets are inconsistent: {unordered} set(s) lie on a cycle"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The adjacency between sets and a topological order over them.
#[derive(Debug)]
pub struct Topology {
    /// The immediate predecessors of each set (one per sequence it spans,
    /// unless it is the first anchor there).
    predecessors: Vec<Vec<SetId>>,

    /// The immediate successors of each set.
    successors: Vec<Vec<SetId>>,

    /// The sets in topological order.
    order: Vec<SetId>,
}

impl Topology {
    /// Derives the adjacency from the anchor order within each sequence and
    /// orders the sets.
    ///
    /// Walking the sequences also relinks every gap between anchors in the
    /// `index`, so that the hints are fresh whether or not ordering succeeds.
    pub fn try_build(index: &mut Index, store: &Store) -> Result<Self> {
        let mut predecessors = vec![Vec::new(); store.len()];
        let mut successors = vec![Vec::new(); store.len()];
        let mut edges = 0usize;

        for sequence in index.iter_mut() {
            let anchors = sequence.anchors().collect::<Vec<_>>();
            let mut last: Option<(usize, SetId)> = None;

            for (position, set) in anchors {
                sequence.link_gap(last.map(|(p, _)| p), Some(position));

                if let Some((_, previous)) = last {
                    successors[previous].push(set);
                    predecessors[set].push(previous);
                    edges += 1;
                }

                last = Some((position, set));
            }

            sequence.link_gap(last.map(|(p, _)| p), None);
        }

        let mut in_degree = predecessors.iter().map(Vec::len).collect::<Vec<_>>();
        let mut ready = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(set, _)| set)
            .collect::<VecDeque<_>>();

        let mut order = Vec::with_capacity(store.len());

        while let Some(set) = ready.pop_front() {
            order.push(set);

            for &next in &successors[set] {
                in_degree[next] -= 1;

                if in_degree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }

        if order.len() != store.len() {
            return Err(Error::Cycle {
                unordered: store.len() - order.len(),
            });
        }

        debug!(sets = store.len(), edges, "ordered alignment sets");

        Ok(Self {
            predecessors,
            successors,
            order,
        })
    }

    /// Gets the sets in topological order.
    pub fn order(&self) -> &[SetId] {
        &self.order
    }

    /// Consumes self and returns the topological order.
    pub fn into_order(self) -> Vec<SetId> {
        self.order
    }

    /// Gets the immediate predecessors of a set.
    pub fn predecessors(&self, set: SetId) -> &[SetId] {
        &self.predecessors[set]
    }

    /// Gets the immediate successors of a set.
    pub fn successors(&self, set: SetId) -> &[SetId] {
        &self.successors[set]
    }

    /// Recomputes every frontier in the `store` from scratch.
    pub fn sweep(&self, store: &mut Store) {
        let width = store.iter().next().map(|r| r.set().width()).unwrap_or(0);

        // (1) Lower bounds flow forward along the order.
        for &set in &self.order {
            for sequence in 0..width {
                let pred = match store.set(set).member(sequence) {
                    Some(position) => Lower::At(position),
                    None => self.predecessors[set]
                        .iter()
                        .map(|&previous| store.frontiers(previous)[sequence].pred())
                        .max()
                        .unwrap_or(Lower::Unbounded),
                };

                store.frontiers_mut(set)[sequence].set_pred(pred);
            }
        }

        // (2) Upper bounds flow backward along the order.
        for &set in self.order.iter().rev() {
            for sequence in 0..width {
                let succ = match store.set(set).member(sequence) {
                    Some(position) => Upper::At(position),
                    None => self.successors[set]
                        .iter()
                        .map(|&next| store.frontiers(next)[sequence].succ())
                        .min()
                        .unwrap_or(Upper::Unbounded),
                };

                store.frontiers_mut(set)[sequence].set_succ(succ);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::Frontier;
    use crate::set::Set;
    use crate::set::store::Record;

    fn store(index: &mut Index, rows: Vec<Vec<Option<usize>>>) -> Store {
        let mut store = Store::default();

        for row in rows {
            store
                .append(Record::seeded(Set::from_members(row)), index)
                .unwrap();
        }

        store
    }

    #[test]
    fn orders_a_chain() {
        let mut index = Index::new([10, 10]);
        let store = store(
            &mut index,
            vec![
                vec![Some(6), None],
                vec![Some(2), Some(1)],
                vec![None, Some(4)],
            ],
        );

        let topology = Topology::try_build(&mut index, &store).unwrap();

        assert_eq!(topology.order(), &[1, 0, 2]);
        assert_eq!(topology.successors(1), &[0, 2]);
        assert_eq!(topology.predecessors(0), &[1]);
    }

    #[test]
    fn sweeps_fill_transitive_bounds() {
        let mut index = Index::new([10, 10, 10]);
        let mut store = store(
            &mut index,
            vec![
                vec![Some(2), Some(3), None],
                vec![None, Some(5), Some(6)],
            ],
        );

        let topology = Topology::try_build(&mut index, &store).unwrap();
        topology.sweep(&mut store);

        // The first set is forced before position 6 of the third sequence.
        assert_eq!(
            store.frontiers(0)[2],
            Frontier::new(Lower::Unbounded, Upper::At(6))
        );

        // The second set is forced after position 2 of the first sequence.
        assert_eq!(
            store.frontiers(1)[0],
            Frontier::new(Lower::At(2), Upper::Unbounded)
        );
    }

    #[test]
    fn detects_a_cycle() {
        let mut index = Index::new([10, 10]);
        let store = store(
            &mut index,
            vec![
                vec![Some(1), Some(5)],
                vec![Some(2), Some(3)],
                vec![None, Some(8)],
            ],
        );

        let err = Topology::try_build(&mut index, &store).unwrap_err();

        assert_eq!(err, Error::Cycle { unordered: 3 });
        assert_eq!(
            err.to_string(),
            "alignment sets are inconsistent: 3 set(s) lie on a cycle"
        );
    }

    #[test]
    fn relinks_gaps() {
        let mut index = Index::new([6]);
        let store = store(&mut index, vec![vec![Some(1)], vec![Some(4)]]);

        Topology::try_build(&mut index, &store).unwrap();

        let sequence = index.sequence(0).unwrap();
        assert_eq!(sequence.preceding_anchor(3), Some(1));
        assert_eq!(sequence.following_anchor(3), Some(4));
        assert_eq!(sequence.following_anchor(5), None);
    }
}
