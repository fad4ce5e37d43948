use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Naive adjacency-list store: the comparison baseline. Correct and
/// simple, with none of the concurrent store's machinery.
#[derive(Default)]
pub struct AdjacencyList {
    edges: FxHashMap<u64, Vec<(u64, f64)>>,
}

impl AdjacencyList {
    pub fn insert_edge(&mut self, src: u64, dest: u64, weight: f64) {
        self.edges.entry(src).or_default().push((dest, weight));
    }

    pub fn update_edge(&mut self, src: u64, dest: u64, weight: f64) -> bool {
        if let Some(list) = self.edges.get_mut(&src) {
            if let Some(entry) = list.iter_mut().find(|(d, _)| *d == dest) {
                entry.1 = weight;
                return true;
            }
        }
        false
    }

    pub fn delete_edge(&mut self, src: u64, dest: u64) -> bool {
        match self.edges.get_mut(&src) {
            Some(list) => {
                let before = list.len();
                list.retain(|(d, _)| *d != dest);
                list.len() != before
            }
            None => false,
        }
    }

    pub fn neighbours(&self, src: u64) -> &[(u64, f64)] {
        self.edges.get(&src).map_or(&[], Vec::as_slice)
    }

    /// Every vertex reachable from `source`, sorted.
    pub fn reachable(&self, source: u64) -> Vec<u64> {
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(source);
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            for &(v, _) in self.neighbours(u) {
                if seen.insert(v) {
                    queue.push_back(v);
                }
            }
        }
        let mut out: Vec<u64> = seen.into_iter().collect();
        out.sort_unstable();
        out
    }
}
