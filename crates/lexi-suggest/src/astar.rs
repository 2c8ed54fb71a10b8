// Weighted edit distance by best-first search over the alignment grid
//
// Both words are wrapped as `^word$` so map rules can anchor to either end.
// Each grid cell (ai, bi) keeps the cheapest node found so far; worse nodes
// left in the heap are skipped when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::weights::{CostPosition, WeightMap};

/// One aligned piece of a weighted-distance solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub a: String,
    pub b: String,
    pub c: u32,
    pub p: u32,
}

/// The full result of [`weighted_distance_ex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedDistance {
    /// Edit cost plus penalties plus adjustments of `b`.
    pub cost: u32,
    /// Adjustment penalty applied to `b`.
    pub penalty: u32,
    /// The edits of the cheapest alignment, in order.
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    ai: usize,
    bi: usize,
    c: u32,
    p: u32,
    from: Option<usize>,
}

#[derive(Debug, PartialEq, Eq)]
struct Candidate {
    c: u32,
    progress: usize,
    node: usize,
}

impl Ord for Candidate {
    /// Max-heap order: lowest cost first, then furthest along.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .c
            .cmp(&self.c)
            .then_with(|| self.progress.cmp(&other.progress))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct CandidatePool {
    nodes: Vec<Node>,
    grid: Vec<Option<usize>>,
    heap: BinaryHeap<Candidate>,
    cols: usize,
}

impl CandidatePool {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            nodes: Vec::new(),
            grid: vec![None; rows * cols],
            heap: BinaryHeap::new(),
            cols,
        }
    }

    fn add(&mut self, n: Node) {
        let cell = n.ai * self.cols + n.bi;
        if let Some(existing) = self.grid[cell] {
            if self.nodes[existing].c <= n.c {
                return;
            }
        }
        let id = self.nodes.len();
        self.nodes.push(n);
        self.grid[cell] = Some(id);
        self.heap.push(Candidate {
            c: n.c,
            progress: n.ai + n.bi,
            node: id,
        });
    }

    fn next(&mut self) -> Option<Node> {
        while let Some(cand) = self.heap.pop() {
            let n = self.nodes[cand.node];
            if self.grid[n.ai * self.cols + n.bi] == Some(cand.node) {
                return Some(n);
            }
        }
        None
    }
}

fn wrap(word: &str) -> Vec<char> {
    std::iter::once('^')
        .chain(word.chars())
        .chain(std::iter::once('$'))
        .collect()
}

/// Search the cheapest alignment; returns the pool and the index of the
/// final node.
fn search(a: &[char], b: &[char], map: &WeightMap, cost: u32) -> (CandidatePool, usize) {
    let (an, bn) = (a.len(), b.len());
    let mut pool = CandidatePool::new(an + 1, bn + 1);
    pool.add(Node {
        ai: 0,
        bi: 0,
        c: 0,
        p: 0,
        from: None,
    });

    let end_cell = an * pool.cols + bn;
    while let Some(n) = pool.next() {
        if n.ai == an && n.bi == bn {
            break;
        }
        let from = pool.grid[n.ai * pool.cols + n.bi];
        let step = |ai: usize, bi: usize, c: u32, p: u32| Node { ai, bi, c, p, from };

        // Swap adjacent letters.
        if n.ai + 1 < an && n.bi + 1 < bn && a[n.ai] == b[n.bi + 1] && a[n.ai + 1] == b[n.bi] {
            pool.add(step(n.ai + 2, n.bi + 2, n.c + cost, n.p));
        }
        if n.bi < bn {
            pool.add(step(n.ai, n.bi + 1, n.c + cost, n.p));
        }
        if n.ai < an {
            pool.add(step(n.ai + 1, n.bi, n.c + cost, n.p));
        }

        let pos = CostPosition {
            a,
            ai: n.ai,
            b,
            bi: n.bi,
            c: n.c,
            p: n.p,
        };
        let mapped = map
            .calc_ins_del_costs(pos)
            .into_iter()
            .chain(map.calc_swap_costs(pos))
            .chain(map.calc_replace_costs(pos));
        for m in mapped {
            pool.add(step(m.ai, m.bi, m.c, m.p));
        }

        if n.ai < an && n.bi < bn {
            let c = if a[n.ai] == b[n.bi] { n.c } else { n.c + cost };
            pool.add(step(n.ai + 1, n.bi + 1, c, n.p));
        }
    }

    // The end cell is always reachable by plain inserts and deletes.
    let best = pool.grid[end_cell].unwrap_or(0);
    (pool, best)
}

/// Weighted edit distance from `a` to `b`.
///
/// Every edit not covered by `map` costs `cost`; with an empty map this is
/// `cost` times the Damerau-Levenshtein distance. Penalties collected along
/// the way and the adjustments matching `b` are added to the result.
pub fn weighted_distance(a: &str, b: &str, map: &WeightMap, cost: u32) -> u32 {
    let (aa, bb) = (wrap(a), wrap(b));
    let (pool, best) = search(&aa, &bb, map, cost);
    let n = pool.nodes[best];
    n.c + n.p + map.calc_adjustment(b)
}

/// Like [`weighted_distance`], also returning the edit segments.
pub fn weighted_distance_ex(a: &str, b: &str, map: &WeightMap, cost: u32) -> WeightedDistance {
    let (aa, bb) = (wrap(a), wrap(b));
    let (pool, best) = search(&aa, &bb, map, cost);
    let penalty = map.calc_adjustment(b);

    let mut segments = Vec::new();
    let mut n = pool.nodes[best];
    while let Some(f) = n.from {
        let prev = pool.nodes[f];
        segments.push(Segment {
            a: aa[prev.ai..n.ai].iter().collect(),
            b: bb[prev.bi..n.bi].iter().collect(),
            c: n.c - prev.c,
            p: n.p - prev.p,
        });
        n = prev;
    }
    segments.reverse();

    let end = pool.nodes[best];
    WeightedDistance {
        cost: end.c + end.p + penalty,
        penalty,
        segments,
    }
}
