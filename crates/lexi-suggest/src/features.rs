// Best-first trie search by bag-of-features similarity
//
// A word's features are its letters and the letter pairs of `^word$`. The
// score of a candidate is the number of its features shared with the query
// (counted as multisets) minus the number it does not share. Extending a
// prefix can only add unshared features, so `|query features| - unshared`
// bounds the score of every word below a node.

use std::time::Instant;

use hashbrown::HashMap;
use lexi_trie::{TrieGraph, Walker};

const WORD_START: char = '^';
const WORD_END: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Uni(char),
    Bi(char, char),
}

fn features(word: &str) -> HashMap<Feature, u32> {
    let mut counts = HashMap::new();
    let mut prev = WORD_START;
    for c in word.chars() {
        *counts.entry(Feature::Uni(c)).or_insert(0) += 1;
        *counts.entry(Feature::Bi(prev, c)).or_insert(0) += 1;
        prev = c;
    }
    *counts.entry(Feature::Bi(prev, WORD_END)).or_insert(0) += 1;
    counts
}

/// Similarity of `candidate` to `query`: shared features minus unshared
/// candidate features.
pub fn feature_score(query: &str, candidate: &str) -> i32 {
    let q = features(query);
    let c = features(candidate);
    let total: u32 = c.values().sum();
    let shared: u32 = c
        .iter()
        .map(|(f, &n)| n.min(q.get(f).copied().unwrap_or(0)))
        .sum();
    shared as i32 - (total - shared) as i32
}

/// A word found by [`FeatureSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredWord {
    pub word: String,
    pub score: i32,
}

/// What one path character added, so it can be taken back.
#[derive(Debug, Clone, Copy)]
struct Frame {
    ch: char,
    uni: Feature,
    uni_shared: bool,
    bi: Feature,
    bi_shared: bool,
}

/// Resumable best-first search for words similar to a query.
///
/// A subtree is entered only while its bound reaches the current minimum
/// score, and a word is returned only when its exact score does. The
/// minimum can be changed on every call to [`next`](Self::next).
pub struct FeatureSearch<'g, G: TrieGraph> {
    walker: Walker<'g, G>,
    query: HashMap<Feature, u32>,
    query_total: i32,
    used: HashMap<Feature, u32>,
    frames: Vec<Frame>,
    shared: i32,
    unshared: i32,
    min_score: i32,
    pending_bound: Option<i32>,
    deadline: Option<Instant>,
    done: bool,
}

impl<'g, G: TrieGraph> FeatureSearch<'g, G> {
    pub fn new(graph: &'g G, word: &str) -> Self {
        let query = features(word);
        let query_total = query.values().sum::<u32>() as i32;
        Self {
            walker: Walker::new(graph).with_hint(word),
            query,
            query_total,
            used: HashMap::new(),
            frames: Vec::new(),
            shared: 0,
            unshared: 0,
            min_score: i32::MIN,
            pending_bound: None,
            deadline: None,
            done: false,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn min_score(&self) -> i32 {
        self.min_score
    }

    /// Highest score any word extending the current path can reach.
    fn bound(&self) -> i32 {
        self.query_total - self.unshared
    }

    fn is_shared(&self, f: Feature) -> bool {
        let have = self.query.get(&f).copied().unwrap_or(0);
        self.used.get(&f).copied().unwrap_or(0) < have
    }

    fn take(&mut self, f: Feature) -> bool {
        let shared = self.is_shared(f);
        if shared {
            *self.used.entry(f).or_insert(0) += 1;
            self.shared += 1;
        } else {
            self.unshared += 1;
        }
        shared
    }

    fn give_back(&mut self, f: Feature, shared: bool) {
        if shared {
            if let Some(n) = self.used.get_mut(&f) {
                *n -= 1;
            }
            self.shared -= 1;
        } else {
            self.unshared -= 1;
        }
    }

    fn pop_frame(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.give_back(frame.bi, frame.bi_shared);
            self.give_back(frame.uni, frame.uni_shared);
        }
    }

    fn push_frame(&mut self, ch: char) {
        let prev = self.frames.last().map_or(WORD_START, |f| f.ch);
        let uni = Feature::Uni(ch);
        let bi = Feature::Bi(prev, ch);
        let uni_shared = self.take(uni);
        let bi_shared = self.take(bi);
        self.frames.push(Frame {
            ch,
            uni,
            uni_shared,
            bi,
            bi_shared,
        });
    }

    /// Score of the current path taken as a whole word.
    fn exact_score(&self) -> i32 {
        let last = self.frames.last().map_or(WORD_START, |f| f.ch);
        if self.is_shared(Feature::Bi(last, WORD_END)) {
            self.shared + 1 - self.unshared
        } else {
            self.shared - self.unshared - 1
        }
    }

    /// The next word scoring at least `min_score`.
    pub fn next(&mut self, min_score: i32) -> Option<ScoredWord> {
        self.min_score = min_score;
        while !self.done {
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                log::debug!("feature search stopped at its deadline");
                self.done = true;
                break;
            }
            let go_deeper = self.pending_bound.is_none_or(|b| b >= self.min_score);
            let (text, ch, depth, is_end) = match self.walker.next(go_deeper) {
                Some(step) => (step.text.to_string(), step.ch, step.depth, step.is_end),
                None => {
                    self.done = true;
                    break;
                }
            };

            while self.frames.len() >= depth {
                self.pop_frame();
            }
            self.push_frame(ch);
            self.pending_bound = Some(self.bound());

            if is_end {
                let score = self.exact_score();
                if score >= self.min_score {
                    return Some(ScoredWord { word: text, score });
                }
            }
        }
        None
    }
}

/// The `limit` best words by feature score, raising the minimum score as
/// the list fills up.
pub fn best_by_features<G: TrieGraph>(graph: &G, word: &str, limit: usize) -> Vec<ScoredWord> {
    let mut search = FeatureSearch::new(graph, word);
    let mut best: Vec<ScoredWord> = Vec::new();
    if limit == 0 {
        return best;
    }
    let mut min_score = i32::MIN;
    while let Some(found) = search.next(min_score) {
        best.push(found);
        best.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.word.cmp(&b.word)));
        if best.len() > limit {
            best.truncate(limit);
        }
        if best.len() == limit {
            min_score = best[limit - 1].score;
        }
    }
    best
}
