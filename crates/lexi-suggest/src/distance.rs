// Plain Levenshtein distance and nearest-word ranking over a candidate list

/// A candidate together with its edit distance to the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDistance {
    pub word: String,
    pub distance: usize,
}

/// Levenshtein edit distance counted in Unicode code points.
///
/// Insertions, deletions and substitutions each cost one. Uses a single
/// rolling row, so memory is `O(|b|)`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitute = diag + usize::from(ca != cb);
            row[j + 1] = substitute.min(above + 1).min(row[j] + 1);
            diag = above;
        }
    }
    row[b.len()]
}

/// Pick up to `num_results` candidates within `max_edits` of `word`.
///
/// Results are ordered by distance, then lexicographically. Equal
/// candidates keep their input order.
pub fn select_nearest_words<I, S>(
    word: &str,
    candidates: I,
    num_results: usize,
    max_edits: usize,
) -> Vec<WordDistance>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut found: Vec<WordDistance> = candidates
        .into_iter()
        .filter_map(|c| {
            let distance = levenshtein(word, c.as_ref());
            (distance <= max_edits).then(|| WordDistance {
                word: c.as_ref().to_string(),
                distance,
            })
        })
        .collect();
    // `sort_by` is stable.
    found.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.word.cmp(&b.word)));
    found.truncate(num_results);
    found
}
