//! Fuzzy matching of class-type names.
//!
//! Uses the Ratcliff/Obershelp ratio: twice the number of characters in the
//! recursively found longest common blocks, divided by the combined length.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Matches scoring below this are not worth suggesting.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Similarity of `a` and `b` in `[0.0, 1.0]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    score(matching_chars(&a, &b), a.len() + b.len())
}

/// Up to `limit` candidates scoring at least `cutoff` against `query`, best
/// first. Equal scores are ordered by name, descending.
pub fn close_matches<'a, I>(query: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if limit == 0 {
        return Vec::new();
    }

    let q: Vec<char> = query.chars().collect();
    let q_counts = char_counts(&q);

    let mut scored: Vec<(f64, &str)> = Vec::new();
    for candidate in candidates {
        let c: Vec<char> = candidate.chars().collect();
        let total = q.len() + c.len();

        // Cheap upper bounds before the full block search.
        if score(q.len().min(c.len()), total) < cutoff {
            continue;
        }
        if score(shared_chars(&q_counts, &c), total) < cutoff {
            continue;
        }

        let s = score(matching_chars(&c, &q), total);
        if s >= cutoff {
            scored.push((s, candidate));
        }
    }

    scored.sort_by(|(sa, na), (sb, nb)| {
        sb.partial_cmp(sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| nb.cmp(na))
    });
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

fn score(matches: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        2.0 * matches as f64 / total as f64
    }
}

fn char_counts(chars: &[char]) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for &ch in chars {
        *counts.entry(ch).or_insert(0) += 1;
    }
    counts
}

/// Size of the multiset intersection of the two character bags.
fn shared_chars(counts: &HashMap<char, usize>, other: &[char]) -> usize {
    let mut available = counts.clone();
    let mut shared = 0;
    for ch in other {
        if let Some(n) = available.get_mut(ch) {
            if *n > 0 {
                *n -= 1;
                shared += 1;
            }
        }
    }
    shared
}

/// Total size of all matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`, earliest in `a`
/// then earliest in `b` on ties. Returns `(start_a, start_b, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // run[j + 1] = length of the common run ending at a[i - 1], b[j]
    let mut run = vec![0usize; b.len() + 1];
    for i in alo..ahi {
        let mut next = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = if j > blo { run[j] + 1 } else { 1 };
                next[j + 1] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        run = next;
    }
    (best_i, best_j, best_k)
}
