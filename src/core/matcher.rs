//! Pair source sheets (employee attendance logs) with target sheets (labor
//! reports) by person name.
//!
//! Names are normalized (title prefix removed, diacritics stripped,
//! lowercased) and compared exactly first, then with the Ratcliff/Obershelp
//! "gestalt" similarity ratio. Every target is handed out at most once.

use crate::models::mapping::{MatchResult, SheetMapping, UNMATCHED};
use crate::utils::text::{strip_diacritics, strip_title};

pub const DEFAULT_CUTOFF: f64 = 0.8;

/// Strip one title prefix, drop diacritics, lowercase, trim.
pub fn normalize(name: &str) -> String {
    strip_diacritics(strip_title(name)).to_lowercase().trim().to_string()
}

/// Drop instruction sheets (exact, case-sensitive names).
pub fn filter_instruction_sheets(names: &[String], instruction_sheets: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|n| !instruction_sheets.contains(n))
        .cloned()
        .collect()
}

/// Build the source → target mapping.
///
/// Every source name gets an entry (target or `None`); targets never picked
/// are reported in `unmatched_target`. Empty inputs yield an empty result.
pub fn match_sheets(source: &[String], target: &[String], cutoff: f64) -> MatchResult {
    let norm_targets: Vec<String> = target.iter().map(|t| normalize(t)).collect();
    let mut used = vec![false; target.len()];
    let mut mapping = SheetMapping::default();
    let mut unmatched_source = Vec::new();

    for src in source {
        let norm = normalize(src);

        // 1️⃣ exact match on normalized names
        let exact = norm_targets
            .iter()
            .enumerate()
            .find(|(i, t)| !used[*i] && **t == norm)
            .map(|(i, _)| i);

        // 2️⃣ best fuzzy candidate above the cutoff; equal scores go to the
        // greatest normalized name, equal names to the first sheet
        let picked = exact.or_else(|| {
            let mut best: Option<(usize, f64)> = None;
            for (i, t) in norm_targets.iter().enumerate() {
                if used[i] {
                    continue;
                }
                let score = ratio(&norm, t);
                let better = best.is_none_or(|(bi, b)| {
                    score > b || (score == b && t.as_str() > norm_targets[bi].as_str())
                });
                if score >= cutoff && better {
                    best = Some((i, score));
                }
            }
            if let Some((i, score)) = best {
                log::debug!("fuzzy match '{}' → '{}' ({:.3})", src, target[i], score);
            }
            best.map(|(i, _)| i)
        });

        match picked {
            Some(i) => {
                used[i] = true;
                mapping.insert(src, Some(target[i].clone()));
            }
            None => {
                log::info!("no target sheet for '{}'", src);
                mapping.insert(src, None);
                unmatched_source.push(src.clone());
            }
        }
    }

    let unmatched_target = target
        .iter()
        .zip(&used)
        .filter(|(t, u)| !**u && t.as_str() != UNMATCHED)
        .map(|(t, _)| t.clone())
        .collect();

    MatchResult {
        mapping,
        unmatched_source,
        unmatched_target,
    }
}

// ---------------------------
// Gestalt pattern matching
// ---------------------------

/// Ratcliff/Obershelp similarity: `2 * M / T`, where `M` is the number of
/// characters in matching blocks and `T` the total length of both strings.
/// Two empty strings are identical (1.0).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_chars(&a, &b, 0, a.len(), 0, b.len());
    2.0 * matches as f64 / total as f64
}

/// Sum of matching block lengths: longest common substring, then recurse on
/// both sides of it.
fn matching_chars(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
    if k == 0 {
        return 0;
    }
    let mut total = k;
    if alo < i && blo < j {
        total += matching_chars(a, b, alo, i, blo, j);
    }
    if i + k < ahi && j + k < bhi {
        total += matching_chars(a, b, i + k, ahi, j + k, bhi);
    }
    total
}

/// Longest common block in `a[alo..ahi]` / `b[blo..bhi]`.
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
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
    let mut prev = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut cur = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                cur[j - blo + 1] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        prev = cur;
    }
    (best_i, best_j, best_k)
}
