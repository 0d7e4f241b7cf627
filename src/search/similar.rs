//! Similarity search: entries sharing labels with a given entry.
//!
//! Every tier is scored on its own and keeps its own rows, so one entry can
//! appear once per language it scored in. Rows are ordered by score, then
//! tier, then data order.
//!
//! Label identities are computed when the index is built (see
//! [`TierRow::similarity`]); a query only compares precomputed keys and
//! formats comments for the rows it returns.

use itertools::Itertools;

use crate::annotations::index::{AnnotationIndex, EntryId, TierRow};
use crate::model::Candidate;

/// Lifts the query entry above every other row.
pub const SELF_MATCH_BONUS: f64 = 100.0;

/// Overlap score of a candidate row against the query labels.
pub fn similarity_score(shared: usize, candidate_has_query_phrase: bool) -> f64 {
    let bonus = if candidate_has_query_phrase { SELF_MATCH_BONUS } else { 0.0 };
    shared as f64 + bonus
}

struct SimilarRow {
    score: f64,
    tier: usize,
    entry: EntryId,
}

pub fn similar(
    index: &AnnotationIndex,
    phrase: &str,
    match_limit: usize,
    show_keywords: bool,
) -> Vec<Candidate> {
    let Some(query_id) = index.find(phrase) else {
        return Vec::new();
    };
    let mut rows: Vec<SimilarRow> = Vec::new();

    for (rank, tier) in index.tiers().iter().enumerate() {
        let Some(query_row) = tier.row(query_id) else {
            continue;
        };
        // The phrase always leads the label list.
        let Some(query_phrase) = query_row.similarity.first().map(|l| l.identity.as_str()) else {
            continue;
        };

        for (id, row) in tier.rows() {
            let mut shared = 0;
            let mut has_query_phrase = false;
            for label in &query_row.similarity {
                if row.shares_label(&label.identity) {
                    if label.identity == query_phrase {
                        has_query_phrase = true;
                    } else {
                        shared += 1;
                    }
                }
            }
            if shared == 0 && !has_query_phrase {
                continue;
            }
            rows.push(SimilarRow {
                score: similarity_score(shared, has_query_phrase),
                tier: rank,
                entry: id,
            });
        }
    }

    rows.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.tier.cmp(&b.tier))
            .then(a.entry.cmp(&b.entry))
    });
    rows.into_iter()
        .take(match_limit)
        .filter_map(|row| {
            let tier = &index.tiers()[row.tier];
            let query_row = tier.row(query_id)?;
            let candidate_row = tier.row(row.entry)?;
            let entry = index.entry(row.entry);
            let comment = comment(query_row, candidate_row, &entry.phrase, show_keywords);
            Some(Candidate::new(entry.phrase.clone(), comment, row.score))
        })
        .collect()
}

/// `name [shared, ...]`, the shared labels in the query row's order.
fn comment(query_row: &TierRow, row: &TierRow, phrase: &str, show_keywords: bool) -> String {
    let name = row.display_name(phrase);
    if !show_keywords {
        return name.to_string();
    }
    let shared = query_row
        .similarity
        .iter()
        .filter(|l| row.shares_label(&l.identity))
        .map(|l| l.text.as_str())
        .join(", ");
    format!("{name} [{shared}]")
}
