//! Final ordering, de-duplication and comment assembly.

use fxhash::FxHashSet;

use crate::annotations::index::AnnotationIndex;
use crate::model::Candidate;
use crate::search::engine::{MatchDetail, ScoredMatch};

/// `name “echo” [keyword, keyword] {category}`, omitting empty parts.
pub fn assemble_comment(name: &str, detail: &MatchDetail) -> String {
    let mut comment = name.to_string();
    if let Some(echo) = &detail.echo {
        comment.push_str(&format!(" “{echo}”"));
    }
    if !detail.keywords.is_empty() {
        comment.push_str(&format!(" [{}]", detail.keywords.join(", ")));
    }
    for category in &detail.categories {
        comment.push_str(&format!(" {{{category}}}"));
    }
    comment
}

/// Orders scored rows and turns them into candidates.
#[derive(Debug, Clone, Copy)]
pub struct CandidateRanker {
    limit: usize,
}

impl CandidateRanker {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Sort by score, then hits, then tier, then data order; keep the best
    /// row per phrase; truncate.
    pub fn rank(&self, index: &AnnotationIndex, mut matches: Vec<ScoredMatch>) -> Vec<Candidate> {
        sort_matches(&mut matches);
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut out = Vec::with_capacity(self.limit.min(matches.len()));
        for m in &matches {
            if out.len() >= self.limit {
                break;
            }
            let entry = index.entry(m.entry);
            if !seen.insert(entry.phrase.as_str()) {
                continue;
            }
            let name = index.tiers()[m.tier]
                .row(m.entry)
                .map_or(entry.phrase.as_str(), |row| row.display_name(&entry.phrase));
            out.push(Candidate::new(
                entry.phrase.clone(),
                assemble_comment(name, &m.detail),
                m.score,
            ));
        }
        out
    }
}

pub fn sort_matches(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(b.hits.cmp(&a.hits))
            .then(a.tier.cmp(&b.tier))
            .then(a.entry.cmp(&b.entry))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;
    use crate::search::transliterate::TransliterationRegistry;

    fn scored(entry: usize, tier: usize, score: f64, hits: usize) -> ScoredMatch {
        ScoredMatch {
            entry,
            tier,
            score,
            hits,
            detail: MatchDetail::default(),
        }
    }

    #[test]
    fn comment_parts_in_order() {
        let detail = MatchDetail {
            keywords: vec!["qímǎ".to_string()],
            echo: Some("sàimǎ".to_string()),
            categories: vec!["sport".to_string()],
        };
        assert_eq!(assemble_comment("赛马", &detail), "赛马 “sàimǎ” [qímǎ] {sport}");
        assert_eq!(assemble_comment("camel", &MatchDetail::default()), "camel");
    }

    #[test]
    fn ties_break_by_hits_then_tier_then_order() {
        let mut matches = vec![
            scored(3, 1, 10.0, 1),
            scored(2, 0, 10.0, 1),
            scored(1, 0, 10.0, 1),
            scored(4, 1, 10.0, 2),
            scored(5, 1, 11.0, 1),
        ];
        sort_matches(&mut matches);
        let order: Vec<usize> = matches.iter().map(|m| m.entry).collect();
        assert_eq!(order, vec![5, 4, 1, 2, 3]);
    }

    #[test]
    fn best_row_per_phrase_and_limit() {
        let entries = vec![
            Entry::new("🐪")
                .annotate("de", "Dromedar", &[])
                .annotate("en", "camel", &[]),
            Entry::new("🐫").annotate("en", "two-hump camel", &[]),
            Entry::new("🐌").annotate("en", "snail", &[]),
        ];
        let tiers = vec!["de".to_string(), "en".to_string()];
        let index = AnnotationIndex::build(entries, &tiers, &TransliterationRegistry::new());
        let matches = vec![
            scored(0, 1, 12.0, 1),
            scored(0, 0, 13.0, 1),
            scored(1, 1, 11.0, 1),
            scored(2, 1, 1.0, 1),
        ];
        let ranked = CandidateRanker::new(2).rank(&index, matches);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].phrase, "🐪");
        assert_eq!(ranked[0].comment, "Dromedar");
        assert_eq!(ranked[1].phrase, "🐫");
    }
}
