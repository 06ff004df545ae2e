//! LLM-judged relevance filtering of a candidate pool.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::{RelevanceSampling, llm, search};
use crate::llm::{CompletionRequest, TextGenerator, extract_json_array};
use crate::models::Paper;

const SYSTEM: &str = "You screen academic papers for topical relevance to a research query. \
                      Answer with a JSON array of integer indices only.";

/// Strict or recall-oriented screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Exclude adjacent-but-different topics.
    Strict,
    /// Keep anything plausibly related.
    Relaxed,
}

/// Narrows a pool to papers relevant to the query.
pub struct RelevanceFilter {
    generator: Arc<dyn TextGenerator>,
    sampling: RelevanceSampling,
}

impl RelevanceFilter {
    /// Create a filter.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, sampling: RelevanceSampling) -> Self {
        Self { generator, sampling }
    }

    /// Keep at most `max` relevant papers.
    ///
    /// Pools no larger than `max` come back unchanged without a generation call.
    pub async fn filter(
        &self,
        pool: &[Paper],
        query: &str,
        subfield: Option<&str>,
        strictness: Strictness,
        max: usize,
        current_year: i32,
    ) -> Vec<Paper> {
        if pool.len() <= max {
            return pool.to_vec();
        }

        let sample = self.sample(pool, current_year);
        let request = CompletionRequest::single(
            SYSTEM,
            self.prompt(&sample, query, subfield, strictness),
            llm::FILTER_MAX_TOKENS,
        );

        let indices = match self.generator.complete(request).await {
            Ok(raw) => extract_json_array::<usize>(&raw),
            Err(err) => {
                tracing::warn!(error = %err, "Relevance filter call failed");
                None
            }
        };

        let Some(indices) = indices else {
            tracing::warn!(
                sampled = sample.len(),
                "Relevance filter unparsable, keeping first sampled"
            );
            return sample.into_iter().take(max).cloned().collect();
        };

        let kept: Vec<Paper> = indices
            .into_iter()
            .filter(|&i| i < sample.len())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|i| sample[i].clone())
            .take(max)
            .collect();

        tracing::debug!(
            pool = pool.len(),
            sampled = sample.len(),
            kept = kept.len(),
            ?strictness,
            "Relevance filter applied"
        );
        kept
    }

    /// Bounded sample: classic-eligible first, then recent-eligible, pool order kept
    /// within each group. Falls back to the head of the pool if both groups are empty.
    #[must_use]
    pub fn sample<'a>(&self, pool: &'a [Paper], current_year: i32) -> Vec<&'a Paper> {
        let window = search::RECENT_WINDOW_YEARS;
        let mut sample: Vec<&Paper> = pool
            .iter()
            .filter(|p| p.is_classic_age(current_year, window))
            .take(self.sampling.classic_sample)
            .collect();
        sample.extend(
            pool.iter()
                .filter(|p| p.is_recent(current_year, window))
                .take(self.sampling.recent_sample),
        );

        if sample.is_empty() {
            sample = pool.iter().take(self.sampling.fallback_sample).collect();
        }
        sample
    }

    fn prompt(
        &self,
        sample: &[&Paper],
        query: &str,
        subfield: Option<&str>,
        strictness: Strictness,
    ) -> String {
        let mut prompt = format!("Research query: \"{query}\"\n");
        if let Some(subfield) = subfield {
            prompt.push_str(&format!("Subfield: {subfield}\n"));
        }

        prompt.push_str(match strictness {
            Strictness::Strict => {
                "\nSelect ONLY papers that study this exact phenomenon. Exclude papers on \
                 topically adjacent but different phenomena, even if they share keywords.\n"
            }
            Strictness::Relaxed => {
                "\nSelect papers that are plausibly useful for this research. Favor recall: aim \
                 to include 20-30 papers and exclude only papers that are clearly unrelated.\n"
            }
        });

        prompt.push_str("\nPapers:\n");
        for (i, paper) in sample.iter().enumerate() {
            let summary: String = paper
                .r#abstract
                .as_deref()
                .unwrap_or("")
                .chars()
                .take(self.sampling.abstract_chars)
                .collect();
            prompt.push_str(&format!("[{i}] {} ({})\n    {summary}\n", paper.title, paper.year));
        }

        prompt.push_str(
            "\nReturn a JSON array of the indices of the selected papers, e.g. [0, 3, 7].",
        );
        prompt
    }
}

impl std::fmt::Debug for RelevanceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelevanceFilter")
            .field("generator", &self.generator.name())
            .field("sampling", &self.sampling)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::ClientResult;
    use crate::models::JournalTier;

    struct Judge {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl TextGenerator for Judge {
        fn name(&self) -> &'static str {
            "judge"
        }

        async fn complete(&self, request: CompletionRequest) -> ClientResult<String> {
            self.prompts.lock().unwrap().push(request.last_user_text().to_string());
            Ok(self.reply.to_string())
        }
    }

    fn paper(i: usize, year: i32) -> Paper {
        Paper {
            id: format!("W{i}"),
            title: format!("Paper {i}"),
            authors: vec![],
            year,
            r#abstract: Some("x".repeat(400)),
            url: None,
            citation_count: 300,
            is_cross_disciplinary: false,
            discipline: None,
            journal: "Organization Science".to_string(),
            journal_tier: JournalTier::TopComposite,
            is_classic: false,
        }
    }

    fn filter(reply: &'static str) -> (Arc<Judge>, RelevanceFilter) {
        let judge = Arc::new(Judge { reply, prompts: Mutex::new(Vec::new()) });
        (judge.clone(), RelevanceFilter::new(judge, RelevanceSampling::default()))
    }

    #[tokio::test]
    async fn test_small_pool_untouched() {
        let (judge, f) = filter("[]");
        let pool: Vec<Paper> = (0..3).map(|i| paper(i, 2010)).collect();
        let out = f.filter(&pool, "q", None, Strictness::Strict, 5, 2026).await;
        assert_eq!(out, pool);
        assert!(judge.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_sample_split() {
        let (_, f) = filter("[]");
        // 40 old then 30 new papers.
        let pool: Vec<Paper> =
            (0..40).map(|i| paper(i, 2000)).chain((40..70).map(|i| paper(i, 2024))).collect();
        let sample = f.sample(&pool, 2026);
        assert_eq!(sample.len(), 50);
        assert_eq!(sample[0].id, "W0");
        assert_eq!(sample[29].id, "W29");
        assert_eq!(sample[30].id, "W40");
    }

    #[tokio::test]
    async fn test_indices_map_to_sample_not_pool() {
        let (judge, f) = filter("Relevant: [31, 0, 0, 999]");
        let pool: Vec<Paper> =
            (0..40).map(|i| paper(i, 2000)).chain((40..70).map(|i| paper(i, 2024))).collect();
        let out = f.filter(&pool, "team dissolution", None, Strictness::Relaxed, 10, 2026).await;
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["W0", "W41"]);

        let prompt = judge.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Favor recall"));
        assert!(prompt.contains("[49] Paper 59 (2024)"));
        assert!(!prompt.contains(&"x".repeat(251)));
    }

    #[tokio::test]
    async fn test_unparsable_keeps_first_sampled() {
        let (_, f) = filter("I could not decide.");
        let pool: Vec<Paper> = (0..12).map(|i| paper(i, 2024)).collect();
        let out = f.filter(&pool, "q", None, Strictness::Strict, 4, 2026).await;
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["W0", "W1", "W2", "W3"]);
    }

    #[tokio::test]
    async fn test_strict_prompt() {
        let (judge, f) = filter("[1]");
        let pool: Vec<Paper> = (0..6).map(|i| paper(i, 2015)).collect();
        let out = f.filter(&pool, "q", Some("strategy"), Strictness::Strict, 2, 2026).await;
        assert_eq!(out.len(), 1);
        let prompt = judge.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("exact phenomenon"));
        assert!(prompt.contains("Subfield: strategy"));
    }
}
