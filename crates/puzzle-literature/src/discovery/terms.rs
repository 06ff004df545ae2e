//! Tiered term generation: synonyms, context-abstracted terms, foundational theories.
//!
//! Each step sees the terms already in use so it can avoid repeating them, and each
//! fails soft to an empty list.

use std::collections::HashSet;
use std::sync::Arc;

use super::normalize_query;
use crate::config::{llm, search};
use crate::llm::{CompletionRequest, TextGenerator, clean_terms, extract_json_array};

const SYSTEM: &str = "You are an expert in research methodology across the social sciences. \
                      You generate bibliographic search terms and answer with a JSON array of \
                      strings.";

/// Which broadening step to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Same meaning, different vocabulary.
    Synonym,
    /// Same underlying constructs in a different setting or population.
    ContextAbstracted,
    /// Theoretical mechanisms underneath the phenomenon.
    FoundationalTheory,
}

impl TermKind {
    /// Short name for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Synonym => "synonym",
            Self::ContextAbstracted => "context-abstracted",
            Self::FoundationalTheory => "foundational-theory",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::Synonym => {
                "Generate 3-5 SYNONYM search terms: phrases that mean the same thing as the query \
                 but use the vocabulary other scholars use for it (e.g. 'employee turnover' for \
                 'staff quitting'). Keep the phenomenon identical."
            }
            Self::ContextAbstracted => {
                "Generate 3-5 CONTEXT-ABSTRACTED search terms: keep the underlying constructs and \
                 relationships but move them to a different setting, industry or population where \
                 the same dynamics have been studied."
            }
            Self::FoundationalTheory => {
                "Generate 3-5 FOUNDATIONAL THEORY search terms: name the theoretical mechanisms \
                 and classic theories that explain the phenomenon (e.g. 'social identity theory', \
                 'transaction cost economics')."
            }
        }
    }
}

/// Generates broadening terms for the tiered search.
pub struct TermGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl TermGenerator {
    /// Create a term generator.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Synonym terms for tier 1.
    pub async fn synonyms(
        &self,
        query: &str,
        subfield: Option<&str>,
        used: &[String],
    ) -> Vec<String> {
        self.generate(TermKind::Synonym, query, subfield, used).await
    }

    /// Context-abstracted terms for tier 2.
    pub async fn context_abstracted(
        &self,
        query: &str,
        subfield: Option<&str>,
        used: &[String],
    ) -> Vec<String> {
        self.generate(TermKind::ContextAbstracted, query, subfield, used).await
    }

    /// Foundational-theory terms for tier 3.
    pub async fn foundational_theories(
        &self,
        query: &str,
        subfield: Option<&str>,
        used: &[String],
    ) -> Vec<String> {
        self.generate(TermKind::FoundationalTheory, query, subfield, used).await
    }

    /// Run one generation step. Returns an empty list on any failure.
    pub async fn generate(
        &self,
        kind: TermKind,
        query: &str,
        subfield: Option<&str>,
        used: &[String],
    ) -> Vec<String> {
        let mut prompt = format!("Research query: \"{query}\"\n");
        if let Some(subfield) = subfield {
            prompt.push_str(&format!("Subfield: {subfield}\n"));
        }
        if !used.is_empty() {
            prompt.push_str(&format!(
                "Terms already searched (do not repeat): {}\n",
                used.join("; ")
            ));
        }
        prompt.push_str(&format!("\n{}\n\nReturn a JSON array of strings.", kind.instruction()));

        let request = CompletionRequest::single(SYSTEM, prompt, llm::TERM_MAX_TOKENS);

        let raw = match self.generator.complete(request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(kind = kind.label(), error = %err, "Term generation failed");
                return Vec::new();
            }
        };

        let Some(terms) = extract_json_array::<String>(&raw) else {
            tracing::warn!(kind = kind.label(), "Term generation returned no JSON array");
            return Vec::new();
        };

        let seen: HashSet<String> = used.iter().map(|t| normalize_query(t)).collect();
        let mut fresh = HashSet::new();
        let terms = terms
            .into_iter()
            .filter(|t| {
                let key = normalize_query(t);
                !key.is_empty() && !seen.contains(&key) && fresh.insert(key)
            })
            .collect();

        let terms = clean_terms(terms, search::MAX_GENERATED_TERMS);
        tracing::debug!(kind = kind.label(), count = terms.len(), "Generated terms");
        terms
    }
}

impl std::fmt::Debug for TermGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermGenerator").field("generator", &self.generator.name()).finish()
    }
}
