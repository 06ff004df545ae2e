//! Mapping raw works into normalized papers.

use std::collections::HashMap;

use crate::discovery::JournalClassifier;
use crate::models::{Paper, Work};

/// Longest abstract (in word positions) that will be rebuilt.
pub const MAX_ABSTRACT_POSITIONS: usize = 5_000;

/// Concept score at which a top-level discipline counts toward cross-disciplinarity.
const DISCIPLINE_SCORE_FLOOR: f64 = 0.3;

/// Rebuild abstract text from an inverted index.
///
/// Each word is placed at every listed position; unfilled positions stay empty and the
/// sequence is joined with single spaces. The result approximates the original text.
#[must_use]
pub fn reconstruct_abstract(index: &HashMap<String, Vec<usize>>) -> Option<String> {
    let len = index
        .values()
        .flatten()
        .copied()
        .filter(|&pos| pos < MAX_ABSTRACT_POSITIONS)
        .max()?
        + 1;

    let mut words = vec![""; len];
    for (word, positions) in index {
        for &pos in positions {
            if pos < len {
                words[pos] = word.as_str();
            }
        }
    }

    Some(words.join(" "))
}

/// Map a work into a paper. Works without an id, title or year are dropped.
#[must_use]
pub fn work_to_paper(work: &Work, classifier: &JournalClassifier) -> Option<Paper> {
    let id = work.short_id()?.to_string();
    let title = work.title_text()?.to_string();
    let year = work.publication_year?;

    let journal = work.source_name().unwrap_or_default().to_string();
    let journal_tier = classifier.classify(Some(journal.as_str()));

    let authors = work
        .authorships
        .iter()
        .filter_map(|a| a.author.display_name.clone())
        .collect();

    let url = work.doi.clone().filter(|d| !d.is_empty()).or_else(|| work.id.clone());

    let mut disciplines: Vec<(&str, f64)> = work
        .concepts
        .iter()
        .filter(|c| c.level == 0)
        .filter_map(|c| c.display_name.as_deref().map(|name| (name, c.score)))
        .collect();
    disciplines.sort_by(|a, b| b.1.total_cmp(&a.1));

    let discipline = disciplines.first().map(|(name, _)| (*name).to_string());
    let is_cross_disciplinary =
        disciplines.iter().filter(|(_, score)| *score >= DISCIPLINE_SCORE_FLOOR).count() >= 2;

    Some(Paper {
        id,
        title,
        authors,
        year,
        r#abstract: work.abstract_inverted_index.as_ref().and_then(reconstruct_abstract),
        url,
        citation_count: work.cited_by_count,
        is_cross_disciplinary,
        discipline,
        journal,
        journal_tier,
        is_classic: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Authorship, Concept, Location, Source, WorkAuthor};

    fn index(pairs: &[(&str, &[usize])]) -> HashMap<String, Vec<usize>> {
        pairs.iter().map(|(w, p)| ((*w).to_string(), p.to_vec())).collect()
    }

    #[test]
    fn test_reconstruct_simple() {
        let idx = index(&[("the", &[0, 2]), ("cat", &[1])]);
        assert_eq!(reconstruct_abstract(&idx).as_deref(), Some("the cat the"));
    }

    #[test]
    fn test_reconstruct_gaps_become_empty() {
        let idx = index(&[("a", &[0]), ("b", &[3])]);
        assert_eq!(reconstruct_abstract(&idx).as_deref(), Some("a   b"));
    }

    #[test]
    fn test_reconstruct_empty_index() {
        assert_eq!(reconstruct_abstract(&HashMap::new()), None);
        assert_eq!(reconstruct_abstract(&index(&[("orphan", &[])])), None);
    }

    #[test]
    fn test_reconstruct_ignores_absurd_positions() {
        let idx = index(&[("ok", &[0]), ("huge", &[usize::MAX])]);
        assert_eq!(reconstruct_abstract(&idx).as_deref(), Some("ok"));
    }

    fn work() -> Work {
        Work {
            id: Some("https://openalex.org/W99".to_string()),
            title: Some("When Teams Fall Apart".to_string()),
            publication_year: Some(2011),
            doi: Some("https://doi.org/10.1/abc".to_string()),
            primary_location: Some(Location {
                source: Some(Source {
                    id: Some("https://openalex.org/S1".to_string()),
                    display_name: Some("Academy of Management Journal".to_string()),
                }),
            }),
            authorships: vec![Authorship {
                author: WorkAuthor { display_name: Some("Ada Lovelace".to_string()) },
            }],
            cited_by_count: 640,
            concepts: vec![
                Concept { display_name: Some("Psychology".to_string()), level: 0, score: 0.4 },
                Concept { display_name: Some("Business".to_string()), level: 0, score: 0.8 },
                Concept { display_name: Some("Teamwork".to_string()), level: 2, score: 0.9 },
            ],
            ..Work::default()
        }
    }

    #[test]
    fn test_work_to_paper_full() {
        let paper = work_to_paper(&work(), &JournalClassifier::builtin()).unwrap();
        assert_eq!(paper.id, "W99");
        assert_eq!(paper.year, 2011);
        assert_eq!(paper.citation_count, 640);
        assert_eq!(paper.discipline.as_deref(), Some("Business"));
        assert!(paper.is_cross_disciplinary);
        assert_eq!(paper.url.as_deref(), Some("https://doi.org/10.1/abc"));
        assert_eq!(paper.journal_tier, crate::models::JournalTier::TopComposite);
        assert!(!paper.is_classic);
    }

    #[test]
    fn test_work_to_paper_requires_year_and_title() {
        let classifier = JournalClassifier::builtin();
        let mut no_year = work();
        no_year.publication_year = None;
        assert!(work_to_paper(&no_year, &classifier).is_none());

        let mut no_title = work();
        no_title.title = Some("  ".to_string());
        assert!(work_to_paper(&no_title, &classifier).is_none());
    }

    #[test]
    fn test_work_without_doi_uses_work_url() {
        let mut w = work();
        w.doi = None;
        w.primary_location = None;
        let paper = work_to_paper(&w, &JournalClassifier::builtin()).unwrap();
        assert_eq!(paper.url.as_deref(), Some("https://openalex.org/W99"));
        assert_eq!(paper.journal, "");
        assert_eq!(paper.journal_tier, crate::models::JournalTier::Other);
    }
}
