//! Markdown output formatting.

use std::borrow::Cow;

use crate::models::{LiteratureResponse, Paper, SearchMetadata};

/// Abstract characters shown per paper.
const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Format a literature response as Markdown.
#[must_use]
pub fn format_literature_markdown(response: &LiteratureResponse) -> String {
    let mut output = format!("# Literature ({} papers found)\n\n", response.total_found);

    if let Some(analysis) = &response.analysis {
        output.push_str(&format!("> {analysis}\n\n"));
    }

    output.push_str(&format_section("Classics", &response.classics));
    output.push_str(&format_section("Recent", &response.recent));

    if let Some(metadata) = &response.search_metadata {
        output.push_str(&format_metadata_markdown(metadata));
    }

    if response.cached {
        output.push_str("_Served from cache._\n");
    }

    output
}

fn format_section(heading: &str, papers: &[Paper]) -> String {
    if papers.is_empty() {
        return format!("## {heading}\n\nNone found.\n\n");
    }

    let mut output = format!("## {heading} ({})\n\n", papers.len());
    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format_paper_markdown(paper, i + 1));
        output.push_str("\n---\n\n");
    }
    output
}

/// Format a list of papers as Markdown.
#[must_use]
pub fn format_papers_markdown(papers: &[Paper]) -> String {
    if papers.is_empty() {
        return "No papers found.".to_string();
    }

    let mut output = format!("# Papers ({} results)\n\n", papers.len());

    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format_paper_markdown(paper, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single paper as Markdown.
#[must_use]
pub fn format_paper_markdown(paper: &Paper, index: usize) -> String {
    let mut output = format!("### {}. {}\n\n", index, paper.title);

    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));
    }

    let mut meta = vec![
        format!("**Year**: {}", paper.year),
        format!("**Citations**: {}", paper.citation_count),
    ];
    if !paper.journal.is_empty() {
        meta.push(format!("**Journal**: {} ({})", paper.journal, paper.journal_tier.label()));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if let Some(discipline) = &paper.discipline {
        let cross = if paper.is_cross_disciplinary { " (cross-disciplinary)" } else { "" };
        output.push_str(&format!("**Discipline**: {discipline}{cross}\n\n"));
    }

    if let Some(url) = &paper.url {
        output.push_str(&format!("**Link**: <{url}>\n\n"));
    }

    // Abstract (truncated)
    if let Some(abs) = &paper.r#abstract {
        output.push_str(&format!(
            "**Abstract**: {}\n",
            truncate_chars(abs, ABSTRACT_PREVIEW_CHARS)
        ));
    }

    output
}

/// Format the search audit trail as Markdown.
#[must_use]
pub fn format_metadata_markdown(metadata: &SearchMetadata) -> String {
    let mut output = String::from("## Search details\n\n");

    output.push_str(&format!(
        "**Tier**: {} | **Classic threshold**: {} citations\n\n",
        metadata.tier, metadata.classic_threshold
    ));

    let mut flags = Vec::new();
    if metadata.exact_match_found {
        flags.push("exact match");
    }
    if metadata.synonym_expansion_used {
        flags.push("synonyms");
    }
    if metadata.broadening_used {
        flags.push("broadened");
    }
    if metadata.citation_threshold_relaxed {
        flags.push("relaxed citation floor");
    }
    if !flags.is_empty() {
        output.push_str(&format!("**Strategy**: {}\n\n", flags.join(", ")));
    }

    if !metadata.search_terms.is_empty() {
        let terms: Vec<String> = metadata.search_terms.iter().map(|t| format!("`{t}`")).collect();
        output.push_str(&format!("**Terms searched**: {}\n\n", terms.join(", ")));
    }

    if !metadata.explanation.is_empty() {
        output.push_str(&format!("{}\n\n", metadata.explanation));
    }

    output
}

fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((end, _)) => Cow::Owned(format!("{}...", &text[..end])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(400);
        let truncated = truncate_chars(&text, 300);
        assert_eq!(truncated.chars().count(), 303);
        assert_eq!(truncate_chars("short", 300), "short");
    }
}
