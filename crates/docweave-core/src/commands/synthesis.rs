//! Synthesis report formatting

use crate::domain::document::{DocumentId, DocumentSet};
use crate::domain::synthesis::SynthesisResult;

/// Document name for display, falling back to the raw id
fn document_name(documents: &DocumentSet, id: &DocumentId) -> String {
    documents
        .get(id)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn section(output: &mut String, title: &str, count: usize) {
    output.push_str(&format!("\n{} ({})\n", title, count));
    output.push_str(&"-".repeat(title.len() + count.to_string().len() + 3));
    output.push('\n');
}

/// Format a synthesis result as a plain-text report
pub fn format_report(documents: &DocumentSet, result: &SynthesisResult) -> String {
    let mut output = String::new();

    output.push_str("Research Synthesis\n");
    output.push_str("==================\n\n");
    output.push_str(&format!("Documents:           {}\n", documents.len()));

    if result.is_empty() {
        output.push_str("\nNothing to synthesize.\n");
        return output;
    }

    section(&mut output, "Insights", result.insights.len());
    for insight in &result.insights {
        output.push_str(&format!(
            "  [{}] {} ({}%)\n",
            insight.category, insight.text, insight.confidence
        ));
    }

    section(&mut output, "Relationships", result.relationships.len());
    for rel in &result.relationships {
        output.push_str(&format!(
            "  {:14} {} <-> {} (strength {})\n",
            rel.kind.as_str(),
            document_name(documents, &rel.document_a),
            document_name(documents, &rel.document_b),
            rel.strength
        ));
    }

    section(&mut output, "Contradictions", result.contradictions.len());
    for contradiction in &result.contradictions {
        let names: Vec<String> = contradiction
            .document_ids
            .iter()
            .map(|id| document_name(documents, id))
            .collect();
        output.push_str(&format!(
            "  [{}] {}: {}\n",
            contradiction.severity,
            contradiction.issue,
            names.join(", ")
        ));
        if !contradiction.recommendation.is_empty() {
            output.push_str(&format!("    -> {}\n", contradiction.recommendation));
        }
    }

    section(&mut output, "Timeline", result.timeline.len());
    for event in &result.timeline {
        output.push_str(&format!(
            "  {}  {} [{}]\n",
            event.date.format("%Y-%m-%d"),
            event.label,
            event.importance
        ));
    }

    section(&mut output, "Gaps", result.gaps.len());
    for gap in &result.gaps {
        output.push_str(&format!("  [{}] {}: {}\n", gap.priority, gap.area, gap.description));
        if !gap.suggested_sources.is_empty() {
            output.push_str(&format!("    sources: {}\n", gap.suggested_sources.join(", ")));
        }
    }

    output
}
