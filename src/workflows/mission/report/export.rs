use super::views::ReportSummary;

/// Renders the merged report as a markdown document for handoff to the
/// client contact.
pub fn render_markdown(summary: &ReportSummary) -> String {
    let mut document = String::new();

    document.push_str(&format!(
        "# Evaluation Report: {}\n\n",
        summary.candidate_name
    ));
    document.push_str(&format!(
        "Mission: {} ({})\n\n",
        summary.mission_title, summary.mission_id
    ));
    document.push_str(&format!(
        "Overall score: {:.2} / {} ({})\n",
        summary.overall_score, summary.rating_scale_max, summary.recommendation_label
    ));
    document.push_str(&format!(
        "Reviewers: {} ({})\n\n",
        summary.reviewer_count, summary.agreement_label
    ));

    document.push_str("## Scorecard\n\n");
    document.push_str("| Criterion | Group | Weight | Average | Spread |\n");
    document.push_str("| --- | --- | --- | --- | --- |\n");
    for score in &summary.criterion_scores {
        document.push_str(&format!(
            "| {} | {} | {}% | {:.2} | {} |\n",
            score.label, score.group_label, score.weight_percentage, score.average, score.spread
        ));
    }
    document.push('\n');

    if !summary.divergences.is_empty() {
        document.push_str("## Divergences\n\n");
        for divergence in &summary.divergences {
            document.push_str(&format!(
                "- {}: scores ranged {} to {} (spread {})\n",
                divergence.label, divergence.low, divergence.high, divergence.spread
            ));
        }
        document.push('\n');
    }

    document.push_str("## Panel verdicts\n\n");
    document.push_str(&format!("- Favorable: {}\n", summary.verdicts.favorable));
    document.push_str(&format!("- Neutral: {}\n", summary.verdicts.neutral));
    document.push_str(&format!(
        "- Unfavorable: {}\n",
        summary.verdicts.unfavorable
    ));

    document
}
