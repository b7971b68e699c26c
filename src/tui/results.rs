//! Text for the three Results sub-views.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::config::ColorConfig;
use crate::domain::{format_score, AnalysisResult, Displayed, PageContent};
use crate::tui::app::ResultView;

/// Paragraphs shown before the rest are summarized.
const MAX_PARAGRAPHS: usize = 20;

pub fn lines(displayed: &Displayed, view: ResultView, colors: &ColorConfig) -> Vec<Line<'static>> {
    match view {
        ResultView::Analysis => analysis_lines(displayed.content().ai_analysis.as_ref(), colors),
        ResultView::Original => original_lines(displayed, colors),
        ResultView::Raw => raw_lines(displayed),
    }
}

fn heading(text: &str, colors: &ColorConfig) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(colors.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn bullets(lines: &mut Vec<Line<'static>>, title: &str, items: &[String], colors: &ColorConfig) {
    if items.is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(heading(title, colors));
    for item in items {
        lines.push(Line::from(format!("  • {}", item)));
    }
}

fn field(lines: &mut Vec<Line<'static>>, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(value.to_string()),
        ]));
    }
}

fn analysis_lines(analysis: Option<&AnalysisResult>, colors: &ColorConfig) -> Vec<Line<'static>> {
    let Some(analysis) = analysis else {
        return vec![Line::from("No AI analysis available for this result.")];
    };
    let mut lines = Vec::new();

    if let Some(summary) = &analysis.summary {
        lines.push(heading("Summary", colors));
        lines.push(Line::from(summary.clone()));
    }

    let scores = analysis.scores();
    if !scores.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Scores", colors));
        for (label, score) in scores {
            lines.push(Line::from(format!("  {:<18} {}", label, format_score(score))));
        }
        if let Some(rating) = analysis
            .content_quality
            .as_ref()
            .and_then(|q| q.rating.as_deref())
        {
            lines.push(Line::from(format!("  {:<18} {}", "Quality Rating", rating)));
        }
    }

    if analysis.category.is_some()
        || analysis.sentiment.is_some()
        || analysis.target_audience.is_some()
    {
        lines.push(Line::from(""));
        field(&mut lines, "Category", analysis.category.as_deref());
        field(&mut lines, "Sentiment", analysis.sentiment.as_deref());
        field(&mut lines, "Target Audience", analysis.target_audience.as_deref());
    }

    bullets(&mut lines, "Key Points", &analysis.key_points, colors);

    if let Some(seo) = &analysis.seo_analysis {
        lines.push(Line::from(""));
        lines.push(heading("SEO Analysis", colors));
        field(&mut lines, "Title", seo.title_optimization.as_deref());
        field(&mut lines, "Meta Description", seo.meta_description.as_deref());
        field(&mut lines, "Header Structure", seo.header_structure.as_deref());
        field(&mut lines, "Keyword Density", seo.keyword_density.as_deref());
        bullets(&mut lines, "SEO Recommendations", &seo.recommendations, colors);
    }

    if let Some(ux) = &analysis.ux_assessment {
        lines.push(Line::from(""));
        lines.push(heading("UX Assessment", colors));
        lines.push(Line::from(format!(
            "Readability: {}",
            format_score(ux.readability)
        )));
        field(&mut lines, "Visual Hierarchy", ux.visual_hierarchy.as_deref());
        field(&mut lines, "Call to Action", ux.call_to_action.as_deref());
        field(&mut lines, "Mobile", ux.mobile_optimization.as_deref());
        bullets(&mut lines, "UX Improvements", &ux.improvements, colors);
    }

    bullets(
        &mut lines,
        "Competitive Advantages",
        &analysis.competitive_advantages,
        colors,
    );
    bullets(&mut lines, "Weaknesses", &analysis.weaknesses, colors);
    bullets(&mut lines, "Recommendations", &analysis.recommendations, colors);

    if lines.is_empty() {
        lines.push(Line::from("The analysis came back empty."));
    }
    lines
}

fn original_lines(displayed: &Displayed, colors: &ColorConfig) -> Vec<Line<'static>> {
    let content: &PageContent = displayed.content();
    let mut lines = vec![Line::from(Span::styled(
        displayed.title().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if let Some(url) = displayed.url() {
        lines.push(Line::from(Span::styled(
            url.to_string(),
            Style::default().fg(colors.link),
        )));
    }
    if let Some(description) = &content.description {
        lines.push(Line::from(""));
        lines.push(Line::from(description.clone()));
    }

    if let Some(metadata) = content.metadata.as_ref().filter(|m| !m.is_empty()) {
        lines.push(Line::from(""));
        field(&mut lines, "Author", metadata.author.as_deref());
        field(&mut lines, "Keywords", metadata.keywords.as_deref());
        field(&mut lines, "Canonical", metadata.canonical.as_deref());
    }

    if let Some(stats) = &content.content_stats {
        let mut media = Vec::new();
        if stats.has_video {
            media.push("video");
        }
        if stats.has_audio {
            media.push("audio");
        }
        if stats.has_form {
            media.push("form");
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "{} words · {} min read{}",
            stats.word_count,
            stats.reading_time,
            if media.is_empty() {
                String::new()
            } else {
                format!(" · has {}", media.join(", "))
            }
        )));
    }

    if !content.headings.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Headings", colors));
        for h in &content.headings {
            let indent = "  ".repeat(h.level.clamp(1, 6) as usize);
            lines.push(Line::from(format!("{}H{} {}", indent, h.level, h.text)));
        }
    }

    if !content.paragraphs.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Content", colors));
        for paragraph in content.paragraphs.iter().take(MAX_PARAGRAPHS) {
            lines.push(Line::from(paragraph.clone()));
            lines.push(Line::from(""));
        }
        if content.paragraphs.len() > MAX_PARAGRAPHS {
            lines.push(Line::from(format!(
                "… {} more paragraphs (see Raw JSON)",
                content.paragraphs.len() - MAX_PARAGRAPHS
            )));
        }
    }

    if !content.links.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading(&format!("Links ({})", content.links.len()), colors));
        for link in &content.links {
            let text = link.text.as_deref().filter(|t| !t.trim().is_empty());
            lines.push(Line::from(vec![
                Span::raw(format!("  {} ", text.unwrap_or("(no text)"))),
                Span::styled(link.href.clone(), Style::default().fg(colors.link)),
            ]));
        }
    }

    if !content.images.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading(&format!("Images ({})", content.images.len()), colors));
        for image in &content.images {
            lines.push(Line::from(format!(
                "  {} {}",
                image.src,
                image
                    .alt
                    .as_deref()
                    .map(|alt| format!("({})", alt))
                    .unwrap_or_default()
            )));
        }
    }

    lines
}

fn raw_lines(displayed: &Displayed) -> Vec<Line<'static>> {
    match serde_json::to_string_pretty(displayed) {
        Ok(json) => json.lines().map(|l| Line::from(l.to_string())).collect(),
        Err(e) => vec![Line::from(format!("Could not serialize result: {}", e))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentQuality, Heading, SeoAnalysis};

    fn text(lines: &[Line<'static>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn displayed(analysis: Option<AnalysisResult>) -> Displayed {
        Displayed::Preview(PageContent {
            title: Some("Example".to_string()),
            url: Some("https://example.com".to_string()),
            headings: vec![Heading {
                level: 2,
                text: "Intro".to_string(),
            }],
            ai_analysis: analysis,
            ..Default::default()
        })
    }

    #[test]
    fn test_analysis_view() {
        let analysis = AnalysisResult {
            summary: Some("A demo page.".to_string()),
            content_quality: Some(ContentQuality {
                score: Some(8.0),
                rating: Some("Good".to_string()),
            }),
            seo_analysis: Some(SeoAnalysis {
                recommendations: vec!["Add a meta description".to_string()],
                ..Default::default()
            }),
            weaknesses: vec!["Thin content".to_string()],
            ..Default::default()
        };
        let out = text(&lines(
            &displayed(Some(analysis)),
            ResultView::Analysis,
            &ColorConfig::default(),
        ));

        assert!(out.contains("A demo page."));
        assert!(out.contains("Content Quality    8"));
        assert!(out.contains("Quality Rating     Good"));
        assert!(out.contains("  • Add a meta description"));
        assert!(out.contains("  • Thin content"));
    }

    #[test]
    fn test_missing_analysis() {
        let out = text(&lines(
            &displayed(None),
            ResultView::Analysis,
            &ColorConfig::default(),
        ));
        assert_eq!(out, "No AI analysis available for this result.");
    }

    #[test]
    fn test_original_view() {
        let out = text(&lines(
            &displayed(None),
            ResultView::Original,
            &ColorConfig::default(),
        ));
        assert!(out.starts_with("Example\nhttps://example.com"));
        assert!(out.contains("    H2 Intro"));
    }

    #[test]
    fn test_raw_view_is_json() {
        let out = text(&lines(
            &displayed(None),
            ResultView::Raw,
            &ColorConfig::default(),
        ));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["title"], "Example");
    }
}
