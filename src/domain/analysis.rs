use serde::{Deserialize, Serialize};

/// AI-derived insights for a page. Every field is optional; the backend fills
/// in whatever its prompt produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub summary: Option<String>,
    pub key_points: Vec<String>,
    pub content_quality: Option<ContentQuality>,
    pub credibility: Option<Credibility>,
    pub monetization_potential: Option<ScoreCard>,
    pub virality_score: Option<ScoreCard>,
    pub seo_analysis: Option<SeoAnalysis>,
    pub ux_assessment: Option<UxAssessment>,
    pub competitive_advantages: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub category: Option<String>,
    pub sentiment: Option<String>,
    pub target_audience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentQuality {
    pub score: Option<f64>,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credibility {
    pub trust_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreCard {
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoAnalysis {
    pub title_optimization: Option<String>,
    pub meta_description: Option<String>,
    pub header_structure: Option<String>,
    pub keyword_density: Option<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UxAssessment {
    pub readability: Option<f64>,
    pub visual_hierarchy: Option<String>,
    pub call_to_action: Option<String>,
    pub mobile_optimization: Option<String>,
    pub improvements: Vec<String>,
}

impl AnalysisResult {
    /// Labelled scores in display order, skipping absent cards.
    pub fn scores(&self) -> Vec<(&'static str, Option<f64>)> {
        let mut scores = Vec::with_capacity(4);
        if let Some(quality) = &self.content_quality {
            scores.push(("Content Quality", quality.score));
        }
        if let Some(credibility) = &self.credibility {
            scores.push(("Trust Score", credibility.trust_score));
        }
        if let Some(monetization) = &self.monetization_potential {
            scores.push(("Monetization", monetization.score));
        }
        if let Some(virality) = &self.virality_score {
            scores.push(("Virality", virality.score));
        }
        scores
    }
}

/// Render a score the way the cards do: zero or missing reads as "N/A".
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s != 0.0 && s.is_finite() => {
            if s.fract() == 0.0 {
                format!("{}", s as i64)
            } else {
                format!("{:.1}", s)
            }
        }
        _ => "N/A".to_string(),
    }
}
