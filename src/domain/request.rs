use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the backend should fetch the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMethod {
    #[default]
    Auto,
    Static,
    Dynamic,
}

impl ScrapeMethod {
    pub fn next(self) -> Self {
        match self {
            ScrapeMethod::Auto => ScrapeMethod::Static,
            ScrapeMethod::Static => ScrapeMethod::Dynamic,
            ScrapeMethod::Dynamic => ScrapeMethod::Auto,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeMethod::Auto => "auto",
            ScrapeMethod::Static => "static",
            ScrapeMethod::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ScrapeMethod::Auto),
            "static" => Ok(ScrapeMethod::Static),
            "dynamic" => Ok(ScrapeMethod::Dynamic),
            other => Err(format!(
                "Unknown scrape method: {}. Use auto, static or dynamic",
                other
            )),
        }
    }
}

/// Body for `POST /scrape` and `POST /preview`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub method: ScrapeMethod,
    #[serde(rename = "analyzeWithAI")]
    pub analyze_with_ai: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: ScrapeMethod::Auto,
            analyze_with_ai: true,
            custom_prompt: None,
        }
    }

    pub fn with_method(mut self, method: ScrapeMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_ai(mut self, analyze: bool) -> Self {
        self.analyze_with_ai = analyze;
        self
    }

    /// Blank prompts are dropped so the backend uses its default analysis.
    pub fn with_prompt(mut self, prompt: Option<&str>) -> Self {
        self.custom_prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_request() {
        let req = ScrapeRequest::new("https://example.com")
            .with_method(ScrapeMethod::Dynamic)
            .with_prompt(Some("  Focus on pricing  "));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com",
                "method": "dynamic",
                "analyzeWithAI": true,
                "customPrompt": "Focus on pricing"
            })
        );
    }

    #[test]
    fn test_blank_prompt_is_omitted() {
        let req = ScrapeRequest::new("https://example.com")
            .with_ai(false)
            .with_prompt(Some("   "));
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("customPrompt").is_none());
        assert_eq!(json["analyzeWithAI"], false);
    }

    #[test]
    fn test_method_cycle_and_parse() {
        assert_eq!(ScrapeMethod::Auto.next().next().next(), ScrapeMethod::Auto);
        assert_eq!("Dynamic".parse::<ScrapeMethod>().unwrap(), ScrapeMethod::Dynamic);
        assert!("headless".parse::<ScrapeMethod>().is_err());
    }
}
