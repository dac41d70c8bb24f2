//! Caption extraction from vendor responses

use serde_json::Value;

/// A generated caption
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub confidence: Option<f64>,
}

/// Pull the caption out of an analysis response.
///
/// Understands the Image Analysis 4.0 shape (`captionResult`) and the
/// Computer Vision v3.2 shape (`description.captions[0]`).
pub fn extract_caption(response: &Value) -> Option<Caption> {
    let node = match response.get("captionResult") {
        Some(result) => result,
        None => response.pointer("/description/captions/0")?,
    };

    let text = node.get("text")?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    Some(Caption {
        text: text.to_string(),
        confidence: node.get("confidence").and_then(Value::as_f64),
    })
}

impl std::fmt::Display for Caption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.confidence {
            Some(confidence) => write!(f, "'{}', Confidence: {:.4}", self.text, confidence),
            None => write!(f, "'{}'", self.text),
        }
    }
}
