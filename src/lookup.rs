use std::{collections::BTreeMap, path::Path, time::Duration};

use anyhow::Context as _;

use crate::{
    foundation::error::{MathvizError, MathvizResult},
    registry::AnimationKey,
};

/// Explanatory text for a topic.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Explanation {
    /// Heading.
    pub title: String,
    /// Body paragraph.
    #[serde(rename = "text")]
    pub body: String,
}

/// Failure of a text lookup.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// No text is known for the key.
    #[error("Concept not found. Please check the list of available topics.")]
    NotFound(AnimationKey),
}

/// Asynchronous source of topic explanations.
#[async_trait::async_trait]
pub trait TextLookup: Send + Sync {
    /// Resolve the explanation for `key`.
    async fn lookup(&self, key: &AnimationKey) -> Result<Explanation, LookupError>;
}

/// In-memory catalog of explanations answered after a fixed simulated latency.
#[derive(Clone, Debug)]
pub struct CatalogLookup {
    entries: BTreeMap<String, Explanation>,
    latency: Duration,
}

impl Default for CatalogLookup {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CatalogLookup {
    /// Catalog with the built-in topics and a 500 ms latency.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(key, title, body)| {
                (
                    (*key).to_owned(),
                    Explanation {
                        title: (*title).to_owned(),
                        body: (*body).to_owned(),
                    },
                )
            })
            .collect();
        Self {
            entries,
            latency: Duration::from_millis(500),
        }
    }

    /// Empty catalog without latency.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            latency: Duration::ZERO,
        }
    }

    /// Replace the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add or replace one entry. The key is normalized first.
    pub fn insert(&mut self, key: &str, explanation: Explanation) -> MathvizResult<()> {
        let key = AnimationKey::normalize(key)
            .ok_or_else(|| MathvizError::validation("catalog key must not be empty"))?;
        self.entries.insert(key.as_str().to_owned(), explanation);
        Ok(())
    }

    /// Merge entries from a JSON object `{ "key": { "title": .., "text": .. } }`.
    pub fn merge_json(&mut self, json: &str) -> MathvizResult<()> {
        let extra: BTreeMap<String, Explanation> =
            serde_json::from_str(json).map_err(|e| MathvizError::serde(e.to_string()))?;
        for (key, explanation) in extra {
            self.insert(&key, explanation)?;
        }
        Ok(())
    }

    /// Merge entries from a JSON file.
    pub fn merge_path(&mut self, path: &Path) -> MathvizResult<()> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read explanations '{}'", path.display()))?;
        self.merge_json(&json)
    }

    /// Keys with an explanation.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Synchronous access to an entry.
    pub fn get(&self, key: &AnimationKey) -> Option<&Explanation> {
        self.entries.get(key.as_str())
    }
}

#[async_trait::async_trait]
impl TextLookup for CatalogLookup {
    async fn lookup(&self, key: &AnimationKey) -> Result<Explanation, LookupError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.get(key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(key.clone()))
    }
}

const BUILTIN: &[(&str, &str, &str)] = &[
    (
        "pythagoras",
        "The Pythagorean Theorem",
        "This theorem states that for a right-angled triangle, the square of the hypotenuse \
         (the longest side) is equal to the sum of the squares of the other two sides. \
         The formula is a² + b² = c².",
    ),
    (
        "unitcircle",
        "The Unit Circle",
        "The unit circle has a radius of 1. For any point on the circle, its (x, y) coordinates \
         correspond to the cosine and sine of the angle (θ). So, x = cos(θ) and y = sin(θ).",
    ),
    (
        "slope",
        "Slope",
        "Slope measures the steepness of a line. It's calculated as 'rise' (vertical change) \
         divided by 'run' (horizontal change). A positive slope goes up, and a negative slope \
         goes down.",
    ),
    (
        "sinewave",
        "Sine Wave",
        "A sine wave is a smooth, periodic curve. It can be created by plotting the sine of an \
         angle against the angle itself. This shape appears naturally in light, sound, and \
         alternating current.",
    ),
    (
        "parabola",
        "Parabola",
        "A parabola is a U-shaped curve produced by a quadratic equation, such as y = x². \
         Every point on a parabola is equidistant from a fixed point (the focus) and a fixed \
         line (the directrix).",
    ),
    (
        "circlearea",
        "Circle Area",
        "The area of a circle is the space it occupies. It is calculated using the formula \
         A = πr², where 'r' is the radius of the circle and π (pi) is a constant approximately \
         equal to 3.14159.",
    ),
    (
        "reflection",
        "Reflection",
        "A reflection is a transformation that flips a shape across a line, creating a mirror \
         image. When reflecting across the y-axis, the x-coordinate of every point changes its \
         sign (e.g., (x, y) becomes (-x, y)).",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> AnimationKey {
        AnimationKey::normalize(s).unwrap()
    }

    #[tokio::test]
    async fn builtin_catalog_answers_known_topics() {
        let lookup = CatalogLookup::builtin().with_latency(Duration::ZERO);
        let e = lookup.lookup(&key("Pythagoras")).await.unwrap();
        assert_eq!(e.title, "The Pythagorean Theorem");
        assert!(e.body.ends_with("a² + b² = c²."));
        assert_eq!(lookup.keys().count(), 7);
    }

    #[tokio::test]
    async fn unknown_topic_is_not_found() {
        let lookup = CatalogLookup::builtin().with_latency(Duration::ZERO);
        let err = lookup.lookup(&key("unknownconcept")).await.unwrap_err();
        assert_eq!(err, LookupError::NotFound(key("unknownconcept")));
        assert_eq!(
            err.to_string(),
            "Concept not found. Please check the list of available topics."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let lookup = CatalogLookup::builtin();
        let started = tokio::time::Instant::now();
        lookup.lookup(&key("slope")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[test]
    fn merge_json_normalizes_keys() {
        let mut lookup = CatalogLookup::empty();
        lookup
            .merge_json(r#"{ "Golden Ratio": { "title": "Golden Ratio", "text": "φ ≈ 1.618" } }"#)
            .unwrap();
        assert_eq!(lookup.get(&key("goldenratio")).unwrap().body, "φ ≈ 1.618");
        assert!(lookup.merge_json("[1, 2]").is_err());
        assert!(lookup.merge_json(r#"{ " ": { "title": "t", "text": "b" } }"#).is_err());
    }
}
