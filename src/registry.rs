use std::collections::BTreeMap;

use crate::animation::{
    Animation,
    reveal::{Reveal, Scene},
    topics::{
        circle_area::CircleArea, parabola::Parabola, pythagoras::Pythagoras,
        reflection::Reflection, sine_wave::SineWave, slope::Slope, unit_circle::UnitCircle,
    },
};

/// Normalized topic identifier: lowercase with all whitespace removed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationKey(String);

impl AnimationKey {
    /// Normalize a raw user query. Returns `None` when nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        (!key.is_empty()).then_some(Self(key))
    }

    /// The normalized key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnimationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every topic that has an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TopicKind {
    /// `pythagoras`
    Pythagoras,
    /// `unitcircle`
    UnitCircle,
    /// `slope`
    Slope,
    /// `sinewave`
    SineWave,
    /// `parabola`
    Parabola,
    /// `circlearea`
    CircleArea,
    /// `reflection`
    Reflection,
}

impl TopicKind {
    /// All topics in catalog order.
    pub const ALL: [TopicKind; 7] = [
        TopicKind::Pythagoras,
        TopicKind::UnitCircle,
        TopicKind::Slope,
        TopicKind::SineWave,
        TopicKind::Parabola,
        TopicKind::CircleArea,
        TopicKind::Reflection,
    ];

    /// Registry key.
    pub fn key(self) -> &'static str {
        match self {
            TopicKind::Pythagoras => Pythagoras::KEY,
            TopicKind::UnitCircle => UnitCircle::KEY,
            TopicKind::Slope => Slope::KEY,
            TopicKind::SineWave => SineWave::KEY,
            TopicKind::Parabola => Parabola::KEY,
            TopicKind::CircleArea => CircleArea::KEY,
            TopicKind::Reflection => Reflection::KEY,
        }
    }

    /// Fresh animation with default geometry, progress at its start.
    pub fn animation(self) -> Box<dyn Animation> {
        match self {
            TopicKind::Pythagoras => Box::new(Reveal::new(Pythagoras::default())),
            TopicKind::UnitCircle => Box::new(Reveal::new(UnitCircle::default())),
            TopicKind::Slope => Box::new(Reveal::new(Slope::default())),
            TopicKind::SineWave => Box::new(Reveal::new(SineWave::default())),
            TopicKind::Parabola => Box::new(Reveal::new(Parabola::default())),
            TopicKind::CircleArea => Box::new(Reveal::new(CircleArea::default())),
            TopicKind::Reflection => Box::new(Reveal::new(Reflection::default())),
        }
    }
}

/// Maps normalized keys to animation variants.
#[derive(Clone, Debug)]
pub struct Registry {
    topics: BTreeMap<String, TopicKind>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Registry holding every built-in topic.
    pub fn builtin() -> Self {
        Self::with_topics(TopicKind::ALL)
    }

    /// Registry restricted to `topics`.
    pub fn with_topics(topics: impl IntoIterator<Item = TopicKind>) -> Self {
        Self {
            topics: topics
                .into_iter()
                .map(|t| (t.key().to_owned(), t))
                .collect(),
        }
    }

    /// Topic registered under `key`.
    pub fn topic(&self, key: &AnimationKey) -> Option<TopicKind> {
        self.topics.get(key.as_str()).copied()
    }

    /// Fresh animation for `key`, if one is registered.
    pub fn resolve(&self, key: &AnimationKey) -> Option<Box<dyn Animation>> {
        self.topic(key).map(TopicKind::animation)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }
}
