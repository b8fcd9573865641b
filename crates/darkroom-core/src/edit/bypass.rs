//! Stage groups and the bypass set used for A/B previews.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A group of stages that can be bypassed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageGroup {
    Curves,
    Light,
    Color,
    Effects,
}

impl StageGroup {
    pub const ALL: [Self; 4] = [Self::Curves, Self::Light, Self::Color, Self::Effects];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Curves => "curves",
            Self::Light => "light",
            Self::Color => "color",
            Self::Effects => "effects",
        }
    }
}

/// Groups the caller wants disabled without touching the edit state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BypassSet(BTreeSet<StageGroup>);

impl BypassSet {
    /// Nothing bypassed.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(group: StageGroup) -> Self {
        Self(BTreeSet::from([group]))
    }

    pub fn with(mut self, group: StageGroup) -> Self {
        self.0.insert(group);
        self
    }

    pub fn contains(&self, group: StageGroup) -> bool {
        self.0.contains(&group)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StageGroup> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<StageGroup> for BypassSet {
    fn from_iter<I: IntoIterator<Item = StageGroup>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
