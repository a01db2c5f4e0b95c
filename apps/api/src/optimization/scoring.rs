//! SEO scoring: target density from source length, achieved density from
//! keyword occurrences in the rendered text.
//!
//! Both scores are percentages clamped to `[0, 100]` and rounded. Achieved
//! density is measured against the *original* word count so a rewrite that
//! pads the text does not dilute its own score.

use crate::optimization::highlighter::strip_markers;

const MAX_SCORE: f64 = 100.0;

/// Target keyword density policy, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityPolicy {
    pub average: f64,
    pub ceiling: f64,
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self {
            average: 3.5,
            ceiling: 5.0,
        }
    }
}

impl DensityPolicy {
    /// The density actually targeted: never above the ceiling.
    pub fn effective(&self) -> f64 {
        self.average.min(self.ceiling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub target_score: u32,
    pub current_score: u32,
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `min(words * density / 100, 100)`, rounded.
pub fn target_score(source: &str, policy: &DensityPolicy) -> u32 {
    let words = word_count(source) as f64;
    clamp_round(words * policy.effective() / 100.0)
}

/// Case-insensitive keyword occurrences in `rendered` (highlight markers
/// ignored), as a percentage of the source word count.
pub fn current_score(source: &str, rendered: &str, keywords: &[String]) -> u32 {
    let words = word_count(source);
    if words == 0 {
        return 0;
    }

    let haystack = strip_markers(rendered).to_lowercase();
    let occurrences: usize = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .map(|k| haystack.matches(k.as_str()).count())
        .sum();

    clamp_round(occurrences as f64 / words as f64 * 100.0)
}

pub fn score(
    source: &str,
    rendered: &str,
    keywords: &[String],
    policy: &DensityPolicy,
) -> ScoreResult {
    ScoreResult {
        target_score: target_score(source, policy),
        current_score: current_score(source, rendered, keywords),
    }
}

fn clamp_round(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, MAX_SCORE).round() as u32
}
