//! Scene intervals and the merge/ranking stage.
//!
//! Raw scene boundaries come from the detector as an ordered list of
//! `SceneInterval`s. This module normalizes them into render candidates:
//! adjacent too-short scenes are merged until they meet a length floor,
//! fade-in/fade-out noise at the edges is trimmed, and the survivors are
//! ranked and truncated to the configured scene limit.

use std::cmp::Ordering;

use crate::config::ProcessingConfig;
use crate::utils::format_timecode;

/// An instant on a video's timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    /// Position in seconds from the start of the video.
    pub seconds: f64,
    /// Frame index at the video's native frame rate.
    pub frame: u64,
}

impl TimePoint {
    /// Creates a time point at `seconds`, deriving the frame index from the
    /// video's frame rate.
    #[must_use]
    pub fn new(seconds: f64, fps: f64) -> Self {
        let frame = if fps > 0.0 && seconds > 0.0 {
            (seconds * fps).round() as u64
        } else {
            0
        };
        Self { seconds, frame }
    }

    /// Display timecode, HH:MM:SS.mmm.
    #[must_use]
    pub fn timecode(&self) -> String {
        format_timecode(self.seconds)
    }
}

/// A contiguous span of a video, delimited by two time points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneInterval {
    pub start: TimePoint,
    pub end: TimePoint,
}

impl SceneInterval {
    #[must_use]
    pub fn new(start: TimePoint, end: TimePoint) -> Self {
        Self { start, end }
    }

    /// Length of the interval in seconds. Degenerate intervals yield a
    /// non-positive duration and are excluded from ranking.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end.seconds - self.start.seconds
    }
}

/// Whether a raw scene should be dropped by the edge-trim rule.
///
/// The first and last detected scenes are assumed to be fade-in/fade-out
/// noise when they are shorter than the minimum short length. The rule only
/// applies when more than one scene was detected: a single-scene list is
/// never trimmed.
#[must_use]
pub fn should_trim_edge(index: usize, scene_count: usize, duration: f64, min_length: f64) -> bool {
    scene_count > 1 && (index == 0 || index == scene_count - 1) && duration < min_length
}

/// Merges short raw scenes into larger runs that meet the length floor.
///
/// Single left-to-right pass with two running accumulators: a "small" run
/// collecting consecutive sub-minimum scenes and a "large" run collecting
/// consecutive at-or-above-minimum scenes. A scene of one kind closes the
/// other kind's run, which is emitted only if it has reached the min/max
/// midpoint. A small run that reaches `max_combined_scene_length` while
/// being extended is flushed immediately. After the pass the remaining open
/// runs are emitted under the same midpoint floor; runs that never reach it
/// are discarded.
///
/// The pass is an online greedy merge: deterministic and cheap, not
/// globally optimal. Emitted intervals are disjoint and keep the original
/// scene order.
#[must_use]
pub fn combine_scenes(scenes: &[SceneInterval], config: &ProcessingConfig) -> Vec<SceneInterval> {
    let midpoint = config.middle_short_length();
    let mut small_run: Option<SceneInterval> = None;
    let mut large_run: Option<SceneInterval> = None;
    let mut combined = Vec::new();

    for (i, scene) in scenes.iter().enumerate() {
        let duration = scene.duration();

        if should_trim_edge(i, scenes.len(), duration, config.min_short_length) {
            continue;
        }

        if duration < config.min_short_length {
            small_run = match small_run {
                None => Some(*scene),
                Some(mut run) => {
                    run.end = scene.end;
                    if run.duration() >= config.max_combined_scene_length {
                        combined.push(run);
                        None
                    } else {
                        Some(run)
                    }
                }
            };

            // A short scene interrupts an in-progress large run.
            if let Some(run) = large_run.take() {
                if run.duration() >= midpoint {
                    combined.push(run);
                }
            }
        } else {
            large_run = match large_run {
                None => Some(*scene),
                Some(mut run) => {
                    run.end = scene.end;
                    Some(run)
                }
            };

            if let Some(run) = small_run.take() {
                if run.duration() >= midpoint {
                    combined.push(run);
                }
            }
        }
    }

    for run in [small_run, large_run].into_iter().flatten() {
        if run.duration() >= midpoint {
            combined.push(run);
        }
    }

    combined
}

/// How merged intervals are scored before truncation.
#[derive(Debug, Clone)]
pub enum RankingStrategy {
    /// Longest coherent action segments first.
    Duration,
    /// Externally supplied per-interval scores (indexed in merge order),
    /// e.g. an audio-energy action signal. Missing entries score zero.
    ExternalScores(Vec<f64>),
}

impl RankingStrategy {
    fn score(&self, index: usize, interval: &SceneInterval) -> f64 {
        match self {
            Self::Duration => interval.duration(),
            Self::ExternalScores(scores) => scores.get(index).copied().unwrap_or(0.0),
        }
    }
}

/// Sorts merged intervals by descending score and keeps at most `limit`.
///
/// Zero-or-negative-duration candidates are excluded up front so a
/// degenerate interval can never reach the compositor.
#[must_use]
pub fn rank_scenes(
    scenes: &[SceneInterval],
    strategy: &RankingStrategy,
    limit: usize,
) -> Vec<SceneInterval> {
    let mut scored: Vec<(f64, SceneInterval)> = scenes
        .iter()
        .enumerate()
        .filter(|(_, scene)| scene.duration() > 0.0)
        .map(|(i, scene)| (strategy.score(i, scene), *scene))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, scene)| scene).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start: f64, end: f64) -> SceneInterval {
        SceneInterval::new(TimePoint::new(start, 30.0), TimePoint::new(end, 30.0))
    }

    #[test]
    fn test_timepoint_frame_index() {
        let tp = TimePoint::new(5.0, 30.0);
        assert_eq!(tp.frame, 150);
        assert_eq!(tp.timecode(), "00:00:05.000");
    }

    #[test]
    fn test_edge_trim_requires_multiple_scenes() {
        // A single sub-minimum scene is never trimmed
        assert!(!should_trim_edge(0, 1, 3.0, 5.0));
        // With more than one scene, short first/last scenes are trimmed
        assert!(should_trim_edge(0, 2, 3.0, 5.0));
        assert!(should_trim_edge(1, 2, 3.0, 5.0));
        // Interior scenes are never trimmed
        assert!(!should_trim_edge(1, 3, 3.0, 5.0));
        // Long edge scenes are kept
        assert!(!should_trim_edge(0, 2, 8.0, 5.0));
    }

    #[test]
    fn test_rank_scenes_by_duration() {
        let scenes = vec![interval(0.0, 5.0), interval(5.0, 25.0), interval(25.0, 35.0)];
        let ranked = rank_scenes(&scenes, &RankingStrategy::Duration, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].duration(), 20.0);
        assert_eq!(ranked[1].duration(), 10.0);
    }

    #[test]
    fn test_rank_scenes_excludes_degenerate_intervals() {
        let scenes = vec![interval(5.0, 5.0), interval(9.0, 7.0), interval(0.0, 4.0)];
        let ranked = rank_scenes(&scenes, &RankingStrategy::Duration, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].duration(), 4.0);
    }

    #[test]
    fn test_rank_scenes_with_external_scores() {
        let scenes = vec![interval(0.0, 20.0), interval(20.0, 25.0)];
        let strategy = RankingStrategy::ExternalScores(vec![0.1, 0.9]);
        let ranked = rank_scenes(&scenes, &strategy, 2);
        // The shorter interval wins on its action score
        assert_eq!(ranked[0].duration(), 5.0);
    }
}
