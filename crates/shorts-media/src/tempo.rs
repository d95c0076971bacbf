//! Audio tempo chaining.
//!
//! `atempo` only accepts factors in 0.5..=2.0, so larger changes are split
//! into several in-range stages whose product is the requested speed.

use crate::filter::{num, Filter, Fragment};

pub const MIN_TEMPO: f64 = 0.5;
pub const MAX_TEMPO: f64 = 2.0;

/// Per-stage factors for `speed`; empty at normal or invalid speed.
pub fn tempo_stages(speed: f64) -> Vec<f64> {
    if !speed.is_finite() || speed <= 0.0 || speed == 1.0 {
        return Vec::new();
    }

    let mut stages = Vec::new();
    let mut remaining = speed;
    while remaining > MAX_TEMPO {
        stages.push(MAX_TEMPO);
        remaining /= MAX_TEMPO;
    }
    while remaining < MIN_TEMPO {
        stages.push(MIN_TEMPO);
        remaining /= MIN_TEMPO;
    }
    stages.push(remaining);
    stages
}

/// One `atempo` filter per stage.
pub fn tempo_filters(speed: f64) -> Vec<Filter> {
    tempo_stages(speed)
        .into_iter()
        .map(|factor| Filter::new("atempo").arg(num(factor)))
        .collect()
}

/// Chained `atempo` fragment, `None` when no retiming is needed.
pub fn audio_tempo_fragment(speed: f64) -> Option<Fragment> {
    let filters = tempo_filters(speed);
    (!filters.is_empty()).then(|| Fragment::chain(filters))
}

/// Audio tempo expression for `speed`, e.g. `atempo=2,atempo=1.5`.
///
/// Returns an empty string at normal speed.
pub fn build_audio_tempo_filter(speed: f64) -> String {
    audio_tempo_fragment(speed)
        .map(Fragment::into_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_is_single_stage() {
        assert_eq!(build_audio_tempo_filter(1.5), "atempo=1.5");
        assert_eq!(build_audio_tempo_filter(0.75), "atempo=0.75");
        assert_eq!(build_audio_tempo_filter(2.0), "atempo=2");
        assert_eq!(build_audio_tempo_filter(0.5), "atempo=0.5");
    }

    #[test]
    fn test_fast_speed_chains() {
        assert_eq!(tempo_stages(3.0), vec![2.0, 1.5]);
        assert_eq!(build_audio_tempo_filter(3.0), "atempo=2,atempo=1.5");
        assert_eq!(build_audio_tempo_filter(5.0), "atempo=2,atempo=2,atempo=1.25");
    }

    #[test]
    fn test_slow_speed_chains() {
        assert_eq!(tempo_stages(0.25), vec![0.5, 0.5]);
        assert_eq!(build_audio_tempo_filter(0.3), "atempo=0.5,atempo=0.6");
    }

    #[test]
    fn test_neutral_and_invalid() {
        assert!(tempo_stages(1.0).is_empty());
        assert!(tempo_stages(0.0).is_empty());
        assert!(tempo_stages(-3.0).is_empty());
        assert!(tempo_stages(f64::NAN).is_empty());
        assert_eq!(build_audio_tempo_filter(1.0), "");
        assert_eq!(audio_tempo_fragment(1.0), None);
    }

    #[test]
    fn test_stage_product_matches_speed() {
        for speed in [0.1, 0.3, 0.5, 0.9, 1.1, 2.0, 3.0, 4.5, 10.0] {
            let stages = tempo_stages(speed);
            let product: f64 = stages.iter().product();
            assert!((product - speed).abs() < 1e-9, "speed {speed}");
            assert!(stages.iter().all(|s| (MIN_TEMPO..=MAX_TEMPO).contains(s)));
        }
    }
}
