//! Hype score computation.
//!
//! Pure, deterministic mapping from a listing's raw popularity signals to a
//! normalized 0–100 composite score. No I/O and no shared state, so the
//! rescore job can evaluate listings in any order.
//!
//! Signal curves:
//! - stars and downloads use log compression, so counts spanning orders of
//!   magnitude contribute smoothly instead of letting a few viral outliers
//!   saturate the scale;
//! - recency decays linearly from 100 at a fresh scrape to 0 at 30 days;
//! - upvotes are linear and saturate at 50, since community upvotes are a
//!   low-volume, high-signal input compared to star counts.

/// Weight for the stars term in the composite (0.0 - 1.0).
const STARS_WEIGHT: f64 = 0.30;

/// Weight for the downloads term in the composite (0.0 - 1.0).
const DOWNLOADS_WEIGHT: f64 = 0.25;

/// Weight for the recency term in the composite (0.0 - 1.0).
const RECENCY_WEIGHT: f64 = 0.25;

/// Weight for the upvotes term in the composite (0.0 - 1.0).
const UPVOTES_WEIGHT: f64 = 0.20;

/// Star count that maps to a full stars score.
const STARS_CEILING: f64 = 100_000.0;

/// Download count that maps to a full downloads score. Downloads run roughly
/// an order of magnitude above stars for comparable popularity, so the
/// ceiling is recalibrated to keep the two terms comparable.
const DOWNLOADS_CEILING: f64 = 1_000_000.0;

/// Days without a scraper refresh after which the recency score reaches 0.
const RECENCY_WINDOW_DAYS: f64 = 30.0;

const SECS_PER_DAY: f64 = 86_400.0;

/// Logarithmic stars curve: 0 → 0, 10 → 20, 1,000 → 60, 100,000+ → 100.
pub fn stars_score(stars: i64) -> f64 {
    let stars = stars.max(0) as f64;
    let score = (stars + 1.0).log10() / STARS_CEILING.log10() * 100.0;
    score.clamp(0.0, 100.0)
}

/// Logarithmic downloads curve, saturating at one million downloads.
pub fn downloads_score(downloads: i64) -> f64 {
    let downloads = downloads.max(0) as f64;
    let score = (downloads + 1.0).log10() / DOWNLOADS_CEILING.log10() * 100.0;
    score.clamp(0.0, 100.0)
}

/// Linear freshness decay: 100 at zero elapsed days, 0 at 30+ days.
///
/// Uses fractional days so the decay is continuous. Timestamps in the
/// future clamp to a full score rather than exceeding the scale.
pub fn recency_score(updated_at_unix: i64, now_unix: i64) -> f64 {
    let days = (now_unix - updated_at_unix) as f64 / SECS_PER_DAY;
    let score = 100.0 - days * (100.0 / RECENCY_WINDOW_DAYS);
    score.clamp(0.0, 100.0)
}

/// Linear upvote curve saturating at 50 upvotes.
pub fn upvotes_score(upvotes: i64) -> f64 {
    let upvotes = upvotes.max(0) as f64;
    (upvotes * 2.0).clamp(0.0, 100.0)
}

/// Weighted composite of the four signal curves, rounded to an integer
/// in [0, 100].
///
/// An unknown scrape timestamp counts as "now" — a full recency score —
/// rather than penalizing listings that have never been refreshed.
pub fn composite_score(
    stars: i64,
    downloads: i64,
    upvotes: i64,
    updated_at_unix: Option<i64>,
    now_unix: i64,
) -> i64 {
    let recency = recency_score(updated_at_unix.unwrap_or(now_unix), now_unix);

    let composite = STARS_WEIGHT * stars_score(stars)
        + DOWNLOADS_WEIGHT * downloads_score(downloads)
        + RECENCY_WEIGHT * recency
        + UPVOTES_WEIGHT * upvotes_score(upvotes);

    (composite.round() as i64).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    // The +1 inside the log shifts small counts slightly above the ideal
    // anchor (e.g. 10 stars → 20.8, not 20.0), so anchors get a 1-point band.
    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1.0
    }

    #[test]
    fn test_stars_anchors() {
        assert_eq!(stars_score(0), 0.0);
        assert!(approx(stars_score(10), 20.0));
        assert!(approx(stars_score(100), 40.0));
        assert!(approx(stars_score(1_000), 60.0));
        assert!(approx(stars_score(10_000), 80.0));
        assert!(approx(stars_score(100_000), 100.0));
        assert_eq!(stars_score(10_000_000), 100.0);
    }

    #[test]
    fn test_stars_monotone_and_bounded() {
        let mut prev = -1.0;
        for s in [0, 1, 5, 10, 99, 100, 999, 50_000, 100_000, 1_000_000] {
            let score = stars_score(s);
            assert!(score >= prev, "stars_score not monotone at {}", s);
            assert!((0.0..=100.0).contains(&score));
            prev = score;
        }
    }

    #[test]
    fn test_downloads_anchors() {
        assert_eq!(downloads_score(0), 0.0);
        assert!(approx(downloads_score(1_000_000), 100.0));
        assert_eq!(downloads_score(100_000_000), 100.0);
        let mut prev = -1.0;
        for d in [0, 10, 1_000, 100_000, 1_000_000, 10_000_000] {
            let score = downloads_score(d);
            assert!(score >= prev);
            assert!((0.0..=100.0).contains(&score));
            prev = score;
        }
    }

    #[test]
    fn test_recency_decay() {
        let now = 1_700_000_000;
        assert_eq!(recency_score(now, now), 100.0);
        assert_eq!(recency_score(now - 30 * DAY, now), 0.0);
        assert_eq!(recency_score(now - 365 * DAY, now), 0.0);
        assert!(approx(recency_score(now - 15 * DAY, now), 50.0));
        assert!(approx(recency_score(now - 5 * DAY, now), 83.3));
        // Future timestamps clamp to full score, never exceed it
        assert_eq!(recency_score(now + DAY, now), 100.0);
    }

    #[test]
    fn test_upvotes_linear_saturating() {
        assert_eq!(upvotes_score(0), 0.0);
        assert_eq!(upvotes_score(10), 20.0);
        assert_eq!(upvotes_score(50), 100.0);
        assert_eq!(upvotes_score(51), 100.0);
        assert_eq!(upvotes_score(10_000), 100.0);
    }

    #[test]
    fn test_negative_inputs_clamp() {
        assert_eq!(stars_score(-5), 0.0);
        assert_eq!(downloads_score(-1), 0.0);
        assert_eq!(upvotes_score(-7), 0.0);
    }

    #[test]
    fn test_composite_bounds() {
        let now = 1_700_000_000;
        for (s, d, u, ts) in [
            (0, 0, 0, Some(now - 100 * DAY)),
            (100_000, 1_000_000, 50, Some(now)),
            (123, 45_678, 3, Some(now - 7 * DAY)),
            (i64::MAX / 2, i64::MAX / 2, i64::MAX / 2, Some(0)),
        ] {
            let c = composite_score(s, d, u, ts, now);
            assert!((0..=100).contains(&c), "composite out of range: {}", c);
        }
    }

    #[test]
    fn test_composite_worked_example() {
        // stars=1000 → ~60.0, downloads=50000 → ~78.3, 5 days old → ~83.3,
        // upvotes=10 → 20; weighted sum ≈ 62.4
        let now = 1_700_000_000;
        let c = composite_score(1_000, 50_000, 10, Some(now - 5 * DAY), now);
        assert_eq!(c, 62);
    }

    #[test]
    fn test_composite_brand_new_listing() {
        // All-zero signals with a fresh timestamp: only the recency term
        // contributes, 0.25 * 100 = 25.
        let now = 1_700_000_000;
        assert_eq!(composite_score(0, 0, 0, Some(now), now), 25);
    }

    #[test]
    fn test_composite_missing_timestamp_is_fresh() {
        let now = 1_700_000_000;
        assert_eq!(
            composite_score(0, 0, 0, None, now),
            composite_score(0, 0, 0, Some(now), now)
        );
    }

    #[test]
    fn test_composite_deterministic() {
        let now = 1_700_000_000;
        let a = composite_score(777, 8_888, 9, Some(now - 3 * DAY), now);
        let b = composite_score(777, 8_888, 9, Some(now - 3 * DAY), now);
        assert_eq!(a, b);
    }
}
