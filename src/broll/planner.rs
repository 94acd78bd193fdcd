use rand::Rng;
use rand::seq::SliceRandom;

use super::error::PlannerError;
use super::model::{PlacementCandidate, SegmentRange, SourceItem};

/// Draw the next segment to place.
///
/// Selection is memoryless: every call picks uniformly from `eligible`, so the
/// same item may be chosen back to back. The length is drawn from `range` and
/// capped by the clip's usable length and by `remaining`, in that order, so
/// the result is always at least one frame and never overshoots the target.
/// A clip with no usable frames is an error rather than a window past its end.
pub fn choose_next<R: Rng>(
    rng: &mut R,
    eligible: &[SourceItem],
    range: SegmentRange,
    remaining: u64,
) -> Result<PlacementCandidate, PlannerError> {
    if remaining == 0 {
        return Err(PlannerError::NothingRemaining);
    }
    let item = eligible.choose(rng).ok_or(PlannerError::NoItems)?;
    if item.length_cap() == Some(0) {
        return Err(PlannerError::EmptyClip(item.id.0.clone()));
    }

    let mut length = rng.gen_range(range.min_frames()..=range.max_frames());
    if let Some(cap) = item.length_cap() {
        length = length.min(cap);
    }
    let length = length.min(remaining);

    let trim_start = match item.length_cap() {
        Some(usable) if length < usable => rng.gen_range(0..=usable - length),
        _ => 0,
    };

    Ok(PlacementCandidate {
        item: item.clone(),
        trim_start,
        trim_length: length,
        record_position: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn range(min: u64, max: u64) -> SegmentRange {
        SegmentRange::new(min, max).unwrap()
    }

    #[test]
    fn clip_lengths_stay_within_range_and_usable_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = vec![SourceItem::clip("beach", 50)];
        for _ in 0..500 {
            let candidate = choose_next(&mut rng, &items, range(20, 30), 1000).unwrap();
            assert!((20..=30).contains(&candidate.trim_length));
            assert!(candidate.trim_start + candidate.trim_length <= 50);
        }
    }

    #[test]
    fn short_clip_is_used_whole() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = vec![SourceItem::clip("blink", 8)];
        for _ in 0..100 {
            let candidate = choose_next(&mut rng, &items, range(20, 30), 1000).unwrap();
            assert_eq!(candidate.trim_length, 8);
            assert_eq!(candidate.trim_start, 0);
        }
    }

    #[test]
    fn remaining_caps_below_minimum() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = vec![SourceItem::clip("beach", 500)];
        let candidate = choose_next(&mut rng, &items, range(20, 30), 3).unwrap();
        assert_eq!(candidate.trim_length, 3);
        assert!(candidate.trim_start <= 497);
    }

    #[test]
    fn stills_ignore_usable_length_and_start_at_zero() {
        let mut rng = StdRng::seed_from_u64(11);
        let items = vec![SourceItem::still("logo")];
        for _ in 0..200 {
            let candidate = choose_next(&mut rng, &items, range(48, 120), 10_000).unwrap();
            assert_eq!(candidate.trim_start, 0);
            assert!((48..=120).contains(&candidate.trim_length));
        }
    }

    #[test]
    fn selection_allows_repeats() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = vec![SourceItem::clip("a", 100), SourceItem::clip("b", 100)];
        let picks: Vec<String> = (0..50)
            .map(|_| {
                choose_next(&mut rng, &items, range(10, 20), 1000)
                    .unwrap()
                    .item
                    .id
                    .0
            })
            .collect();
        assert!(picks.windows(2).any(|pair| pair[0] == pair[1]));
        assert!(picks.iter().any(|id| id == "a"));
        assert!(picks.iter().any(|id| id == "b"));
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let items = vec![SourceItem::clip("a", 300), SourceItem::still("b")];
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| choose_next(&mut rng, &items, range(10, 90), 5000).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn empty_pool_and_zero_remaining_are_errors() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            choose_next(&mut rng, &[], range(1, 2), 10),
            Err(PlannerError::NoItems)
        );
        assert_eq!(
            choose_next(&mut rng, &[SourceItem::still("x")], range(1, 2), 0),
            Err(PlannerError::NothingRemaining)
        );
    }

    #[test]
    fn zero_length_clip_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            choose_next(&mut rng, &[SourceItem::clip("void", 0)], range(1, 2), 10),
            Err(PlannerError::EmptyClip("void".to_string()))
        );
    }
}
