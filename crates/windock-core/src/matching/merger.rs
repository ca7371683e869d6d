//! Collapsing a group into its canonical record.
//!
//! Pure functions over immutable records: the best-scoring member becomes
//! the base, the others only fill its gaps.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::grouper::WindowGroup;
use crate::window::{MergedWindowRecord, RawWindowRecord, SourceTag};

const SCORE_HAS_WINDOW_ID: u32 = 1000;
const SCORE_SOURCE_GEOMETRY: u32 = 300;
const SCORE_SOURCE_ACCESSIBILITY: u32 = 200;
const SCORE_NONZERO_FRAME: u32 = 200;
const SCORE_NOT_MINIMIZED: u32 = 60;
const SCORE_ACTIVE: u32 = 40;
const SCORE_HAS_TITLE: u32 = 20;
const SCORE_FULLSCREEN: u32 = 10;

/// Desirability of a record as the base of its group.
pub fn score_record(record: &RawWindowRecord) -> u32 {
    let mut score = match record.source() {
        SourceTag::Geometry => SCORE_SOURCE_GEOMETRY,
        SourceTag::Accessibility => SCORE_SOURCE_ACCESSIBILITY,
    };
    if record.window_id().is_some() {
        score += SCORE_HAS_WINDOW_ID;
    }
    if !record.frame().is_zero_area() {
        score += SCORE_NONZERO_FRAME;
    }
    if !record.is_minimized() {
        score += SCORE_NOT_MINIMIZED;
    }
    if record.is_active() {
        score += SCORE_ACTIVE;
    }
    if !record.normalized_title().is_empty() {
        score += SCORE_HAS_TITLE;
    }
    if record.is_fullscreen() {
        score += SCORE_FULLSCREEN;
    }
    score
}

/// Order two candidates so that the better base compares `Greater`.
///
/// Score first, then: has window id, Geometry source, larger frame area,
/// not minimized, active, smaller normalized title, smaller pid.
pub fn compare_candidates(a: &RawWindowRecord, b: &RawWindowRecord) -> Ordering {
    score_record(a)
        .cmp(&score_record(b))
        .then(a.window_id().is_some().cmp(&b.window_id().is_some()))
        .then(
            (a.source() == SourceTag::Geometry).cmp(&(b.source() == SourceTag::Geometry)),
        )
        .then(a.frame().area().total_cmp(&b.frame().area()))
        .then((!a.is_minimized()).cmp(&!b.is_minimized()))
        .then(a.is_active().cmp(&b.is_active()))
        .then(b.normalized_title().cmp(a.normalized_title()))
        .then(b.pid().cmp(&a.pid()))
}

/// Merge one group's members into a canonical record.
///
/// Returns `None` only for an empty member list. Members are visited in
/// the order given; the first of several equally good candidates is the
/// base.
pub fn merge_group(members: &[&RawWindowRecord]) -> Option<MergedWindowRecord> {
    let (base_index, base) = members
        .iter()
        .enumerate()
        .fold(None::<(usize, &RawWindowRecord)>, |best, (index, candidate)| {
            match best {
                Some((_, current)) if compare_candidates(candidate, current) != Ordering::Greater => {
                    best
                }
                _ => Some((index, *candidate)),
            }
        })?;

    let mut merged = MergedWindowRecord {
        pid: base.pid(),
        bundle_id: base.bundle_id().to_string(),
        window_id: base.window_id(),
        window_number: base.window_number(),
        title: base.title().to_string(),
        normalized_title: base.normalized_title().to_string(),
        frame: base.frame(),
        minimized: base.is_minimized(),
        active: base.is_active(),
        fullscreen: base.is_fullscreen(),
        sources: BTreeSet::from([base.source()]),
    };

    for (_, other) in members.iter().enumerate().filter(|(i, _)| *i != base_index) {
        if merged.normalized_title.is_empty() && !other.normalized_title().is_empty() {
            merged.title = other.title().to_string();
            merged.normalized_title = other.normalized_title().to_string();
        }
        if merged.frame.is_zero_area() && !other.frame().is_zero_area() {
            merged.frame = other.frame();
        }
        merged.window_id = merged.window_id.or(other.window_id());
        merged.window_number = merged.window_number.or(other.window_number());
        merged.minimized |= other.is_minimized();
        merged.active |= other.is_active();
        merged.fullscreen |= other.is_fullscreen();
        merged.sources.insert(other.source());
    }

    // Whitespace-only titles count as missing.
    if merged.normalized_title.is_empty() {
        merged.title = merged.bundle_id.clone();
        merged.normalized_title = merged.bundle_id.clone();
    }

    Some(merged)
}

/// Merge every group of `pool`, in group order.
pub fn merge_groups(pool: &[RawWindowRecord], groups: &[WindowGroup]) -> Vec<MergedWindowRecord> {
    groups
        .iter()
        .filter_map(|group| {
            let members: Vec<&RawWindowRecord> =
                group.members.iter().filter_map(|i| pool.get(*i)).collect();
            merge_group(&members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::matching::{GroupRule, IouMatchPolicy, group_records};

    fn geo(id: u32) -> RawWindowRecord {
        RawWindowRecord::new(SourceTag::Geometry, 100, "com.apple.Notes")
            .with_window_id(id)
            .with_title("Notes")
            .with_frame(Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    fn ax() -> RawWindowRecord {
        RawWindowRecord::new(SourceTag::Accessibility, 100, "com.apple.Notes").with_title("Notes")
    }

    #[test]
    fn test_score_weights() {
        // 1000 + 300 + 200 + 60 + 20
        assert_eq!(score_record(&geo(7)), 1580);
        // 200 + 60 + 20
        assert_eq!(score_record(&ax()), 280);
        // 200 + 40 + 10
        let flagged = RawWindowRecord::new(SourceTag::Accessibility, 1, "b")
            .with_minimized(true)
            .with_active(true)
            .with_fullscreen(true);
        assert_eq!(score_record(&flagged), 250);
    }

    #[test]
    fn test_tie_breaks_on_area_then_title_then_pid() {
        let small = ax().with_frame(Rect::new(0.0, 0.0, 100.0, 100.0));
        let large = ax().with_frame(Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(compare_candidates(&large, &small), Ordering::Greater);

        let alpha = ax().with_title("Alpha");
        let beta = ax().with_title("Beta");
        assert_eq!(compare_candidates(&alpha, &beta), Ordering::Greater);

        let low = RawWindowRecord::new(SourceTag::Accessibility, 10, "b").with_title("T");
        let high = RawWindowRecord::new(SourceTag::Accessibility, 20, "b").with_title("T");
        assert_eq!(compare_candidates(&low, &high), Ordering::Greater);
        assert_eq!(compare_candidates(&low, &low), Ordering::Equal);
    }

    #[test]
    fn test_minimized_instance_merges_into_live_window() {
        let pool = vec![geo(7), ax().with_minimized(true)];
        let groups = group_records(&pool, &IouMatchPolicy::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rule, GroupRule::TitleGeometry);

        let merged = merge_groups(&pool, &groups);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!(m.window_id, Some(7));
        assert!(m.minimized);
        assert_eq!(m.frame, Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(
            m.sources,
            BTreeSet::from([SourceTag::Geometry, SourceTag::Accessibility])
        );
    }

    #[test]
    fn test_window_number_match_merges_sources() {
        let g = RawWindowRecord::new(SourceTag::Geometry, 100, "com.apple.Notes")
            .with_window_number(3)
            .with_frame(Rect::new(0.0, 0.0, 400.0, 300.0));
        let a = ax().with_window_number(3).with_active(true);
        let pool = vec![g, a];

        let groups = group_records(&pool, &IouMatchPolicy::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rule, GroupRule::ProcessWindowNumber);

        let merged = &merge_groups(&pool, &groups)[0];
        assert_eq!(merged.window_number, Some(3));
        assert_eq!(merged.title, "Notes");
        assert!(merged.active);
        assert_eq!(merged.sources.len(), 2);
    }

    #[test]
    fn test_gaps_filled_from_other_members() {
        let base = geo(7).with_title("");
        let other = ax()
            .with_window_number(12)
            .with_fullscreen(true)
            .with_title("Notes — Edited");
        let merged = merge_group(&[&base, &other]).unwrap();

        assert_eq!(merged.title, "Notes — Edited");
        assert_eq!(merged.normalized_title, "Notes");
        assert_eq!(merged.window_number, Some(12));
        assert!(merged.fullscreen);
    }

    #[test]
    fn test_title_defaults_to_bundle_id() {
        let untitled = RawWindowRecord::new(SourceTag::Accessibility, 5, "com.example.App");
        let merged = merge_group(&[&untitled]).unwrap();
        assert_eq!(merged.title, "com.example.App");
    }

    #[test]
    fn test_flags_are_or_combined_regardless_of_base() {
        let plain = geo(7);
        let minimized = ax().with_minimized(true);
        for members in [[&plain, &minimized], [&minimized, &plain]] {
            let merged = merge_group(&members).unwrap();
            assert!(merged.minimized);
            assert_eq!(merged.window_id, Some(7));
        }
    }

    #[test]
    fn test_nonempty_member_title_survives_merge() {
        let titled = ax().with_minimized(true);
        let untitled = geo(7).with_title("");
        let merged = merge_group(&[&untitled, &titled]).unwrap();
        assert_eq!(merged.title, "Notes");
    }

    #[test]
    fn test_blank_base_title_adopts_member_title() {
        let blank = geo(7).with_title("   ");
        let titled = ax().with_window_number(7);
        assert_eq!(score_record(&blank), 1560);

        let merged = merge_group(&[&blank, &titled]).unwrap();
        assert_eq!(merged.window_id, Some(7));
        assert_eq!(merged.title, "Notes");
        assert_eq!(merged.normalized_title, "Notes");
    }

    #[test]
    fn test_blank_title_falls_back_to_bundle_id() {
        let blank = RawWindowRecord::new(SourceTag::Accessibility, 5, "com.example.App")
            .with_title(" \t ");
        let merged = merge_group(&[&blank]).unwrap();
        assert_eq!(merged.title, "com.example.App");
        assert_eq!(merged.normalized_title, "com.example.App");
    }

    #[test]
    fn test_empty_group_merges_to_none() {
        assert!(merge_group(&[]).is_none());
    }
}
