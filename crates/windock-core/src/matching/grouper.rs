//! Partitioning the raw pool into same-window equivalence classes.
//!
//! Four passes run in order, each over the records no earlier pass has
//! placed in a group:
//!
//! 1. same window id
//! 2. same process and window number
//! 3. same process and normalized title, with corroborating geometry
//! 4. everything left becomes a singleton
//!
//! A pass only closes buckets that gathered at least two records, so a lone
//! record with an id can still meet its counterpart by number or title.
//! Passes 2 and 3 never put two different window ids in one group.
//!
//! Every bucket is keyed through a `BTreeMap` and pass 3 sorts its
//! candidates before clustering, so the result depends only on the input
//! list.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use super::policy::MatchPolicy;
use crate::window::RawWindowRecord;

/// Which pass formed a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupRule {
    WindowId,
    ProcessWindowNumber,
    TitleGeometry,
    Singleton,
}

impl GroupRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRule::WindowId => "window_id",
            GroupRule::ProcessWindowNumber => "pid_window_number",
            GroupRule::TitleGeometry => "title_geometry",
            GroupRule::Singleton => "singleton",
        }
    }
}

/// One equivalence class: indices into the pool, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowGroup {
    pub rule: GroupRule,
    pub members: Vec<usize>,
}

impl WindowGroup {
    fn new(rule: GroupRule, mut members: Vec<usize>) -> Self {
        members.sort_unstable();
        Self { rule, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Records that share a bucket and hold at most one distinct window id.
struct Cluster {
    window_id: Option<u32>,
    members: Vec<usize>,
}

impl Cluster {
    fn new(index: usize, window_id: Option<u32>) -> Self {
        Self {
            window_id,
            members: vec![index],
        }
    }

    fn accepts_id(&self, window_id: Option<u32>) -> bool {
        match (self.window_id, window_id) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    fn push(&mut self, index: usize, window_id: Option<u32>) {
        self.window_id = self.window_id.or(window_id);
        self.members.push(index);
    }
}

/// Partition `pool` into equivalence classes.
///
/// Every index appears in exactly one group. Groups are ordered by pass,
/// then by bucket key; singletons follow pool order.
pub fn group_records(pool: &[RawWindowRecord], policy: &dyn MatchPolicy) -> Vec<WindowGroup> {
    let mut grouped = vec![false; pool.len()];
    let mut groups = Vec::new();

    // Pass 1: window id
    let mut by_id: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, record) in pool.iter().enumerate() {
        if let Some(id) = record.window_id() {
            by_id.entry(id).or_default().push(index);
        }
    }
    for members in by_id.into_values() {
        close(&mut groups, &mut grouped, GroupRule::WindowId, members);
    }

    // Pass 2: (pid, window number)
    let mut by_number: BTreeMap<(i32, i64), Vec<usize>> = BTreeMap::new();
    for (index, record) in ungrouped(pool, &grouped) {
        if let Some(number) = record.window_number() {
            by_number
                .entry((record.pid(), number))
                .or_default()
                .push(index);
        }
    }
    for bucket in by_number.into_values() {
        let mut clusters: Vec<Cluster> = Vec::new();
        for index in bucket {
            let id = pool[index].window_id();
            match clusters.iter_mut().find(|c| c.accepts_id(id)) {
                Some(cluster) => cluster.push(index, id),
                None => clusters.push(Cluster::new(index, id)),
            }
        }
        for cluster in clusters {
            close(
                &mut groups,
                &mut grouped,
                GroupRule::ProcessWindowNumber,
                cluster.members,
            );
        }
    }

    // Pass 3: (pid, normalized title) + geometry
    let mut by_title: BTreeMap<(i32, &str), Vec<usize>> = BTreeMap::new();
    for (index, record) in ungrouped(pool, &grouped) {
        if !record.normalized_title().is_empty() {
            by_title
                .entry((record.pid(), record.normalized_title()))
                .or_default()
                .push(index);
        }
    }
    for mut bucket in by_title.into_values() {
        bucket.sort_by(|a, b| title_pass_order(&pool[*a], &pool[*b]).then(a.cmp(b)));

        // The first record of a cluster anchors it. Live frames sort first,
        // so a zero-area record joins the first compatible live cluster
        // instead of chaining two unrelated live windows together.
        let mut clusters: Vec<Cluster> = Vec::new();
        for index in bucket {
            let record = &pool[index];
            let id = record.window_id();
            let target = clusters.iter_mut().find(|c| {
                let anchor = &pool[c.members[0]];
                c.accepts_id(id)
                    && policy.titles_correspond(anchor.normalized_title(), record.normalized_title())
                    && policy.geometry_corroborates(&anchor.frame(), &record.frame())
            });
            match target {
                Some(cluster) => cluster.push(index, id),
                None => clusters.push(Cluster::new(index, id)),
            }
        }
        for cluster in clusters {
            close(
                &mut groups,
                &mut grouped,
                GroupRule::TitleGeometry,
                cluster.members,
            );
        }
    }

    // Pass 4: singletons
    let remaining: Vec<usize> = ungrouped(pool, &grouped).map(|(index, _)| index).collect();
    for index in remaining {
        grouped[index] = true;
        groups.push(WindowGroup::new(GroupRule::Singleton, vec![index]));
    }

    debug!(
        event = "core.matching.group_completed",
        policy = policy.name(),
        record_count = pool.len(),
        group_count = groups.len()
    );

    groups
}

fn ungrouped<'p>(
    pool: &'p [RawWindowRecord],
    grouped: &[bool],
) -> impl Iterator<Item = (usize, &'p RawWindowRecord)> {
    pool.iter()
        .enumerate()
        .filter(move |(index, _)| !grouped[*index])
}

fn close(
    groups: &mut Vec<WindowGroup>,
    grouped: &mut [bool],
    rule: GroupRule,
    members: Vec<usize>,
) {
    if members.len() < 2 {
        return;
    }
    for index in &members {
        grouped[*index] = true;
    }
    groups.push(WindowGroup::new(rule, members));
}

/// Live frames first, then Geometry before Accessibility, id-bearing
/// records first, then frame coordinates.
fn title_pass_order(a: &RawWindowRecord, b: &RawWindowRecord) -> Ordering {
    let (fa, fb) = (a.frame(), b.frame());
    fa.is_zero_area()
        .cmp(&fb.is_zero_area())
        .then(a.source().cmp(&b.source()))
        .then(a.window_id().is_none().cmp(&b.window_id().is_none()))
        .then(a.window_id().cmp(&b.window_id()))
        .then(a.window_number().cmp(&b.window_number()))
        .then(fa.x.total_cmp(&fb.x))
        .then(fa.y.total_cmp(&fb.y))
        .then(fa.width.total_cmp(&fb.width))
        .then(fa.height.total_cmp(&fb.height))
}
