//! Observation record filters
use itertools::{EitherOrBoth, Itertools};
use log::debug;

use crate::observation::{same_epoch, ObservationRecord, RecordOrdering};

/// Sorts records with given [RecordOrdering], which must order epochs first.
/// Records are sorted by epoch, then each run of records sharing the same
/// epoch is insertion sorted using [RecordOrdering::less] only, so orderings
/// that are not total never abort the sort. The sort is stable: records that
/// are not less than each other keep their relative order.
pub fn sort<O: RecordOrdering>(records: &mut [ObservationRecord], ordering: &O) {
    records.sort_by(|l, r| l.epoch.cmp(&r.epoch));
    let mut start = 0;
    while start < records.len() {
        let end = start
            + records[start..]
                .iter()
                .take_while(|r| same_epoch(r, &records[start]))
                .count();
        insertion_sort(&mut records[start..end], ordering);
        start = end;
    }
}

fn insertion_sort<O: RecordOrdering>(records: &mut [ObservationRecord], ordering: &O) {
    for i in 1..records.len() {
        let mut j = i;
        while j > 0 && ordering.less(&records[j], &records[j - 1]) {
            records.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Drops consecutive records that share the same epoch,
/// keeping the first one. Records should be sorted first.
pub fn unique(records: &mut Vec<ObservationRecord>) {
    let size = records.len();
    records.dedup_by(|r, l| same_epoch(l, r));
    if records.len() < size {
        debug!("dropped {} duplicated epochs", size - records.len());
    }
}

/// Records present in only one of two sorted lists:
/// (only in `lhs`, only in `rhs`).
pub fn diff<O: RecordOrdering>(
    lhs: &[ObservationRecord],
    rhs: &[ObservationRecord],
    ordering: &O,
) -> (Vec<ObservationRecord>, Vec<ObservationRecord>) {
    let mut only_lhs = Vec::new();
    let mut only_rhs = Vec::new();
    for item in lhs
        .iter()
        .merge_join_by(rhs.iter(), |l, r| ordering.compare(l, r))
    {
        match item {
            EitherOrBoth::Left(l) => only_lhs.push(l.clone()),
            EitherOrBoth::Right(r) => only_rhs.push(r.clone()),
            EitherOrBoth::Both(_, _) => {},
        }
    }
    (only_lhs, only_rhs)
}
