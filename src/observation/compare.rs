//! Observation record orderings
use std::{cmp::Ordering, collections::BTreeSet};

use crate::observation::{ObsType, ObservationData, ObservationRecord};

/// Strict "less than" predicate over [ObservationRecord]s
pub trait RecordOrdering {
    fn less(&self, l: &ObservationRecord, r: &ObservationRecord) -> bool;
    /// [Ordering] derived from [Self::less]: records that
    /// are not less than each other compare Equal.
    fn compare(&self, l: &ObservationRecord, r: &ObservationRecord) -> Ordering {
        if self.less(l, r) {
            Ordering::Less
        } else if self.less(r, l) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// True if both records share the same epoch
pub fn same_epoch(l: &ObservationRecord, r: &ObservationRecord) -> bool {
    l.epoch == r.epoch
}

/// Orders records by epoch only
#[derive(Debug, Default, Copy, Clone)]
pub struct TimeOrdering;

impl RecordOrdering for TimeOrdering {
    fn less(&self, l: &ObservationRecord, r: &ObservationRecord) -> bool {
        l.epoch < r.epoch
    }
}

/// Orders records by epoch, flag and clock offset, then by content,
/// over a set of observation types.
///
/// Content comparison is a short-circuit scan: the first measurement of
/// `l` that is less than its counterpart in `r` makes `l` less than `r`,
/// but a greater measurement does not stop the scan. This is not a
/// strict weak ordering when records differ in more than one measurement.
#[derive(Debug, Default, Clone)]
pub struct FullOrdering {
    obs_set: BTreeSet<ObsType>,
}

impl FullOrdering {
    pub fn new(obs_set: BTreeSet<ObsType>) -> Self {
        Self { obs_set }
    }
    pub fn obs_set(&self) -> &BTreeSet<ObsType> {
        &self.obs_set
    }
}

impl RecordOrdering for FullOrdering {
    fn less(&self, l: &ObservationRecord, r: &ObservationRecord) -> bool {
        match l.epoch.cmp(&r.epoch) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {},
        }
        match l.flag.cmp(&r.flag) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {},
        }
        let (l_clk, r_clk) = (l.clock_offset.unwrap_or(0.0), r.clock_offset.unwrap_or(0.0));
        if l_clk < r_clk {
            return true;
        } else if l_clk > r_clk {
            return false;
        }

        match l.sv_count().cmp(&r.sv_count()) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {},
        }

        let missing = ObservationData::default();
        for (sv, l_obs) in l.observations.iter() {
            let r_obs = match r.observations.get(sv) {
                Some(r_obs) => r_obs,
                None => return false,
            };
            for obs_type in self.obs_set.iter() {
                let l_data = l_obs.get(obs_type).unwrap_or(&missing);
                let r_data = r_obs.get(obs_type).unwrap_or(&missing);
                if l_data.obs < r_data.obs {
                    return true;
                }
                let (l_lli, r_lli) = (l_data.lli_value(), r_data.lli_value());
                if l_lli != 0 && r_lli != 0 && l_lli < r_lli {
                    return true;
                }
                let (l_ssi, r_ssi) = (l_data.ssi_value(), r_data.ssi_value());
                if l_ssi != 0 && r_ssi != 0 && l_ssi < r_ssi {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        observation::{EpochFlag, LliFlags, SNR},
        prelude::{Constellation, Duration, Epoch, TimeScale, SV},
    };
    use std::str::FromStr;

    fn t0() -> Epoch {
        Epoch::from_gregorian_at_midnight(2020, 6, 25, TimeScale::GPST)
    }

    fn l1() -> ObsType {
        ObsType::from_str("L1").unwrap()
    }

    fn c1() -> ObsType {
        ObsType::from_str("C1").unwrap()
    }

    fn full() -> FullOrdering {
        FullOrdering::new([l1(), c1()].into_iter().collect())
    }

    fn record(l1_value: f64) -> ObservationRecord {
        ObservationRecord::new(t0()).with_observation(
            SV::new(Constellation::GPS, 1),
            l1(),
            ObservationData::new(l1_value),
        )
    }

    #[test]
    fn time_ordering() {
        let a = record(1.0);
        let mut b = record(0.0);
        b.epoch += Duration::from_seconds(30.0);
        assert!(TimeOrdering.less(&a, &b));
        assert!(!TimeOrdering.less(&b, &a));
        assert!(!TimeOrdering.less(&a, &a));
        assert_eq!(TimeOrdering.compare(&a, &b), Ordering::Less);
        assert_eq!(TimeOrdering.compare(&a, &record(5.0)), Ordering::Equal);
        assert!(same_epoch(&a, &record(5.0)));
        assert!(!same_epoch(&a, &b));
    }

    #[test]
    fn header_fields() {
        let ord = full();
        let a = record(1.0);
        let b = a.with_flag(EpochFlag::PowerFailure);
        assert!(ord.less(&a, &b));
        assert!(!ord.less(&b, &a));

        let b = a.with_clock_offset(1.0E-3);
        assert!(ord.less(&a, &b));
        assert!(!ord.less(&b, &a));

        // flag takes precedence over clock offset
        let a = a.with_clock_offset(2.0E-3);
        assert!(ord.less(&a, &b.with_flag(EpochFlag::CycleSlip)));
    }

    #[test]
    fn satellite_count() {
        let ord = full();
        let a = record(5.0);
        let b = record(1.0).with_observation(
            SV::new(Constellation::GPS, 2),
            l1(),
            ObservationData::new(0.0),
        );
        assert!(ord.less(&a, &b));
        assert!(!ord.less(&b, &a));
    }

    #[test]
    fn content() {
        let ord = full();
        assert!(ord.less(&record(1.0), &record(2.0)));
        assert!(!ord.less(&record(2.0), &record(1.0)));
        assert!(!ord.less(&record(1.0), &record(1.0)));
        assert_eq!(ord.compare(&record(1.0), &record(1.0)), Ordering::Equal);

        // missing satellite
        let a = record(1.0);
        let b = ObservationRecord::new(t0()).with_observation(
            SV::new(Constellation::GPS, 3),
            l1(),
            ObservationData::new(2.0),
        );
        assert!(!ord.less(&a, &b));
        assert!(!ord.less(&b, &a));

        // missing data reads as zero
        let b = record(1.0).with_observation(
            SV::new(Constellation::GPS, 1),
            c1(),
            ObservationData::new(2.0E7),
        );
        assert!(ord.less(&a, &b));
    }

    #[test]
    fn indicators() {
        let ord = full();
        let g01 = SV::new(Constellation::GPS, 1);
        let a = ObservationRecord::new(t0()).with_observation(
            g01,
            l1(),
            ObservationData::new(1.0).with_lli(LliFlags::LOCK_LOSS),
        );
        let b = ObservationRecord::new(t0()).with_observation(
            g01,
            l1(),
            ObservationData::new(1.0).with_lli(LliFlags::UNDER_ANTI_SPOOFING),
        );
        assert!(ord.less(&a, &b));
        assert!(!ord.less(&b, &a));

        // null indicators are ignored
        let c = ObservationRecord::new(t0()).with_observation(g01, l1(), ObservationData::new(1.0));
        assert!(!ord.less(&c, &b));
        assert!(!ord.less(&b, &c));

        let a = c.with_observation(g01, l1(), ObservationData::new(1.0).with_ssi(SNR::DbHz12));
        let b = c.with_observation(g01, l1(), ObservationData::new(1.0).with_ssi(SNR::DbHz54));
        assert!(ord.less(&a, &b));
        assert!(!ord.less(&b, &a));
    }
}
