use std::str::FromStr;

use gnss_nav::{
    observation::{filter, LliFlags, SNR},
    prelude::{
        Constellation, Duration, Epoch, EpochFlag, HeaderMerge, Merge, ObsType, ObservationData,
        ObservationHeader, ObservationRecord, RecordOrdering, TimeScale, TimeOrdering, SV,
    },
};

fn obs(codes: &[&str]) -> Vec<ObsType> {
    codes.iter().map(|c| ObsType::from_str(c).unwrap()).collect()
}

fn epoch(seconds: f64) -> Epoch {
    Epoch::from_gregorian_at_midnight(2022, 3, 1, TimeScale::GPST) + Duration::from_seconds(seconds)
}

fn record(seconds: f64, sv: &[u8], c1: f64) -> ObservationRecord {
    let mut rec = ObservationRecord::new(epoch(seconds));
    for prn in sv {
        rec = rec
            .with_observation(
                SV::new(Constellation::GPS, *prn),
                ObsType::from_str("C1").unwrap(),
                ObservationData::new(c1 + *prn as f64),
            )
            .with_observation(
                SV::new(Constellation::GPS, *prn),
                ObsType::from_str("L1").unwrap(),
                ObservationData::new(c1 / 0.19)
                    .with_lli(LliFlags::OK_OR_UNKNOWN)
                    .with_ssi(SNR::from_str("7").unwrap()),
            );
    }
    rec
}

#[test]
fn merged_files() {
    let headers = [
        ObservationHeader::default()
            .with_marker_name("AJAC")
            .with_program("teqc")
            .with_comment("receiver reset")
            .with_obs_types(&obs(&["C1", "L1", "L2", "P2", "S1"])),
        ObservationHeader::default()
            .with_marker_name("AJAC")
            .with_comment("receiver reset")
            .with_comment("antenna swap")
            .with_obs_types(&obs(&["L1", "C1", "S1"])),
        ObservationHeader::default()
            .with_marker_name("AJAC")
            .with_obs_types(&obs(&["S1", "C1", "L1", "D1"])),
    ];

    let merged = HeaderMerge::from_headers(headers.iter()).unwrap();
    let header = merged.header().unwrap();
    assert_eq!(header.program, "teqc");
    assert_eq!(header.comments, vec!["antenna swap", "receiver reset"]);
    assert_eq!(merged.obs_set(), &obs(&["C1", "L1", "S1"]).into_iter().collect());

    // records of all files, sorted then deduplicated
    let ordering = merged.full_ordering();
    let mut records = vec![
        record(30.0, &[1, 2], 2.0E7),
        record(0.0, &[1, 2, 3], 2.0E7),
        record(0.0, &[1, 2, 3], 2.0E7),
        record(60.0, &[1], 2.1E7),
        record(30.0, &[1, 2], 2.0E7),
    ];
    filter::sort(&mut records, &ordering);
    filter::unique(&mut records);

    let epochs = records.iter().map(|r| r.epoch).collect::<Vec<_>>();
    assert_eq!(epochs, vec![epoch(0.0), epoch(30.0), epoch(60.0)]);
}

#[test]
fn self_merge() {
    let header = ObservationHeader::default()
        .with_agency("IGN")
        .with_comment("comment")
        .with_obs_types(&obs(&["C1", "L1", "L2"]));
    let merged = header.merge(&header).unwrap();
    assert_eq!(merged.agency, header.agency);
    assert_eq!(merged.comments, header.comments);
    assert_eq!(merged.obs_set(), header.obs_set());

    let mut fold = HeaderMerge::new();
    for _ in 0..3 {
        fold.touch(&header).unwrap();
    }
    assert_eq!(fold.obs_set(), &header.obs_set());
}

#[test]
fn file_differences() {
    let merged = HeaderMerge::from_headers([&ObservationHeader::default()
        .with_obs_types(&obs(&["C1", "L1"]))])
    .unwrap();
    let ordering = merged.full_ordering();

    let lhs = vec![
        record(0.0, &[1, 2], 2.0E7),
        record(30.0, &[1, 2], 2.0E7),
        record(60.0, &[1, 2], 2.0E7),
    ];
    let rhs = vec![
        record(0.0, &[1, 2], 2.0E7),
        record(30.0, &[1, 2, 3], 2.0E7),
        record(60.0, &[1, 2], 2.0E7).with_flag(EpochFlag::PowerFailure),
    ];

    let (only_lhs, only_rhs) = filter::diff(&lhs, &rhs, &ordering);
    assert_eq!(only_lhs, vec![lhs[1].clone(), lhs[2].clone()]);
    assert_eq!(only_rhs, vec![rhs[1].clone(), rhs[2].clone()]);

    // epochs only
    let (only_lhs, only_rhs) = filter::diff(&lhs, &rhs, &TimeOrdering);
    assert!(only_lhs.is_empty());
    assert!(only_rhs.is_empty());
    assert!(TimeOrdering.less(&lhs[0], &rhs[1]));
}
