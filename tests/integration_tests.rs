use chrono::NaiveDate;
use referral_breakdown::aggregation::breakdown::Breakdown;
use referral_breakdown::aggregation::engine::AttributionEngine;
use referral_breakdown::core::deal::{Deal, DealSet};
use referral_breakdown::core::name::Name;
use referral_breakdown::format::decoder::{decode_file, decode_str, DecodeError};
use referral_breakdown::format::emitter::OutputFormat;
use referral_breakdown::graph::cycle_detection::find_cycles;
use referral_breakdown::graph::referral_map::{ReferralMap, ResolveError};
use referral_breakdown::pipeline::{run, RunError};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn testdata(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(file)
}

fn deal(name: &str, date: (i32, u32, u32), referrer: Option<&str>) -> Deal {
    let d = Deal::new(
        Name::new(name),
        NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
    );
    match referrer {
        Some(r) => d.with_referrer(Name::new(r)),
        None => d,
    }
}

/// Flatten a breakdown into plain strings for comparison as a mapping.
fn as_map(b: &Breakdown) -> BTreeMap<String, BTreeMap<String, u64>> {
    b.iter()
        .map(|(month, referrers)| {
            (
                month.to_string(),
                referrers
                    .iter()
                    .map(|(name, count)| (name.to_string(), *count))
                    .collect(),
            )
        })
        .collect()
}

fn expected(entries: &[(&str, &[(&str, u64)])]) -> BTreeMap<String, BTreeMap<String, u64>> {
    entries
        .iter()
        .map(|(month, referrers)| {
            (
                month.to_string(),
                referrers.iter().map(|(n, c)| (n.to_string(), *c)).collect(),
            )
        })
        .collect()
}

fn breakdown_of(deals: Vec<Deal>) -> Breakdown {
    AttributionEngine::monthly_breakdown(&DealSet::from_deals(deals).unwrap()).unwrap()
}

#[test]
fn single_direct_referral() {
    let b = breakdown_of(vec![
        deal("Alice", (2024, 1, 15), None),
        deal("Bob", (2024, 1, 20), Some("Alice")),
    ]);
    assert_eq!(as_map(&b), expected(&[("2024-01", &[("Alice", 1)])]));
}

#[test]
fn two_hop_chain_compresses_map() {
    let set = DealSet::from_deals(vec![
        deal("A", (2024, 2, 1), None),
        deal("B", (2024, 2, 5), Some("A")),
        deal("C", (2024, 2, 10), Some("B")),
    ])
    .unwrap();
    let mut referrals = ReferralMap::from_deals(&set);
    let b = AttributionEngine::monthly_breakdown_with(&set, &mut referrals).unwrap();

    assert_eq!(as_map(&b), expected(&[("2024-02", &[("A", 2)])]));
    assert_eq!(referrals.parent(&Name::new("B")), Some(&Name::new("A")));
    assert_eq!(referrals.parent(&Name::new("C")), Some(&Name::new("A")));
}

#[test]
fn chains_crossing_months() {
    let b = breakdown_of(vec![
        deal("A", (2024, 1, 3), None),
        deal("B", (2024, 2, 5), Some("A")),
        deal("C", (2024, 2, 10), Some("B")),
        deal("D", (2024, 3, 1), Some("A")),
    ]);
    assert_eq!(
        as_map(&b),
        expected(&[("2024-02", &[("A", 2)]), ("2024-03", &[("A", 1)])])
    );
}

#[test]
fn independent_roots_in_one_month() {
    let b = breakdown_of(vec![
        deal("A", (2024, 4, 1), None),
        deal("X", (2024, 4, 2), None),
        deal("B", (2024, 4, 10), Some("A")),
        deal("Y", (2024, 4, 11), Some("X")),
    ]);
    assert_eq!(as_map(&b), expected(&[("2024-04", &[("A", 1), ("X", 1)])]));
}

#[test]
fn referrer_without_deal_is_root() {
    let b = breakdown_of(vec![deal("B", (2024, 5, 2), Some("Ghost"))]);
    assert_eq!(as_map(&b), expected(&[("2024-05", &[("Ghost", 1)])]));
}

#[test]
fn unreferred_deal_produces_empty_breakdown() {
    let b = breakdown_of(vec![deal("A", (2024, 6, 1), None)]);
    assert!(b.is_empty());
}

#[test]
fn referral_into_later_chain_member() {
    // C is referred by B before B's own deal appears in the input.
    let b = breakdown_of(vec![
        deal("C", (2024, 1, 1), Some("B")),
        deal("B", (2024, 2, 1), Some("A")),
    ]);
    assert_eq!(
        as_map(&b),
        expected(&[("2024-01", &[("A", 1)]), ("2024-02", &[("A", 1)])])
    );
}

#[test]
fn file_report_text() {
    let mut out = Vec::new();
    let b = run(testdata("deals.json"), OutputFormat::Text, &mut out).unwrap();

    assert_eq!(b.total(), 6);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "2024-02: \n\tA: 2\n\n\
         2024-03: \n\tA: 1\n\n\
         2024-04: \n\tA: 1\n\tX: 1\n\n\
         2024-05: \n\tGhost: 1\n\n"
    );
}

#[test]
fn file_report_json() {
    let mut out = Vec::new();
    run(testdata("deals.json"), OutputFormat::Json, &mut out).unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({
            "2024-02": { "A": 2 },
            "2024-03": { "A": 1 },
            "2024-04": { "A": 1, "X": 1 },
            "2024-05": { "Ghost": 1 },
        })
    );
}

#[test]
fn decode_failure_emits_nothing() {
    let mut out = Vec::new();
    let err = run(testdata("bad_date.json"), OutputFormat::Text, &mut out).unwrap_err();
    assert!(matches!(err, RunError::Decode(DecodeError::InvalidDate { .. })));
    assert!(out.is_empty());

    let err = run(testdata("missing.json"), OutputFormat::Text, &mut out).unwrap_err();
    assert!(matches!(err, RunError::Decode(DecodeError::Io { .. })));
    assert!(out.is_empty());
}

#[test]
fn cyclic_file_fails_without_output() {
    let mut out = Vec::new();
    let err = run(testdata("cyclic.json"), OutputFormat::Text, &mut out).unwrap_err();
    assert!(matches!(err, RunError::Resolve(ResolveError::Cycle { .. })));
    assert!(out.is_empty());

    let deals = decode_file(testdata("cyclic.json")).unwrap();
    let cycles = find_cycles(&ReferralMap::from_deals(&deals));
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        cycles[0].names,
        vec![Name::new("A"), Name::new("C"), Name::new("B")]
    );
}

#[test]
fn decoded_and_built_sets_agree() {
    let decoded = decode_str(
        r#"[{"name": "A", "close_date": "02-01-2024"},
            {"name": "B", "close_date": "02-05-2024", "referred_by": "A"},
            {"name": "C", "close_date": "02-10-2024", "referred_by": "B"}]"#,
    )
    .unwrap();
    let built = DealSet::from_deals(vec![
        deal("A", (2024, 2, 1), None),
        deal("B", (2024, 2, 5), Some("A")),
        deal("C", (2024, 2, 10), Some("B")),
    ])
    .unwrap();
    assert_eq!(decoded.deals(), built.deals());
    assert_eq!(
        AttributionEngine::monthly_breakdown(&decoded).unwrap(),
        AttributionEngine::monthly_breakdown(&built).unwrap()
    );
}
