//! End-to-end tests for the exploration pipeline.

use ucf_rs::canonical::{canonical_form, relabel, Permutation};
use ucf_rs::closure::{is_union_closed, union_closure};
use ucf_rs::compress::{compress, compress_until_stable, DEFAULT_MAX_PASSES};
use ucf_rs::config::ExploreConfig;
use ucf_rs::dedup::unique_union_closed;
use ucf_rs::explore::{run, run_with_config};
use ucf_rs::record::write_csv;

// ─── Reference table ───────────────────────────────────────────────────────────

const N3_TABLE: &str = "\
index,antichain_minimals,family_size,min_freq_before,var_before,compressed_changed,min_freq_after,var_after,freqs_before,freqs_after
0,[[0]],2,0.0,0.055556,False,0.0,0.055556,\"[0.5, 0.0, 0.0]\",\"[0.5, 0.0, 0.0]\"
1,\"[[0], [1]]\",4,0.0,0.055556,True,0.0,0.074074,\"[0.5, 0.5, 0.0]\",\"[0.666667, 0.333333, 0.0]\"
2,\"[[0], [1], [2]]\",8,0.5,0.0,True,0.25,0.041667,\"[0.5, 0.5, 0.5]\",\"[0.75, 0.5, 0.25]\"
3,\"[[0], [1, 2]]\",4,0.5,0.0,True,0.25,0.041667,\"[0.5, 0.5, 0.5]\",\"[0.75, 0.5, 0.25]\"
4,\"[[0, 1]]\",2,0.0,0.055556,False,0.0,0.055556,\"[0.5, 0.5, 0.0]\",\"[0.5, 0.5, 0.0]\"
5,\"[[0, 1], [0, 2]]\",4,0.5,0.013889,True,0.333333,0.024691,\"[0.75, 0.5, 0.5]\",\"[0.666667, 0.666667, 0.333333]\"
6,\"[[0, 1], [0, 2], [1, 2]]\",5,0.6,0.0,True,0.333333,0.024691,\"[0.6, 0.6, 0.6]\",\"[0.666667, 0.666667, 0.333333]\"
7,\"[[0, 1, 2]]\",2,0.5,0.0,False,0.5,0.0,\"[0.5, 0.5, 0.5]\",\"[0.5, 0.5, 0.5]\"
";

#[test]
fn n3_table_matches_reference() {
    let records = run(3, None).unwrap();
    let mut out = Vec::new();
    write_csv(&mut out, &records).unwrap();
    let text = String::from_utf8(out).unwrap();

    let actual: Vec<&str> = text.lines().collect();
    let expected: Vec<&str> = N3_TABLE.lines().collect();
    assert_eq!(actual, expected);
}

#[test]
fn runs_are_reproducible() {
    let config = ExploreConfig::new(5).with_max_families(Some(40));
    let a = run_with_config(&config).unwrap();
    let b = run_with_config(&config).unwrap();
    assert_eq!(a.records, b.records);
    assert_eq!(a.families, b.families);
}

// ─── Known counts ──────────────────────────────────────────────────────────────

#[test]
fn non_isomorphic_counts() {
    let counts: Vec<usize> = (1..=4).map(|n| run(n, None).unwrap().len()).collect();
    assert_eq!(counts, vec![1, 3, 8, 28]);
}

#[test]
fn capped_n5_prefix() {
    let records = run(5, Some(25)).unwrap();
    assert_eq!(records.len(), 25);
    assert_eq!(records[0].antichain_minimals, vec![vec![0]]);
    assert_eq!(records[0].family_size, 2);
}

// ─── Properties over every kept family ─────────────────────────────────────────

#[test]
fn kept_families_are_closed_and_distinct() {
    let n = 4;
    let families = unique_union_closed(n, None).unwrap();
    let mut forms: Vec<_> = families.iter().map(|(_, f)| canonical_form(f, n)).collect();

    for (antichain, family) in &families {
        assert!(is_union_closed(family));
        assert_eq!(*family, union_closure(antichain.masks()));
    }

    let total = forms.len();
    forms.sort();
    forms.dedup();
    assert_eq!(forms.len(), total);
}

#[test]
fn canonical_form_ignores_relabeling() {
    let n = 4;
    for (_, family) in unique_union_closed(n, None).unwrap() {
        let canon = canonical_form(&family, n);
        let perm = Permutation::new(vec![3, 0, 2, 1]).unwrap();
        let image = relabel(&family, &perm).unwrap();
        assert_eq!(canonical_form(&image, n), canon);
    }
}

#[test]
fn compression_reaches_fixed_point() {
    let n = 4;
    for (_, family) in unique_union_closed(n, None).unwrap() {
        let c = compress_until_stable(&family, n, DEFAULT_MAX_PASSES);
        assert!(c.converged);
        for i in 0..n {
            for j in (i + 1)..n {
                assert_eq!(compress(&c.family, i, j), c.family);
            }
        }
    }
}

#[test]
fn frequencies_are_bounded() {
    for record in run(4, None).unwrap() {
        for &x in record.freqs_before.iter().chain(&record.freqs_after) {
            assert!((0.0..=1.0).contains(&x));
        }
        assert!(record.var_before >= 0.0);
        assert!(record.var_after >= 0.0);
        assert!(record.min_freq_before <= 1.0);
    }
}

// ─── Input validation ──────────────────────────────────────────────────────────

#[test]
fn oversized_ground_set_is_rejected() {
    let err = run(ucf_rs::mask::MAX_ELEMENTS + 1, None).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(err.to_string().starts_with("Invalid input"));
}
