// tests/properties.rs
// Property tests for tolerance matching and report construction.

use numcheck::compare::{compare_texts, SourceText};
use numcheck::Filter;
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn render(values: &[f64]) -> String {
    values.iter().map(|v| format!("value {:.6}\n", v)).collect()
}

fn value_filter(abs_tolerance: f64) -> Filter {
    Filter::builder().from_string("value").abs_tolerance(abs_tolerance).build().unwrap()
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn within_tolerance_always_passes(
        values in proptest::collection::vec(-1.0e3f64..1.0e3, 1..20),
        noise in proptest::collection::vec(-4.0e-4f64..4.0e-4, 20),
    ) {
        let shifted: Vec<f64> = values.iter().zip(&noise).map(|(v, n)| v + n).collect();
        let actual = SourceText::new("out", &render(&shifted));
        let reference = SourceText::new("ref", &render(&values));
        let report = compare_texts(&[value_filter(1.0e-3)], &actual, &reference).unwrap();
        prop_assert!(report.passed(), "diff:\n{}", report.diff);
        prop_assert_eq!(report.compared, values.len());
    }

    #[test]
    fn one_bad_value_fails_and_is_marked(
        values in proptest::collection::vec(-1.0e3f64..1.0e3, 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let bad = pick.index(values.len());
        let mut shifted = values.clone();
        shifted[bad] += 1.0;
        let actual = SourceText::new("out", &render(&shifted));
        let reference = SourceText::new("ref", &render(&values));
        let report = compare_texts(&[value_filter(1.0e-3)], &actual, &reference).unwrap();
        prop_assert!(!report.passed());
        prop_assert_eq!(report.mismatches, 1);
        // "value " is six characters, so the marker starts in column 6.
        let expected_row = format!("ERROR   {}#", " ".repeat(6));
        prop_assert!(report.diff.contains(&expected_row), "diff:\n{}", report.diff);
    }

    #[test]
    fn count_mismatch_reports_exact_sizes(
        own in proptest::collection::vec(0i64..1000, 0..10),
        theirs in proptest::collection::vec(0i64..1000, 0..10),
    ) {
        prop_assume!(own.len() != theirs.len());
        let line = |v: &[i64]| {
            let nums: Vec<String> = v.iter().map(|n| n.to_string()).collect();
            format!("ints {}\n", nums.join(" "))
        };
        let filter = Filter::builder().from_string("ints").abs_tolerance(1.0e9).build().unwrap();
        let report = compare_texts(
            &[filter],
            &SourceText::new("out", &line(&own)),
            &SourceText::new("ref", &line(&theirs)),
        )
        .unwrap();
        let own_count = format!("own gave {} numbers:", own.len());
        let reference_count = format!("reference gave {} numbers:", theirs.len());
        prop_assert!(report.diff.contains(&own_count));
        prop_assert!(report.diff.contains(&reference_count));
    }

    #[test]
    fn skip_window_hides_any_deviation(
        tiny_actual in -1.0e-12f64..1.0e-12,
        reference in -1.0e3f64..1.0e3,
    ) {
        let filter = Filter::builder()
            .from_string("value")
            .abs_tolerance(1.0e-15)
            .ignore_below(1.0e-9)
            .build()
            .unwrap();
        let actual = SourceText::new("out", &format!("value {:e}\n", tiny_actual));
        let reference = SourceText::new("ref", &format!("value {:e}\n", reference));
        let report = compare_texts(&[filter], &actual, &reference).unwrap();
        prop_assert!(report.passed(), "diff:\n{}", report.diff);
    }

    #[test]
    fn comparison_is_deterministic(values in proptest::collection::vec(-10.0f64..10.0, 1..10)) {
        let actual = SourceText::new("out", &render(&values));
        let reference = SourceText::new("ref", &render(&values.iter().map(|v| v * 1.5).collect::<Vec<_>>()));
        let filters = [value_filter(1.0e-6)];
        let first = compare_texts(&filters, &actual, &reference).unwrap();
        let second = compare_texts(&filters, &actual, &reference).unwrap();
        prop_assert_eq!(first, second);
    }
}
