use proptest::prelude::*;

use crate::utils::{ID, flags, input_batch, mace_taxonomy, text_values};
use icd9_dx::{ClassifierConfig, Pattern, Taxonomy, classify, classify_batches, matches, tokenize};

fn code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{3}(\\.[0-9]{1,2})?",
        "V[0-9]{2}(\\.[0-9])?",
        "E[0-9]{3}",
        "4(1|2|3)[0-9](\\.[0-9]{1,2})?",
    ]
}

fn raw_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        prop::collection::vec(code_strategy(), 0..6)
            .prop_map(|codes| codes.join(", ")),
    )
}

proptest! {
    #[test]
    fn prop_classify_is_idempotent(codes in prop::collection::vec(code_strategy(), 0..8)) {
        let taxonomy = Taxonomy::reference().unwrap();
        prop_assert_eq!(classify(&codes, &taxonomy), classify(&codes, &taxonomy));
    }

    #[test]
    fn prop_composite_is_union_of_members(codes in prop::collection::vec(code_strategy(), 0..8)) {
        let taxonomy = Taxonomy::reference().unwrap();
        let result = classify(&codes, &taxonomy);
        let expected = taxonomy
            .composite()
            .members()
            .iter()
            .any(|&idx| result.flag(idx) == Some(true));
        prop_assert_eq!(result.composite(), expected);
    }

    #[test]
    fn prop_dotted_children_match_prefix(
        code in "[0-9]{3}",
        child in "[0-9]{1,2}",
        digit in "[0-9]",
    ) {
        let pattern = Pattern::HierarchicalPrefix(code.clone());
        prop_assert!(matches(&code, &pattern));
        let dotted = format!("{code}.{child}");
        let longer = format!("{code}{digit}");
        prop_assert!(matches(&dotted, &pattern));
        prop_assert!(!matches(&longer, &pattern));
    }

    #[test]
    fn prop_range_matches_numeric_order(value in 0u32..1000, fraction in 0u32..100) {
        let candidate = format!("{value:03}.{fraction:02}");
        let numeric = f64::from(value) + f64::from(fraction) / 100.0;
        let pattern = Pattern::range("430", "438");
        prop_assert_eq!(matches(&candidate, &pattern), (430.0..=438.0).contains(&numeric));
    }

    #[test]
    fn prop_tokens_never_contain_separators(raw in ".{0,40}") {
        for token in tokenize(Some(&raw)) {
            prop_assert!(!token.is_empty());
            prop_assert!(token.chars().all(|c| c.is_alphanumeric() || c == '.'));
        }
    }

    #[test]
    fn prop_rows_keep_input_order(rows in prop::collection::vec(raw_strategy(), 0..64)) {
        let taxonomy = mace_taxonomy();
        let ids: Vec<String> = (0..rows.len()).map(|i| format!("id-{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let codes: Vec<Option<&str>> = rows.iter().map(Option::as_deref).collect();
        let dates = vec![None; rows.len()];
        let batch = input_batch(&id_refs, &codes, &dates);

        let sequential = ClassifierConfig::default().sequential();
        let parallel = ClassifierConfig::default().with_parallel_threshold(1);
        let a = classify_batches(&[batch.clone()], &taxonomy, &sequential).unwrap();
        let b = classify_batches(&[batch], &taxonomy, &parallel).unwrap();

        prop_assert_eq!(&a, &b);
        let out_ids = text_values(&b[0], ID);
        let expected: Vec<Option<String>> = ids.into_iter().map(Some).collect();
        prop_assert_eq!(out_ids, expected);

        for (row, raw) in rows.iter().enumerate() {
            let blank = raw.as_deref().is_none_or(|r| r.trim().is_empty());
            if blank {
                prop_assert_eq!(flags(&b[0], "MACE").value(row), 0);
            }
        }
    }
}
