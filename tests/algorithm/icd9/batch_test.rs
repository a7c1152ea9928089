use crate::utils::{CODES, DATE, ID, flags, input_batch, mace_taxonomy, text_values};
use icd9_dx::{ClassifierConfig, DxError, classify_batches, validate_input_schema};

#[test]
fn test_end_to_end_rows() {
    let taxonomy = mace_taxonomy();
    let config = ClassifierConfig::default();
    let batch = input_batch(
        &["p1", "p2", "p3", "p4"],
        &[Some("410.01, 250.00"), Some("434"), Some(""), None],
        &[Some("2019-03-01"), Some("2019-03-02"), None, Some("2019-03-04")],
    );

    let output = classify_batches(&[batch], &taxonomy, &config).unwrap();
    assert_eq!(output.len(), 1);
    let output = &output[0];

    assert_eq!(
        flags(output, "Acute myocardial infarction").values().to_vec(),
        [1, 0, 0, 0]
    );
    assert_eq!(flags(output, "Heart failure").values().to_vec(), [0, 0, 0, 0]);
    assert_eq!(
        flags(output, "Stroke/transient ischemic attack").values().to_vec(),
        [0, 0, 0, 0]
    );
    assert_eq!(
        flags(output, "Cerebrovascular disease (430-438)").values().to_vec(),
        [0, 1, 0, 0]
    );
    assert_eq!(flags(output, "MACE").values().to_vec(), [1, 0, 0, 0]);
}

#[test]
fn test_identifier_and_date_pass_through() {
    let taxonomy = mace_taxonomy();
    let config = ClassifierConfig::default();
    let dates = [Some("01/02/2020"), None, Some("2020-13-45")];
    let batch = input_batch(&["007", "", "x-9"], &[Some("428"), Some("x"), None], &dates);

    let output = &classify_batches(&[batch], &taxonomy, &config).unwrap()[0];
    assert_eq!(
        text_values(output, ID),
        [Some("007".to_string()), Some(String::new()), Some("x-9".to_string())]
    );
    assert_eq!(
        text_values(output, DATE),
        dates.iter().map(|d| d.map(str::to_string)).collect::<Vec<_>>()
    );
    assert!(output.column_by_name(CODES).is_none());
}

#[test]
fn test_batches_keep_their_order() {
    let taxonomy = mace_taxonomy();
    let config = ClassifierConfig::default().with_parallel_threshold(1);
    let first = input_batch(&["a", "b"], &[Some("428"), None], &[None, None]);
    let second = input_batch(&["c"], &[Some("435.1")], &[None]);

    let output = classify_batches(&[first, second], &taxonomy, &config).unwrap();
    assert_eq!(output.len(), 2);
    assert_eq!(
        text_values(&output[0], ID),
        [Some("a".to_string()), Some("b".to_string())]
    );
    assert_eq!(flags(&output[0], "MACE").values().to_vec(), [1, 0]);
    assert_eq!(text_values(&output[1], ID), [Some("c".to_string())]);
    assert_eq!(flags(&output[1], "MACE").values().to_vec(), [1]);
}

#[test]
fn test_renamed_columns() {
    let taxonomy = mace_taxonomy();
    let batch = input_batch(&["a"], &[Some("410")], &[None]);

    let config = ClassifierConfig::default().with_codes_column("dx");
    let err = validate_input_schema(&batch.schema(), &config).unwrap_err();
    assert!(matches!(err, DxError::ColumnNotFound { ref column } if column == "dx"));

    let err = classify_batches(&[batch], &taxonomy, &config).unwrap_err();
    assert!(err.to_string().contains("'dx'"));
}

#[test]
fn test_empty_dataset() {
    let taxonomy = mace_taxonomy();
    let config = ClassifierConfig::default();
    assert!(classify_batches(&[], &taxonomy, &config).unwrap().is_empty());

    let batch = input_batch(&[], &[], &[]);
    let output = classify_batches(&[batch], &taxonomy, &config).unwrap();
    assert_eq!(output[0].num_rows(), 0);
    assert_eq!(output[0].num_columns(), 3 + taxonomy.len());
}
