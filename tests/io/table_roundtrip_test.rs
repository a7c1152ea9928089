use std::fs;

use crate::utils::{mace_taxonomy, temp_path};
use icd9_dx::{
    ClassifierConfig, DxError, ReaderConfig, Table, classify_batches, output_schema, read_table,
    validate_input_schema, write_table,
};

const INPUT: &str = "\
Reference Key,Sex,All Diagnosis Code (ICD9),Reference Date
0001,F,\"410.01, 250.00\",2015-06-01
0002,M,434,2015-06-02
0003,F,,2015-06-03
0004,M,V43.4;428.22,2015-06-04
";

const EXPECTED: &str = "\
Reference Key,MACE,Reference Date,Acute myocardial infarction,Heart failure,Stroke/transient ischemic attack,Cerebrovascular disease (430-438)
0001,1,2015-06-01,1,0,0,0
0002,0,2015-06-02,0,0,0,1
0003,0,2015-06-03,0,0,0,0
0004,1,2015-06-04,0,1,0,0
";

#[test]
fn test_csv_classification_roundtrip() {
    let input_path = temp_path("roundtrip-in.csv");
    let output_path = temp_path("roundtrip-out.csv");
    fs::write(&input_path, INPUT).unwrap();

    let taxonomy = mace_taxonomy();
    let config = ClassifierConfig::default();
    let reader_config = ReaderConfig::default().with_batch_size(2);

    let input = read_table(&input_path, &reader_config).unwrap();
    assert_eq!(input.batches.len(), 2);
    validate_input_schema(&input.schema, &config).unwrap();

    let schema = output_schema(&input.schema, &taxonomy, &config).unwrap();
    let batches = classify_batches(&input.batches, &taxonomy, &config).unwrap();
    write_table(&output_path, &Table::new(schema, batches)).unwrap();

    let written = fs::read_to_string(&output_path).unwrap();
    fs::remove_file(&input_path).ok();
    fs::remove_file(&output_path).ok();

    assert_eq!(written, EXPECTED);
}

#[test]
fn test_short_row_classifies_as_without_codes() {
    let input_path = temp_path("short-in.csv");
    let output_path = temp_path("short-out.csv");
    fs::write(
        &input_path,
        "Reference Key,Reference Date,All Diagnosis Code (ICD9)\n0005,2015-06-05\n0006,2015-06-06,428\n",
    )
    .unwrap();

    let taxonomy = mace_taxonomy();
    let config = ClassifierConfig::default();
    let input = read_table(&input_path, &ReaderConfig::default()).unwrap();
    let schema = output_schema(&input.schema, &taxonomy, &config).unwrap();
    let batches = classify_batches(&input.batches, &taxonomy, &config).unwrap();
    write_table(&output_path, &Table::new(schema, batches)).unwrap();

    let written = fs::read_to_string(&output_path).unwrap();
    fs::remove_file(&input_path).ok();
    fs::remove_file(&output_path).ok();

    let header = EXPECTED.lines().next().unwrap();
    assert_eq!(
        written,
        format!("{header}\n0005,0,2015-06-05,0,0,0,0\n0006,1,2015-06-06,0,1,0,0\n")
    );
}

#[test]
fn test_missing_column_in_file() {
    let input_path = temp_path("missing-col.csv");
    fs::write(&input_path, "Reference Key,Reference Date\n1,2015-01-01\n").unwrap();

    let input = read_table(&input_path, &ReaderConfig::default()).unwrap();
    fs::remove_file(&input_path).ok();

    let err = validate_input_schema(&input.schema, &ClassifierConfig::default()).unwrap_err();
    assert!(
        matches!(err, DxError::ColumnNotFound { ref column } if column == "All Diagnosis Code (ICD9)")
    );
}

#[test]
fn test_parquet_output() {
    let input_path = temp_path("pq-in.csv");
    let output_path = temp_path("pq-out.parquet");
    fs::write(&input_path, INPUT).unwrap();

    let taxonomy = mace_taxonomy();
    let config = ClassifierConfig::default();
    let input = read_table(&input_path, &ReaderConfig::default()).unwrap();
    let schema = output_schema(&input.schema, &taxonomy, &config).unwrap();
    let batches = classify_batches(&input.batches, &taxonomy, &config).unwrap();
    write_table(&output_path, &Table::new(schema.clone(), batches)).unwrap();

    let reread = read_table(&output_path, &ReaderConfig::default()).unwrap();
    fs::remove_file(&input_path).ok();
    fs::remove_file(&output_path).ok();

    assert_eq!(reread.num_rows(), 4);
    assert_eq!(reread.schema.fields().len(), schema.fields().len());
}

#[test]
fn test_unsupported_extension() {
    let err = read_table(&temp_path("input.xlsx"), &ReaderConfig::default()).unwrap_err();
    assert!(matches!(err, DxError::UnsupportedFormat { .. }));
}
