use std::fs;
use std::path::PathBuf;

use tempfile::{tempdir, TempDir};

use super::{load_csv, train_test_split, DatasetConfig, DatasetError};
use crate::logic::model::Label;

fn write_csv(content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("phishing.csv");
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn sample_rows(n: usize) -> String {
    let mut csv = String::from("Index,UsingIP,LongURL,HTTPS,class\n");
    for i in 0..n {
        let label = if i % 3 == 0 { -1 } else { 1 };
        csv.push_str(&format!("{},{},{},{},{}\n", i, label, (i % 3) as i32 - 1, label, label));
    }
    csv
}

#[test]
fn test_load_drops_index_and_separates_label() {
    let (_dir, path) = write_csv(&sample_rows(6));
    let dataset = load_csv(&path, &DatasetConfig::default()).unwrap();

    assert_eq!(dataset.feature_names, vec!["UsingIP", "LongURL", "HTTPS"]);
    assert_eq!(dataset.n_samples(), 6);
    assert_eq!(dataset.n_features(), 3);
    assert_eq!(dataset.negative_label, -1.0);
    assert_eq!(dataset.features[[0, 0]], -1.0);
    assert_eq!(dataset.label(0), Some(Label::Negative));
    assert_eq!(dataset.label(1), Some(Label::Positive));
    assert_eq!(dataset.targets(), vec![-1.0, 1.0, 1.0, -1.0, 1.0, 1.0]);
    assert_eq!(dataset.positive_count(), 4);
}

#[test]
fn test_zero_as_negative_label() {
    let (_dir, path) = write_csv("a,b,class\n1,0,1\n-1,1,0\n");
    let dataset = load_csv(&path, &DatasetConfig::default()).unwrap();
    assert_eq!(dataset.negative_label, 0.0);
    assert_eq!(dataset.targets(), vec![1.0, -1.0]);
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_csv(dir.path().join("missing.csv"), &DatasetConfig::default()).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn test_missing_label_column() {
    let (_dir, path) = write_csv("a,b\n1,1\n");
    let err = load_csv(&path, &DatasetConfig::default()).unwrap_err();
    assert!(matches!(err, DatasetError::MissingLabelColumn(ref c) if c == "class"));
}

#[test]
fn test_non_numeric_cell_reports_position() {
    let (_dir, path) = write_csv("a,b,class\n1,1,1\n1,oops,-1\n");
    match load_csv(&path, &DatasetConfig::default()).unwrap_err() {
        DatasetError::InvalidValue { line, column, value } => {
            assert_eq!(line, 3);
            assert_eq!(column, "b");
            assert_eq!(value, "oops");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rejects_non_binary_labels() {
    let (_dir, path) = write_csv("a,class\n1,1\n0,0\n-1,-1\n");
    assert!(matches!(
        load_csv(&path, &DatasetConfig::default()),
        Err(DatasetError::InvalidLabels { .. })
    ));

    let (_dir, path) = write_csv("a,class\n1,1\n0,1\n");
    assert!(matches!(
        load_csv(&path, &DatasetConfig::default()),
        Err(DatasetError::InvalidLabels { .. })
    ));

    let (_dir, path) = write_csv("a,class\n1,2\n0,1\n");
    assert!(load_csv(&path, &DatasetConfig::default()).is_err());
}

#[test]
fn test_empty_dataset() {
    let (_dir, path) = write_csv("a,class\n");
    assert!(matches!(
        load_csv(&path, &DatasetConfig::default()),
        Err(DatasetError::Empty)
    ));
}

#[test]
fn test_split_sizes_and_determinism() {
    let (_dir, path) = write_csv(&sample_rows(10));
    let dataset = load_csv(&path, &DatasetConfig::default()).unwrap();

    let (train, test) = train_test_split(&dataset, 0.2, 42).unwrap();
    assert_eq!(test.n_samples(), 2);
    assert_eq!(train.n_samples(), 8);

    let (train_again, test_again) = train_test_split(&dataset, 0.2, 42).unwrap();
    assert_eq!(train, train_again);
    assert_eq!(test, test_again);

    // holdout size rounds up
    let (_, test) = train_test_split(&dataset, 0.15, 7).unwrap();
    assert_eq!(test.n_samples(), 2);
}

#[test]
fn test_split_partitions_rows() {
    let (_dir, path) = write_csv(&sample_rows(9));
    let dataset = load_csv(&path, &DatasetConfig::default()).unwrap();
    let (train, test) = train_test_split(&dataset, 0.3, 1).unwrap();

    // LongURL cycles -1/0/1, so the per-value counts survive the split
    let count = |value: f32| {
        train.features.column(1).iter().filter(|&&v| v == value).count()
            + test.features.column(1).iter().filter(|&&v| v == value).count()
    };
    assert_eq!((count(-1.0), count(0.0), count(1.0)), (3, 3, 3));
    assert_eq!(train.positive_count() + test.positive_count(), dataset.positive_count());
}

#[test]
fn test_split_rejects_bad_sizes() {
    let (_dir, path) = write_csv(&sample_rows(3));
    let dataset = load_csv(&path, &DatasetConfig::default()).unwrap();

    assert!(train_test_split(&dataset, 0.0, 42).is_err());
    assert!(train_test_split(&dataset, 1.0, 42).is_err());
    assert!(matches!(
        train_test_split(&dataset, 0.9, 42),
        Err(DatasetError::InvalidSplit(_))
    ));
}
