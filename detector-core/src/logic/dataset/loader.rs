//! CSV loader

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use ndarray::Array2;

use super::{Dataset, DatasetConfig, DatasetError};

/// Read a headered CSV into a [`Dataset`]
pub fn load_csv(path: impl AsRef<Path>, config: &DatasetConfig) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| DatasetError::MissingLabelColumn(config.label_column.clone()))?;

    let feature_indices: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(idx, name)| *idx != label_idx && !config.drop_columns.iter().any(|d| d == name))
        .map(|(idx, _)| idx)
        .collect();
    if feature_indices.is_empty() {
        return Err(DatasetError::NoFeatures);
    }
    let feature_names: Vec<String> = feature_indices
        .iter()
        .map(|&idx| headers[idx].to_string())
        .collect();

    let mut values = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(row_idx as u64 + 2);

        labels.push(parse_cell(&record, label_idx, &headers, line)?);
        for &idx in &feature_indices {
            values.push(parse_cell(&record, idx, &headers, line)?);
        }
    }

    if labels.is_empty() {
        return Err(DatasetError::Empty);
    }

    let negative_label = check_labels(&labels, config.positive_label)?;
    let features = Array2::from_shape_vec((labels.len(), feature_names.len()), values)?;

    log::info!(
        "Loaded {} rows x {} features from {}",
        labels.len(),
        feature_names.len(),
        path.display()
    );

    Ok(Dataset {
        feature_names,
        features,
        labels,
        positive_label: config.positive_label,
        negative_label,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn parse_cell(record: &StringRecord, idx: usize, headers: &StringRecord, line: u64) -> Result<f32, DatasetError> {
    let raw = record.get(idx).unwrap_or_default();
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DatasetError::InvalidValue {
            line,
            column: headers.get(idx).unwrap_or_default().to_string(),
            value: raw.to_string(),
        }),
    }
}

/// The label set must be exactly {positive, negative} with negative in {-1, 0}.
/// Returns the negative value.
fn check_labels(labels: &[f32], positive: f32) -> Result<f32, DatasetError> {
    let mut found = labels.to_vec();
    found.sort_by(f32::total_cmp);
    found.dedup();
    let invalid = || DatasetError::InvalidLabels {
        positive,
        found: found.clone(),
    };

    if found.len() != 2 || !found.contains(&positive) {
        return Err(invalid());
    }
    match found.iter().copied().find(|&v| v != positive) {
        Some(negative) if negative == -1.0 || negative == 0.0 => Ok(negative),
        _ => Err(invalid()),
    }
}
