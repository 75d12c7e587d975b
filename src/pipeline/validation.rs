//! Pipeline specification validation.
//!
//! Walks the steps against the input schema before anything is fitted, so a
//! misspelt column fails with a message naming the step instead of a polars
//! error halfway through training.

use polars::prelude::*;
use std::collections::HashMap;

use super::spec::{PipelineSpec, SPEC_VERSION, Step};

/// Validation error with the step it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub step_index: Option<usize>,
    pub message: String,
}

impl ValidationError {
    fn step(step_index: usize, message: impl Into<String>) -> Self {
        Self {
            step_index: Some(step_index),
            message: message.into(),
        }
    }

    fn spec(message: impl Into<String>) -> Self {
        Self {
            step_index: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(idx) = self.step_index {
            write!(f, "Step {}: {}", idx + 1, self.message)
        } else {
            write!(f, "Spec: {}", self.message)
        }
    }
}

/// What a column holds while the steps are simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Vector,
    Other,
}

/// Validate a pipeline spec against an input schema
pub fn validate_pipeline(spec: &PipelineSpec, input_schema: &Schema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if spec.version != SPEC_VERSION {
        errors.push(ValidationError::spec(format!(
            "Unsupported spec version '{}', expected '{SPEC_VERSION}'",
            spec.version
        )));
    }

    let trainers = spec.steps.iter().filter(|s| s.is_trainer()).count();
    if trainers != 1 {
        errors.push(ValidationError::spec(format!(
            "Expected exactly one trainer step, found {trainers}"
        )));
    }
    if spec.steps.last().is_some_and(|s| !s.is_trainer()) && trainers == 1 {
        errors.push(ValidationError::spec("The trainer must be the last step"));
    }

    let mut columns: HashMap<String, ColumnKind> = input_schema
        .iter()
        .map(|(name, dtype)| {
            let kind = if dtype.is_primitive_numeric() {
                ColumnKind::Numeric
            } else {
                ColumnKind::Other
            };
            (name.to_string(), kind)
        })
        .collect();

    for (idx, step) in spec.steps.iter().enumerate() {
        validate_step(step, idx, &mut columns, &mut errors);
    }

    errors
}

fn validate_step(
    step: &Step,
    idx: usize,
    columns: &mut HashMap<String, ColumnKind>,
    errors: &mut Vec<ValidationError>,
) {
    match step {
        Step::Concatenate { output, inputs } => {
            if inputs.is_empty() {
                errors.push(ValidationError::step(idx, "Concatenate needs at least one input"));
            }
            for input in inputs {
                match columns.get(input) {
                    None => errors.push(ValidationError::step(
                        idx,
                        format!("Column '{input}' not found"),
                    )),
                    Some(ColumnKind::Numeric) => {}
                    Some(_) => errors.push(ValidationError::step(
                        idx,
                        format!("Column '{input}' is not numeric and cannot be concatenated"),
                    )),
                }
            }
            columns.insert(output.clone(), ColumnKind::Vector);
        }

        Step::CopyColumns { output, input } => match columns.get(input).copied() {
            Some(kind) => {
                columns.insert(output.clone(), kind);
            }
            None => errors.push(ValidationError::step(
                idx,
                format!("Column '{input}' not found"),
            )),
        },

        Step::FastTree {
            label_column,
            feature_column,
            params,
        } => {
            if columns.get(feature_column) != Some(&ColumnKind::Vector) {
                errors.push(ValidationError::step(
                    idx,
                    format!("Feature column '{feature_column}' is not produced by a concatenate step"),
                ));
            }
            if columns.get(label_column) != Some(&ColumnKind::Numeric) {
                errors.push(ValidationError::step(
                    idx,
                    format!("Label column '{label_column}' is missing or not numeric"),
                ));
            }
            if let Err(e) = params.validate() {
                errors.push(ValidationError::step(idx, e.to_string()));
            }
        }
    }
}
