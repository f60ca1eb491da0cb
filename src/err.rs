/// Faults that abort the processing of one case.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    /// The raw-to-canonical column mapping does not cover the canonical schema.
    #[error("schema fault: expected {expected} canonical columns but mapping has {actual}")]
    SchemaFault { expected: usize, actual: usize },
    /// A canonical column is mapped more than once (or not at all).
    #[error("schema fault: canonical column {column} mapped {count} times")]
    SchemaDuplicate { column: String, count: usize },
    /// A numeric column holds a value that does not parse.
    #[error("invalid value {value:?} in column {column} of row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    /// A fusion read-count group does not pair exactly two breakpoints.
    #[error("aggregation fault: {size} fusion rows share total read count {total_read:?}")]
    AggregationFault {
        total_read: Option<i64>,
        size: usize,
    },
}

#[cfg(test)]
mod test {
    use super::ReportError;

    #[test]
    fn aggregation_fault_display() {
        let err = ReportError::AggregationFault {
            total_read: Some(120),
            size: 3,
        };

        assert_eq!(
            err.to_string(),
            "aggregation fault: 3 fusion rows share total read count Some(120)"
        );
    }

    #[test]
    fn schema_fault_display() {
        let err = ReportError::SchemaFault {
            expected: 37,
            actual: 36,
        };

        assert!(err.to_string().contains("expected 37"));
    }
}
