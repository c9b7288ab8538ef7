//! Batch Chunker
//!
//! Splits the transaction sequence into fixed-size windows and wraps each
//! window in its own copy of the multisig batch template.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::transaction::Transaction;
use crate::error::{MigrationError, Result};

/// Transaction-builder document with a `transactions` array to fill in
#[derive(Debug, Clone, PartialEq)]
pub struct BatchTemplate {
    document: Value,
}

impl BatchTemplate {
    pub fn new(document: Value) -> Result<Self> {
        if !document.is_object() {
            return Err(MigrationError::config("batch template must be a JSON object"));
        }
        Ok(Self { document })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MigrationError::Artifact {
            path: path.to_path_buf(),
            source,
        })?;
        let document = serde_json::from_str(&content).map_err(|source| {
            MigrationError::ArtifactFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::new(document)
    }

    /// Bare template used when none is supplied
    pub fn minimal() -> Self {
        Self {
            document: json!({
                "version": "1.0",
                "chainId": "1",
                "meta": { "name": "Transactions Batch" },
                "transactions": [],
            }),
        }
    }

    fn render(&self, transactions: &[Transaction]) -> Result<Value> {
        let mut document = self.document.clone();
        let txs = serde_json::to_value(transactions).map_err(|e| {
            MigrationError::config(format!("transactions are not serializable: {}", e))
        })?;
        if let Some(obj) = document.as_object_mut() {
            obj.insert("transactions".to_string(), txs);
        }
        Ok(document)
    }
}

impl Default for BatchTemplate {
    fn default() -> Self {
        Self::minimal()
    }
}

/// One numbered window of the transaction sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// 1-based
    pub number: usize,
    pub transactions: Vec<Transaction>,
    /// Template copy with `transactions` replaced
    pub document: Value,
}

/// Split `transactions` into windows of at most `size`, numbered from 1.
///
/// `size == 0` is rejected before anything is produced.
pub fn chunk(
    transactions: &[Transaction],
    size: usize,
    template: &BatchTemplate,
) -> Result<Vec<Batch>> {
    if size == 0 {
        return Err(MigrationError::config("batch size must be positive"));
    }

    transactions
        .chunks(size)
        .enumerate()
        .map(|(i, window)| {
            debug!("Batch {}: {} transactions", i + 1, window.len());
            Ok(Batch {
                number: i + 1,
                transactions: window.to_vec(),
                document: template.render(window)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes};

    fn txs(n: u8) -> Vec<Transaction> {
        (1..=n)
            .map(|i| Transaction {
                to: Address::with_last_byte(i),
                value: "0".to_string(),
                data: Bytes::from(vec![i; 4]),
            })
            .collect()
    }

    #[test]
    fn test_ten_by_four() {
        let all = txs(10);
        let batches = chunk(&all, 4, &BatchTemplate::minimal()).unwrap();

        let sizes: Vec<usize> = batches.iter().map(|b| b.transactions.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);

        let numbers: Vec<usize> = batches.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let rebuilt: Vec<Transaction> = batches.into_iter().flat_map(|b| b.transactions).collect();
        assert_eq!(rebuilt, all);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_batch() {
        let batches = chunk(&txs(8), 4, &BatchTemplate::minimal()).unwrap();
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn test_empty_sequence_gives_no_batches() {
        assert!(chunk(&[], 25, &BatchTemplate::minimal()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = chunk(&txs(3), 0, &BatchTemplate::minimal()).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[test]
    fn test_template_fields_preserved() {
        let template = BatchTemplate::new(json!({
            "version": "1.0",
            "chainId": "1",
            "meta": { "name": "set strategy", "createdFromSafeAddress": "0xabc" },
            "transactions": [{ "to": "stale" }],
        }))
        .unwrap();

        let batches = chunk(&txs(3), 2, &template).unwrap();
        let doc = &batches[1].document;

        assert_eq!(doc["meta"]["name"], "set strategy");
        assert_eq!(doc["meta"]["createdFromSafeAddress"], "0xabc");
        let entries = doc["transactions"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["value"], "0");
        assert_eq!(entries[0]["data"], "0x03030303");
    }

    #[test]
    fn test_non_object_template_rejected() {
        assert!(BatchTemplate::new(json!([1, 2])).is_err());
    }
}
