//! # recency-dataset
//!
//! Builds a fixed-size sequence of labeled records. Records are plain data and
//! know nothing about the cache; callers typically key them by `id`.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

/// Prefix of every record description
pub const DESC_PREFIX: &str = "component: ";

/// One generated record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Sequential identifier, unique within one generated dataset
    pub id: u64,
    /// Human readable label embedding the category tag
    pub desc: String,
    /// Category tag
    #[serde(rename = "type")]
    pub kind: String,
}

/// Shape of a generated dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Number of passes over the category list
    pub rounds: usize,
    /// Category tags, emitted in this order on every round
    pub categories: Vec<String>,
    /// Consecutive records emitted per category per round
    pub per_category: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            rounds: 300,
            categories: vec!["A".to_string(), "B".to_string()],
            per_category: 5,
        }
    }
}

impl DatasetConfig {
    /// Total number of records `generate` will produce
    pub fn len(&self) -> usize {
        self.rounds * self.categories.len() * self.per_category
    }

    /// Check if the configuration produces no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate the dataset described by `config`
///
/// For each round, for each category, `per_category` records tagged with that
/// category are emitted. Ids count up from 0 in emission order.
pub fn generate(config: &DatasetConfig) -> Vec<Record> {
    let mut data = Vec::with_capacity(config.len());
    let mut next_id = 0u64;

    for _ in 0..config.rounds {
        for kind in &config.categories {
            for _ in 0..config.per_category {
                data.push(Record {
                    id: next_id,
                    desc: format!("{}{}", DESC_PREFIX, kind),
                    kind: kind.clone(),
                });
                next_id += 1;
            }
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let config = DatasetConfig::default();
        let data = generate(&config);

        assert_eq!(config.len(), 3000);
        assert_eq!(data.len(), 3000);
    }

    #[test]
    fn test_order_and_labels() {
        let config = DatasetConfig {
            rounds: 2,
            categories: vec!["A".to_string(), "B".to_string()],
            per_category: 2,
        };
        let data = generate(&config);

        let kinds: Vec<&str> = data.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, ["A", "A", "B", "B", "A", "A", "B", "B"]);

        for record in &data {
            assert_eq!(record.desc, format!("component: {}", record.kind));
        }
    }

    #[test]
    fn test_ids_sequential() {
        let data = generate(&DatasetConfig::default());

        for (i, record) in data.iter().enumerate() {
            assert_eq!(record.id, i as u64);
        }
    }

    #[test]
    fn test_empty() {
        let config = DatasetConfig {
            rounds: 3,
            categories: Vec::new(),
            per_category: 5,
        };

        assert!(config.is_empty());
        assert!(generate(&config).is_empty());
    }

    #[test]
    fn test_json_shape() {
        let record = Record {
            id: 4,
            desc: "component: B".to_string(),
            kind: "B".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":4,"desc":"component: B","type":"B"}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
