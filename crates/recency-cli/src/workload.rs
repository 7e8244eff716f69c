//! Load and replay phases over a shared cache

use std::collections::BTreeMap;
use std::fmt;

use recency::SharedCache;
use recency_dataset::Record;
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of one workload run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub capacity: usize,
    pub records: usize,
    pub cached: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub evictions: u64,
    pub hit_ratio: f64,
    /// Evicted records counted by category tag
    pub evicted_by_kind: BTreeMap<String, u64>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Capacity:   {}", self.capacity)?;
        writeln!(f, "Records:    {}", self.records)?;
        writeln!(f, "Cached:     {}", self.cached)?;
        writeln!(f, "Hits:       {}", self.hits)?;
        writeln!(f, "Misses:     {}", self.misses)?;
        writeln!(f, "Inserts:    {}", self.inserts)?;
        writeln!(f, "Updates:    {}", self.updates)?;
        writeln!(f, "Evictions:  {}", self.evictions)?;
        write!(f, "Hit ratio:  {:.2}%", self.hit_ratio * 100.0)?;
        for (kind, count) in &self.evicted_by_kind {
            write!(f, "\n  evicted {}: {}", kind, count)?;
        }
        Ok(())
    }
}

/// Replays records through a cache keyed by record id
pub struct Workload {
    cache: SharedCache<u64, Record>,
    window: usize,
    evicted_by_kind: BTreeMap<String, u64>,
}

impl Workload {
    /// `window` is how far back the replay phase re-reads; 0 disables it
    pub fn new(cache: SharedCache<u64, Record>, window: usize) -> Self {
        Self {
            cache,
            window,
            evicted_by_kind: BTreeMap::new(),
        }
    }

    /// Load every record, then replay reads in order
    ///
    /// The replay reads each record's id and, once far enough in, the id
    /// `window` positions earlier. Misses are filled back from `records`.
    pub fn run(mut self, records: &[Record]) -> Report {
        for record in records {
            self.store(record);
        }
        info!(cached = self.cache.len(), "load phase complete");

        for (i, record) in records.iter().enumerate() {
            self.read_through(record);
            if self.window > 0 && i >= self.window {
                self.read_through(&records[i - self.window]);
            }
        }
        info!("replay phase complete");

        let stats = self.cache.stats();
        Report {
            capacity: self.cache.capacity(),
            records: records.len(),
            cached: self.cache.len(),
            hits: stats.hits(),
            misses: stats.misses(),
            inserts: stats.inserts(),
            updates: stats.updates(),
            evictions: stats.evictions(),
            hit_ratio: stats.hit_ratio(),
            evicted_by_kind: self.evicted_by_kind,
        }
    }

    fn read_through(&mut self, record: &Record) {
        if self.cache.get(&record.id).is_err() {
            debug!(id = record.id, "miss, refilling");
            self.store(record);
        }
    }

    fn store(&mut self, record: &Record) {
        if let Some(evicted) = self.cache.set(record.id, record.clone()) {
            *self.evicted_by_kind.entry(evicted.kind).or_default() += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recency_dataset::{generate, DatasetConfig};

    fn small_dataset() -> Vec<Record> {
        generate(&DatasetConfig {
            rounds: 1,
            categories: vec!["A".to_string(), "B".to_string()],
            per_category: 5,
        })
    }

    #[test]
    fn test_everything_fits() {
        let records = small_dataset();
        let cache = SharedCache::new(20).unwrap();

        let report = Workload::new(cache, 0).run(&records);

        assert_eq!(report.cached, 10);
        assert_eq!(report.hits, 10);
        assert_eq!(report.misses, 0);
        assert_eq!(report.evictions, 0);
        assert!(report.evicted_by_kind.is_empty());
        assert_eq!(report.hit_ratio, 1.0);
    }

    #[test]
    fn test_sequential_scan_thrashes_small_cache() {
        let records = small_dataset();
        let cache = SharedCache::new(2).unwrap();

        let report = Workload::new(cache, 0).run(&records);

        assert_eq!(report.cached, 2);
        assert_eq!(report.hits, 0);
        assert_eq!(report.misses, 10);
        assert_eq!(report.inserts, 20);
        assert_eq!(report.evictions, 18);

        // load evicts ids 0..8 (five A, three B); replay evicts 8, 9, 0..=7
        assert_eq!(report.evicted_by_kind.get("A"), Some(&10));
        assert_eq!(report.evicted_by_kind.get("B"), Some(&8));
    }

    #[test]
    fn test_window_lookups_counted() {
        let records = small_dataset();
        let cache = SharedCache::new(4).unwrap();

        let report = Workload::new(cache, 2).run(&records);

        assert_eq!(report.hits + report.misses, 10 + 8);
        assert_eq!(report.cached, 4);
        assert!(report.hits > 0);
    }

    #[test]
    fn test_report_json() {
        let records = small_dataset();
        let cache = SharedCache::new(20).unwrap();

        let report = Workload::new(cache, 0).run(&records);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["capacity"], 20);
        assert_eq!(json["hits"], 10);
        assert!(json["evicted_by_kind"].as_object().unwrap().is_empty());
    }
}
