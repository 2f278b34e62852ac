use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::Value;

use super::query::{Compare, RecordQuery, SortOrder};
use super::types::{HostError, Record, RecordData, Term};
use super::HostClient;

#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    records: BTreeMap<u64, Record>,
    fields: HashMap<u64, BTreeMap<String, Value>>,
    terms: HashMap<u64, BTreeMap<String, Vec<Term>>>,
    defined_terms: HashMap<String, BTreeMap<i64, Term>>,
}

/// In-memory [`HostClient`] implementation.
///
/// Backs the test suites and the emitted smoke tests. Not a cache: it is the
/// whole store, guarded by one mutex, which is plenty for a reference host.
#[derive(Debug, Default)]
pub struct MemoryHost {
    store: Mutex<Store>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a term so `set_terms` can resolve its id.
    pub fn define_term(&self, taxonomy: &str, term: Term) {
        let mut store = self.store.lock().unwrap();
        store
            .defined_terms
            .entry(taxonomy.to_string())
            .or_default()
            .insert(term.id, term);
    }

    fn matches(store: &Store, record: &Record, query: &RecordQuery) -> bool {
        if record.post_type != query.post_type {
            return false;
        }
        if let Some(status) = &query.status {
            if &record.status != status {
                return false;
            }
        }
        for filter in &query.meta {
            let stored = store
                .fields
                .get(&record.id)
                .and_then(|fields| fields.get(&filter.key));
            let Some(stored) = stored else {
                return false;
            };
            if !compare_values(stored, &filter.value, filter.compare) {
                return false;
            }
        }
        for filter in &query.terms {
            let attached = store
                .terms
                .get(&record.id)
                .and_then(|taxonomies| taxonomies.get(&filter.taxonomy));
            let hit = attached
                .map(|terms| terms.iter().any(|t| filter.terms.contains(&t.id)))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }
        true
    }

    fn matching_ids(&self, query: &RecordQuery, paginate: bool) -> Vec<u64> {
        let store = self.store.lock().unwrap();
        let mut matched: Vec<&Record> = store
            .records
            .values()
            .filter(|record| Self::matches(&store, record, query))
            .collect();
        matched.sort_by(|a, b| {
            let ordering = match query.order_by.as_str() {
                "modified" => a.modified.cmp(&b.modified),
                "title" => a.title.cmp(&b.title),
                "id" => a.id.cmp(&b.id),
                // "date" and anything unrecognized order by creation time
                _ => a.created.cmp(&b.created),
            };
            // Equal sort keys fall back to id so ordering stays deterministic
            let ordering = ordering.then(a.id.cmp(&b.id));
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        let ids = matched.into_iter().map(|record| record.id);
        if paginate {
            if let Some(per_page) = query.per_page {
                let skip = (query.page.max(1) - 1) as usize * per_page as usize;
                return ids.skip(skip).take(per_page as usize).collect();
            }
        }
        ids.collect()
    }
}

fn compare_values(stored: &Value, wanted: &Value, op: Compare) -> bool {
    match op {
        Compare::Equal => stored == wanted,
        Compare::NotEqual => stored != wanted,
        Compare::Like => {
            let stored = value_text(stored);
            stored.contains(&value_text(wanted))
        }
        _ => {
            let (Some(a), Some(b)) = (numeric(stored), numeric(wanted)) else {
                // Non-numeric operands compare lexically
                let (a, b) = (value_text(stored), value_text(wanted));
                return ordered(op, a.cmp(&b));
            };
            ordered(op, a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal))
        }
    }
}

fn ordered(op: Compare, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        Compare::GreaterThan => ordering == Greater,
        Compare::GreaterOrEqual => ordering != Less,
        Compare::LessThan => ordering == Less,
        Compare::LessOrEqual => ordering != Greater,
        _ => false,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl HostClient for MemoryHost {
    fn record(&self, id: u64) -> Option<Record> {
        self.store.lock().unwrap().records.get(&id).cloned()
    }

    fn insert_record(&self, data: RecordData) -> Result<u64, HostError> {
        if data.post_type.trim().is_empty() {
            return Err(HostError::InsertFailed("empty post type".to_string()));
        }
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = store.next_id;
        let now = Utc::now().naive_utc();
        store.records.insert(
            id,
            Record {
                id,
                post_type: data.post_type,
                title: data.title.unwrap_or_default(),
                content: data.content.unwrap_or_default(),
                excerpt: data.excerpt.unwrap_or_default(),
                status: data.status.unwrap_or_else(|| "publish".to_string()),
                author: data.author.unwrap_or(0),
                created: now,
                modified: now,
                thumbnail: None,
            },
        );
        Ok(id)
    }

    fn update_record(&self, id: u64, data: RecordData) -> Result<(), HostError> {
        let mut store = self.store.lock().unwrap();
        let record = store.records.get_mut(&id).ok_or(HostError::UpdateFailed(id))?;
        if let Some(title) = data.title {
            record.title = title;
        }
        if let Some(content) = data.content {
            record.content = content;
        }
        if let Some(excerpt) = data.excerpt {
            record.excerpt = excerpt;
        }
        if let Some(status) = data.status {
            record.status = status;
        }
        if let Some(author) = data.author {
            record.author = author;
        }
        record.modified = Utc::now().naive_utc();
        Ok(())
    }

    fn delete_record(&self, id: u64, _force: bool) -> bool {
        let mut store = self.store.lock().unwrap();
        store.fields.remove(&id);
        store.terms.remove(&id);
        store.records.remove(&id).is_some()
    }

    fn field(&self, key: &str, record: u64) -> Option<Value> {
        self.store
            .lock()
            .unwrap()
            .fields
            .get(&record)
            .and_then(|fields| fields.get(key).cloned())
    }

    fn set_field(&self, key: &str, record: u64, value: Value) -> Result<(), HostError> {
        let mut store = self.store.lock().unwrap();
        if !store.records.contains_key(&record) {
            return Err(HostError::FieldWriteFailed {
                record,
                key: key.to_string(),
            });
        }
        store
            .fields
            .entry(record)
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn terms(&self, record: u64, taxonomy: &str) -> Vec<Term> {
        self.store
            .lock()
            .unwrap()
            .terms
            .get(&record)
            .and_then(|taxonomies| taxonomies.get(taxonomy).cloned())
            .unwrap_or_default()
    }

    fn set_terms(&self, record: u64, taxonomy: &str, terms: &[i64]) -> Result<(), HostError> {
        let mut store = self.store.lock().unwrap();
        if !store.records.contains_key(&record) {
            return Err(HostError::TermWriteFailed {
                record,
                taxonomy: taxonomy.to_string(),
            });
        }
        let mut resolved = Vec::with_capacity(terms.len());
        for id in terms {
            let term = store
                .defined_terms
                .get(taxonomy)
                .and_then(|defined| defined.get(id))
                .cloned()
                .ok_or_else(|| HostError::TermWriteFailed {
                    record,
                    taxonomy: taxonomy.to_string(),
                })?;
            resolved.push(term);
        }
        store
            .terms
            .entry(record)
            .or_default()
            .insert(taxonomy.to_string(), resolved);
        Ok(())
    }

    fn thumbnail_url(&self, record: u64) -> Option<String> {
        self.store
            .lock()
            .unwrap()
            .records
            .get(&record)
            .and_then(|r| r.thumbnail.clone())
    }

    fn set_thumbnail(&self, record: u64, url: &str) -> Result<(), HostError> {
        let mut store = self.store.lock().unwrap();
        let rec = store
            .records
            .get_mut(&record)
            .ok_or(HostError::ThumbnailFailed(record))?;
        rec.thumbnail = Some(url.to_string());
        Ok(())
    }

    fn query(&self, query: &RecordQuery) -> Vec<u64> {
        self.matching_ids(query, true)
    }

    fn count(&self, query: &RecordQuery) -> u64 {
        self.matching_ids(query, false).len() as u64
    }

    fn count_published(&self, post_type: &str) -> u64 {
        let store = self.store.lock().unwrap();
        store
            .records
            .values()
            .filter(|r| r.post_type == post_type && r.status == "publish")
            .count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MetaFilter, TermFilter};
    use serde_json::json;

    fn seeded() -> MemoryHost {
        let host = MemoryHost::new();
        for (title, capacity) in [("alpha", 10), ("beta", 50), ("gamma", 30)] {
            let id = host
                .insert_record(RecordData {
                    post_type: "event".to_string(),
                    title: Some(title.to_string()),
                    ..RecordData::default()
                })
                .unwrap();
            host.set_field("capacity", id, json!(capacity)).unwrap();
        }
        host
    }

    #[test]
    fn test_insert_requires_post_type() {
        let host = MemoryHost::new();
        assert!(host.insert_record(RecordData::default()).is_err());
    }

    #[test]
    fn test_meta_compare_operators() {
        let host = seeded();
        let over_20 = RecordQuery::new("event")
            .unpaged()
            .meta(MetaFilter::new("capacity", json!(20), Compare::GreaterThan));
        assert_eq!(host.count(&over_20), 2);

        let exactly_50 = RecordQuery::new("event")
            .unpaged()
            .meta(MetaFilter::equals("capacity", json!(50)));
        assert_eq!(host.count(&exactly_50), 1);
    }

    #[test]
    fn test_missing_field_never_matches() {
        let host = seeded();
        let query = RecordQuery::new("event")
            .unpaged()
            .meta(MetaFilter::new("missing", json!(1), Compare::NotEqual));
        assert_eq!(host.count(&query), 0);
    }

    #[test]
    fn test_order_and_pagination() {
        let host = seeded();
        let by_title = RecordQuery::new("event")
            .per_page(2)
            .page(1)
            .order_by("title", SortOrder::Asc);
        let ids = host.query(&by_title);
        assert_eq!(ids.len(), 2);
        let first = host.record(ids[0]).unwrap();
        assert_eq!(first.title, "alpha");

        let page_two = RecordQuery::new("event")
            .per_page(2)
            .page(2)
            .order_by("title", SortOrder::Asc);
        assert_eq!(host.query(&page_two).len(), 1);
    }

    #[test]
    fn test_term_filters() {
        let host = seeded();
        host.define_term("event_category", Term::new(7, "Music", "music"));
        let id = host.query(&RecordQuery::new("event").unpaged())[0];
        host.set_terms(id, "event_category", &[7]).unwrap();

        let tagged = RecordQuery::new("event")
            .unpaged()
            .term(TermFilter::new("event_category", vec![7]));
        assert_eq!(host.query(&tagged), vec![id]);

        // Undefined term ids are a write error, not silently dropped
        assert!(host.set_terms(id, "event_category", &[99]).is_err());
    }

    #[test]
    fn test_count_published_ignores_drafts() {
        let host = seeded();
        host.insert_record(RecordData {
            post_type: "event".to_string(),
            status: Some("draft".to_string()),
            ..RecordData::default()
        })
        .unwrap();
        assert_eq!(host.count_published("event"), 3);
    }

    #[test]
    fn test_delete_removes_fields_and_terms() {
        let host = seeded();
        let id = host.query(&RecordQuery::new("event").unpaged())[0];
        assert!(host.delete_record(id, true));
        assert!(host.record(id).is_none());
        assert!(host.field("capacity", id).is_none());
        assert!(!host.delete_record(id, true));
    }
}
