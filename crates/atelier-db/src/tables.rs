//! In-memory table engine shared by the backends.

use crate::{Condition, ConditionalUpdate, DbError, Document, Filter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredRow {
    pub id: String,
    pub doc: Document,
}

/// Collections of rows kept in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Tables {
    collections: HashMap<String, Vec<StoredRow>>,
}

impl Tables {
    fn rows(&self, collection: &str) -> &[StoredRow] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn position(&self, collection: &str, id: &str) -> Option<usize> {
        self.rows(collection).iter().position(|r| r.id == id)
    }

    pub fn insert(&mut self, collection: &str, id: &str, doc: Document) -> Result<(), DbError> {
        if self.position(collection, id).is_some() {
            return Err(DbError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredRow {
                id: id.to_string(),
                doc,
            });
        Ok(())
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.rows(collection)
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.doc.clone())
    }

    pub fn delete(&mut self, collection: &str, id: &str) -> bool {
        match (self.position(collection, id), self.collections.get_mut(collection)) {
            (Some(index), Some(rows)) => {
                rows.remove(index);
                true
            }
            _ => false,
        }
    }

    pub fn update_if(
        &mut self,
        collection: &str,
        id: &str,
        condition: &Condition,
        changes: Document,
    ) -> ConditionalUpdate {
        let Some(row) = self
            .collections
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
        else {
            return ConditionalUpdate::Missing;
        };

        if !condition.holds(&row.doc) {
            return ConditionalUpdate::Rejected(row.doc.clone());
        }

        for (field, value) in changes {
            row.doc.insert(field, value);
        }
        ConditionalUpdate::Applied(row.doc.clone())
    }

    pub fn find(&self, collection: &str, filter: &Filter) -> Vec<Document> {
        self.rows(collection)
            .iter()
            .filter(|r| filter.matches(&r.doc))
            .map(|r| r.doc.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(status: &str) -> Document {
        let mut d = Document::new();
        d.insert("status".into(), json!(status));
        d
    }

    #[test]
    fn test_insert_conflict() {
        let mut t = Tables::default();
        t.insert("orders", "a", doc("pending")).unwrap();
        assert!(t.insert("orders", "a", doc("pending")).unwrap_err().is_conflict());
        // Same id in another collection is fine.
        t.insert("attempts", "a", doc("pending")).unwrap();
    }

    #[test]
    fn test_update_if_applies_and_rejects() {
        let mut t = Tables::default();
        t.insert("orders", "a", doc("pending")).unwrap();
        let guard = Condition::field_in("status", ["pending"]);

        let first = t.update_if("orders", "a", &guard, doc("cancelled"));
        assert!(matches!(first, ConditionalUpdate::Applied(ref d) if d["status"] == "cancelled"));

        let second = t.update_if("orders", "a", &guard, doc("cancelled"));
        assert!(matches!(second, ConditionalUpdate::Rejected(ref d) if d["status"] == "cancelled"));

        let missing = t.update_if("orders", "zzz", &guard, doc("cancelled"));
        assert_eq!(missing, ConditionalUpdate::Missing);
    }

    #[test]
    fn test_find_keeps_insertion_order() {
        let mut t = Tables::default();
        for id in ["c", "a", "b"] {
            t.insert("orders", id, doc("pending")).unwrap();
        }
        t.delete("orders", "a");
        let ids: Vec<_> = t
            .rows("orders")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["c", "b"]);
        assert_eq!(t.find("orders", &Filter::field_eq("status", "pending")).len(), 2);
    }
}
