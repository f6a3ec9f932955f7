use crate::{Collection, DocError, Document, Result, UpdateResult};
use log::debug;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// An in-memory document collection
///
/// Documents are kept in insertion order, so "first match" always means
/// the oldest matching document. Cloning yields another handle onto the
/// same collection.
#[derive(Clone, Default)]
pub struct MemCollection {
    inner: Arc<Mutex<Vec<(Uuid, Document)>>>,
}

impl MemCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// how many documents the collection holds
    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.lock().map_err(|_| DocError::Lock)?.len())
    }

    /// whether the collection holds no documents
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Collection for MemCollection {
    fn insert_one(&self, doc: Document) -> Result<Uuid> {
        let id = Uuid::new_v4();
        debug!("insert_one {} ({} fields)", id, doc.len());

        self.inner
            .lock()
            .map_err(|_| DocError::Lock)?
            .push((id, doc));

        Ok(id)
    }

    fn update_one(&self, filter: Document, set: Document) -> Result<UpdateResult> {
        let mut docs = self.inner.lock().map_err(|_| DocError::Lock)?;

        let Some((id, doc)) = docs.iter_mut().find(|(_, doc)| matches(doc, &filter)) else {
            debug!("update_one matched nothing");
            return Ok(UpdateResult {
                matched: 0,
                modified: 0,
            });
        };

        let mut modified = 0;
        for (field, value) in set {
            if doc.get(&field) != Some(&value) {
                modified = 1;
            }
            doc.insert(field, value);
        }

        debug!("update_one {} (modified: {})", id, modified == 1);
        Ok(UpdateResult {
            matched: 1,
            modified,
        })
    }

    fn find_one(&self, filter: Document) -> Result<Option<Document>> {
        let docs = self.inner.lock().map_err(|_| DocError::Lock)?;

        Ok(docs
            .iter()
            .find(|(_, doc)| matches(doc, &filter))
            .map(|(_, doc)| doc.clone()))
    }
}

// every filter field must be present and equal in the document
fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, value)| doc.get(field) == Some(value))
}
