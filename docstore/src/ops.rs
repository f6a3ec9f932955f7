use crate::{Collection, Document, Result, UpdateResult};
use serde_json::json;
use uuid::Uuid;

/// Insert the given fields as one new school document and return its id.
pub fn insert_school<C: Collection>(coll: &C, fields: Document) -> Result<Uuid> {
    coll.insert_one(fields)
}

/// Replace the topics of the first school document named `name`.
pub fn update_topics<C: Collection>(
    coll: &C,
    name: &str,
    topics: &[&str],
) -> Result<UpdateResult> {
    let mut filter = Document::new();
    filter.insert("name".to_owned(), json!(name));

    let mut set = Document::new();
    set.insert("topics".to_owned(), json!(topics));

    coll.update_one(filter, set)
}
