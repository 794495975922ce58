//! A whole entity API response.

use crate::model::entity::Entity;
use crate::model::keyed::KeyedList;

/// The `entities` map of an entity API response, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityDocument {
    pub(crate) entities: KeyedList<Entity>,
    pub(crate) success: Option<bool>,
}

impl EntityDocument {
    /// Wraps already-built entities, keyed by their ids.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let entities = entities
            .into_iter()
            .map(|e| (e.id().unwrap_or_default().to_string(), e))
            .collect();
        Self {
            entities,
            success: None,
        }
    }

    /// The first entity of the response.
    pub fn first(&self) -> Option<&Entity> {
        self.entities.values().next()
    }

    /// Entity stored under `id`.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entities(&self) -> &KeyedList<Entity> {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_entities(self) -> KeyedList<Entity> {
        self.entities
    }

    /// Label of the first entity in `lang`.
    pub fn label(&self, lang: &str) -> Option<&str> {
        self.first()?.label(lang)
    }

    /// The response's `success` flag, when it carried one.
    pub fn success(&self) -> Option<bool> {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::EntityBuilder;

    #[test]
    fn test_document_accessors() {
        let doc = EntityDocument::from_entities([
            EntityBuilder::new("P31").label("en", "instance of").build(),
            EntityBuilder::new("Q5").label("en", "human").build(),
        ]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.first().and_then(Entity::id), Some("P31"));
        assert_eq!(doc.label("en"), Some("instance of"));
        assert_eq!(doc.get("Q5").and_then(|e| e.label("en")), Some("human"));
        assert!(doc.get("Q6").is_none());
        assert_eq!(doc.success(), None);
    }

    #[test]
    fn test_empty_document() {
        let doc = EntityDocument::default();
        assert!(doc.is_empty());
        assert!(doc.first().is_none());
        assert_eq!(doc.label("en"), None);
    }
}
