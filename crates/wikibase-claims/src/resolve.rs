//! Label resolution for entity references.
//!
//! Rendering an [`EntityRef`](crate::EntityRef) needs the label of another
//! entity. The claim tree never looks labels up on its own: callers pass a
//! [`LabelResolver`] into every rendering query.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::codec::wire::parse_document_str;
use crate::config::LookupConfig;
use crate::error::ResolveError;
use crate::model::document::EntityDocument;
use crate::model::entity::Entity;

/// Looks up the label of an entity in a language.
pub trait LabelResolver {
    /// Returns the label of `entity_id` in `lang`.
    ///
    /// `Ok(None)` means the entity exists but has no label in `lang`.
    fn resolve_label(&self, entity_id: &str, lang: &str) -> Result<Option<String>, ResolveError>;
}

impl<T: LabelResolver + ?Sized> LabelResolver for &T {
    fn resolve_label(&self, entity_id: &str, lang: &str) -> Result<Option<String>, ResolveError> {
        (**self).resolve_label(entity_id, lang)
    }
}

impl<T: LabelResolver + ?Sized> LabelResolver for Box<T> {
    fn resolve_label(&self, entity_id: &str, lang: &str) -> Result<Option<String>, ResolveError> {
        (**self).resolve_label(entity_id, lang)
    }
}

impl<T: LabelResolver + ?Sized> LabelResolver for Arc<T> {
    fn resolve_label(&self, entity_id: &str, lang: &str) -> Result<Option<String>, ResolveError> {
        (**self).resolve_label(entity_id, lang)
    }
}

/// Resolves nothing. Entity references render without a label.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl LabelResolver for NoopResolver {
    fn resolve_label(&self, _entity_id: &str, _lang: &str) -> Result<Option<String>, ResolveError> {
        Ok(None)
    }
}

/// Resolves labels from entities already held in memory.
///
/// Unknown ids resolve to `Ok(None)`.
#[derive(Debug, Clone, Default)]
pub struct DocumentResolver {
    entities: FxHashMap<String, Entity>,
}

impl DocumentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: EntityDocument) -> Self {
        let mut resolver = Self::new();
        resolver.add_document(document);
        resolver
    }

    /// Adds every entity of `document`, replacing earlier ones with the
    /// same id.
    pub fn add_document(&mut self, document: EntityDocument) {
        for (key, entity) in document.into_entities() {
            let id = entity.id().map(str::to_string).unwrap_or(key);
            self.entities.insert(id, entity);
        }
    }

    /// Adds one entity. Entities without an id are ignored.
    pub fn add_entity(&mut self, entity: Entity) {
        if let Some(id) = entity.id().map(str::to_string) {
            self.entities.insert(id, entity);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl LabelResolver for DocumentResolver {
    fn resolve_label(&self, entity_id: &str, lang: &str) -> Result<Option<String>, ResolveError> {
        Ok(self
            .entities
            .get(entity_id)
            .and_then(|e| e.label(lang))
            .map(str::to_string))
    }
}

/// Transport boundary: fetches the body behind a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, ResolveError>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<String, ResolveError>,
{
    fn fetch(&self, url: &str) -> Result<String, ResolveError> {
        self(url)
    }
}

/// Resolves each label with a fresh entity API request.
///
/// Every call fetches and parses a whole entity document. There is no
/// caching and no retry; transport and parse failures are returned to the
/// caller.
#[derive(Debug, Clone)]
pub struct FetchResolver<F> {
    fetcher: F,
    config: LookupConfig,
}

impl<F: Fetcher> FetchResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, LookupConfig::default())
    }

    pub fn with_config(fetcher: F, config: LookupConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Fetches and parses the entity document for `ids`.
    pub fn fetch_document(&self, ids: &[&str], lang: &str) -> Result<EntityDocument, ResolveError> {
        let url = self.config.entity_url(ids, lang)?;
        debug!(%url, "fetching entity document");
        let body = self.fetcher.fetch(url.as_str())?;
        Ok(parse_document_str(&body)?)
    }
}

impl<F: Fetcher> LabelResolver for FetchResolver<F> {
    fn resolve_label(&self, entity_id: &str, lang: &str) -> Result<Option<String>, ResolveError> {
        let document = self.fetch_document(&[entity_id], lang)?;
        match document.first() {
            Some(entity) => Ok(entity.label(lang).map(str::to_string)),
            None => Err(ResolveError::NotFound {
                id: entity_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::ParseError;
    use crate::model::builder::EntityBuilder;

    const HUMAN: &str = r#"{"entities": {"Q5": {"id": "Q5", "type": "item",
        "labels": {"en": {"language": "en", "value": "human"}}}}, "success": 1}"#;

    #[test]
    fn test_noop_resolver() {
        assert_eq!(NoopResolver.resolve_label("Q5", "en").unwrap(), None);
    }

    #[test]
    fn test_document_resolver() {
        let mut resolver = DocumentResolver::new();
        resolver.add_entity(EntityBuilder::new("Q5").label("en", "human").build());
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.resolve_label("Q5", "en").unwrap().as_deref(), Some("human"));
        assert_eq!(resolver.resolve_label("Q5", "de").unwrap(), None);
        assert_eq!(resolver.resolve_label("Q6", "en").unwrap(), None);
    }

    #[test]
    fn test_resolver_through_pointers() {
        let boxed: Box<dyn LabelResolver> = Box::new(NoopResolver);
        assert_eq!(boxed.resolve_label("Q5", "en").unwrap(), None);
        let shared = Arc::new(NoopResolver);
        assert_eq!(shared.resolve_label("Q5", "en").unwrap(), None);
    }

    #[test]
    fn test_fetch_resolver_requests_entity() {
        let seen = RefCell::new(Vec::new());
        let fetch = |url: &str| -> Result<String, ResolveError> {
            seen.borrow_mut().push(url.to_string());
            Ok(HUMAN.to_string())
        };
        let resolver = FetchResolver::new(fetch);
        assert_eq!(resolver.resolve_label("Q5", "en").unwrap().as_deref(), Some("human"));
        assert_eq!(resolver.resolve_label("Q5", "fr").unwrap(), None);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("action=wbgetentities"));
        assert!(seen[0].contains("ids=Q5"));
        assert!(seen[1].contains("languages=fr"));
    }

    #[test]
    fn test_fetch_resolver_errors_propagate() {
        let down = FetchResolver::new(|_: &str| -> Result<String, ResolveError> {
            Err(ResolveError::Transport("connection refused".into()))
        });
        assert!(matches!(down.resolve_label("Q5", "en"), Err(ResolveError::Transport(_))));

        let garbage = FetchResolver::new(|_: &str| -> Result<String, ResolveError> { Ok("<html>".to_string()) });
        assert!(matches!(
            garbage.resolve_label("Q5", "en"),
            Err(ResolveError::Document(ParseError::Json(_)))
        ));

        let empty = FetchResolver::new(|_: &str| -> Result<String, ResolveError> {
            Ok(r#"{"entities": {}}"#.to_string())
        });
        assert!(matches!(
            empty.resolve_label("Q5", "en"),
            Err(ResolveError::NotFound { id }) if id == "Q5"
        ));
    }
}
