//! Entities: the top-level node of a claim tree.

use serde_json::Value;

use crate::error::ResolveError;
use crate::model::claim::Claim;
use crate::model::id::normalize_property_id;
use crate::model::keyed::KeyedList;
use crate::model::value::RenderedValue;
use crate::resolve::LabelResolver;

/// A text in one language (label, description or alias).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    pub language: String,
    pub value: String,
}

impl LocalizedText {
    pub fn new(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            value: value.into(),
        }
    }
}

/// A knowledge-base entity with its terms and claims.
///
/// Sections missing from the source document are `None`. Lookups treat a
/// missing section and an empty one alike.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub(crate) id: Option<String>,
    pub(crate) entity_type: Option<String>,
    pub(crate) page_id: Option<u64>,
    pub(crate) namespace: Option<i64>,
    pub(crate) title: Option<String>,
    pub(crate) last_revision_id: Option<u64>,
    pub(crate) modified: Option<String>,
    pub(crate) labels: Option<KeyedList<LocalizedText>>,
    pub(crate) descriptions: Option<KeyedList<LocalizedText>>,
    pub(crate) aliases: Option<KeyedList<Vec<LocalizedText>>>,
    /// Keyed by upper-cased property id.
    pub(crate) claims: Option<KeyedList<Vec<Claim>>>,
}

impl Entity {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Entity type (`item`, `property`, ...).
    pub fn entity_type(&self) -> Option<&str> {
        self.entity_type.as_deref()
    }

    pub fn page_id(&self) -> Option<u64> {
        self.page_id
    }

    pub fn namespace(&self) -> Option<i64> {
        self.namespace
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn last_revision_id(&self) -> Option<u64> {
        self.last_revision_id
    }

    /// Last modification timestamp as given by the API.
    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }

    pub fn labels(&self) -> Option<&KeyedList<LocalizedText>> {
        self.labels.as_ref()
    }

    pub fn descriptions(&self) -> Option<&KeyedList<LocalizedText>> {
        self.descriptions.as_ref()
    }

    pub fn aliases(&self) -> Option<&KeyedList<Vec<LocalizedText>>> {
        self.aliases.as_ref()
    }

    /// All claim groups, keyed by property id.
    pub fn properties(&self) -> Option<&KeyedList<Vec<Claim>>> {
        self.claims.as_ref()
    }

    /// Label in `lang`. No fallback to other languages.
    pub fn label(&self, lang: &str) -> Option<&str> {
        self.labels.as_ref()?.get(lang).map(|t| t.value.as_str())
    }

    /// Description in `lang`. No fallback to other languages.
    pub fn description(&self, lang: &str) -> Option<&str> {
        self.descriptions.as_ref()?.get(lang).map(|t| t.value.as_str())
    }

    /// Alias texts in `lang`.
    pub fn alias_values(&self, lang: &str) -> Option<Vec<&str>> {
        self.aliases
            .as_ref()?
            .get(lang)
            .map(|list| list.iter().map(|t| t.value.as_str()).collect())
    }

    /// Claims for a property; either case of the id is accepted.
    pub fn property(&self, id: &str) -> Option<&[Claim]> {
        self.claims
            .as_ref()?
            .get(&normalize_property_id(id))
            .map(Vec::as_slice)
    }

    /// Rendered main value of every claim for a property, in claim order.
    ///
    /// `Ok(None)` when the entity has no claims for the property. Resolver
    /// failures are returned unchanged.
    pub fn property_values<R>(
        &self,
        id: &str,
        lang: &str,
        resolver: &R,
    ) -> Result<Option<Vec<RenderedValue<'_>>>, ResolveError>
    where
        R: LabelResolver + ?Sized,
    {
        let Some(claims) = self.property(id) else {
            return Ok(None);
        };
        claims
            .iter()
            .map(|c| c.main_snak().render(lang, resolver))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Maps each claim's rendered main value to the first value of its
    /// `qualifier_id` qualifier.
    ///
    /// Map keys are [`RenderedValue::key`]. When two claims render to the
    /// same key the later claim's qualifier wins, keeping the position of
    /// the first. Claims without the qualifier map to `None`.
    pub fn property_values_with_qualifier<R>(
        &self,
        property_id: &str,
        qualifier_id: &str,
        lang: &str,
        resolver: &R,
    ) -> Result<Option<KeyedList<Option<RenderedValue<'_>>>>, ResolveError>
    where
        R: LabelResolver + ?Sized,
    {
        let Some(claims) = self.property(property_id) else {
            return Ok(None);
        };

        let mut out = KeyedList::new();
        for claim in claims {
            let key = claim.main_snak().render(lang, resolver)?.key();
            let first = claim
                .qualifier_values(qualifier_id, resolver)?
                .and_then(|values| values.into_iter().next());
            out.insert(key, first);
        }
        Ok(Some(out))
    }

    /// Every entity id referenced anywhere in the tree, plus this entity's
    /// own id, sorted and deduplicated.
    pub fn gather_entity_ids(&self) -> Vec<String> {
        crate::walk::gather_entity_ids(self)
    }

    /// Every property id used as a claim key, qualifier or reference snak,
    /// sorted and deduplicated.
    pub fn gather_property_ids(&self) -> Vec<String> {
        crate::walk::gather_property_ids(self)
    }

    /// Canonical JSON form of the whole tree.
    pub fn serialize(&self) -> Value {
        crate::codec::tree::encode_entity(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::builder::EntityBuilder;
    use crate::model::value::TypedValue;
    use crate::resolve::NoopResolver;

    fn sample() -> Entity {
        EntityBuilder::new("Q42")
            .label("en", "Douglas Adams")
            .label("de", "Douglas Adams")
            .description("en", "English writer and humorist")
            .alias("en", "Douglas Noël Adams")
            .alias("en", "DNA")
            .claim("p1477", |c| c.value("monolingualtext", TypedValue::Plain(json!({"text": "Douglas Noël Adams", "language": "en"}))))
            .claim("P569", |c| c.value("string", TypedValue::Plain(json!("1952"))))
            .build()
    }

    #[test]
    fn test_terms() {
        let e = sample();
        assert_eq!(e.id(), Some("Q42"));
        assert_eq!(e.label("en"), Some("Douglas Adams"));
        assert_eq!(e.label("fr"), None);
        assert_eq!(e.description("en"), Some("English writer and humorist"));
        assert_eq!(e.description("de"), None);
        assert_eq!(e.alias_values("en"), Some(vec!["Douglas Noël Adams", "DNA"]));
        assert_eq!(e.alias_values("de"), None);
    }

    #[test]
    fn test_property_lookup_case_insensitive() {
        let e = sample();
        assert_eq!(e.property("p1477"), e.property("P1477"));
        assert!(e.property("P1477").is_some());
        assert!(e.property("P31").is_none());
    }

    #[test]
    fn test_property_values_unknown_is_none() {
        let e = sample();
        assert_eq!(e.property_values("P31", "en", &NoopResolver).unwrap(), None);
        let values = e.property_values("P569", "en", &NoopResolver).unwrap().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_str(), Some("1952"));
    }

    #[test]
    fn test_empty_entity_has_nothing() {
        let e = Entity::default();
        assert_eq!(e.label("en"), None);
        assert!(e.properties().is_none());
        assert!(e.property("P31").is_none());
        assert!(e.gather_entity_ids().is_empty());
        assert!(e.gather_property_ids().is_empty());
    }
}
