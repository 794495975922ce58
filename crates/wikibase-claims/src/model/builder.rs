//! Builder API for constructing entities in code.
//!
//! Useful for fixtures and for callers that assemble claim trees from
//! sources other than the entity API.
//!
//! # Example
//!
//! ```rust
//! use wikibase_claims::model::builder::EntityBuilder;
//! use wikibase_claims::{EntityRef, Rank, TypedValue};
//!
//! let entity = EntityBuilder::new("Q42")
//!     .label("en", "Douglas Adams")
//!     .claim("P31", |c| c
//!         .rank(Rank::Preferred)
//!         .value("wikibase-item", TypedValue::EntityRef(EntityRef::new("item", 5)))
//!     )
//!     .build();
//!
//! assert_eq!(entity.gather_entity_ids(), vec!["Q42", "Q5"]);
//! ```

use crate::model::claim::{Claim, Rank};
use crate::model::entity::{Entity, LocalizedText};
use crate::model::id::normalize_property_id;
use crate::model::keyed::KeyedList;
use crate::model::reference::Reference;
use crate::model::snak::{Snak, SnakType};
use crate::model::value::TypedValue;

/// Builder for an [`Entity`].
#[derive(Debug, Clone, Default)]
pub struct EntityBuilder {
    entity: Entity,
}

impl EntityBuilder {
    /// Creates a builder for the entity with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            entity: Entity {
                id: Some(id.into()),
                ..Entity::default()
            },
        }
    }

    /// Sets the entity type (`item`, `property`, ...).
    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity.entity_type = Some(entity_type.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.entity.title = Some(title.into());
        self
    }

    /// Sets the label in `lang`, replacing any previous one.
    pub fn label(mut self, lang: &str, text: impl Into<String>) -> Self {
        self.entity
            .labels
            .get_or_insert_with(KeyedList::new)
            .insert(lang, LocalizedText::new(lang, text));
        self
    }

    /// Sets the description in `lang`, replacing any previous one.
    pub fn description(mut self, lang: &str, text: impl Into<String>) -> Self {
        self.entity
            .descriptions
            .get_or_insert_with(KeyedList::new)
            .insert(lang, LocalizedText::new(lang, text));
        self
    }

    /// Appends an alias in `lang`.
    pub fn alias(mut self, lang: &str, text: impl Into<String>) -> Self {
        let aliases = self.entity.aliases.get_or_insert_with(KeyedList::new);
        let entry = LocalizedText::new(lang, text);
        match aliases.get(lang) {
            Some(existing) => {
                let mut list = existing.clone();
                list.push(entry);
                aliases.insert(lang, list);
            }
            None => {
                aliases.insert(lang, vec![entry]);
            }
        }
        self
    }

    /// Appends a claim for `property_id` built by `f`.
    pub fn claim<F>(mut self, property_id: &str, f: F) -> Self
    where
        F: FnOnce(ClaimBuilder) -> ClaimBuilder,
    {
        let pid = normalize_property_id(property_id);
        let claims = self.entity.claims.get_or_insert_with(KeyedList::new);
        let mut group = claims.get(&pid).cloned().unwrap_or_default();

        let default_id = format!(
            "{}${}-{}",
            self.entity.id.as_deref().unwrap_or_default(),
            pid,
            group.len()
        );
        group.push(f(ClaimBuilder::new(default_id, &pid)).build());
        claims.insert(pid, group);
        self
    }

    /// Builds the entity.
    pub fn build(self) -> Entity {
        self.entity
    }
}

/// Builder for a single [`Claim`].
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    property: String,
    claim: Claim,
}

impl ClaimBuilder {
    /// Creates a builder for a claim on `property_id`. The main snak starts
    /// out as an unknown value.
    pub fn new(id: impl Into<String>, property_id: &str) -> Self {
        let property = normalize_property_id(property_id);
        let main = Snak::new(SnakType::SomeValue, property.clone(), None, None);
        Self {
            claim: Claim {
                statement_type: Some("statement".to_string()),
                ..Claim::new(id, Rank::Normal, main)
            },
            property,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.claim.id = id.into();
        self
    }

    pub fn rank(mut self, rank: Rank) -> Self {
        self.claim.rank = rank;
        self
    }

    /// Sets the main snak to a value.
    pub fn value(mut self, data_type: &str, value: TypedValue) -> Self {
        self.claim.main_snak = Snak::with_value(self.property.clone(), data_type, value);
        self
    }

    /// Sets the main snak to "no value".
    pub fn no_value(mut self, data_type: &str) -> Self {
        self.claim.main_snak = Snak::new(
            SnakType::NoValue,
            self.property.clone(),
            Some(data_type.to_string()),
            None,
        );
        self
    }

    /// Sets the main snak directly.
    pub fn main_snak(mut self, snak: Snak) -> Self {
        self.claim.main_snak = snak;
        self
    }

    /// Appends a qualifier value under `property_id`.
    pub fn qualifier(self, property_id: &str, data_type: &str, value: TypedValue) -> Self {
        let pid = normalize_property_id(property_id);
        let snak = Snak::with_value(pid, data_type, value);
        self.qualifier_snak(snak)
    }

    /// Appends a qualifier snak, grouped under its own property.
    pub fn qualifier_snak(mut self, snak: Snak) -> Self {
        let pid = normalize_property_id(snak.property());
        let groups = self.claim.qualifiers.get_or_insert_with(KeyedList::new);
        let mut group = groups.get(&pid).cloned().unwrap_or_default();
        group.push(snak);
        groups.insert(pid.clone(), group);

        let order = self.claim.qualifiers_order.get_or_insert_with(Vec::new);
        if !order.contains(&pid) {
            order.push(pid);
        }
        self
    }

    /// Appends a reference built by `f`.
    pub fn reference<F>(mut self, hash: &str, f: F) -> Self
    where
        F: FnOnce(ReferenceBuilder) -> ReferenceBuilder,
    {
        let reference = f(ReferenceBuilder::new(hash)).build();
        self.claim
            .references
            .get_or_insert_with(Vec::new)
            .push(reference);
        self
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}

/// Builder for a [`Reference`].
#[derive(Debug, Clone)]
pub struct ReferenceBuilder {
    hash: String,
    snaks: KeyedList<Vec<Snak>>,
}

impl ReferenceBuilder {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            snaks: KeyedList::new(),
        }
    }

    /// Appends a value snak under `property_id`.
    pub fn snak(self, property_id: &str, data_type: &str, value: TypedValue) -> Self {
        let pid = normalize_property_id(property_id);
        self.raw_snak(Snak::with_value(pid, data_type, value))
    }

    /// Appends a snak, grouped under its own property.
    pub fn raw_snak(mut self, snak: Snak) -> Self {
        let pid = snak.property().to_string();
        let mut group = self.snaks.get(&pid).cloned().unwrap_or_default();
        group.push(snak);
        self.snaks.insert(pid, group);
        self
    }

    pub fn build(self) -> Reference {
        Reference::new(self.hash, self.snaks)
    }
}
