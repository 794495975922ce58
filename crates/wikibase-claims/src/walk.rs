//! Traversal of claim trees.
//!
//! [`TreeVisitor`] walks an entity's claims, qualifiers and references.
//! The default methods do the walking and the leaf hooks do nothing, so an
//! implementation only overrides the hooks it needs. Walks only read the
//! raw typed values; they never render, so they never reach a resolver.

use std::collections::BTreeSet;

use crate::model::claim::Claim;
use crate::model::entity::Entity;
use crate::model::reference::Reference;
use crate::model::snak::Snak;

/// Where a snak or property id sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakSite {
    /// A claim's main snak (or the claim group key).
    Main,
    Qualifier,
    Reference,
}

// =============================================================================
// TREE WALKING
// =============================================================================

/// Visitor over an entity's claim tree.
pub trait TreeVisitor {
    /// Visit the whole entity
    fn visit_entity(&mut self, entity: &Entity) {
        for (pid, claims) in entity.properties().into_iter().flat_map(|c| c.iter()) {
            self.visit_property(pid, SnakSite::Main);
            for claim in claims {
                self.visit_claim(claim);
            }
        }
    }

    /// Visit a claim: main snak, qualifier groups, then references
    fn visit_claim(&mut self, claim: &Claim) {
        self.visit_snak(claim.main_snak(), SnakSite::Main);
        for (pid, snaks) in claim.qualifiers() {
            self.visit_property(pid, SnakSite::Qualifier);
            for snak in snaks {
                self.visit_snak(snak, SnakSite::Qualifier);
            }
        }
        for reference in claim.references() {
            self.visit_reference(reference);
        }
    }

    /// Visit a reference
    fn visit_reference(&mut self, reference: &Reference) {
        for (pid, snaks) in reference.snaks().iter() {
            self.visit_property(pid, SnakSite::Reference);
            for snak in snaks {
                self.visit_snak(snak, SnakSite::Reference);
            }
        }
    }

    /// Visit a property id used as a group key
    fn visit_property(&mut self, _property_id: &str, _site: SnakSite) {}

    /// Visit a snak
    fn visit_snak(&mut self, _snak: &Snak, _site: SnakSite) {}
}

/// Collects the canonical id of every entity reference.
#[derive(Debug, Default)]
pub struct EntityIdCollector {
    pub ids: BTreeSet<String>,
}

impl TreeVisitor for EntityIdCollector {
    fn visit_snak(&mut self, snak: &Snak, _site: SnakSite) {
        if let Some(id) = snak.typed_value().and_then(|v| v.entity_id()) {
            self.ids.insert(id);
        }
    }
}

/// Collects every property id used as a claim key, a qualifier or a
/// reference snak. A main snak's own property is not counted; its claim
/// key already names it.
#[derive(Debug, Default)]
pub struct PropertyIdCollector {
    pub ids: BTreeSet<String>,
}

impl TreeVisitor for PropertyIdCollector {
    fn visit_property(&mut self, property_id: &str, _site: SnakSite) {
        if !self.ids.contains(property_id) {
            self.ids.insert(property_id.to_string());
        }
    }

    fn visit_snak(&mut self, snak: &Snak, site: SnakSite) {
        if site != SnakSite::Main {
            self.visit_property(snak.property(), site);
        }
    }
}

/// The entity's own id and every entity it references, sorted and
/// deduplicated.
pub fn gather_entity_ids(entity: &Entity) -> Vec<String> {
    let mut collector = EntityIdCollector::default();
    if let Some(id) = entity.id() {
        collector.ids.insert(id.to_string());
    }
    collector.visit_entity(entity);
    collector.ids.into_iter().collect()
}

/// Every claim key, qualifier property and reference snak property,
/// sorted and deduplicated.
pub fn gather_property_ids(entity: &Entity) -> Vec<String> {
    let mut collector = PropertyIdCollector::default();
    collector.visit_entity(entity);
    collector.ids.into_iter().collect()
}
