//! Claims (statements) on an entity.

use serde_json::Value;
use tracing::debug;

use crate::config::DEFAULT_LANGUAGE;
use crate::error::ResolveError;
use crate::model::id::normalize_property_id;
use crate::model::keyed::KeyedList;
use crate::model::reference::Reference;
use crate::model::snak::Snak;
use crate::model::value::RenderedValue;
use crate::resolve::LabelResolver;

/// Claim priority marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

impl Rank {
    pub fn from_name(name: &str) -> Option<Rank> {
        match name {
            "preferred" => Some(Rank::Preferred),
            "normal" => Some(Rank::Normal),
            "deprecated" => Some(Rank::Deprecated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Preferred => "preferred",
            Rank::Normal => "normal",
            Rank::Deprecated => "deprecated",
        }
    }
}

/// One statement: a main snak plus optional qualifiers and references.
///
/// Qualifiers and references distinguish "not in the document" (`None`)
/// from "present but empty"; the iteration accessors treat both as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub(crate) id: String,
    pub(crate) statement_type: Option<String>,
    pub(crate) rank: Rank,
    pub(crate) main_snak: Snak,
    pub(crate) qualifiers: Option<KeyedList<Vec<Snak>>>,
    pub(crate) qualifiers_order: Option<Vec<String>>,
    pub(crate) references: Option<Vec<Reference>>,
}

impl Claim {
    /// Creates a claim with no qualifiers and no references.
    pub fn new(id: impl Into<String>, rank: Rank, main_snak: Snak) -> Self {
        Self {
            id: id.into(),
            statement_type: None,
            rank,
            main_snak,
            qualifiers: None,
            qualifiers_order: None,
            references: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Statement type as given in the document (normally `statement`).
    pub fn statement_type(&self) -> Option<&str> {
        self.statement_type.as_deref()
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn main_snak(&self) -> &Snak {
        &self.main_snak
    }

    /// Qualifier snaks for one property, or `None` if the claim has none.
    pub fn qualifier(&self, property_id: &str) -> Option<&[Snak]> {
        self.qualifiers
            .as_ref()?
            .get(&normalize_property_id(property_id))
            .map(Vec::as_slice)
    }

    /// Qualifier groups in document order; empty when the claim has none.
    pub fn qualifiers(&self) -> impl Iterator<Item = (&str, &[Snak])> {
        self.qualifiers
            .iter()
            .flat_map(|q| q.iter().map(|(k, v)| (k, v.as_slice())))
    }

    /// The qualifier map exactly as parsed (`None` if the document had none).
    pub fn qualifier_groups(&self) -> Option<&KeyedList<Vec<Snak>>> {
        self.qualifiers.as_ref()
    }

    /// Declared display order of qualifier properties.
    pub fn qualifiers_order(&self) -> Option<&[String]> {
        self.qualifiers_order.as_deref()
    }

    /// Qualifier groups in declared display order.
    ///
    /// Groups missing from the declared order follow in document order.
    pub fn ordered_qualifiers(&self) -> Vec<(&str, &[Snak])> {
        let Some(groups) = self.qualifiers.as_ref() else {
            return Vec::new();
        };
        let order = self.qualifiers_order.as_deref().unwrap_or(&[]);

        let mut out = Vec::with_capacity(groups.len());
        for pid in order {
            match groups.get(pid) {
                Some(snaks) if !out.iter().any(|(k, _)| *k == pid.as_str()) => {
                    out.push((pid.as_str(), snaks.as_slice()))
                }
                Some(_) => {}
                None => debug!(claim = %self.id, property = %pid, "qualifier order names a missing group"),
            }
        }
        for (pid, snaks) in groups.iter() {
            if !out.iter().any(|(k, _)| *k == pid) {
                out.push((pid, snaks.as_slice()));
            }
        }
        out
    }

    /// References; empty when the claim has none.
    pub fn references(&self) -> &[Reference] {
        self.references.as_deref().unwrap_or(&[])
    }

    /// Whether the document carried a `references` field at all.
    pub fn has_references_field(&self) -> bool {
        self.references.is_some()
    }

    /// Renders every qualifier value for `property_id` in the default
    /// language, or `None` if the claim has no such qualifier.
    pub fn qualifier_values<R>(
        &self,
        property_id: &str,
        resolver: &R,
    ) -> Result<Option<Vec<RenderedValue<'_>>>, ResolveError>
    where
        R: LabelResolver + ?Sized,
    {
        let Some(snaks) = self.qualifier(property_id) else {
            return Ok(None);
        };
        snaks
            .iter()
            .map(|s| s.render(DEFAULT_LANGUAGE, resolver))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Canonical JSON form:
    /// `{"id", "rank", "value", "qualifiers", "references"}`.
    pub fn serialize(&self) -> Value {
        crate::codec::tree::encode_claim(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::value::TypedValue;
    use crate::resolve::NoopResolver;

    fn plain(pid: &str, v: &str) -> Snak {
        Snak::with_value(pid, "string", TypedValue::Plain(json!(v)))
    }

    fn claim_with_qualifiers() -> Claim {
        let mut claim = Claim::new("Q1$abc", Rank::Preferred, plain("P1", "main"));
        let mut quals = KeyedList::new();
        quals.insert("P580", vec![plain("P580", "start")]);
        quals.insert("P582", vec![plain("P582", "end"), plain("P582", "end-2")]);
        quals.insert("P1545", vec![plain("P1545", "1")]);
        claim.qualifiers = Some(quals);
        claim.qualifiers_order = Some(vec!["P582".into(), "P9999".into(), "P580".into()]);
        claim
    }

    #[test]
    fn test_rank_names() {
        for name in ["preferred", "normal", "deprecated"] {
            assert_eq!(Rank::from_name(name).unwrap().as_str(), name);
        }
        assert_eq!(Rank::from_name("best"), None);
    }

    #[test]
    fn test_absent_sections_iterate_empty() {
        let claim = Claim::new("Q1$x", Rank::Normal, plain("P1", "v"));
        assert!(claim.references().is_empty());
        assert!(!claim.has_references_field());
        assert_eq!(claim.qualifiers().count(), 0);
        assert!(claim.qualifier_groups().is_none());
        assert!(claim.qualifier("P580").is_none());
        assert_eq!(claim.qualifier_values("P580", &NoopResolver).unwrap(), None);
    }

    #[test]
    fn test_qualifier_lookup_is_case_insensitive() {
        let claim = claim_with_qualifiers();
        assert_eq!(claim.qualifier("p582").map(<[Snak]>::len), Some(2));
        let values = claim.qualifier_values("P582", &NoopResolver).unwrap().unwrap();
        let texts: Vec<_> = values.iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(texts, vec!["end", "end-2"]);
    }

    #[test]
    fn test_ordered_qualifiers() {
        let claim = claim_with_qualifiers();
        let order: Vec<&str> = claim.ordered_qualifiers().into_iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["P582", "P580", "P1545"]);
    }

    #[test]
    fn test_serialize_absent_sections() {
        let claim = Claim::new("Q1$x", Rank::Deprecated, plain("P1", "v"));
        assert_eq!(
            claim.serialize(),
            json!({
                "id": "Q1$x",
                "rank": "deprecated",
                "value": {"type": "string", "value": "v"},
                "qualifiers": {},
                "references": [],
            })
        );
    }
}
