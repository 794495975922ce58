//! References: groups of snaks citing the source of a claim.

use serde_json::Value;

use crate::model::keyed::KeyedList;
use crate::model::snak::Snak;

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub(crate) hash: String,
    pub(crate) snaks_order: Vec<String>,
    pub(crate) snaks: KeyedList<Vec<Snak>>,
}

impl Reference {
    /// Creates a reference; the snak order follows the group order.
    pub fn new(hash: impl Into<String>, snaks: KeyedList<Vec<Snak>>) -> Self {
        let snaks_order = snaks.keys().map(str::to_string).collect();
        Self {
            hash: hash.into(),
            snaks_order,
            snaks,
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Property ids in their declared display order.
    pub fn snaks_order(&self) -> &[String] {
        &self.snaks_order
    }

    /// Snaks grouped by property id, in document order.
    pub fn snaks(&self) -> &KeyedList<Vec<Snak>> {
        &self.snaks
    }

    /// Snaks for one property.
    pub fn snaks_for(&self, property_id: &str) -> Option<&[Snak]> {
        self.snaks.get(property_id).map(Vec::as_slice)
    }

    /// Every snak of the reference, group by group.
    pub fn iter_snaks(&self) -> impl Iterator<Item = &Snak> {
        self.snaks.values().flatten()
    }

    /// Canonical JSON form: `{"hash": .., "value": {<pid>: [<snak>, ..]}}`.
    pub fn serialize(&self) -> Value {
        crate::codec::tree::encode_reference(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::value::TypedValue;

    #[test]
    fn test_reference_accessors() {
        let mut groups = KeyedList::new();
        groups.insert(
            "P854",
            vec![Snak::with_value("P854", "url", TypedValue::Plain(json!("https://example.org")))],
        );
        groups.insert(
            "P813",
            vec![Snak::with_value("P813", "string", TypedValue::Plain(json!("today")))],
        );
        let reference = Reference::new("abc123", groups);

        assert_eq!(reference.hash(), "abc123");
        assert_eq!(reference.snaks_order(), ["P854".to_string(), "P813".to_string()]);
        assert_eq!(reference.snaks_for("P854").map(<[Snak]>::len), Some(1));
        assert!(reference.snaks_for("P143").is_none());
        assert_eq!(reference.iter_snaks().count(), 2);
        assert_eq!(
            reference.serialize(),
            json!({
                "hash": "abc123",
                "value": {
                    "P854": [{"type": "url", "value": "https://example.org"}],
                    "P813": [{"type": "string", "value": "today"}],
                }
            })
        );
    }
}
