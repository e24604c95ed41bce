//! Ordered value collections with common-base type tracking
//!
//! A collection is bound to the model adapter it was created with.
//! Foreign nodes are converted on entry where a system value maps, the
//! running item type narrows to the nearest common ancestor as items are
//! added, and uniqueness scans use system equality for system values and
//! the adapter's equality for nodes that stayed foreign.
//!
//! Callers treat collections returned from an evaluation as read-only.

use std::fmt;

use crate::adapter::{AdapterRef, ModelError};
use crate::types::TypeSpec;
use crate::value::SystemValue;

/// Ordered sequence of values with a tracked item type.
#[derive(Clone)]
pub struct Collection {
    items: Vec<SystemValue>,
    item_type: Option<TypeSpec>,
    adapter: AdapterRef,
}

impl Collection {
    /// Empty collection bound to an adapter
    pub fn new(adapter: AdapterRef) -> Self {
        Self {
            items: Vec::new(),
            item_type: None,
            adapter,
        }
    }

    /// Collection populated from an iterator of values
    pub fn from_values<I>(adapter: AdapterRef, values: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = SystemValue>,
    {
        let mut collection = Self::new(adapter);
        for value in values {
            collection.add(value)?;
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SystemValue] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&SystemValue> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&SystemValue> {
        self.items.first()
    }

    /// The sole item, when the collection is a singleton
    pub fn single(&self) -> Option<&SystemValue> {
        if self.items.len() == 1 {
            self.items.first()
        } else {
            None
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SystemValue> {
        self.items.iter()
    }

    /// The nearest common ancestor type of the items; `None` while empty
    /// or when the item types share no ancestor.
    pub fn item_type_spec(&self) -> Option<&TypeSpec> {
        self.item_type.as_ref()
    }

    pub fn adapter(&self) -> &AdapterRef {
        &self.adapter
    }

    /// Convert a foreign node on entry, where the adapter maps one.
    fn converted(&self, value: SystemValue) -> Result<SystemValue, ModelError> {
        match value {
            SystemValue::Node(node) => match self.adapter.convert_to_system(&node)? {
                Some(system) => Ok(system),
                None => Ok(SystemValue::Node(node)),
            },
            other => Ok(other),
        }
    }

    fn narrow_item_type(&mut self, spec: TypeSpec, first: bool) {
        self.item_type = if first {
            Some(spec)
        } else {
            self.item_type
                .take()
                .and_then(|current| current.common_base(&spec))
        };
    }

    /// Append a value unconditionally.
    pub fn add(&mut self, value: SystemValue) -> Result<(), ModelError> {
        let value = self.converted(value)?;
        let spec = value.type_spec();
        let first = self.items.is_empty();
        self.items.push(value);
        self.narrow_item_type(spec, first);
        Ok(())
    }

    /// Append only when no existing item equals the value; reports
    /// whether it was added.
    pub fn add_unique(&mut self, value: SystemValue) -> Result<bool, ModelError> {
        let value = self.converted(value)?;
        if self.items.iter().any(|item| self.items_equal(item, &value)) {
            return Ok(false);
        }
        let spec = value.type_spec();
        let first = self.items.is_empty();
        self.items.push(value);
        self.narrow_item_type(spec, first);
        Ok(true)
    }

    /// Append every item of `other`, preserving order.
    pub fn add_all(&mut self, other: &Collection) -> Result<(), ModelError> {
        for item in other.iter() {
            self.add(item.clone())?;
        }
        Ok(())
    }

    /// Append items of `other` that are not already present, preserving
    /// order.
    pub fn add_all_unique(&mut self, other: &Collection) -> Result<(), ModelError> {
        for item in other.iter() {
            self.add_unique(item.clone())?;
        }
        Ok(())
    }

    /// Linear scan with equality only.
    pub fn contains(&self, value: &SystemValue) -> bool {
        self.items.iter().any(|item| self.items_equal(item, value))
    }

    /// System equality, except foreign node pairs which compare by the
    /// model's rules.
    fn items_equal(&self, left: &SystemValue, right: &SystemValue) -> bool {
        match (left, right) {
            (SystemValue::Node(l), SystemValue::Node(r)) => self.adapter.equal(l, r),
            _ => left.equal(right),
        }
    }

    fn items_equivalent(&self, left: &SystemValue, right: &SystemValue) -> bool {
        match (left, right) {
            (SystemValue::Node(l), SystemValue::Node(r)) => self.adapter.equivalent(l, r),
            _ => left.equivalent(right),
        }
    }

    /// Order-sensitive equality: same count, pairwise equal.
    pub fn equal(&self, other: &Collection) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(l, r)| self.items_equal(l, r))
    }

    /// Order-sensitive equivalence: same count, pairwise equivalent.
    pub fn equivalent(&self, other: &Collection) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(l, r)| self.items_equivalent(l, r))
    }
}

impl Default for Collection {
    /// Empty collection bound to the JSON adapter
    fn default() -> Self {
        Self::new(std::sync::Arc::new(crate::adapter::JsonModelAdapter::new()))
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("items", &self.items)
            .field("item_type", &self.item_type)
            .finish()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a SystemValue;
    type IntoIter = std::slice::Iter<'a, SystemValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::JsonModelAdapter;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn empty() -> Collection {
        Collection::new(Arc::new(JsonModelAdapter::new()))
    }

    fn of_integers(values: &[i32]) -> Collection {
        let mut collection = empty();
        for &v in values {
            collection.add(SystemValue::Integer(v)).unwrap();
        }
        collection
    }

    #[test]
    fn test_empty_collection_has_undefined_item_type() {
        let collection = empty();
        assert!(collection.is_empty());
        assert!(collection.item_type_spec().is_none());
    }

    #[test]
    fn test_add_appends_in_order() {
        let collection = of_integers(&[10, 12, 11]);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.get(1), Some(&SystemValue::Integer(12)));
    }

    #[test]
    fn test_add_unique_skips_duplicates() {
        let mut collection = empty();
        assert!(collection.add_unique(SystemValue::Integer(10)).unwrap());
        assert!(collection.add_unique(SystemValue::Integer(12)).unwrap());
        assert!(collection.add_unique(SystemValue::Integer(11)).unwrap());
        assert!(!collection.add_unique(SystemValue::Integer(10)).unwrap());
        assert_eq!(collection.len(), 3);
        assert_eq!(
            collection.items(),
            &[
                SystemValue::Integer(10),
                SystemValue::Integer(12),
                SystemValue::Integer(11),
            ]
        );
    }

    #[test]
    fn test_item_type_narrows_to_common_base() {
        let mut collection = empty();
        collection.add(SystemValue::Integer(1)).unwrap();
        assert_eq!(
            collection.item_type_spec().unwrap().qualified_name(),
            "System.Integer"
        );
        collection
            .add(SystemValue::Decimal("1.5".parse().unwrap()))
            .unwrap();
        assert_eq!(
            collection.item_type_spec().unwrap().qualified_name(),
            "System.Any"
        );
    }

    #[test]
    fn test_foreign_scalars_convert_on_entry() {
        let adapter = JsonModelAdapter::new();
        let mut collection = Collection::new(Arc::new(adapter));
        let node = adapter.node_for(json!(42));
        collection.add(SystemValue::Node(node)).unwrap();
        assert_eq!(collection.get(0), Some(&SystemValue::Integer(42)));
        assert_eq!(
            collection.item_type_spec().unwrap().qualified_name(),
            "System.Integer"
        );
    }

    #[test]
    fn test_foreign_composites_stay_nodes_and_use_adapter_equality() {
        let adapter = JsonModelAdapter::new();
        let mut collection = Collection::new(Arc::new(adapter));
        let first = adapter.node_for(json!({"code": "a"}));
        let duplicate = adapter.node_for(json!({"code": "a"}));
        let other = adapter.node_for(json!({"code": "b"}));

        assert!(collection.add_unique(SystemValue::Node(first)).unwrap());
        assert!(!collection.add_unique(SystemValue::Node(duplicate)).unwrap());
        assert!(collection.add_unique(SystemValue::Node(other)).unwrap());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_contains_is_equal_only() {
        let collection = of_integers(&[1, 2, 3]);
        assert!(collection.contains(&SystemValue::Integer(2)));
        assert!(!collection.contains(&SystemValue::Integer(4)));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = of_integers(&[1, 2]);
        let b = of_integers(&[2, 1]);
        let c = of_integers(&[1, 2]);
        assert!(a.equal(&c));
        assert!(!a.equal(&b));
        assert!(!a.equal(&of_integers(&[1, 2, 3])));
    }

    #[test]
    fn test_equivalence_pairwise() {
        let mut a = empty();
        a.add(SystemValue::String("Hello World".to_string())).unwrap();
        let mut b = empty();
        b.add(SystemValue::String("  hello   world ".to_string()))
            .unwrap();
        assert!(a.equivalent(&b));
        assert!(!a.equal(&b));
    }

    #[test]
    fn test_add_all_preserves_order() {
        let mut target = of_integers(&[1]);
        target.add_all(&of_integers(&[2, 3])).unwrap();
        assert_eq!(
            target.items(),
            &[
                SystemValue::Integer(1),
                SystemValue::Integer(2),
                SystemValue::Integer(3),
            ]
        );
    }

    #[test]
    fn test_add_all_unique_merges_without_duplicates() {
        let mut target = of_integers(&[10, 12]);
        target.add_all_unique(&of_integers(&[12, 11, 10])).unwrap();
        assert_eq!(
            target.items(),
            &[
                SystemValue::Integer(10),
                SystemValue::Integer(12),
                SystemValue::Integer(11),
            ]
        );
    }

    #[test]
    fn test_display_braces() {
        assert_eq!(empty().to_string(), "{}");
        assert_eq!(of_integers(&[10, 12]).to_string(), "{10, 12}");
    }
}
