//! Many query-state fields bound to a single query string.

use log::{debug, error};
use rez_core::RezError;
use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::codec::QsField;
use crate::host::QueryHost;
use crate::query::{build_query, parse_query};

trait ErasedField {
    fn key(&self) -> &str;
    fn hydrate_any(&self, raw: Option<&str>) -> Box<dyn Any>;
    fn dehydrate_any(&self, value: &dyn Any) -> Option<String>;
}

impl<T: Clone + PartialEq + 'static> ErasedField for QsField<T> {
    fn key(&self) -> &str {
        QsField::key(self)
    }

    fn hydrate_any(&self, raw: Option<&str>) -> Box<dyn Any> {
        Box::new(self.hydrate(raw))
    }

    fn dehydrate_any(&self, value: &dyn Any) -> Option<String> {
        value.downcast_ref::<T>().and_then(|v| self.dehydrate(v))
    }
}

struct Slot {
    field: Rc<dyn ErasedField>,
    /// Raw parameter the value was last hydrated from or dehydrated to.
    raw: Option<String>,
    value: Box<dyn Any>,
}

/// Typed handle to a field registered with a [`QueryStateStore`].
pub struct QsKey<T> {
    index: usize,
    field: Rc<QsField<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for QsKey<T> {
    fn clone(&self) -> Self {
        QsKey {
            index: self.index,
            field: Rc::clone(&self.field),
            _marker: PhantomData,
        }
    }
}

impl<T> QsKey<T> {
    /// The URL parameter this key is bound to.
    pub fn name(&self) -> &str {
        self.field.key()
    }
}

/// Ordered set of fields bound to one query string.
///
/// `set` is the only mutation path: it stores the value and republishes the
/// whole string. External edits to the string (navigation) are picked up by
/// `sync`, which re-hydrates the fields whose parameter changed. Parameters
/// no field owns are kept and written after the owned ones.
pub struct QueryStateStore {
    host: Box<dyn QueryHost>,
    slots: Vec<Slot>,
    foreign: Vec<(String, String)>,
}

impl QueryStateStore {
    pub fn new(host: impl QueryHost + 'static) -> Self {
        let mut store = QueryStateStore {
            host: Box::new(host),
            slots: Vec::new(),
            foreign: Vec::new(),
        };
        store.foreign = parse_query(&store.host.current());
        store
    }

    /// Register a field and hydrate it from the current string. Keys must
    /// be unique within a store.
    pub fn register<T: Clone + PartialEq + 'static>(
        &mut self,
        field: QsField<T>,
    ) -> rez_core::Result<QsKey<T>> {
        if self.slots.iter().any(|s| s.field.key() == field.key()) {
            return Err(RezError::validation(field.key(), "key already registered"));
        }
        let raw = self.raw_param(field.key());
        let value = field.hydrate(raw.as_deref());
        let field = Rc::new(field);
        let erased: Rc<dyn ErasedField> = field.clone();
        self.foreign.retain(|(k, _)| k != field.key());
        self.slots.push(Slot {
            field: erased,
            raw,
            value: Box::new(value),
        });
        Ok(QsKey {
            index: self.slots.len() - 1,
            field,
            _marker: PhantomData,
        })
    }

    /// Current value of the field.
    pub fn get<T: Clone + PartialEq + 'static>(&self, key: &QsKey<T>) -> T {
        let value = self
            .slots
            .get(key.index)
            .and_then(|s| s.value.downcast_ref::<T>());
        match value {
            Some(v) => v.clone(),
            None => {
                error!("Query state key {} does not belong to this store", key.field.key());
                key.field.default_value().clone()
            }
        }
    }

    /// Store `value` and republish the query string.
    pub fn set<T: Clone + PartialEq + 'static>(&mut self, key: &QsKey<T>, value: T) {
        let Some(slot) = self.slots.get_mut(key.index) else {
            error!("Query state key {} does not belong to this store", key.field.key());
            return;
        };
        slot.raw = key.field.dehydrate(&value);
        slot.value = Box::new(value);
        self.publish();
    }

    /// Hydrate one field again from the host's string, for fields whose
    /// validator reads state that changed after the last `sync`. The
    /// string is republished only when the new value no longer matches
    /// its parameter.
    pub fn rehydrate<T: Clone + PartialEq + 'static>(&mut self, key: &QsKey<T>) -> T {
        let raw = self.raw_param(key.name());
        let value = key.field.hydrate(raw.as_deref());
        let dehydrated = key.field.dehydrate(&value);
        let Some(slot) = self.slots.get_mut(key.index) else {
            error!("Query state key {} does not belong to this store", key.field.key());
            return value;
        };
        slot.value = Box::new(value.clone());
        slot.raw = dehydrated.clone();
        if dehydrated != raw {
            debug!("Query parameter {} no longer valid, republishing", key.name());
            self.publish();
        }
        value
    }

    /// Re-read the host's string after an external change. Returns the keys
    /// whose parameter changed.
    pub fn sync(&mut self) -> Vec<String> {
        let pairs = parse_query(&self.host.current());
        let mut changed = Vec::new();
        for slot in self.slots.iter_mut() {
            let raw = pairs
                .iter()
                .find(|(k, _)| k == slot.field.key())
                .map(|(_, v)| v.clone());
            if raw != slot.raw {
                debug!("Query parameter {} changed, re-hydrating", slot.field.key());
                slot.value = slot.field.hydrate_any(raw.as_deref());
                slot.raw = raw;
                changed.push(slot.field.key().to_string());
            }
        }
        self.foreign = pairs
            .into_iter()
            .filter(|(k, _)| !self.slots.iter().any(|s| s.field.key() == k))
            .collect();
        changed
    }

    /// The query string as the fields currently describe it.
    pub fn query(&self) -> String {
        let owned = self.slots.iter().filter_map(|s| {
            let raw = s.field.dehydrate_any(s.value.as_ref())?;
            Some((s.field.key(), raw))
        });
        let owned: Vec<(&str, String)> = owned.collect();
        build_query(
            owned
                .iter()
                .map(|(k, v)| (*k, v.as_str()))
                .chain(self.foreign.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
        )
    }

    fn publish(&mut self) {
        let query = self.query();
        self.host.publish(&query);
    }

    fn raw_param(&self, key: &str) -> Option<String> {
        parse_query(&self.host.current())
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SharedQuery;
    use rez_core::filter::RangeValue;

    #[test]
    fn test_set_publishes_all_fields() {
        let url = SharedQuery::new("?areaId=KEN");
        let mut store = QueryStateStore::new(url.clone());
        let area = store.register(QsField::string("areaId")).unwrap();
        let score = store
            .register(QsField::range("maxZoneScore", None))
            .unwrap();
        assert_eq!(store.get(&area), Some("KEN".to_string()));
        assert_eq!(store.get(&score), None);

        store.set(&score, Some(RangeValue::new(0.5, 1.0)));
        assert_eq!(url.get(), "areaId=KEN&maxZoneScore=0.5,1");

        store.set(&area, None);
        assert_eq!(url.get(), "maxZoneScore=0.5,1");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut store = QueryStateStore::new(SharedQuery::default());
        store.register(QsField::string("areaId")).unwrap();
        assert!(store.register(QsField::string("areaId")).is_err());
    }

    #[test]
    fn test_navigation_rehydrates_changed_fields() {
        let url = SharedQuery::new("areaId=KEN&maxZoneScore=0.2,0.4");
        let mut store = QueryStateStore::new(url.clone());
        let area = store.register(QsField::string("areaId")).unwrap();
        let score = store.register(QsField::range("maxZoneScore", None)).unwrap();

        url.navigate("?areaId=ZMB&maxZoneScore=0.2,0.4");
        assert_eq!(store.sync(), vec!["areaId".to_string()]);
        assert_eq!(store.get(&area), Some("ZMB".to_string()));
        assert_eq!(store.get(&score), Some(RangeValue::new(0.2, 0.4)));

        // unchanged string: nothing to re-hydrate, same values
        assert!(store.sync().is_empty());
        assert_eq!(store.get(&area), Some("ZMB".to_string()));
    }

    #[test]
    fn test_rehydrate_after_validator_state_changes() {
        use crate::codec::Validator;
        use std::cell::RefCell;

        let allowed = Rc::new(RefCell::new(vec!["Solar"]));
        let check = Rc::clone(&allowed);
        let url = SharedQuery::new("resourceId=Wind");
        let mut store = QueryStateStore::new(url.clone());
        let resource = store
            .register(QsField::string("resourceId").with_validator(Validator::predicate(
                move |v: &Option<String>| v.as_deref().is_some_and(|v| check.borrow().contains(&v)),
            )))
            .unwrap();
        assert_eq!(store.get(&resource), None);

        // sync alone does not revisit an unchanged parameter
        allowed.borrow_mut().push("Wind");
        assert!(store.sync().is_empty());
        assert_eq!(store.get(&resource), None);

        assert_eq!(store.rehydrate(&resource), Some("Wind".to_string()));
        assert_eq!(store.get(&resource), Some("Wind".to_string()));
        assert_eq!(url.get(), "resourceId=Wind");

        allowed.borrow_mut().clear();
        assert_eq!(store.rehydrate(&resource), None);
        assert_eq!(url.get(), "");
    }

    #[test]
    fn test_foreign_params_preserved() {
        let url = SharedQuery::new("utm=abc&areaId=KEN");
        let mut store = QueryStateStore::new(url.clone());
        let area = store.register(QsField::string("areaId")).unwrap();
        store.set(&area, Some("ZMB".to_string()));
        assert_eq!(url.get(), "areaId=ZMB&utm=abc");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let url = SharedQuery::default();
        let mut store = QueryStateStore::new(url.clone());
        let resource = store.register(QsField::string("resourceId")).unwrap();
        store.set(&resource, Some("Solar PV".to_string()));
        assert_eq!(url.get(), "resourceId=Solar%20PV");
        url.navigate("resourceId=Off-Shore%20Wind");
        store.sync();
        assert_eq!(store.get(&resource), Some("Off-Shore Wind".to_string()));
    }

    #[test]
    fn test_published_string_is_pure_function_of_values() {
        let a = SharedQuery::default();
        let b = SharedQuery::default();
        let mut first = QueryStateStore::new(a.clone());
        let mut second = QueryStateStore::new(b.clone());
        let k1 = first.register(QsField::range("r", None)).unwrap();
        let k2 = second.register(QsField::range("r", None)).unwrap();
        first.set(&k1, Some(RangeValue::new(1.0, 3.0)));
        first.set(&k1, Some(RangeValue::new(1.0, 2.0)));
        second.set(&k2, Some(RangeValue::new(1.0, 2.0)));
        assert_eq!(a.get(), b.get());
    }
}
