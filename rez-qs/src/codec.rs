//! Per-field codecs between a typed value and one URL query parameter.

use log::warn;
use rez_core::filter::RangeValue;
use rez_core::RezError;
use std::fmt::Display;
use std::str::FromStr;

use crate::query::parse_query;

type Hydrator<T> = Box<dyn Fn(Option<&str>) -> Option<T>>;
type Dehydrator<T> = Box<dyn Fn(&T) -> Option<String>>;

/// Restricts which hydrated values a field accepts.
pub enum Validator<T> {
    /// The value must be one of these.
    OneOf(Vec<T>),
    /// The value must satisfy this predicate.
    Predicate(Box<dyn Fn(&T) -> bool>),
}

impl<T: PartialEq> Validator<T> {
    pub fn predicate(f: impl Fn(&T) -> bool + 'static) -> Self {
        Validator::Predicate(Box::new(f))
    }

    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Validator::OneOf(allowed) => allowed.contains(value),
            Validator::Predicate(f) => f(value),
        }
    }
}

/// A typed value bound to the query parameter `key`.
///
/// Hydration never fails: a missing parameter, a malformed one, or one the
/// validator rejects all produce the default. [`QsField::try_hydrate`]
/// reports the rejection instead.
pub struct QsField<T> {
    key: String,
    default: T,
    hydrator: Hydrator<T>,
    dehydrator: Dehydrator<T>,
    validator: Option<Validator<T>>,
}

impl<T> QsField<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: Clone + PartialEq + 'static> QsField<T> {
    /// `hydrator` receives the raw parameter (or `None` when absent) and
    /// returns `None` if it cannot make sense of it. `dehydrator` returns
    /// `None` to leave the parameter out of the URL.
    pub fn new(
        key: &str,
        default: T,
        hydrator: impl Fn(Option<&str>) -> Option<T> + 'static,
        dehydrator: impl Fn(&T) -> Option<String> + 'static,
    ) -> Self {
        QsField {
            key: key.to_string(),
            default,
            hydrator: Box::new(hydrator),
            dehydrator: Box::new(dehydrator),
            validator: None,
        }
    }

    pub fn with_validator(mut self, validator: Validator<T>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Hydrate `raw`, or say why it was rejected. The validator only
    /// applies to parameters that are present.
    pub fn try_hydrate(&self, raw: Option<&str>) -> rez_core::Result<T> {
        let Some(value) = (self.hydrator)(raw) else {
            return match raw {
                None => Ok(self.default.clone()),
                Some(r) => Err(RezError::validation(&self.key, format!("malformed value '{r}'"))),
            };
        };
        if raw.is_some() {
            if let Some(validator) = &self.validator {
                if !validator.accepts(&value) {
                    return Err(RezError::validation(
                        &self.key,
                        format!("'{}' is not an allowed value", raw.unwrap_or_default()),
                    ));
                }
            }
        }
        Ok(value)
    }

    pub fn hydrate(&self, raw: Option<&str>) -> T {
        self.try_hydrate(raw).unwrap_or_else(|e| {
            warn!("{e}, falling back to default");
            self.default.clone()
        })
    }

    pub fn dehydrate(&self, value: &T) -> Option<String> {
        (self.dehydrator)(value)
    }

    /// Hydrate this field from a whole query string.
    pub fn read_from(&self, query: &str) -> T {
        let raw = parse_query(query)
            .into_iter()
            .find(|(k, _)| *k == self.key)
            .map(|(_, v)| v);
        self.hydrate(raw.as_deref())
    }
}

impl QsField<Option<String>> {
    /// Plain identifier. An empty parameter counts as absent.
    pub fn string(key: &str) -> Self {
        QsField::new(
            key,
            None,
            |raw| Some(raw.filter(|s| !s.is_empty()).map(str::to_string)),
            |v| v.clone(),
        )
    }
}

impl QsField<Option<RangeValue>> {
    /// Numeric range written as `min,max`.
    pub fn range(key: &str, default: Option<RangeValue>) -> Self {
        QsField::new(
            key,
            default,
            move |raw| match raw {
                None => Some(default),
                Some(s) => RangeValue::parse(s).map(Some),
            },
            |v| v.map(|r| r.to_string()),
        )
    }
}

impl QsField<f64> {
    /// Number that is left out of the URL while it equals its default.
    pub fn number(key: &str, default: f64) -> Self {
        QsField::new(
            key,
            default,
            move |raw| match raw {
                None => Some(default),
                Some(s) => s.parse::<f64>().ok().filter(|v| v.is_finite()),
            },
            move |v| (*v != default).then(|| v.to_string()),
        )
    }
}

/// Optional value of any type with a `FromStr`/`Display` pair, such as a
/// resource or zone type.
pub fn parsed<T>(key: &str) -> QsField<Option<T>>
where
    T: FromStr + Display + Clone + PartialEq + 'static,
{
    QsField::new(
        key,
        None,
        |raw| match raw {
            None | Some("") => Some(None),
            Some(s) => s.parse::<T>().ok().map(Some),
        },
        |v: &Option<T>| v.as_ref().map(|x| x.to_string()),
    )
}
