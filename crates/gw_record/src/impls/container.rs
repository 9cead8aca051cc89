use std::collections::BTreeMap;

use crate::record::{FieldType, ShapeError, Value, ValueShape};
use crate::schema::FieldKind;

// -----------------------------------------------------------------------------
// Option

impl<T: FieldType> FieldType for Option<T> {
    #[inline]
    fn kind() -> FieldKind {
        FieldKind::Optional(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// -----------------------------------------------------------------------------
// Vec

impl<T: FieldType> FieldType for Vec<T> {
    #[inline]
    fn kind() -> FieldKind {
        FieldKind::List(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ShapeError::shape(ValueShape::List, other.shape())),
        }
    }
}

// -----------------------------------------------------------------------------
// BTreeMap

impl<T: FieldType> FieldType for BTreeMap<String, T> {
    #[inline]
    fn kind() -> FieldKind {
        FieldKind::Map(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, inner)| (key.clone(), inner.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Map(pairs) => pairs
                .into_iter()
                .map(|(key, inner)| Ok((key, T::from_value(inner)?)))
                .collect(),
            other => Err(ShapeError::shape(ValueShape::Map, other.shape())),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::record::{FieldType, Value};

    #[test]
    fn option_round_trips_null() {
        assert!(matches!(None::<i32>.to_value(), Value::Null));
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::Int(4)), Ok(Some(4)));
    }

    #[test]
    fn vec_preserves_positions() {
        let value = vec![10_i32, 20, 30].to_value();
        assert_eq!(Vec::<i32>::from_value(value), Ok(vec![10, 20, 30]));
    }

    #[test]
    fn map_round_trips_sorted_keys() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2_u32);
        map.insert("a".to_string(), 1);

        let Value::Map(pairs) = map.to_value() else {
            panic!("expected a map value");
        };
        // BTreeMap iteration is sorted, so encoding is deterministic.
        assert_eq!(pairs[0].0, "a");

        let back = BTreeMap::<String, u32>::from_value(Value::Map(pairs)).unwrap();
        assert_eq!(back, map);
    }
}
