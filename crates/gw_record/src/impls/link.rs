use crate::record::{FieldType, Link, Schematic, ShapeError, Value, ValueShape};
use crate::schema::FieldKind;

// -----------------------------------------------------------------------------
// Link

impl<T: Schematic> FieldType for Link<T> {
    #[inline]
    fn kind() -> FieldKind {
        FieldKind::Record(<T as Schematic>::schema)
    }

    /// Aliases the record: the returned value shares identity with `self`.
    fn to_value(&self) -> Value {
        Value::Link(self.handle())
    }

    fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Link(handle) => {
                handle
                    .downcast::<T>()
                    .ok_or_else(|| ShapeError::RecordType {
                        expected: T::schema().name(),
                        found: handle.schema().name(),
                    })
            }
            other => Err(ShapeError::shape(ValueShape::Record, other.shape())),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::derive::Record;
    use crate::record::{FieldType, Link, ShapeError, Value};
    use crate::schema::FieldKind;

    #[derive(Record, Default)]
    struct Left {
        value: i64,
    }

    #[derive(Record, Default)]
    struct Right {
        value: i64,
    }

    #[test]
    fn kind_points_at_the_target_schema() {
        let FieldKind::Record(schema) = Link::<Left>::kind() else {
            panic!("expected a record kind");
        };
        assert_eq!(schema().name(), "Left");
    }

    #[test]
    fn round_trip_keeps_identity() {
        let link = Link::new(Left { value: 3 });
        let back = Link::<Left>::from_value(link.to_value()).unwrap();
        assert!(Link::ptr_eq(&link, &back));
    }

    #[test]
    fn wrong_record_type_is_reported() {
        let link = Link::new(Right { value: 3 });
        let err = Link::<Left>::from_value(link.to_value()).unwrap_err();
        assert_eq!(
            err,
            ShapeError::RecordType {
                expected: "Left",
                found: "Right",
            }
        );
        assert!(matches!(
            Link::<Left>::from_value(Value::Int(1)),
            Err(ShapeError::Shape { .. })
        ));
    }
}
