use crate::record::{FieldType, ShapeError, Value, ValueShape};
use crate::schema::{FieldKind, ScalarKind};

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_field_type_signed {
    ($($ty:ty),*) => {
        $(impl FieldType for $ty {
            #[inline]
            fn kind() -> FieldKind {
                FieldKind::Scalar(ScalarKind::Int)
            }

            #[inline]
            fn to_value(&self) -> Value {
                Value::Int(*self as i64)
            }

            fn from_value(value: Value) -> Result<Self, ShapeError> {
                match value {
                    Value::Int(int) => <$ty>::try_from(int).map_err(|_| ShapeError::OutOfRange {
                        value: int.to_string(),
                        target: stringify!($ty),
                    }),
                    Value::UInt(uint) => <$ty>::try_from(uint).map_err(|_| ShapeError::OutOfRange {
                        value: uint.to_string(),
                        target: stringify!($ty),
                    }),
                    Value::Float(float) => Err(ShapeError::OutOfRange {
                        value: float.to_string(),
                        target: stringify!($ty),
                    }),
                    other => Err(ShapeError::shape(ValueShape::Number, other.shape())),
                }
            }
        })*
    };
}

macro_rules! impl_field_type_unsigned {
    ($($ty:ty),*) => {
        $(impl FieldType for $ty {
            #[inline]
            fn kind() -> FieldKind {
                FieldKind::Scalar(ScalarKind::UInt)
            }

            #[inline]
            fn to_value(&self) -> Value {
                Value::UInt(*self as u64)
            }

            fn from_value(value: Value) -> Result<Self, ShapeError> {
                match value {
                    Value::Int(int) => <$ty>::try_from(int).map_err(|_| ShapeError::OutOfRange {
                        value: int.to_string(),
                        target: stringify!($ty),
                    }),
                    Value::UInt(uint) => <$ty>::try_from(uint).map_err(|_| ShapeError::OutOfRange {
                        value: uint.to_string(),
                        target: stringify!($ty),
                    }),
                    Value::Float(float) => Err(ShapeError::OutOfRange {
                        value: float.to_string(),
                        target: stringify!($ty),
                    }),
                    other => Err(ShapeError::shape(ValueShape::Number, other.shape())),
                }
            }
        })*
    };
}

impl_field_type_signed!(i8, i16, i32, i64, isize);
impl_field_type_unsigned!(u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_field_type_float {
    ($($ty:ty),*) => {
        $(impl FieldType for $ty {
            #[inline]
            fn kind() -> FieldKind {
                FieldKind::Scalar(ScalarKind::Float)
            }

            #[inline]
            fn to_value(&self) -> Value {
                Value::Float(*self as f64)
            }

            fn from_value(value: Value) -> Result<Self, ShapeError> {
                match value {
                    Value::Float(float) => Ok(float as $ty),
                    // Integer literals are valid floating point input.
                    Value::Int(int) => Ok(int as $ty),
                    Value::UInt(uint) => Ok(uint as $ty),
                    other => Err(ShapeError::shape(ValueShape::Number, other.shape())),
                }
            }
        })*
    };
}

impl_field_type_float!(f32, f64);

// -----------------------------------------------------------------------------
// bool / char / String

impl FieldType for bool {
    #[inline]
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Bool)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Bool(flag) => Ok(flag),
            other => Err(ShapeError::shape(ValueShape::Bool, other.shape())),
        }
    }
}

impl FieldType for char {
    #[inline]
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Char)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }

    fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Str(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(only), None) => Ok(only),
                    _ => Err(ShapeError::OutOfRange {
                        value: format!("{text:?}"),
                        target: "char",
                    }),
                }
            }
            other => Err(ShapeError::shape(ValueShape::String, other.shape())),
        }
    }
}

impl FieldType for String {
    #[inline]
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Str)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Str(text) => Ok(text),
            other => Err(ShapeError::shape(ValueShape::String, other.shape())),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::record::{FieldType, ShapeError, Value, ValueShape};

    #[test]
    fn integer_ranges_are_checked() {
        assert_eq!(u8::from_value(Value::Int(200)), Ok(200));
        assert!(matches!(
            u8::from_value(Value::Int(300)),
            Err(ShapeError::OutOfRange { target: "u8", .. })
        ));
        assert!(matches!(
            u32::from_value(Value::Int(-1)),
            Err(ShapeError::OutOfRange { .. })
        ));
        assert_eq!(i64::from_value(Value::UInt(7)), Ok(7));
    }

    #[test]
    fn floats_accept_integer_literals() {
        assert_eq!(f64::from_value(Value::Int(3)), Ok(3.0));
        assert_eq!(f32::from_value(Value::Float(0.5)), Ok(0.5));
        assert!(matches!(
            i32::from_value(Value::Float(1.5)),
            Err(ShapeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn char_requires_exactly_one_character() {
        assert_eq!(char::from_value(Value::Str("x".into())), Ok('x'));
        assert!(char::from_value(Value::Str("xy".into())).is_err());
        assert!(char::from_value(Value::Str(String::new())).is_err());
    }

    #[test]
    fn shape_mismatches_name_both_sides() {
        let err = String::from_value(Value::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ShapeError::shape(ValueShape::String, ValueShape::Bool)
        );
    }
}
