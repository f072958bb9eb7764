//! Contract compliance tests for core_types
//!
//! These tests pin the public surface other components build against.

use core_types::{ErrorKind, NativeFunction, ObjectLike, PlainObject, ScriptError, Value};
use std::rc::Rc;

mod value_contract_tests {
    use super::*;

    /// Contract: Value must expose all payload variants.
    #[test]
    fn test_value_has_all_variants() {
        let _: Value = Value::Undefined;
        let _: Value = Value::Null;
        let _: Value = Value::Boolean(true);
        let _: Value = Value::Smi(0);
        let _: Value = Value::Double(0.0);
        let _: Value = Value::String(String::new());
        let _: Value = Value::List(Vec::new());
        let _: Value = Value::Function(NativeFunction::new(|_| Ok(Value::Undefined)));
        let _: Value = Value::Object(PlainObject::new());
        let _: Value = Value::Error(ScriptError::internal("contract"));
    }

    #[test]
    fn test_value_is_cloneable_and_comparable() {
        let value = Value::Smi(1);
        let copy = value.clone();
        assert_eq!(value, copy);
    }

    #[test]
    fn test_type_of_returns_static_str() {
        let _: &'static str = Value::Undefined.type_of();
    }
}

mod object_contract_tests {
    use super::*;

    #[test]
    fn test_object_like_get_returns_result_of_value() {
        let object: Rc<dyn ObjectLike> = PlainObject::new();
        let read: Result<Value, ScriptError> = object.get("key");
        assert_eq!(read, Ok(Value::Undefined));
    }

    #[test]
    fn test_plain_object_set_takes_key_and_value() {
        let object = PlainObject::new();
        object.set("key".to_string(), Value::Null);
        object.set("other", Value::Null);
    }
}

mod function_contract_tests {
    use super::*;

    #[test]
    fn test_call_takes_args_and_returns_result() {
        let func = NativeFunction::new(|_| Ok(Value::Undefined));
        let outcome: Result<Value, ScriptError> = func.call(Vec::new());
        assert!(outcome.is_ok());
    }
}

mod error_contract_tests {
    use super::*;

    #[test]
    fn test_error_fields_are_public() {
        let error = ScriptError::type_error("contract");
        let _kind: ErrorKind = error.kind;
        let _message: String = error.message;
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ScriptError::type_error("contract");
        let _: &dyn std::error::Error = &error;
    }
}
