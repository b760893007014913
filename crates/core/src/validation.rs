//! Schema validation adapter and built-in schemas

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use courier_domain::{Issue, RequestError, Result, ValidationOutcome};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::ports::Schema;

/// Run `value` through `schema`.
///
/// Returns the schema's output, which may differ from the input. A rejected
/// value becomes a [`RequestError::Validation`] carrying the schema's issues;
/// errors raised by the schema itself pass through untouched.
pub async fn validate(schema: &dyn Schema, value: Value) -> Result<Value> {
    match schema.validate(value).await? {
        ValidationOutcome::Success { value } => Ok(value),
        ValidationOutcome::Failure { issues } => Err(RequestError::validation_failed(issues)),
    }
}

/// Schema backed by a synchronous closure.
pub struct FnSchema<F> {
    validator: F,
}

impl<F> FnSchema<F>
where
    F: Fn(Value) -> ValidationOutcome + Send + Sync,
{
    pub fn new(validator: F) -> Self {
        Self { validator }
    }
}

impl<F> fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSchema")
    }
}

#[async_trait]
impl<F> Schema for FnSchema<F>
where
    F: Fn(Value) -> ValidationOutcome + Send + Sync,
{
    async fn validate(&self, value: Value) -> Result<ValidationOutcome> {
        Ok((self.validator)(value))
    }
}

/// Schema that checks a value deserializes into `T`.
///
/// The output is `T` serialized back, so serde defaults are filled in and
/// unknown fields are dropped.
pub struct TypedSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedSchema<{}>", std::any::type_name::<T>())
    }
}

#[async_trait]
impl<T> Schema for TypedSchema<T>
where
    T: DeserializeOwned + Serialize + 'static,
{
    async fn validate(&self, value: Value) -> Result<ValidationOutcome> {
        Ok(coerce::<T>(value))
    }
}

fn coerce<T>(value: Value) -> ValidationOutcome
where
    T: DeserializeOwned + Serialize,
{
    let typed: T = match serde_json::from_value(value) {
        Ok(typed) => typed,
        Err(err) => return ValidationOutcome::failure(vec![Issue::new(err.to_string())]),
    };
    match serde_json::to_value(&typed) {
        Ok(value) => ValidationOutcome::success(value),
        Err(err) => ValidationOutcome::failure(vec![Issue::new(err.to_string())]),
    }
}

/// Adapter for validators that report raw `{"value": ..}` / `{"issues": [..]}`
/// results.
///
/// Any other shape is reported as an unknown validation error.
pub struct StandardSchema<F> {
    validator: F,
}

impl<F> StandardSchema<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    pub fn new(validator: F) -> Self {
        Self { validator }
    }
}

impl<F> fmt::Debug for StandardSchema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StandardSchema")
    }
}

#[async_trait]
impl<F> Schema for StandardSchema<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    async fn validate(&self, value: Value) -> Result<ValidationOutcome> {
        let raw = (self.validator)(value);
        ValidationOutcome::from_standard(&raw).ok_or_else(RequestError::unknown_validation)
    }
}
