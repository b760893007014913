//! Outcome callbacks and their dispatcher
//!
//! A callback either returns a replacement value, returns `None` to keep the
//! value it was given, or fails. Validated callbacks additionally run their
//! result through a schema; a rejected result is terminal and is never routed
//! to another callback.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use courier_domain::constants::CALLBACK_VALIDATION_PREFIX;
use courier_domain::{HttpErrorBody, RequestError, Result};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::ports::Schema;
use crate::validation;

/// Async callback body. `Ok(None)` keeps the input as the outcome.
pub type Handler<I> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<Option<Value>>> + Send + Sync>;

/// Values a callback slot can receive.
pub trait CallbackInput: Clone + Send + 'static {
    /// The value used when no callback replaces it.
    fn into_value(self) -> Value;
}

impl CallbackInput for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl CallbackInput for RequestError {
    fn into_value(self) -> Value {
        RequestError::into_value(self)
    }
}

impl CallbackInput for HttpErrorBody {
    fn into_value(self) -> Value {
        HttpErrorBody::into_value(self)
    }
}

/// A single callback slot.
pub enum Callback<I> {
    Plain(Handler<I>),
    Validated { schema: Arc<dyn Schema>, handler: Handler<I> },
}

impl<I: CallbackInput> Callback<I> {
    /// Callback from an async closure.
    pub fn plain<F, Fut>(handler: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>>> + Send + 'static,
    {
        Self::Plain(boxed(handler))
    }

    /// Callback from a synchronous closure that cannot fail.
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(I) -> Option<Value> + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(move |input| {
            future::ready(Ok::<_, RequestError>(handler(input))).boxed()
        }))
    }

    /// Callback whose result must satisfy `schema`.
    pub fn validated<S, F, Fut>(schema: S, handler: F) -> Self
    where
        S: Schema + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>>> + Send + 'static,
    {
        Self::Validated { schema: Arc::new(schema), handler: boxed(handler) }
    }
}

fn boxed<I, F, Fut>(handler: F) -> Handler<I>
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Value>>> + Send + 'static,
{
    Arc::new(move |input| handler(input).boxed())
}

impl<I> Clone for Callback<I> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(handler) => Self::Plain(Arc::clone(handler)),
            Self::Validated { schema, handler } => {
                Self::Validated { schema: Arc::clone(schema), handler: Arc::clone(handler) }
            }
        }
    }
}

impl<I> fmt::Debug for Callback<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Callback::Plain"),
            Self::Validated { .. } => f.write_str("Callback::Validated"),
        }
    }
}

/// The six outcome slots of a request.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_success: Option<Callback<Value>>,
    /// Catch-all for errors no specific slot handled.
    pub on_error: Option<Callback<RequestError>>,
    pub on_network_error: Option<Callback<RequestError>>,
    pub on_validation_error: Option<Callback<RequestError>>,
    pub on_http_error: Option<Callback<HttpErrorBody>>,
    pub on_timeout: Option<Callback<RequestError>>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_network_error", &self.on_network_error.is_some())
            .field("on_validation_error", &self.on_validation_error.is_some())
            .field("on_http_error", &self.on_http_error.is_some())
            .field("on_timeout", &self.on_timeout.is_some())
            .finish()
    }
}

/// Run `callback` on `input` and produce the resulting outcome value.
///
/// Without a callback the input itself is the outcome.
pub async fn dispatch<I: CallbackInput>(callback: Option<&Callback<I>>, input: I) -> Result<Value> {
    let Some(callback) = callback else {
        return Ok(input.into_value());
    };

    match callback {
        Callback::Plain(handler) => {
            let fallback = input.clone();
            Ok(handler(input).await?.unwrap_or_else(|| fallback.into_value()))
        }
        Callback::Validated { schema, handler } => {
            let candidate = handler(input).await?.unwrap_or(Value::Null);
            validation::validate(schema.as_ref(), candidate)
                .await
                .map_err(|err| err.prefixed(CALLBACK_VALIDATION_PREFIX))
        }
    }
}
