//! # Data Boundary (DataSource)
//!
//! An external data-acquisition service. The lifecycle controller calls
//! [`DataSource::acquire`] once per mount to obtain the initial payload;
//! later updates arrive as pushes and do not go through this trait.
//!
//! Closures returning a future are data sources too:
//!
//! ```rust,ignore
//! let source = || async { Ok(serde_json::json!({ "name": "Ada" })) };
//! ```

use crate::{error::AcquisitionError, knit::Payload};
use std::{future::Future, pin::Pin};

/// Acquires server payloads on demand.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `DataSource`",
    label = "missing `DataSource` implementation",
    note = "Data sources must implement `acquire`, or be a closure returning a future of `Result<Payload, AcquisitionError>`."
)]
pub trait DataSource: Send + Sync + 'static {
    /// Fetch the current payload.
    fn acquire(&self) -> impl Future<Output = Result<Payload, AcquisitionError>> + Send;

    /// Transforms every acquired payload before it reaches the knitter.
    fn map<F>(self, mapper: F) -> MapSource<Self, F>
    where
        Self: Sized,
        F: Fn(Payload) -> Payload + Send + Sync + 'static,
    {
        MapSource {
            source: self,
            mapper,
        }
    }

    /// Boxes the source.
    fn boxed(self) -> BoxSource
    where
        Self: Sized,
    {
        BoxSource::new(self)
    }
}

// Blanket impl for closures
impl<F, Fut> DataSource for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Payload, AcquisitionError>> + Send,
{
    fn acquire(&self) -> impl Future<Output = Result<Payload, AcquisitionError>> + Send {
        (self)()
    }
}

/// See [`DataSource::map`].
pub struct MapSource<S, F> {
    source: S,
    mapper: F,
}

impl<S, F> DataSource for MapSource<S, F>
where
    S: DataSource,
    F: Fn(Payload) -> Payload + Send + Sync + 'static,
{
    async fn acquire(&self) -> Result<Payload, AcquisitionError> {
        let payload = self.source.acquire().await?;
        Ok((self.mapper)(payload))
    }
}

/// Dynamic object-safe version of [`DataSource`].
pub trait DynSource: Send + Sync + 'static {
    /// Fetch the current payload (dynamic dispatch version).
    fn acquire_dyn(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Payload, AcquisitionError>> + Send + '_>>;
}

impl<S: DataSource> DynSource for S {
    fn acquire_dyn(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Payload, AcquisitionError>> + Send + '_>> {
        Box::pin(self.acquire())
    }
}

/// A type-erased data source.
pub struct BoxSource {
    inner: Box<dyn DynSource>,
}

impl BoxSource {
    /// Erase the type of `source`.
    pub fn new<S: DataSource>(source: S) -> Self {
        Self {
            inner: Box::new(source),
        }
    }
}

impl DataSource for BoxSource {
    async fn acquire(&self) -> Result<Payload, AcquisitionError> {
        self.inner.acquire_dyn().await
    }

    fn boxed(self) -> BoxSource {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_closure_is_a_source() {
        let source = || async { Ok::<_, AcquisitionError>(json!({ "name": "Ada" })) };
        assert_eq!(source.acquire().await.unwrap(), json!({ "name": "Ada" }));
    }

    #[tokio::test]
    async fn test_map_transforms_payload() {
        let source = (|| async { Ok::<_, AcquisitionError>(json!({ "user": { "name": "Ada" } })) })
            .map(|payload| payload["user"].clone());

        assert_eq!(source.acquire().await.unwrap(), json!({ "name": "Ada" }));
    }

    #[tokio::test]
    async fn test_map_skips_errors() {
        let source = (|| async { Err::<Payload, _>(AcquisitionError::Server { status: 404 }) })
            .map(|_| json!("unreachable"));

        assert!(matches!(
            source.acquire().await,
            Err(AcquisitionError::Server { status: 404 })
        ));
    }

    #[tokio::test]
    async fn test_boxed_sources_share_a_type() {
        let sources: Vec<BoxSource> = vec![
            (|| async { Ok::<_, AcquisitionError>(json!(1)) }).boxed(),
            (|| async { Err::<Payload, _>(AcquisitionError::Closed) }).boxed(),
        ];

        assert_eq!(sources[0].acquire().await.unwrap(), json!(1));
        assert!(sources[1].acquire().await.is_err());
    }
}
