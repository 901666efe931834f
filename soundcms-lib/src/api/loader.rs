//! The list-loading callback contract

use std::future::Future;

use async_trait::async_trait;

use super::ListParams;
use super::PageResult;
use crate::error::Error;
use crate::model::Record;

/// Loads one page of rows for a table.
///
/// Supplied per table instance; implementations own the transport. See
/// [`ModuleLoader`](crate::ModuleLoader) for the REST-backed one.
#[async_trait]
pub trait ListLoader: Send + Sync {
    /// Loads the page described by `params`.
    async fn load(&self, params: &ListParams) -> Result<PageResult<Record>, Error>;
}

/// Adapts an async closure into a [`ListLoader`].
///
/// # Example
///
/// ```
/// use soundcms_lib::api::{FnLoader, ListLoader, ListParams, PageResult};
/// use soundcms_lib::error::Error;
///
/// let loader: Box<dyn ListLoader> = Box::new(FnLoader::new(|_params: ListParams| async {
///     Ok::<_, Error>(PageResult::new(vec![], 0))
/// }));
/// ```
pub struct FnLoader<F> {
    f: F,
}

impl<F> FnLoader<F> {
    /// Wraps the closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ListLoader for FnLoader<F>
where
    F: Fn(ListParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult<Record>, Error>> + Send,
{
    async fn load(&self, params: &ListParams) -> Result<PageResult<Record>, Error> {
        (self.f)(params.clone()).await
    }
}
