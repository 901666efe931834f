//! REST-backed list loader

use async_trait::async_trait;

use crate::AdminClient;
use crate::api::ListLoader;
use crate::api::ListParams;
use crate::api::PageResult;
use crate::error::Error;
use crate::mapping::ModuleMapping;
use crate::mapping::mapping_for;
use crate::model::ModuleKey;
use crate::model::Record;

/// [`ListLoader`] that pages a module through [`AdminClient`].
///
/// Parameters are translated to backend names before the request and rows
/// are translated back to frontend names after it.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    client: AdminClient,
    module: ModuleKey,
    mapping: ModuleMapping,
}

impl ModuleLoader {
    /// Creates a loader using the module's built-in mapping table (or the
    /// generic transform when it has none).
    pub fn new(client: AdminClient, module: ModuleKey) -> Self {
        let mapping = mapping_for(&module)
            .map(ModuleMapping::new)
            .unwrap_or_default();
        Self {
            client,
            module,
            mapping,
        }
    }

    /// Replaces the mapping table.
    pub fn with_mapping(mut self, mapping: ModuleMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// The module this loader pages.
    pub fn module(&self) -> &ModuleKey {
        &self.module
    }

    /// The mapping applied to params and rows.
    pub fn mapping(&self) -> &ModuleMapping {
        &self.mapping
    }
}

#[async_trait]
impl ListLoader for ModuleLoader {
    async fn load(&self, params: &ListParams) -> Result<PageResult<Record>, Error> {
        let backend_params = self.mapping.params_to_backend(params);
        let page = self.client.page(&self.module, &backend_params).await?;
        let rows = page
            .rows
            .iter()
            .map(|row| self.mapping.record_to_frontend(row))
            .collect();
        Ok(PageResult::new(rows, page.total))
    }
}
