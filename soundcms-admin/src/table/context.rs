//! The table context: state plus the operations that drive it.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use soundcms_lib::api::{ListLoader, ListParams, PageResult, ParamOverrides, SortDirection};
use soundcms_lib::enums::{EnumRegistry, OptionItem};
use soundcms_lib::model::{ModuleKey, Record};
use soundcms_lib::Error;

use super::actions::{ActionHandler, ReorderHandler};
use super::column::{display_order, ActionButton, ColumnDescriptor, Visibility};
use super::error::TableError;
use super::filter::FilterSection;
use super::options::TableOptions;
use super::render::{resolve_cell, CellContent, CellInput, RendererRegistry};
use crate::selection::RowSelection;
use crate::state::State;
use crate::toast::{Messages, Toast};

/// Called with the effective visible column keys after they change.
pub type VisibilityCallback = Arc<dyn Fn(&[String]) + Send + Sync>;

// =============================================================================
// State
// =============================================================================

/// Where the table is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    /// Waiting for the response to request `seq`.
    Loading { seq: u64 },
}

impl FetchPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// What happened to one `fetch_data` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows and total were replaced.
    Loaded { rows: usize, total: u64 },
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    /// The loader failed; rows were kept and a toast was pushed.
    Failed(String),
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Snapshot of a table's state.
#[derive(Debug, Clone)]
pub struct TableState {
    pub module: Option<ModuleKey>,
    pub rows: Vec<Record>,
    pub total: u64,
    /// Search text, active filters, page, page size and sort.
    pub params: ListParams,
    pub selection: RowSelection,
    /// Optional columns the user chose to show.
    pub selected_columns: Vec<String>,
    pub phase: FetchPhase,
    pub last_error: Option<String>,
    /// Sequence number of the latest issued request.
    issued: u64,
}

impl TableState {
    fn initial(options: &TableOptions, columns: &[ColumnDescriptor]) -> Self {
        Self {
            module: None,
            rows: Vec::new(),
            total: 0,
            params: ListParams::new().page_size(options.page_size),
            selection: RowSelection::new(options.selection_mode),
            selected_columns: columns
                .iter()
                .filter(|c| c.visibility == Visibility::Shown)
                .map(|c| c.key.clone())
                .collect(),
            phase: FetchPhase::Idle,
            last_error: None,
            issued: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }
}

/// Page, page size and sort changes.
///
/// `None` keeps the current value; for the sort fields `Some(None)` clears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationUpdate {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_field: Option<Option<String>>,
    pub sort_direction: Option<Option<SortDirection>>,
}

// =============================================================================
// TableContext
// =============================================================================

/// A configurable remote-data table.
///
/// Owns the rows, query parameters, selection and column visibility of one
/// table and loads pages through an injected [`ListLoader`]. Cheap to clone;
/// clones drive the same table.
///
/// Every fetch takes a sequence number under the state lock; when responses
/// arrive out of order only the one matching the latest issued number is
/// applied. The lock is never held while the loader runs.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use soundcms_admin::table::{ColumnDescriptor, TableContext};
/// use soundcms_admin::toast::Messages;
/// use soundcms_lib::api::{FnLoader, ListParams, PageResult};
/// use soundcms_lib::enums::EnumRegistry;
/// use soundcms_lib::model::Record;
/// use soundcms_lib::Error;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let loader = Arc::new(FnLoader::new(|_params: ListParams| async {
///     Ok::<_, Error>(PageResult::new(vec![Record::with_id(1).set("name", "Rain")], 1))
/// }));
/// let table = TableContext::new(
///     vec![ColumnDescriptor::new("name", "Name")],
///     loader,
///     EnumRegistry::new(),
///     Messages::new(),
/// )
/// .unwrap();
///
/// table.fetch_data(Default::default()).await;
/// assert_eq!(table.rows().len(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct TableContext {
    columns: Arc<Vec<ColumnDescriptor>>,
    filters: Arc<Vec<FilterSection>>,
    loader: State<Arc<dyn ListLoader>>,
    registry: EnumRegistry,
    renderers: Arc<RendererRegistry>,
    messages: Messages,
    options: TableOptions,
    state: State<TableState>,
    on_visibility_change: Option<VisibilityCallback>,
    action_handler: Option<Arc<dyn ActionHandler>>,
    reorder_handler: Option<Arc<dyn ReorderHandler>>,
}

impl TableContext {
    /// Create a table over `columns`.
    ///
    /// Fails if two columns share a key.
    pub fn new(
        columns: Vec<ColumnDescriptor>,
        loader: Arc<dyn ListLoader>,
        registry: EnumRegistry,
        messages: Messages,
    ) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(TableError::DuplicateColumnKey(column.key.clone()));
            }
        }

        let options = TableOptions::default();
        let state = TableState::initial(&options, &columns);
        Ok(Self {
            columns: Arc::new(columns),
            filters: Arc::new(Vec::new()),
            loader: State::new(loader),
            registry,
            renderers: Arc::new(RendererRegistry::new()),
            messages,
            options,
            state: State::new(state),
            on_visibility_change: None,
            action_handler: None,
            reorder_handler: None,
        })
    }

    /// Replace the options; resets page size and selection mode.
    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.state.update(|s| {
            s.params.page_size = options.page_size.max(1);
            s.selection = RowSelection::new(options.selection_mode);
        });
        self.options = options;
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterSection>) -> Self {
        self.filters = Arc::new(filters);
        self
    }

    pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
        self.renderers = Arc::new(renderers);
        self
    }

    /// Add one named renderer to the registry this table uses.
    pub fn with_renderer<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CellInput<'_>) -> CellContent + Send + Sync + 'static,
    {
        let mut renderers = (*self.renderers).clone();
        renderers.register(name, f);
        self.renderers = Arc::new(renderers);
        self
    }

    pub fn with_module(self, module: ModuleKey) -> Self {
        self.state.update(|s| s.module = Some(module));
        self
    }

    pub fn on_visibility_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.on_visibility_change = Some(Arc::new(f));
        self
    }

    pub fn with_action_handler(mut self, handler: Arc<dyn ActionHandler>) -> Self {
        self.action_handler = Some(handler);
        self
    }

    pub fn with_reorder_handler(mut self, handler: Arc<dyn ReorderHandler>) -> Self {
        self.reorder_handler = Some(handler);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn filters(&self) -> &[FilterSection] {
        &self.filters
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn registry(&self) -> &EnumRegistry {
        &self.registry
    }

    /// Clone of the whole state.
    pub fn snapshot(&self) -> TableState {
        self.state.get()
    }

    pub fn rows(&self) -> Vec<Record> {
        self.state.with(|s| s.rows.clone())
    }

    pub fn total(&self) -> u64 {
        self.state.with(|s| s.total)
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading())
    }

    pub fn phase(&self) -> FetchPhase {
        self.state.with(|s| s.phase)
    }

    pub fn params(&self) -> ListParams {
        self.state.with(|s| s.params.clone())
    }

    pub fn search_value(&self) -> String {
        self.state.with(|s| s.params.search.clone())
    }

    pub fn active_filters(&self) -> BTreeMap<String, Vec<String>> {
        self.state.with(|s| s.params.filters.clone())
    }

    pub fn module(&self) -> Option<ModuleKey> {
        self.state.with(|s| s.module.clone())
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.with(|s| s.last_error.clone())
    }

    /// Whether anything changed since the last call.
    pub fn take_changed(&self) -> bool {
        let changed = self.state.is_dirty();
        self.state.clear_dirty();
        changed
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Load a page with the current parameters plus `overrides`.
    ///
    /// The merged parameters become the table's parameters immediately.
    /// On success rows and total are replaced and the selection is cleared
    /// unless `preserve_selection_on_fetch` is set. On failure rows are kept
    /// and an error toast is pushed. Either way the loading flag drops once
    /// the latest request settles.
    pub async fn fetch_data(&self, overrides: ParamOverrides) -> FetchOutcome {
        let (seq, params) = self.state.modify(|s| {
            s.params = s.params.merge(&overrides);
            s.issued += 1;
            s.phase = FetchPhase::Loading { seq: s.issued };
            (s.issued, s.params.clone())
        });
        let loader = self.loader.get();

        debug!(
            "table fetch #{}: page={} size={} search={:?} filters={}",
            seq,
            params.page,
            params.page_size,
            params.search,
            params.filters.len()
        );
        let result = loader.load(&params).await;
        self.complete(seq, result)
    }

    /// Re-run the current query.
    pub async fn refresh(&self) -> FetchOutcome {
        self.fetch_data(ParamOverrides::none()).await
    }

    fn complete(&self, seq: u64, result: Result<PageResult<Record>, Error>) -> FetchOutcome {
        let preserve = self.options.preserve_selection_on_fetch;
        let outcome = self.state.modify(|s| {
            if s.issued != seq {
                return FetchOutcome::Stale;
            }
            s.phase = FetchPhase::Idle;
            match result {
                Ok(page) => {
                    let outcome = FetchOutcome::Loaded {
                        rows: page.rows.len(),
                        total: page.total,
                    };
                    s.rows = page.rows;
                    s.total = page.total;
                    s.last_error = None;
                    if !preserve {
                        s.selection.clear();
                    }
                    outcome
                }
                Err(err) => {
                    let message = err.to_string();
                    s.last_error = Some(message.clone());
                    FetchOutcome::Failed(message)
                }
            }
        });

        match &outcome {
            FetchOutcome::Loaded { rows, total } => {
                debug!("table fetch #{}: {} rows of {}", seq, rows, total)
            }
            FetchOutcome::Stale => debug!("table fetch #{}: superseded, response dropped", seq),
            FetchOutcome::Failed(message) => {
                warn!("table fetch #{} failed: {}", seq, message);
                self.messages
                    .push(Toast::error(format!("Failed to load data: {}", message)));
            }
        }
        outcome
    }

    /// Set the search text and reload from page 1.
    pub async fn set_search_value(&self, text: impl Into<String>) -> FetchOutcome {
        self.fetch_data(ParamOverrides {
            search: Some(text.into()),
            page: Some(1),
            ..ParamOverrides::default()
        })
        .await
    }

    /// Replace the active filters and reload from page 1.
    ///
    /// Empty value lists are dropped; sections in single mode keep one value.
    pub async fn set_active_filters(&self, filters: BTreeMap<String, Vec<String>>) -> FetchOutcome {
        let filters = filters
            .into_iter()
            .map(|(key, values)| {
                let values = match self.filters.iter().find(|f| f.key == key) {
                    Some(section) => section.normalize(values),
                    None => values,
                };
                (key, values)
            })
            .filter(|(_, values)| !values.is_empty())
            .collect();
        self.fetch_data(ParamOverrides {
            filters: Some(filters),
            page: Some(1),
            ..ParamOverrides::default()
        })
        .await
    }

    /// Set one declared filter section, keeping the others.
    pub async fn set_filter(
        &self,
        key: &str,
        values: Vec<String>,
    ) -> Result<FetchOutcome, TableError> {
        if !self.filters.iter().any(|f| f.key == key) {
            return Err(TableError::UnknownFilter(key.to_string()));
        }
        let mut filters = self.active_filters();
        filters.insert(key.to_string(), values);
        Ok(self.set_active_filters(filters).await)
    }

    /// Options offered by the filter section `key`.
    pub fn filter_options(&self, key: &str) -> Result<Vec<OptionItem>, TableError> {
        self.filters
            .iter()
            .find(|f| f.key == key)
            .map(|section| section.resolve_options(&self.registry))
            .ok_or_else(|| TableError::UnknownFilter(key.to_string()))
    }

    /// Change page, page size and/or sort, then reload.
    ///
    /// A change that only moves to another page keeps that page; any page
    /// size or sort change restarts at page 1.
    pub async fn set_pagination_params(&self, update: PaginationUpdate) -> FetchOutcome {
        let current = self.params();
        let size_changed = update
            .page_size
            .is_some_and(|size| size.max(1) != current.page_size);
        let sort_changed = update
            .sort_field
            .as_ref()
            .is_some_and(|field| *field != current.sort_field)
            || update
                .sort_direction
                .is_some_and(|direction| direction != current.sort_direction);

        let page = if size_changed || sort_changed {
            Some(1)
        } else {
            update.page
        };
        self.fetch_data(ParamOverrides {
            page,
            page_size: update.page_size,
            sort_field: update.sort_field,
            sort_direction: update.sort_direction,
            ..ParamOverrides::default()
        })
        .await
    }

    pub async fn set_page(&self, page: u32) -> FetchOutcome {
        self.set_pagination_params(PaginationUpdate {
            page: Some(page),
            ..PaginationUpdate::default()
        })
        .await
    }

    pub async fn set_page_size(&self, page_size: u32) -> FetchOutcome {
        self.set_pagination_params(PaginationUpdate {
            page_size: Some(page_size),
            ..PaginationUpdate::default()
        })
        .await
    }

    /// Sort by a sortable column's field.
    pub async fn set_sort(
        &self,
        column_key: &str,
        direction: SortDirection,
    ) -> Result<FetchOutcome, TableError> {
        let column = self
            .column(column_key)
            .ok_or_else(|| TableError::UnknownColumn(column_key.to_string()))?;
        if !column.sortable {
            return Err(TableError::NotSortable(column_key.to_string()));
        }
        let field = column.data_index.clone();
        Ok(self
            .set_pagination_params(PaginationUpdate {
                sort_field: Some(Some(field)),
                sort_direction: Some(Some(direction)),
                ..PaginationUpdate::default()
            })
            .await)
    }

    pub async fn clear_sort(&self) -> FetchOutcome {
        self.set_pagination_params(PaginationUpdate {
            sort_field: Some(None),
            sort_direction: Some(None),
            ..PaginationUpdate::default()
        })
        .await
    }

    /// Switch to another module: reset everything, swap the loader, reload.
    ///
    /// Responses still in flight for the previous module are dropped.
    pub async fn set_module_key(
        &self,
        module: ModuleKey,
        loader: Arc<dyn ListLoader>,
    ) -> FetchOutcome {
        debug!("table module -> {}", module);
        self.loader.set(loader);
        self.state.update(|s| {
            let issued = s.issued + 1;
            *s = TableState::initial(&self.options, &self.columns);
            s.module = Some(module);
            s.issued = issued;
        });
        self.refresh().await
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    fn is_mandatory(&self, column: &ColumnDescriptor) -> bool {
        column.visibility == Visibility::Always
            || self.options.mandatory_columns.contains(&column.key)
    }

    /// Columns the user can toggle.
    pub fn configurable_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|c| !self.is_mandatory(c)).collect()
    }

    /// Choose the optional columns to show.
    ///
    /// The rendered set is the mandatory columns plus `keys`, in declaration
    /// order. Unknown keys are ignored. Returns the effective keys, which
    /// are also passed to the visibility callback.
    pub fn set_visible_columns<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        let selected: Vec<String> = keys
            .iter()
            .map(|k| k.as_ref())
            .filter(|k| {
                let known = self.column(k).is_some();
                if !known {
                    debug!("ignoring unknown column '{}'", k);
                }
                known
            })
            .map(str::to_string)
            .collect();
        self.state.update(|s| s.selected_columns = selected);

        let visible = self.visible_column_keys();
        if let Some(callback) = &self.on_visibility_change {
            callback(&visible);
        }
        visible
    }

    /// Effective visible column keys in declaration order.
    pub fn visible_column_keys(&self) -> Vec<String> {
        self.visible_columns()
            .into_iter()
            .map(|c| c.key.clone())
            .collect()
    }

    fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        let selected = self.state.with(|s| s.selected_columns.clone());
        self.columns
            .iter()
            .filter(|c| self.is_mandatory(c) || selected.contains(&c.key))
            .collect()
    }

    /// Visible columns in display order (pinned-left first, pinned-right last).
    pub fn rendered_columns(&self) -> Vec<&ColumnDescriptor> {
        display_order(self.visible_columns())
    }

    // -------------------------------------------------------------------------
    // Cells & actions
    // -------------------------------------------------------------------------

    pub fn render_cell(&self, row: &Record, column_key: &str) -> Result<CellContent, TableError> {
        let column = self
            .column(column_key)
            .ok_or_else(|| TableError::UnknownColumn(column_key.to_string()))?;
        Ok(resolve_cell(column, row, &self.renderers, &self.registry))
    }

    /// Cells of the rendered columns, keyed by column key.
    pub fn render_row(&self, row: &Record) -> Vec<(String, CellContent)> {
        self.rendered_columns()
            .into_iter()
            .map(|column| {
                let cell = resolve_cell(column, row, &self.renderers, &self.registry);
                (column.key.clone(), cell)
            })
            .collect()
    }

    /// Buttons of action column `column_key` offered for `row`.
    pub fn visible_actions(
        &self,
        row: &Record,
        column_key: &str,
    ) -> Result<Vec<ActionButton>, TableError> {
        self.column(column_key)
            .map(|column| column.visible_actions(row))
            .ok_or_else(|| TableError::UnknownColumn(column_key.to_string()))
    }

    /// Forward a button click to the action handler.
    ///
    /// The button must be offered for the row by some action column.
    pub async fn dispatch_action(&self, button: &str, row: &Record) -> Result<(), TableError> {
        let offered = self
            .columns
            .iter()
            .any(|c| c.visible_actions(row).iter().any(|b| b.name == button));
        if !offered {
            return Err(TableError::ActionHidden {
                button: button.to_string(),
            });
        }
        let handler = self
            .action_handler
            .as_ref()
            .ok_or(TableError::NoHandler("action"))?;
        debug!("table action '{}' on row {:?}", button, row.id());
        handler.on_action(button, row).await;
        Ok(())
    }

    /// Move a row and hand the full reordered list to the reorder handler.
    ///
    /// The table's own rows stay as they are until the next fetch.
    pub async fn reorder_rows(&self, from: usize, to: usize) -> Result<Vec<Record>, TableError> {
        let mut rows = self.rows();
        let len = rows.len();
        for index in [from, to] {
            if index >= len {
                return Err(TableError::InvalidIndex { index, len });
            }
        }
        let handler = self
            .reorder_handler
            .as_ref()
            .ok_or(TableError::NoHandler("reorder"))?;

        let moved = rows.remove(from);
        rows.insert(to, moved);
        handler.on_reorder(rows.clone()).await;
        Ok(rows)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Key identifying `row` for selection.
    pub fn row_key(&self, row: &Record) -> Option<String> {
        if self.options.row_key == "id" {
            row.id().map(|id| id.to_string())
        } else {
            row.get(&self.options.row_key).and_then(|v| v.option_key())
        }
    }

    fn find_row(&self, rows: &[Record], key: &str) -> Option<Record> {
        rows.iter()
            .find(|row| self.row_key(row).as_deref() == Some(key))
            .cloned()
    }

    /// Toggle one row of the current page.
    pub fn toggle_row(&self, key: &str) -> Result<bool, TableError> {
        self.state.modify(|s| {
            let row = self
                .find_row(&s.rows, key)
                .ok_or_else(|| TableError::UnknownRow(key.to_string()))?;
            Ok(s.selection.toggle(key.to_string(), row))
        })
    }

    /// Replace the selection with the rows matching `keys`.
    ///
    /// Keys not on the current page are ignored.
    pub fn select_rows<S: AsRef<str>>(&self, keys: &[S]) {
        self.state.update(|s| {
            let entries = keys
                .iter()
                .filter_map(|key| {
                    let key = key.as_ref();
                    self.find_row(&s.rows, key).map(|row| (key.to_string(), row))
                })
                .collect();
            s.selection.replace(entries);
        });
    }

    /// Select every keyed row on the current page.
    pub fn select_all(&self) {
        self.state.update(|s| {
            let entries = s
                .rows
                .iter()
                .filter_map(|row| self.row_key(row).map(|key| (key, row.clone())))
                .collect();
            s.selection.replace(entries);
        });
    }

    pub fn clear_selection(&self) {
        self.state.update(|s| s.selection.clear());
    }

    pub fn selected_keys(&self) -> Vec<String> {
        self.state.with(|s| s.selection.keys())
    }

    pub fn selected_rows(&self) -> Vec<Record> {
        self.state.with(|s| s.selection.rows())
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.state.with(|s| s.selection.is_selected(key))
    }
}

impl fmt::Debug for TableContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableContext")
            .field("columns", &self.columns.len())
            .field("filters", &self.filters.len())
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
