use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use soundcms_admin::selection::SelectionMode;
use soundcms_admin::table::{
    status_predicate, ActionButton, ActionHandler, CellContent, ColumnDescriptor, FetchOutcome,
    FetchPhase, FilterSection, PaginationUpdate, ReorderHandler, TableContext, TableError,
    TableOptions,
};
use soundcms_admin::toast::{Messages, ToastLevel};
use soundcms_lib::api::{ListLoader, ListParams, PageResult, ParamOverrides, SortDirection};
use soundcms_lib::enums::{EnumRegistry, OptionItem, OptionSet};
use soundcms_lib::model::{ModuleKey, Record};
use soundcms_lib::Error;
use tokio::sync::oneshot;

// =============================================================================
// Loaders
// =============================================================================

/// Serves fixed rows, records every request and can be switched to fail.
#[derive(Default)]
struct RecordingLoader {
    rows: Vec<Record>,
    calls: Mutex<Vec<ListParams>>,
    fail: AtomicBool,
}

impl RecordingLoader {
    fn with_rows(rows: Vec<Record>) -> Arc<Self> {
        Arc::new(Self {
            rows,
            ..Self::default()
        })
    }

    fn last_call(&self) -> ListParams {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ListLoader for RecordingLoader {
    async fn load(&self, params: &ListParams) -> Result<PageResult<Record>, Error> {
        self.calls.lock().unwrap().push(params.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::other("backend unavailable"));
        }
        Ok(PageResult::new(self.rows.clone(), self.rows.len() as u64 + 40))
    }
}

/// Each request waits until the test releases the response for its search text.
#[derive(Default)]
struct GatedLoader {
    gates: Mutex<HashMap<String, oneshot::Receiver<PageResult<Record>>>>,
}

impl GatedLoader {
    fn gate(&self, search: &str) -> oneshot::Sender<PageResult<Record>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(search.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ListLoader for GatedLoader {
    async fn load(&self, params: &ListParams) -> Result<PageResult<Record>, Error> {
        let rx = self.gates.lock().unwrap().remove(&params.search);
        match rx {
            Some(rx) => rx.await.map_err(|_| Error::other("gate dropped")),
            None => Ok(PageResult::new(vec![], 0)),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn sound(id: i64, name: &str, status: &str) -> Record {
    Record::with_id(id)
        .set("name", name)
        .set("status", status)
        .set("usage", "SLEEP")
}

fn sounds() -> Vec<Record> {
    vec![
        sound(1, "Rain", "DRAFT"),
        sound(2, "Waves", "ENABLED"),
        sound(3, "Wind", "DISABLED"),
    ]
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name").sortable(),
        ColumnDescriptor::new("duration", "Duration").hidden(),
        ColumnDescriptor::new("usage", "Usage").options("Usage"),
        ColumnDescriptor::new("createTime", "Created")
            .data_index("createTime")
            .sortable()
            .render_with("datetime"),
        ColumnDescriptor::new("status", "Status").render_with("switch"),
        ColumnDescriptor::new("actions", "Actions")
            .fixed_right()
            .actions(vec![
                ActionButton::new("edit", "Edit"),
                ActionButton::new("delete", "Delete"),
                ActionButton::new("enable", "Enable"),
                ActionButton::new("disable", "Disable"),
            ])
            .show_action_when(status_predicate),
    ]
}

fn registry() -> EnumRegistry {
    let registry = EnumRegistry::new();
    registry.register(OptionSet::new(
        "Usage",
        vec![OptionItem::new("SLEEP", "Sleep"), OptionItem::new("FOCUS", "Focus")],
    ));
    registry
}

fn table(loader: Arc<dyn ListLoader>) -> (TableContext, Messages) {
    let messages = Messages::new();
    let table = TableContext::new(columns(), loader, registry(), messages.clone())
        .unwrap()
        .with_options(TableOptions::new().with_mandatory_columns(["actions"]))
        .with_filters(vec![
            FilterSection::named("usage", "Usage", "Usage"),
            FilterSection::inline(
                "status",
                "Status",
                vec![OptionItem::new("DRAFT", "Draft"), OptionItem::new("ENABLED", "Enabled")],
            )
            .single(),
        ]);
    (table, messages)
}

// =============================================================================
// Fetch ordering
// =============================================================================

#[tokio::test]
async fn test_latest_request_wins_when_older_arrives_last() {
    let loader = Arc::new(GatedLoader::default());
    let release_a = loader.gate("a");
    let release_b = loader.gate("b");
    let (table, _) = table(loader.clone());

    let driver = async {
        tokio::task::yield_now().await;
        release_b
            .send(PageResult::new(vec![sound(2, "B", "DRAFT")], 1))
            .unwrap();
        tokio::task::yield_now().await;
        release_a
            .send(PageResult::new(vec![sound(1, "A", "DRAFT")], 1))
            .unwrap();
    };
    let (first, second, ()) = tokio::join!(
        table.set_search_value("a"),
        table.set_search_value("b"),
        driver
    );

    assert_eq!(first, FetchOutcome::Stale);
    assert_eq!(second, FetchOutcome::Loaded { rows: 1, total: 1 });
    assert_eq!(table.rows()[0].id(), Some(2));
    assert_eq!(table.search_value(), "b");
    assert!(!table.is_loading());
}

#[tokio::test]
async fn test_stale_response_does_not_end_loading() {
    let loader = Arc::new(GatedLoader::default());
    let release_a = loader.gate("a");
    let release_b = loader.gate("b");
    let (table, _) = table(loader.clone());

    let driver = async {
        tokio::task::yield_now().await;
        release_a
            .send(PageResult::new(vec![sound(1, "A", "DRAFT")], 1))
            .unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        // the older response has been dropped and the newer one is pending
        assert!(table.is_loading());
        assert!(table.rows().is_empty());
        assert!(matches!(table.phase(), FetchPhase::Loading { seq: 2 }));

        release_b
            .send(PageResult::new(vec![sound(2, "B", "DRAFT")], 1))
            .unwrap();
    };
    let (first, second, ()) = tokio::join!(
        table.set_search_value("a"),
        table.set_search_value("b"),
        driver
    );

    assert_eq!(first, FetchOutcome::Stale);
    assert!(second.is_loaded());
    assert_eq!(table.rows()[0].id(), Some(2));
    assert_eq!(table.phase(), FetchPhase::Idle);
}

// =============================================================================
// Failure retention
// =============================================================================

#[tokio::test]
async fn test_failure_keeps_rows_and_reports() {
    let loader = RecordingLoader::with_rows(sounds());
    let (table, messages) = table(loader.clone());

    assert!(table.refresh().await.is_loaded());
    assert_eq!(table.rows().len(), 3);

    loader.fail.store(true, Ordering::SeqCst);
    let outcome = table.set_page(2).await;

    assert!(matches!(outcome, FetchOutcome::Failed(ref m) if m.contains("backend unavailable")));
    assert_eq!(table.rows().len(), 3);
    assert_eq!(table.total(), 43);
    assert!(!table.is_loading());
    assert!(table.last_error().is_some());

    let toasts = messages.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);

    loader.fail.store(false, Ordering::SeqCst);
    assert!(table.refresh().await.is_loaded());
    assert!(table.last_error().is_none());
}

// =============================================================================
// Query parameters
// =============================================================================

#[tokio::test]
async fn test_pagination_resets() {
    let loader = RecordingLoader::with_rows(sounds());
    let (table, _) = table(loader.clone());

    table.set_page(3).await;
    assert_eq!(loader.last_call().page, 3);

    table.set_page_size(50).await;
    let params = loader.last_call();
    assert_eq!((params.page, params.page_size), (1, 50));

    table.set_page(2).await;
    table.set_search_value("rain").await;
    assert_eq!(loader.last_call().page, 1);
    assert_eq!(loader.last_call().search, "rain");

    table.set_page(4).await;
    table
        .set_sort("createTime", SortDirection::Descending)
        .await
        .unwrap();
    let params = loader.last_call();
    assert_eq!(params.page, 1);
    assert_eq!(params.sort_field.as_deref(), Some("createTime"));
    assert_eq!(params.sort_direction, Some(SortDirection::Descending));
    assert_eq!(params.search, "rain");
}

#[tokio::test]
async fn test_same_sort_with_page_is_pure_page_change() {
    let loader = RecordingLoader::with_rows(sounds());
    let (table, _) = table(loader.clone());
    table.set_sort("name", SortDirection::Ascending).await.unwrap();

    table
        .set_pagination_params(PaginationUpdate {
            page: Some(5),
            sort_field: Some(Some("name".into())),
            sort_direction: Some(Some(SortDirection::Ascending)),
            ..PaginationUpdate::default()
        })
        .await;
    assert_eq!(loader.last_call().page, 5);

    table.clear_sort().await;
    let params = loader.last_call();
    assert_eq!(params.page, 1);
    assert_eq!(params.sort_field, None);
}

#[tokio::test]
async fn test_sort_errors() {
    let loader = RecordingLoader::with_rows(sounds());
    let (table, _) = table(loader.clone());

    assert_eq!(
        table.set_sort("status", SortDirection::Ascending).await,
        Err(TableError::NotSortable("status".into()))
    );
    assert_eq!(
        table.set_sort("missing", SortDirection::Ascending).await,
        Err(TableError::UnknownColumn("missing".into()))
    );
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn test_filters() {
    let loader = RecordingLoader::with_rows(sounds());
    let (table, _) = table(loader.clone());
    table.set_page(3).await;

    let mut filters = BTreeMap::new();
    filters.insert("usage".to_string(), vec!["SLEEP".to_string(), "FOCUS".to_string()]);
    filters.insert("status".to_string(), vec!["DRAFT".to_string(), "ENABLED".to_string()]);
    filters.insert("genre".to_string(), vec![]);
    table.set_active_filters(filters).await;

    let params = loader.last_call();
    assert_eq!(params.page, 1);
    assert_eq!(params.filters["usage"], vec!["SLEEP", "FOCUS"]);
    assert_eq!(params.filters["status"], vec!["DRAFT"]);
    assert!(!params.filters.contains_key("genre"));

    table
        .set_filter("usage", vec!["FOCUS".to_string()])
        .await
        .unwrap();
    let active = table.active_filters();
    assert_eq!(active["usage"], vec!["FOCUS"]);
    assert_eq!(active["status"], vec!["DRAFT"]);

    assert_eq!(
        table.set_filter("genre", vec![]).await,
        Err(TableError::UnknownFilter("genre".into()))
    );
}

#[test]
fn test_filter_options() {
    let (table, _) = table(RecordingLoader::with_rows(vec![]));
    let usage = table.filter_options("usage").unwrap();
    assert_eq!(usage[1].label, "Focus");
    assert_eq!(table.filter_options("status").unwrap().len(), 2);
    assert!(table.filter_options("genre").is_err());
}

#[tokio::test]
async fn test_overrides_persist() {
    let loader = RecordingLoader::with_rows(sounds());
    let (table, _) = table(loader.clone());
    table
        .fetch_data(ParamOverrides {
            search: Some("wind".into()),
            page_size: Some(5),
            ..ParamOverrides::default()
        })
        .await;
    table.refresh().await;

    let params = loader.last_call();
    assert_eq!(params.search, "wind");
    assert_eq!(params.page_size, 5);
    assert_eq!(loader.call_count(), 2);
}

// =============================================================================
// Columns
// =============================================================================

#[test]
fn test_duplicate_column_key() {
    let result = TableContext::new(
        vec![ColumnDescriptor::new("name", "Name"), ColumnDescriptor::new("name", "Title")],
        RecordingLoader::with_rows(vec![]),
        EnumRegistry::new(),
        Messages::new(),
    );
    assert!(matches!(result, Err(TableError::DuplicateColumnKey(key)) if key == "name"));
}

#[test]
fn test_visible_columns_union() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let (table, _) = table(RecordingLoader::with_rows(vec![]));
    let table = table.on_visibility_change(move |keys| sink.lock().unwrap().push(keys.to_vec()));

    assert_eq!(
        table.visible_column_keys(),
        vec!["name", "usage", "createTime", "status", "actions"]
    );

    let visible = table.set_visible_columns(&["name"]);
    assert_eq!(visible, vec!["name", "actions"]);

    let visible = table.set_visible_columns(&["duration", "ghost", "actions"]);
    assert_eq!(visible, vec!["duration", "actions"]);

    let empty: [&str; 0] = [];
    assert_eq!(table.set_visible_columns(&empty), vec!["actions"]);

    let calls = seen.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], vec!["name", "actions"]);

    let configurable = table.configurable_columns();
    assert_eq!(configurable.len(), 5);
    assert!(!configurable.iter().any(|c| c.key == "actions"));
}

#[tokio::test]
async fn test_render_row() {
    let (table, _) = table(RecordingLoader::with_rows(vec![]));
    table.set_visible_columns(&["name", "usage", "status"]);

    let cells = table.render_row(&sound(2, "Waves", "ENABLED"));
    let keys: Vec<&str> = cells.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["name", "usage", "status", "actions"]);
    assert_eq!(cells[0].1, CellContent::Text("Waves".into()));
    assert_eq!(cells[1].1, CellContent::Text("Sleep".into()));
    assert_eq!(cells[2].1, CellContent::Switch { on: true });
    assert_eq!(
        cells[3].1,
        CellContent::Actions(vec![
            ActionButton::new("edit", "Edit"),
            ActionButton::new("disable", "Disable"),
        ])
    );

    assert_eq!(
        table.render_cell(&Record::with_id(9), "createTime").unwrap(),
        CellContent::Empty
    );
    assert!(table.render_cell(&Record::with_id(9), "ghost").is_err());
}

#[tokio::test]
async fn test_custom_renderer() {
    let (table, _) = table(RecordingLoader::with_rows(vec![]));
    let table = table.with_renderer("switch", |input| {
        CellContent::Text(format!("status:{}", input.value))
    });
    assert_eq!(
        table.render_cell(&sound(1, "Rain", "DRAFT"), "status").unwrap(),
        CellContent::Text("status:DRAFT".into())
    );
}

// =============================================================================
// Actions & reorder
// =============================================================================

#[derive(Default)]
struct Recorder {
    actions: Mutex<Vec<(String, Option<i64>)>>,
    orders: Mutex<Vec<Vec<Option<i64>>>>,
}

#[async_trait]
impl ActionHandler for Recorder {
    async fn on_action(&self, button: &str, row: &Record) {
        self.actions.lock().unwrap().push((button.to_string(), row.id()));
    }
}

#[async_trait]
impl ReorderHandler for Recorder {
    async fn on_reorder(&self, rows: Vec<Record>) {
        self.orders
            .lock()
            .unwrap()
            .push(rows.iter().map(|r| r.id()).collect());
    }
}

#[tokio::test]
async fn test_visible_actions_follow_status() {
    let (table, _) = table(RecordingLoader::with_rows(vec![]));
    let names = |row: &Record| -> Vec<String> {
        table
            .visible_actions(row, "actions")
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect()
    };
    assert_eq!(names(&sound(1, "Rain", "DRAFT")), vec!["edit", "delete", "enable"]);
    assert_eq!(names(&sound(2, "Waves", "ENABLED")), vec!["edit", "disable"]);
    assert_eq!(names(&sound(3, "Wind", "DISABLED")), vec!["edit", "delete", "enable"]);
}

#[tokio::test]
async fn test_dispatch_action() {
    let recorder = Arc::new(Recorder::default());
    let (table, _) = table(RecordingLoader::with_rows(vec![]));
    let table = table.with_action_handler(recorder.clone());

    table.dispatch_action("delete", &sound(1, "Rain", "DRAFT")).await.unwrap();
    assert_eq!(
        table.dispatch_action("delete", &sound(2, "Waves", "ENABLED")).await,
        Err(TableError::ActionHidden { button: "delete".into() })
    );
    assert_eq!(
        *recorder.actions.lock().unwrap(),
        vec![("delete".to_string(), Some(1))]
    );
}

#[tokio::test]
async fn test_dispatch_without_handler() {
    let (table, _) = table(RecordingLoader::with_rows(vec![]));
    assert_eq!(
        table.dispatch_action("edit", &sound(1, "Rain", "DRAFT")).await,
        Err(TableError::NoHandler("action"))
    );
}

#[tokio::test]
async fn test_reorder_emits_without_persisting() {
    let recorder = Arc::new(Recorder::default());
    let (table, _) = table(RecordingLoader::with_rows(sounds()));
    let table = table.with_reorder_handler(recorder.clone());
    table.refresh().await;

    let reordered = table.reorder_rows(0, 2).await.unwrap();
    let ids: Vec<Option<i64>> = reordered.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![Some(2), Some(3), Some(1)]);
    assert_eq!(recorder.orders.lock().unwrap()[0], ids);
    assert_eq!(table.rows()[0].id(), Some(1));

    assert_eq!(
        table.reorder_rows(0, 3).await,
        Err(TableError::InvalidIndex { index: 3, len: 3 })
    );
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_selection_cleared_on_fetch() {
    let (table, _) = table(RecordingLoader::with_rows(sounds()));
    table.refresh().await;

    assert!(table.toggle_row("1").unwrap());
    table.select_rows(&["2", "3", "99"]);
    assert_eq!(table.selected_keys(), vec!["2", "3"]);
    let ids: Vec<Option<i64>> = table.selected_rows().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![Some(2), Some(3)]);

    assert_eq!(table.toggle_row("99"), Err(TableError::UnknownRow("99".into())));

    table.set_page(2).await;
    assert!(table.selected_keys().is_empty());
    assert!(table.selected_rows().is_empty());
}

#[tokio::test]
async fn test_selection_preserved_when_configured() {
    let loader = RecordingLoader::with_rows(sounds());
    let table = TableContext::new(columns(), loader, registry(), Messages::new())
        .unwrap()
        .with_options(
            TableOptions::new()
                .with_preserve_selection(true)
                .with_selection_mode(SelectionMode::Single),
        );
    table.refresh().await;
    table.select_all();
    assert_eq!(table.selected_keys(), vec!["1"]);

    table.refresh().await;
    assert_eq!(table.selected_keys(), vec!["1"]);
    assert_eq!(table.selected_rows().len(), 1);
}

#[tokio::test]
async fn test_custom_row_key() {
    let rows = vec![Record::new().set("code", "RAIN"), Record::new().set("code", "WIND")];
    let table = TableContext::new(
        columns(),
        RecordingLoader::with_rows(rows),
        registry(),
        Messages::new(),
    )
    .unwrap()
    .with_options(TableOptions::new().with_row_key("code"));
    table.refresh().await;

    table.toggle_row("WIND").unwrap();
    assert!(table.is_selected("WIND"));
    assert_eq!(table.selected_rows()[0].get_string("code").unwrap(), Some("WIND"));
}

// =============================================================================
// Module switching
// =============================================================================

#[tokio::test]
async fn test_module_switch_resets_and_drops_in_flight() {
    let gated = Arc::new(GatedLoader::default());
    let release_old = gated.gate("old");
    let (table, _) = table(gated.clone());
    let table = table.with_module(ModuleKey::Sound);

    let music = RecordingLoader::with_rows(vec![Record::with_id(50).set("name", "Piano")]);
    let driver = async {
        tokio::task::yield_now().await;
        let outcome = table.set_module_key(ModuleKey::Music, music.clone()).await;
        assert!(outcome.is_loaded());
        release_old
            .send(PageResult::new(vec![sound(1, "Rain", "DRAFT")], 1))
            .unwrap();
    };
    let (old, ()) = tokio::join!(table.set_search_value("old"), driver);

    assert_eq!(old, FetchOutcome::Stale);
    assert_eq!(table.module(), Some(ModuleKey::Music));
    assert_eq!(table.search_value(), "");
    assert_eq!(table.rows()[0].id(), Some(50));
    assert_eq!(music.last_call().page, 1);
}
