//! Command handlers.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use soundcms_admin::form::{values_from_record, EditorForm, FormStore, Validator};
use soundcms_admin::table::{ColumnDescriptor, FetchOutcome, TableContext, TableOptions};
use soundcms_admin::toast::{Messages, ToastLevel};
use soundcms_lib::api::{ParamOverrides, SortDirection};
use soundcms_lib::config::AdminConfig;
use soundcms_lib::enums::EnumRegistry;
use soundcms_lib::model::{ModuleKey, Record};
use soundcms_lib::{AdminClient, ModuleLoader};

use crate::args::{split_pair, Commands};
use crate::error::CliError;

pub async fn run(command: Commands, config: &AdminConfig) -> Result<(), CliError> {
    let client = config.client()?;
    info!("backend {}", client.base_url());

    match command {
        Commands::List {
            module,
            search,
            page,
            page_size,
            sort,
            desc,
            filters,
            columns,
            labels,
        } => {
            let query = ListQuery {
                search,
                page,
                page_size: page_size.unwrap_or(config.page_size),
                sort,
                desc,
                filters,
            };
            list(&client, module, query, &columns, &labels).await
        }
        Commands::Get { module, id } => {
            let record = client.get(&module, id).await?;
            let record = ModuleLoader::new(client.clone(), module)
                .mapping()
                .record_to_frontend(&record);
            print_json(&record)
        }
        Commands::Save {
            module,
            json,
            file,
            required,
        } => save(&client, module, json, file, &required).await,
        Commands::Delete { module, ids } => {
            client.delete(&module, &ids).await?;
            println!("deleted {} {} record(s)", ids.len(), module);
            Ok(())
        }
        Commands::Enums { name } => enums(&client, name).await,
    }
}

struct ListQuery {
    search: Option<String>,
    page: u32,
    page_size: u32,
    sort: Option<String>,
    desc: bool,
    filters: Vec<String>,
}

async fn list(
    client: &AdminClient,
    module: ModuleKey,
    query: ListQuery,
    columns: &[String],
    labels: &[String],
) -> Result<(), CliError> {
    let registry = EnumRegistry::new();
    let mut label_sets = BTreeMap::new();
    for raw in labels {
        let (column, sets) = split_pair(raw)
            .ok_or_else(|| CliError::Usage(format!("expected COLUMN=SET, got '{}'", raw)))?;
        if let Some(set) = sets.into_iter().next() {
            label_sets.insert(column, set);
        }
    }
    if !label_sets.is_empty() {
        registry.load(client).await?;
    }

    let descriptors = columns
        .iter()
        .map(|key| {
            let column = ColumnDescriptor::new(key.as_str(), key.as_str()).sortable();
            match label_sets.get(key) {
                Some(set) => column.options(set.as_str()),
                None => column,
            }
        })
        .collect();

    let mut filters = BTreeMap::new();
    for raw in &query.filters {
        let (key, values) = split_pair(raw)
            .ok_or_else(|| CliError::Usage(format!("expected KEY=VALUES, got '{}'", raw)))?;
        filters.insert(key, values);
    }

    let messages = Messages::new();
    let loader = Arc::new(ModuleLoader::new(client.clone(), module.clone()));
    let table = TableContext::new(descriptors, loader, registry, messages.clone())?
        .with_options(TableOptions::new().with_page_size(query.page_size))
        .with_module(module);

    if let Some(sort) = &query.sort {
        if table.column(sort).is_none() {
            return Err(CliError::Usage(format!("sort column '{}' is not listed in --columns", sort)));
        }
    }
    let direction = if query.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let overrides = ParamOverrides {
        search: query.search,
        filters: Some(filters),
        page: Some(query.page),
        sort_field: query.sort.map(Some),
        sort_direction: Some(Some(direction)),
        ..ParamOverrides::default()
    };

    let outcome = table.fetch_data(overrides).await;
    report(&messages);
    if let FetchOutcome::Failed(message) = outcome {
        return Err(CliError::Usage(message));
    }

    let rendered = table.rendered_columns();
    let header: Vec<&str> = rendered.iter().map(|c| c.title.as_str()).collect();
    println!("{}", header.join("\t"));
    for row in table.rows() {
        let cells: Vec<String> = table
            .render_row(&row)
            .into_iter()
            .map(|(_, cell)| cell.as_text())
            .collect();
        println!("{}", cells.join("\t"));
    }
    let params = table.params();
    println!(
        "-- page {} of {} ({} total)",
        params.page,
        table.total().div_ceil(params.page_size.max(1) as u64).max(1),
        table.total()
    );
    Ok(())
}

async fn save(
    client: &AdminClient,
    module: ModuleKey,
    json: Option<String>,
    file: Option<PathBuf>,
    required: &[String],
) -> Result<(), CliError> {
    let raw = match (json, file) {
        (Some(json), _) => json,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err(CliError::Usage("pass --json or --file".to_string())),
    };
    let record: Record = serde_json::from_str(&raw)?;

    let messages = Messages::new();
    let form = EditorForm::new(values_from_record(&record), messages.clone());
    form.connect(Arc::new(FormStore::new()));

    let validator = required
        .iter()
        .fold(Validator::new(), |validator, field| {
            validator
                .field(field.as_str())
                .required(format!("{} is required", field))
                .build()
        });

    let mapping = ModuleLoader::new(client.clone(), module.clone())
        .mapping()
        .clone();
    let result = form
        .submit(Some(&validator), |record| async move {
            let saved = client.save(&module, &mapping.record_to_backend(&record)).await?;
            Ok::<_, soundcms_lib::Error>(mapping.record_to_frontend(&saved))
        })
        .await;
    report(&messages);

    let saved = result?;
    print_json(&saved)
}

async fn enums(client: &AdminClient, name: Option<String>) -> Result<(), CliError> {
    let registry = EnumRegistry::new();
    let count = registry.load(client).await?;
    match name {
        Some(name) => {
            let set = registry
                .resolve(&name)
                .ok_or_else(|| CliError::Usage(format!("no option set named '{}'", name)))?;
            for item in &set.items {
                println!("{}\t{}", item.value, item.label);
            }
        }
        None => {
            for name in registry.names() {
                println!("{}", name);
            }
            println!("-- {} option set(s)", count);
        }
    }
    Ok(())
}

fn print_json(record: &Record) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Print queued toasts to stderr.
fn report(messages: &Messages) {
    for toast in messages.drain() {
        let prefix = match toast.level {
            ToastLevel::Error => "error",
            ToastLevel::Warning => "warning",
            ToastLevel::Success => "ok",
            ToastLevel::Info => "info",
        };
        eprintln!("{}: {}", prefix, toast.message);
    }
}
