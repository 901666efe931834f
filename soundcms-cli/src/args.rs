use std::path::PathBuf;

use clap::{Parser, Subcommand};
use soundcms_lib::model::ModuleKey;

#[derive(Parser, Debug)]
#[command(name = "soundcms")]
#[command(about = "Browse and edit SoundCMS content from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to config.json in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and SOUNDCMS_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Log level written to the log file
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one page of a module
    List {
        module: ModuleKey,

        #[arg(long, short)]
        search: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long)]
        page_size: Option<u32>,

        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Filter as key=value[,value...]; repeatable
        #[arg(long = "filter", value_name = "KEY=VALUES")]
        filters: Vec<String>,

        /// Columns to show, comma separated
        #[arg(long, value_delimiter = ',', default_value = "id,name,status")]
        columns: Vec<String>,

        /// Label a column through an option set, as column=SetName; repeatable
        #[arg(long = "label", value_name = "COLUMN=SET")]
        labels: Vec<String>,
    },

    /// Print one record as JSON
    Get { module: ModuleKey, id: i64 },

    /// Create or update a record from JSON
    Save {
        module: ModuleKey,

        /// Record as a JSON object
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,

        /// Read the record from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Field that must not be empty; repeatable
        #[arg(long = "require")]
        required: Vec<String>,
    },

    /// Delete records by id
    Delete {
        module: ModuleKey,
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// List option sets, or the options of one set
    Enums { name: Option<String> },
}

/// Split `key=a,b` into the key and its values.
pub fn split_pair(raw: &str) -> Option<(String, Vec<String>)> {
    let (key, values) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Some((key.to_string(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let cli = Cli::parse_from([
            "soundcms", "list", "sounds", "--search", "rain", "--sort", "createTime", "--desc",
            "--filter", "usage=SLEEP,FOCUS", "--columns", "id,name",
        ]);
        match cli.command {
            Commands::List {
                module,
                search,
                desc,
                filters,
                columns,
                page,
                ..
            } => {
                assert_eq!(module, ModuleKey::Sound);
                assert_eq!(search.as_deref(), Some("rain"));
                assert!(desc);
                assert_eq!(filters, vec!["usage=SLEEP,FOCUS"]);
                assert_eq!(columns, vec!["id", "name"]);
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_custom_module() {
        let cli = Cli::parse_from(["soundcms", "delete", "banner", "3", "4"]);
        match cli.command {
            Commands::Delete { module, ids } => {
                assert_eq!(module, ModuleKey::Custom("banner".into()));
                assert_eq!(ids, vec![3, 4]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(
            split_pair("usage = SLEEP, FOCUS,"),
            Some(("usage".to_string(), vec!["SLEEP".to_string(), "FOCUS".to_string()]))
        );
        assert_eq!(split_pair("novalue"), None);
        assert_eq!(split_pair("=x"), None);
    }
}
