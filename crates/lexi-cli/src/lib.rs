// lexi-cli: shared utilities for the command-line tools.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use lexi_dict::{
    Collection, DictionaryDefinition, DictionaryLoader, DictionarySettings, DictionaryType,
    SpellingDictionary,
};

/// Initialise logging at `info`, overridable through `RUST_LOG`.
pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// How word-list files are split into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListType {
    /// One word per line.
    S,
    /// Whitespace separated words.
    W,
    /// Code identifiers split on camelCase and snake_case.
    C,
}

impl From<ListType> for DictionaryType {
    fn from(t: ListType) -> Self {
        match t {
            ListType::S => DictionaryType::S,
            ListType::W => DictionaryType::W,
            ListType::C => DictionaryType::C,
        }
    }
}

/// Dictionary selection shared by the tools.
#[derive(Debug, Args)]
pub struct DictArgs {
    /// Settings JSON listing dictionaries and inline word lists.
    #[arg(short, long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Word list or serialized trie (text or binary). May be repeated.
    #[arg(short, long = "dict", value_name = "PATH")]
    pub dicts: Vec<PathBuf>,

    /// How word lists given with --dict are split into words.
    #[arg(long = "type", value_enum, ignore_case = true, default_value = "s")]
    pub list_type: ListType,

    /// Treat words given with --dict as case sensitive.
    #[arg(long)]
    pub case_sensitive: bool,
}

/// Load every dictionary named on the command line into one collection.
///
/// Paths inside a settings file are relative to that file. Dictionaries
/// that fail to load are reported and skipped.
pub fn load_dictionaries(args: &DictArgs) -> Result<Collection, String> {
    if args.settings.is_none() && args.dicts.is_empty() {
        return Err("no dictionaries given; use --settings or --dict".to_string());
    }
    let mut loader = DictionaryLoader::new();
    let mut members: Vec<Arc<dyn SpellingDictionary>> = Vec::new();

    if let Some(path) = &args.settings {
        let settings = DictionarySettings::from_path(path).map_err(|e| e.to_string())?;
        let base_dir = path.parent().unwrap_or(Path::new(""));
        members.push(Arc::new(loader.load_settings(&settings, base_dir)));
    }
    for path in &args.dicts {
        let def = DictionaryDefinition {
            name: dictionary_name(path),
            path: Some(path.clone()),
            dict_type: args.list_type.into(),
            case_sensitive: args.case_sensitive,
            ..DictionaryDefinition::default()
        };
        members.push(loader.load(&def, Path::new("")));
    }

    let collection = Collection::new("lexi", members);
    for err in collection.errors() {
        eprintln!("warning: {err}");
    }
    log::info!(
        "loaded {} entries from {}",
        collection.size(),
        collection.source()
    );
    Ok(collection)
}

/// The file stem, used as the dictionary name.
pub fn dictionary_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read each named file, or stdin (named `-`) when there are none.
pub fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>, String> {
    if files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        return Ok(vec![("-".to_string(), text)]);
    }
    files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|text| (path.display().to_string(), text))
                .map_err(|e| format!("failed to read {}: {}", path.display(), e))
        })
        .collect()
}
