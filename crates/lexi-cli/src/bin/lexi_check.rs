// lexi-check: Check text against dictionaries.
//
// Reads the named files (or stdin) and prints one line per unknown or
// forbidden word:
//   file:offset word (suggestion, ...)
//
// Usage:
//   lexi-check (--settings PATH | --dict PATH...) [OPTIONS] [FILE...]
//
// Exits with code 1 when any issue is found.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use lexi_cli::DictArgs;
use lexi_dict::{CachingDictionary, SearchOptions, ValidationOptions, validate_text};
use lexi_suggest::SuggestOptions;

#[derive(Parser)]
#[command(name = "lexi-check")]
#[command(about = "Check text against dictionaries")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    dicts: DictArgs,

    /// Files to check. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Words shorter than this are not checked unless forbidden.
    #[arg(long, default_value_t = 4)]
    min_word_length: usize,

    /// Accept words only in their listed case and accents.
    #[arg(long)]
    strict_case: bool,

    /// Search the dictionaries for suggestions when none are configured.
    #[arg(short = 'S', long)]
    suggest: bool,

    /// Print issues as JSON, one object per line.
    #[arg(long)]
    json: bool,

    /// Print cache statistics to stderr when done.
    #[arg(long)]
    stats: bool,
}

fn main() {
    lexi_cli::init_logger();
    let cli = Cli::parse();

    let collection = lexi_cli::load_dictionaries(&cli.dicts).unwrap_or_else(|e| lexi_cli::fatal(&e));
    let inputs = lexi_cli::read_inputs(&cli.files).unwrap_or_else(|e| lexi_cli::fatal(&e));

    let search = SearchOptions {
        ignore_case: !cli.strict_case,
    };
    let validation = ValidationOptions {
        min_word_length: cli.min_word_length,
    };
    let suggest = SuggestOptions {
        ignore_case: !cli.strict_case,
        ..SuggestOptions::default()
    };
    let mut dict = CachingDictionary::new(&collection, search);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut found_issues = false;

    for (name, text) in &inputs {
        for mut issue in validate_text(text, &mut dict, &validation) {
            found_issues = true;
            if cli.suggest && issue.suggestions_ex.is_empty() {
                issue.suggestions_ex = dict.suggest(&issue.text, &suggest);
            }
            if cli.json {
                match serde_json::to_string(&issue) {
                    Ok(line) => {
                        let _ = writeln!(out, "{line}");
                    }
                    Err(e) => lexi_cli::fatal(&format!("failed to encode issue: {e}")),
                }
                continue;
            }
            let marker = if issue.is_flagged { " [forbidden]" } else { "" };
            let words: Vec<&str> = issue.suggestions_ex.iter().map(|s| s.word.as_str()).collect();
            if words.is_empty() {
                let _ = writeln!(out, "{name}:{} {}{marker}", issue.offset, issue.text);
            } else {
                let _ = writeln!(
                    out,
                    "{name}:{} {}{marker} ({})",
                    issue.offset,
                    issue.text,
                    words.join(", ")
                );
            }
        }
    }
    let _ = out.flush();

    if cli.stats {
        match serde_json::to_string_pretty(&dict.stats()) {
            Ok(stats) => eprintln!("{stats}"),
            Err(e) => eprintln!("error: failed to encode stats: {e}"),
        }
    }
    if found_issues {
        process::exit(1);
    }
}
