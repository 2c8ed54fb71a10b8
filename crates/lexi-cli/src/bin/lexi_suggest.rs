// lexi-suggest: Print ranked spelling suggestions.
//
// Suggests for each WORD argument, or for each line of stdin when no
// words are given. Known words are printed as `word (correct)`.
//
// Usage:
//   lexi-suggest (--settings PATH | --dict PATH...) [OPTIONS] [WORD...]

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use lexi_cli::DictArgs;
use lexi_dict::{SearchOptions, SpellingDictionary};
use lexi_suggest::SuggestOptions;
use lexi_trie::CompoundMethod;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Compounds {
    None,
    /// Join dictionary words with a space.
    Separate,
    /// Join dictionary words with `+`.
    Join,
}

impl From<Compounds> for CompoundMethod {
    fn from(c: Compounds) -> Self {
        match c {
            Compounds::None => CompoundMethod::None,
            Compounds::Separate => CompoundMethod::SeparateWords,
            Compounds::Join => CompoundMethod::JoinWords,
        }
    }
}

#[derive(Parser)]
#[command(name = "lexi-suggest")]
#[command(about = "Print ranked spelling suggestions")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    dicts: DictArgs,

    /// Words to suggest for. Reads stdin when none are given.
    words: Vec<String>,

    /// Maximum number of suggestions, not counting ties.
    #[arg(short = 'n', long, default_value_t = 8, allow_negative_numbers = true)]
    max_suggestions: i64,

    /// Maximum number of edits in a suggestion.
    #[arg(long, default_value_t = 5)]
    changes: usize,

    /// Make case and accent changes cost as much as any other edit.
    #[arg(long)]
    strict_case: bool,

    /// Also suggest compounds of dictionary words.
    #[arg(long, value_enum, default_value = "none")]
    compounds: Compounds,

    /// Time budget per word in milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Print results as JSON, one object per word.
    #[arg(long)]
    json: bool,
}

fn main() {
    lexi_cli::init_logger();
    let cli = Cli::parse();

    let base = SuggestOptions::with_count(cli.max_suggestions)
        .unwrap_or_else(|e| lexi_cli::fatal(&e.to_string()));
    let options = SuggestOptions {
        num_changes: cli.changes,
        ignore_case: !cli.strict_case,
        compound_method: cli.compounds.into(),
        timeout: Duration::from_millis(cli.timeout_ms),
        ..base
    };
    let search = SearchOptions {
        ignore_case: !cli.strict_case,
    };

    let collection = lexi_cli::load_dictionaries(&cli.dicts).unwrap_or_else(|e| lexi_cli::fatal(&e));

    let words: Vec<String> = if cli.words.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .map_while(Result::ok)
            .map(|line| line.trim().to_string())
            .filter(|word| !word.is_empty())
            .collect()
    } else {
        cli.words.clone()
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for word in &words {
        let correct = collection.has(word, &search) && !collection.is_forbidden(word, false);
        let suggestions = if correct {
            Vec::new()
        } else {
            collection.suggest(word, &options)
        };

        if cli.json {
            let value = serde_json::json!({
                "word": word,
                "correct": correct,
                "suggestions": suggestions,
            });
            let _ = writeln!(out, "{value}");
        } else if correct {
            let _ = writeln!(out, "{word} (correct)");
        } else if suggestions.is_empty() {
            let _ = writeln!(out, "{word}: (no suggestions)");
        } else {
            let _ = writeln!(out, "{word}:");
            for s in &suggestions {
                let preferred = if s.is_preferred { " *" } else { "" };
                let _ = writeln!(out, "  {} ({}){preferred}", s.word, s.cost);
            }
        }
    }
}
