// lexi-compile: Compile word lists into a serialized trie.
//
// The entries of every input are merged into one dictionary and written as
// a text trie (TrieXv1 through TrieXv4) or a binary blob. `!word` and
// `~word` entries keep their meaning.
//
// Usage:
//   lexi-compile [OPTIONS] [-o OUTPUT] [WORDLIST...]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lexi_cli::ListType;
use lexi_dict::{DictionaryOptions, SpellingDictionary, TrieDictionary, parse_word_list};
use lexi_trie::TrieBlob;
use lexi_trie::io::{ExportOptions, FormatVersion, serialize_trie};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    V1,
    V2,
    V3,
    /// V3 with a reference index and prefix-grouped lines.
    V4,
    /// Binary record array with a 16-byte header.
    Blob,
}

#[derive(Parser)]
#[command(name = "lexi-compile")]
#[command(about = "Compile word lists into a serialized trie")]
#[command(version)]
struct Cli {
    /// Word lists to compile. Reads stdin when none are given.
    inputs: Vec<PathBuf>,

    /// Output file. Writes to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, ignore_case = true, default_value = "v3")]
    format: Format,

    /// How input lines are split into words.
    #[arg(long = "type", value_enum, ignore_case = true, default_value = "s")]
    list_type: ListType,

    /// Number base for node references in text formats (10 to 36).
    #[arg(long, default_value_t = 10)]
    base: u32,

    /// Comment written into the header of text formats.
    #[arg(long, default_value = "")]
    comment: String,
}

fn main() {
    lexi_cli::init_logger();
    let cli = Cli::parse();

    let inputs = lexi_cli::read_inputs(&cli.inputs).unwrap_or_else(|e| lexi_cli::fatal(&e));
    let mut words = Vec::new();
    for (_, text) in &inputs {
        words.extend(parse_word_list(text, cli.list_type.into()));
    }
    let source = inputs
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let dict = TrieDictionary::from_words("compiled", source, &words, DictionaryOptions::default());
    log::info!("compiled {} words into {} entries", words.len(), dict.size());

    let bytes = match cli.format {
        Format::Blob => TrieBlob::from_trie(dict.trie()).to_bytes(),
        text_format => {
            let version = match text_format {
                Format::V1 => FormatVersion::V1,
                Format::V2 => FormatVersion::V2,
                Format::V4 => FormatVersion::V4,
                _ => FormatVersion::V3,
            };
            let options = ExportOptions {
                version,
                base: cli.base,
                comment: cli.comment.clone(),
            };
            serialize_trie(dict.trie(), &options)
                .unwrap_or_else(|e| lexi_cli::fatal(&e.to_string()))
                .into_bytes()
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &bytes) {
                lexi_cli::fatal(&format!("failed to write {}: {}", path.display(), e));
            }
            log::info!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            if let Err(e) = out.write_all(&bytes).and_then(|()| out.flush()) {
                lexi_cli::fatal(&format!("failed to write output: {e}"));
            }
        }
    }
}
