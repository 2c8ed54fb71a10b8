// Line-oriented text formats for shipping consolidated tries.
//
// Every format starts with a header:
//
//   TrieXv<N>
//   base=<radix>
//   # optional comment lines
//   # Data:
//   __DATA__          (V2 and later)
//
// followed by the node data. Node references are written in `radix`
// (clamped to 10..=36 on export).

pub mod v1;
pub mod v2;
pub mod v3;
pub mod v4;

use crate::TrieError;
use crate::node::Trie;

/// Marker line that separates the header from the data (V2 and later).
pub(crate) const DATA: &str = "__DATA__";

/// Text format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatVersion {
    V1,
    V2,
    #[default]
    V3,
    V4,
}

/// Options for [`serialize_trie`].
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub version: FormatVersion,
    /// Radix for node references; clamped to 10..=36.
    pub base: u32,
    /// Free text written as `#` comment lines in the header.
    pub comment: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            version: FormatVersion::default(),
            base: 10,
            comment: String::new(),
        }
    }
}

/// Serialize a trie. The output is deterministic for a given word set.
pub fn serialize_trie(trie: &Trie, options: &ExportOptions) -> Result<String, TrieError> {
    let base = clamp_base(options.base);
    match options.version {
        FormatVersion::V1 => v1::serialize(trie, base, &options.comment),
        FormatVersion::V2 => v2::serialize(trie, base, &options.comment),
        FormatVersion::V3 => Ok(v3::serialize(trie, base, &options.comment)),
        FormatVersion::V4 => Ok(v4::serialize(trie, base, &options.comment)),
    }
}

/// Parse any supported text format, detecting the version from the header.
///
/// `source_name` identifies the input in error messages. The result is
/// consolidated.
pub fn import_trie(text: &str, source_name: &str) -> Result<Trie, TrieError> {
    let lines: Vec<&str> = text.lines().collect();
    let header = read_header(&lines, source_name)?;
    let trie = match header.version {
        FormatVersion::V1 => v1::import(&lines, &header, source_name)?,
        FormatVersion::V2 => v2::import(&lines, &header, source_name)?,
        FormatVersion::V3 => v3::import(&lines, &header, source_name)?,
        FormatVersion::V4 => v4::import(&lines, &header, source_name)?,
    };
    log::debug!(
        "imported {source_name}: {:?}, {} words, {} nodes",
        header.version,
        trie.count_words(),
        trie.count_nodes()
    );
    Ok(trie)
}

pub(crate) fn clamp_base(base: u32) -> u32 {
    base.clamp(10, 36)
}

/// Parsed header plus the index of the first data line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Header {
    pub version: FormatVersion,
    pub base: u32,
    pub data_start: usize,
}

/// Whether `text` starts like a serialized trie rather than a word list.
pub fn is_trie_text(text: &str) -> bool {
    text.lines()
        .find(|line| !is_skippable(line))
        .is_some_and(|line| line.trim().starts_with("TrieXv"))
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

pub(crate) fn read_header(lines: &[&str], source_name: &str) -> Result<Header, TrieError> {
    let mut significant = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !is_skippable(line));

    let (_, magic) = significant.next().ok_or_else(|| TrieError::UnsupportedFormat {
        source_name: source_name.to_string(),
        header: String::new(),
    })?;
    let version = match magic.trim() {
        "TrieXv1" => FormatVersion::V1,
        "TrieXv2" => FormatVersion::V2,
        "TrieXv3" => FormatVersion::V3,
        "TrieXv4" => FormatVersion::V4,
        other => {
            return Err(TrieError::UnsupportedFormat {
                source_name: source_name.to_string(),
                header: other.to_string(),
            });
        }
    };

    let (base_index, base_line) = significant.next().ok_or_else(|| TrieError::Parse {
        source_name: source_name.to_string(),
        line: lines.len(),
        message: "missing base= line".to_string(),
    })?;
    let base = base_line
        .trim()
        .strip_prefix("base=")
        .and_then(|b| b.parse::<u32>().ok())
        .filter(|b| (2..=36).contains(b))
        .ok_or_else(|| TrieError::Parse {
            source_name: source_name.to_string(),
            line: base_index + 1,
            message: format!("invalid base line {base_line:?}"),
        })?;

    let data_start = match version {
        // V1 has no marker: data begins at the first non-comment line.
        FormatVersion::V1 => lines
            .iter()
            .enumerate()
            .skip(base_index + 1)
            .find(|(_, line)| !is_skippable(line))
            .map(|(i, line)| if line.trim() == DATA { i + 1 } else { i })
            .unwrap_or(lines.len()),
        FormatVersion::V2 | FormatVersion::V3 | FormatVersion::V4 => lines
            .iter()
            .enumerate()
            .skip(base_index + 1)
            .find(|(_, line)| line.trim() == DATA)
            .map(|(i, _)| i + 1)
            .ok_or_else(|| TrieError::Parse {
                source_name: source_name.to_string(),
                line: lines.len(),
                message: format!("missing {DATA} marker"),
            })?,
    };

    Ok(Header {
        version,
        base,
        data_start,
    })
}

pub(crate) fn write_header(out: &mut String, version: u8, base: u32, comment: &str, marker: bool) {
    out.push_str(&format!("TrieXv{version}\nbase={base}\n"));
    if !comment.is_empty() {
        for line in comment.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str("# Data:\n");
    if marker {
        out.push_str(DATA);
        out.push('\n');
    }
}

/// Format `n` in `base` with lowercase digits.
pub(crate) fn to_radix(mut n: usize, base: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        let d = (n % base as usize) as u32;
        digits.push(char::from_digit(d, base).unwrap_or('0'));
        n /= base as usize;
    }
    digits.iter().rev().collect()
}

pub(crate) fn parse_ref(
    digits: &str,
    base: u32,
    source_name: &str,
    line: usize,
) -> Result<usize, TrieError> {
    usize::from_str_radix(digits, base).map_err(|_| TrieError::Parse {
        source_name: source_name.to_string(),
        line,
        message: format!("invalid reference {digits:?}"),
    })
}
