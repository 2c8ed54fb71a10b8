// TrieXv3: a pre-order token stream over the consolidated trie.
//
// Tokens:
//   <char>     step down along `char`
//   $[d]       end of word, then go back up 1 (or `d`, 2..=9) levels
//   <[d]       go back up 1 (or `d`) levels
//   #<n>;      the edge just written points at node `n`
//   \<char>    literal character (`\n` and `\r` stand for line breaks)
//
// Nodes that have children are numbered in pre-order, root = 0. A node is
// written out once; later edges to it use a `#n;` reference. Line breaks
// between tokens carry no meaning.

use crate::TrieError;
use crate::consolidate::consolidate;
use crate::io::{Header, parse_ref, to_radix, write_header};
use crate::node::{NodeId, Trie};

const EOW: char = '$';
const BACK: char = '<';
const REF: char = '#';
const REF_END: char = ';';
const ESCAPE: char = '\\';

fn needs_escape(c: char, dialect: Dialect) -> bool {
    matches!(c, EOW | BACK | REF | REF_END | ESCAPE)
        || c.is_ascii_digit()
        || (dialect == Dialect::V4 && matches!(c, REF_INDEXED | COMMENT | INDEX_BEGIN | INDEX_END))
}

pub(crate) struct Writer {
    out: String,
    base: u32,
    dialect: Dialect,
    pending: Option<char>,
    backs: usize,
    words: usize,
    pub eol: bool,
}

impl Writer {
    pub fn new(out: String, base: u32, dialect: Dialect) -> Self {
        Self {
            out,
            base,
            dialect,
            pending: None,
            backs: 0,
            words: 0,
            eol: false,
        }
    }

    /// Words per output line before a break is forced.
    fn words_per_line(&self) -> usize {
        match self.dialect {
            Dialect::V3 => 20,
            Dialect::V4 => 50,
        }
    }

    fn flush(&mut self) {
        if let Some(mut mark) = self.pending.take() {
            let mut count = self.backs.max(1);
            while count > 0 {
                let n = count.min(9);
                self.out.push(mark);
                if n > 1 {
                    self.out.push_str(&n.to_string());
                }
                count -= n;
                mark = BACK;
            }
            self.backs = 0;
        }
        if self.eol {
            self.out.push('\n');
            self.eol = false;
            self.words = 0;
        }
    }

    pub fn end_of_word(&mut self) {
        self.flush();
        self.pending = Some(EOW);
        self.backs = 0;
        self.words += 1;
    }

    pub fn back(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(BACK);
        }
        self.backs += 1;
    }

    pub fn letter(&mut self, c: char) {
        if self.words >= self.words_per_line() {
            self.eol = true;
        }
        self.flush();
        match c {
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            c if needs_escape(c, self.dialect) => {
                self.out.push(ESCAPE);
                self.out.push(c);
            }
            c => self.out.push(c),
        }
    }

    /// Edge to the already written node `n`, or to entry `slot` of the
    /// reference index.
    pub fn reference(&mut self, n: usize, slot: Option<usize>) {
        if self.words >= self.words_per_line() {
            self.eol = true;
        }
        self.flush();
        match slot {
            Some(i) => {
                self.out.push(REF_INDEXED);
                self.out.push_str(&to_radix(i, self.base));
            }
            None => {
                self.out.push(REF);
                self.out.push_str(&to_radix(n, self.base));
            }
        }
        if self.dialect == Dialect::V3 || self.base != 10 {
            self.out.push(REF_END);
        }
        self.words += 1;
    }

    /// Start a new line with a `/* prefix */` comment.
    pub fn comment(&mut self, prefix: &[char]) {
        self.flush();
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str("/* ");
        for &c in prefix {
            let shown = if c == COMMENT || c.is_control() { '?' } else { c };
            self.out.push(shown);
        }
        self.out.push_str(" */\n");
        self.words = 0;
    }

    pub fn finish(mut self) -> String {
        self.flush();
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}

pub(crate) fn serialize(trie: &Trie, base: u32, comment: &str) -> String {
    let mut header = String::new();
    write_header(&mut header, 3, base, comment, true);
    if trie.count_words() == 0 {
        return header;
    }

    let trie = consolidate(trie);
    let mut w = Writer::new(header, base, Dialect::V3);
    let mut numbers: Vec<Option<usize>> = vec![None; trie.arena_len()];
    numbers[NodeId::ROOT.index()] = Some(0);
    let mut next_number = 1;
    let mut stack: Vec<(NodeId, usize)> = vec![(NodeId::ROOT, 0)];

    while let Some(top) = stack.last_mut() {
        let (id, next) = *top;
        let children = trie.node(id).children();
        if next < children.len() {
            top.1 += 1;
            let (c, child) = children[next];
            w.letter(c);
            if let Some(n) = numbers[child.index()] {
                w.reference(n, None);
                continue;
            }
            if !trie.node(child).is_leaf() {
                numbers[child.index()] = Some(next_number);
                next_number += 1;
            }
            stack.push((child, 0));
            continue;
        }
        stack.pop();
        if stack.is_empty() {
            break;
        }
        if trie.node(id).is_end() {
            w.end_of_word();
        }
        w.back();
        if stack.len() == 1 {
            w.eol = true;
        }
    }
    w.finish()
}

/// Token set accepted by [`read_stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    V3,
    /// V3 plus a leading reference index, `@i` references, `/ ... /`
    /// comments, and references without `;` in base 10.
    V4,
}

pub(crate) const REF_INDEXED: char = '@';
pub(crate) const COMMENT: char = '/';
pub(crate) const INDEX_BEGIN: char = '[';
pub(crate) const INDEX_END: char = ']';

enum Mode {
    Main,
    Escape,
    /// After `$` or `<`: an optional count digit may follow.
    Back,
    Ref { digits: String, indexed: bool },
    /// Before the first token of a V4 stream.
    IndexStart,
    Index(String),
    Comment,
}

struct Reader<'a> {
    trie: Trie,
    stack: Vec<(NodeId, char)>,
    numbered: Vec<NodeId>,
    index: Vec<usize>,
    after_letter: bool,
    dialect: Dialect,
    base: u32,
    source_name: &'a str,
    line: usize,
}

impl Reader<'_> {
    fn error(&self, message: &str) -> TrieError {
        TrieError::Parse {
            source_name: self.source_name.to_string(),
            line: self.line,
            message: message.to_string(),
        }
    }

    fn top(&self) -> NodeId {
        self.stack.last().map_or(NodeId::ROOT, |&(id, _)| id)
    }

    /// Base-10 V4 references may end at any non-digit.
    fn open_references(&self) -> bool {
        self.dialect == Dialect::V4 && self.base == 10
    }

    fn letter(&mut self, c: char) -> Result<(), TrieError> {
        let parent = self.top();
        if self.trie.node(parent).child(c).is_some() {
            return Err(self.error("duplicate child character"));
        }
        let node = self.trie.child_or_insert(parent, c);
        self.stack.push((node, c));
        self.numbered.push(node);
        self.after_letter = true;
        Ok(())
    }

    fn end_of_word(&mut self) -> Result<(), TrieError> {
        let Some(&(node, _)) = self.stack.last() else {
            return Err(self.error("end of word at the root"));
        };
        self.trie.set_end(node);
        // Leaves are not numbered.
        if self.trie.node(node).is_leaf() {
            self.numbered.pop();
        }
        Ok(())
    }

    fn pop(&mut self, count: usize) -> Result<(), TrieError> {
        if count > self.stack.len() {
            return Err(self.error("back past the root"));
        }
        self.stack.truncate(self.stack.len() - count);
        Ok(())
    }

    fn reference(&mut self, digits: &str, indexed: bool) -> Result<(), TrieError> {
        let mut n = parse_ref(digits, self.base, self.source_name, self.line)?;
        if indexed {
            n = *self
                .index
                .get(n)
                .ok_or_else(|| self.error("reference to an unknown index entry"))?;
        }
        let target = *self
            .numbered
            .get(n)
            .ok_or_else(|| self.error("reference to an unknown node"))?;
        let Some((_, c)) = self.stack.pop() else {
            return Err(self.error("reference without a letter"));
        };
        if target == NodeId::ROOT || self.stack.iter().any(|&(id, _)| id == target) {
            return Err(TrieError::Cycle {
                source_name: self.source_name.to_string(),
                line: self.line,
            });
        }
        let parent = self.top();
        self.trie.set_child(parent, c, target);
        self.numbered.pop();
        Ok(())
    }

    fn read_index(&mut self, entries: &str) -> Result<(), TrieError> {
        self.index = entries
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| parse_ref(d, self.base, self.source_name, self.line))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn main(&mut self, c: char) -> Result<Mode, TrieError> {
        let v4 = self.dialect == Dialect::V4;
        match c {
            EOW => {
                self.after_letter = false;
                self.end_of_word()?;
                Ok(Mode::Back)
            }
            BACK => {
                self.after_letter = false;
                Ok(Mode::Back)
            }
            REF | REF_INDEXED if c == REF || v4 => {
                if !self.after_letter {
                    return Err(self.error("reference without a letter"));
                }
                self.after_letter = false;
                Ok(Mode::Ref {
                    digits: String::new(),
                    indexed: c == REF_INDEXED,
                })
            }
            COMMENT if v4 => Ok(Mode::Comment),
            ESCAPE => Ok(Mode::Escape),
            c if c.is_ascii_digit() => Err(self.error("unexpected digit")),
            c => {
                self.letter(c)?;
                Ok(Mode::Main)
            }
        }
    }

    fn step(&mut self, mode: Mode, c: char) -> Result<Mode, TrieError> {
        match mode {
            Mode::Main => self.main(c),
            Mode::Escape => {
                let c = match c {
                    'n' => '\n',
                    'r' => '\r',
                    c => c,
                };
                self.letter(c)?;
                Ok(Mode::Main)
            }
            Mode::Back => match c.to_digit(10) {
                Some(d @ 2..=9) => {
                    self.pop(d as usize)?;
                    Ok(Mode::Main)
                }
                Some(_) => Err(self.error("invalid back count")),
                None => {
                    self.pop(1)?;
                    self.main(c)
                }
            },
            Mode::Ref { mut digits, indexed } => {
                if c == REF_END {
                    self.reference(&digits, indexed)?;
                    Ok(Mode::Main)
                } else if self.open_references() && !c.is_ascii_digit() {
                    self.reference(&digits, indexed)?;
                    self.main(c)
                } else {
                    digits.push(c);
                    Ok(Mode::Ref { digits, indexed })
                }
            }
            Mode::IndexStart if c == INDEX_BEGIN => Ok(Mode::Index(String::new())),
            Mode::IndexStart => self.main(c),
            Mode::Index(entries) if c == INDEX_END => {
                self.read_index(&entries)?;
                Ok(Mode::Main)
            }
            Mode::Index(mut entries) => {
                entries.push(c);
                Ok(Mode::Index(entries))
            }
            Mode::Comment if c == COMMENT => Ok(Mode::Main),
            Mode::Comment => Ok(Mode::Comment),
        }
    }
}

/// Read the token stream that follows the header.
pub(crate) fn read_stream(
    lines: &[&str],
    header: &Header,
    source_name: &str,
    dialect: Dialect,
) -> Result<Trie, TrieError> {
    let mut reader = Reader {
        trie: Trie::new(),
        stack: Vec::new(),
        numbered: vec![NodeId::ROOT],
        index: Vec::new(),
        after_letter: false,
        dialect,
        base: header.base,
        source_name,
        line: header.data_start,
    };
    let mut mode = match dialect {
        Dialect::V3 => Mode::Main,
        Dialect::V4 => Mode::IndexStart,
    };

    for (i, line) in lines.iter().enumerate().skip(header.data_start) {
        reader.line = i + 1;
        for c in line.chars() {
            mode = reader.step(mode, c)?;
        }
        // Index entries never span a line break.
        if let Mode::Index(entries) = &mut mode {
            entries.push(',');
        }
    }
    match mode {
        Mode::Main | Mode::IndexStart => {}
        Mode::Back => reader.pop(1)?,
        Mode::Escape => return Err(reader.error("dangling escape")),
        Mode::Ref { digits, indexed } if reader.open_references() => {
            reader.reference(&digits, indexed)?;
        }
        Mode::Ref { .. } => return Err(reader.error("unterminated reference")),
        Mode::Index(_) => return Err(reader.error("unterminated reference index")),
        Mode::Comment => return Err(reader.error("unterminated comment")),
    }
    Ok(consolidate(&reader.trie))
}

pub(crate) fn import(lines: &[&str], header: &Header, source_name: &str) -> Result<Trie, TrieError> {
    read_stream(lines, header, source_name, Dialect::V3)
}
