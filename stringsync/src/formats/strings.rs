//! Support for Apple `.strings` localization files.
//!
//! A file holds `"key" = "value";` lines mixed with `//` and `/* */` comments and blank
//! lines. Quotes around the key are optional when reading and always written.
//!
//! Two ways of writing are provided:
//! - [`Format::from_source`] + [`Parser::to_writer`] rewrite a whole file, dropping any
//!   comments or layout it had.
//! - [`patch_lines`] rewrites only the lines assigning keys that already exist, keeping
//!   every other line byte for byte.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{error::Error, traits::Parser, types::Source};

/// Represents the parsed content of one `.strings` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs in file order. Comments are not kept.
    pub pairs: Vec<Pair>,
}

impl Format {
    /// Builds the full content of the `locale` file of `source`: one pair per entry in
    /// source order, empty when the entry has no text for that locale.
    pub fn from_source(source: &Source, locale: &str) -> Self {
        let pairs = source
            .entries()
            .iter()
            .map(|entry| Pair {
                key: entry.key.clone(),
                value: entry.get(locale).unwrap_or_default().to_string(),
            })
            .collect();
        Format { pairs }
    }

    /// Adds every pair of this file to `source` as a `locale` translation.
    pub fn add_to(&self, source: &mut Source, locale: &str) {
        for pair in &self.pairs {
            source.add_translation(pair.key.as_str(), locale, pair.value.as_str());
        }
    }

    fn parse(content: &str) -> Self {
        let stripped = strip_comments(content);
        Format {
            pairs: stripped.lines().filter_map(parse_line).collect(),
        }
    }
}

impl Parser for Format {
    /// Lines that are not assignments are ignored, as are lines emptied by comment removal.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let content = reader.lines().collect::<Result<Vec<_>, _>>()?.join("\n");
        Ok(Format::parse(&content))
    }

    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::new();
        for pair in &self.pairs {
            content.push_str(&pair.to_string());
            content.push('\n');
        }
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// Decodes UTF-16 files written by Xcode as well as plain UTF-8.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Ok(Format::parse(&read_text(path)?))
    }
}

/// Reads a whole file, decoding UTF-16 when it starts with a BOM and passing UTF-8
/// through.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .strip_bom(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
    Ok(decoded)
}

/// A single key-value pair in a `.strings` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" = \"{}\";", self.key, self.value)
    }
}

/// Removes `//` line comments and `/* */` block comments.
///
/// Comment markers inside double-quoted strings are text, not comments. Newlines inside
/// a block comment are kept so the output has the same lines as the input.
pub fn strip_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut inside_string = false;

    while let Some(c) = chars.next() {
        if inside_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' | '\n' => inside_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                inside_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        result.push('\n');
                    }
                    previous = next;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

fn parse_line(line: &str) -> Option<Pair> {
    let line = line.trim();
    let line = line.strip_suffix(';').unwrap_or(line).trim_end();
    let (key, value) = line.split_once('=')?;

    let key = unquote(key.trim());
    if key.is_empty() {
        return None;
    }

    Some(Pair {
        key: key.to_string(),
        value: unquote(value.trim()).to_string(),
    })
}

fn unquote(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Result of [`patch_lines`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    /// The rewritten file. Lines keep their `\n` or `\r\n` ending; a last line without
    /// one gets `\n`.
    pub content: String,
    /// Number of lines replaced.
    pub updated: usize,
    /// Keys that had no line to replace.
    pub skipped: Vec<String>,
}

/// Replaces, for every `(key, value)`, the first assignment of `key` with
/// `"key" = "value";`.
///
/// An assignment reads: optional quote, the key, optional quote, `=`, a quoted value, `;`
/// (whitespace allowed in between, anything allowed after). Block comments before it on
/// the same line, including the end of one opened on an earlier line, are skipped and
/// kept; text after the `;` is dropped. Lines wholly inside block comments never match.
/// Keys without an assignment are skipped; this never adds lines.
pub fn patch_lines<K, V>(content: &str, updates: &[(K, V)]) -> Patched
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut lines: Vec<(String, &str)> = content
        .split_inclusive('\n')
        .map(|line| {
            let (body, ending) = split_line_ending(line);
            (body.to_string(), ending)
        })
        .collect();

    let mut positions: HashMap<String, (usize, usize)> = HashMap::new();
    let mut inside_comment = false;
    for (index, (line, _)) in lines.iter().enumerate() {
        if let Some((key, start)) = find_assignment(line, inside_comment) {
            positions.entry(key.to_string()).or_insert((index, start));
        }
        inside_comment = ends_inside_comment(line, inside_comment);
    }

    let mut updated = 0;
    let mut skipped = Vec::new();
    for (key, value) in updates {
        let key = key.as_ref();
        match positions.get(key) {
            Some(&(index, start)) => {
                let line = &mut lines[index].0;
                line.truncate(start);
                line.push_str(
                    &Pair {
                        key: key.to_string(),
                        value: value.as_ref().to_string(),
                    }
                    .to_string(),
                );
                updated += 1;
            }
            None => skipped.push(key.to_string()),
        }
    }

    let mut content = String::with_capacity(content.len() + 1);
    for (line, ending) in &lines {
        content.push_str(line);
        content.push_str(ending);
    }

    Patched {
        content,
        updated,
        skipped,
    }
}

fn split_line_ending(line: &str) -> (&str, &'static str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "\n")
    }
}

/// Finds the assignment on `line`, after the end of a block comment still open from
/// earlier lines and any `/* */` blocks in front of it.
///
/// Returns the key and the byte offset where the assignment starts.
fn find_assignment(line: &str, inside_comment: bool) -> Option<(&str, usize)> {
    let mut start = if inside_comment {
        line.find("*/")? + 2
    } else {
        0
    };

    loop {
        let rest = &line[start..];
        let trimmed = rest.trim_start();
        start += rest.len() - trimmed.len();
        match trimmed.strip_prefix("/*") {
            Some(comment) => start += 2 + comment.find("*/")? + 2,
            None => break,
        }
    }

    assigned_key(&line[start..]).map(|key| (key, start))
}

/// Returns the key `text` assigns when it starts with an assignment.
fn assigned_key(text: &str) -> Option<&str> {
    if text.starts_with("//") {
        return None;
    }

    let (key, rest) = match text.strip_prefix('"') {
        Some(quoted) => {
            let end = closing_quote(quoted)?;
            (&quoted[..end], &quoted[end + 1..])
        }
        None => {
            let end = text.find('=')?;
            (text[..end].trim_end(), &text[end..])
        }
    };
    if key.is_empty() {
        return None;
    }

    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let value = rest.strip_prefix('"')?;
    let end = closing_quote(value)?;
    value[end + 1..].trim_start().strip_prefix(';')?;

    Some(key)
}

/// Byte offset of the first unescaped `"` in `text`.
fn closing_quote(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(index),
            _ => {}
        }
    }
    None
}

/// Whether a block comment is still open at the end of `line`.
fn ends_inside_comment(line: &str, mut inside_comment: bool) -> bool {
    let mut chars = line.chars().peekable();
    let mut inside_string = false;

    while let Some(c) = chars.next() {
        if inside_comment {
            if c == '*' && chars.next_if_eq(&'/').is_some() {
                inside_comment = false;
            }
        } else if inside_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => inside_string = false,
                _ => {}
            }
        } else {
            match c {
                '"' => inside_string = true,
                '/' if chars.next_if_eq(&'*').is_some() => inside_comment = true,
                '/' if chars.peek() == Some(&'/') => return false,
                _ => {}
            }
        }
    }

    inside_comment
}
