//! Dot-notation paths into nested values.

use crate::error::{CoreError, CoreResult};
use jsondb_codec::type_name;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A parsed dot-notation path such as `settings.theme` or `teams[0].name`.
///
/// Bracket indexes are sugar for numeric segments: `a.b[0].c` is the same
/// path as `a.b.0.c`. Numeric segments index arrays; on objects they are
/// ordinary keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    segments: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    Char,
    Dot,
    Close,
}

impl Path {
    /// Parses a path.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] for empty paths, empty segments
    /// (`a..b`, `.a`, `a.`), and malformed bracket indexes.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let invalid = |reason| CoreError::invalid_path(raw, reason);
        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut last = Last::Start;
        let mut chars = raw.chars();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    match last {
                        Last::Start | Last::Dot => return Err(invalid("empty segment")),
                        Last::Char => segments.push(std::mem::take(&mut current)),
                        Last::Close => {}
                    }
                    last = Last::Dot;
                }
                '[' => {
                    match last {
                        Last::Dot => return Err(invalid("empty segment")),
                        Last::Char => segments.push(std::mem::take(&mut current)),
                        Last::Start | Last::Close => {}
                    }
                    let mut index = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) if d.is_ascii_digit() => index.push(d),
                            Some(_) => return Err(invalid("bracket index must be an integer")),
                            None => return Err(invalid("unclosed bracket")),
                        }
                    }
                    if index.is_empty() {
                        return Err(invalid("empty bracket index"));
                    }
                    segments.push(index);
                    last = Last::Close;
                }
                _ => {
                    if last == Last::Close {
                        return Err(invalid("expected '.' or '[' after ']'"));
                    }
                    current.push(c);
                    last = Last::Char;
                }
            }
        }

        match last {
            Last::Dot => return Err(invalid("empty segment")),
            Last::Char => segments.push(current),
            Last::Start | Last::Close => {}
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for Path {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// How many `null`s a write may pad an array with to reach its index.
const MAX_INDEX_GAP: usize = 4096;

/// Parses a segment as an array index: `0` or a digit string without a
/// leading zero.
fn as_index(segment: &str) -> Option<usize> {
    if segment.is_empty()
        || !segment.bytes().all(|b| b.is_ascii_digit())
        || (segment.len() > 1 && segment.starts_with('0'))
    {
        return None;
    }
    segment.parse().ok()
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => as_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => as_index(segment).and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

/// Returns the value at `path`, if any.
pub(crate) fn get<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(root, |value, segment| child(value, segment))
}

/// Returns the value at `path` for in-place changes, if any.
pub(crate) fn get_mut<'a>(root: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    path.segments
        .iter()
        .try_fold(root, |value, segment| child_mut(value, segment))
}

/// Returns the slot for `segment` in `container`, creating it as `null`.
fn slot<'a>(container: &'a mut Value, segment: &str, path: &Path) -> CoreResult<&'a mut Value> {
    match container {
        Value::Object(map) => Ok(map.entry(segment.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = as_index(segment).ok_or_else(|| {
                CoreError::shape(
                    format!("segment {segment:?} of path {path}"),
                    "an object",
                    "array",
                )
            })?;
            if index.saturating_sub(items.len()) > MAX_INDEX_GAP {
                return Err(CoreError::invalid_path(
                    path.as_str(),
                    "array index is too far past the end",
                ));
            }
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            Ok(&mut items[index])
        }
        other => Err(CoreError::shape(
            format!("segment {segment:?} of path {path}"),
            "an object or array",
            type_name(other),
        )),
    }
}

/// Writes `value` at `path`, creating intermediate containers.
///
/// A missing or scalar intermediate becomes an array when the next segment
/// is an index and an object otherwise. Array indexes past the end pad the
/// array with `null`, at most `MAX_INDEX_GAP` of them; an index further out
/// is an `InvalidPath` error.
pub(crate) fn set(root: &mut Value, path: &Path, value: Value) -> CoreResult<()> {
    let (last, parents) = path
        .segments
        .split_last()
        .ok_or_else(|| CoreError::invalid_path(path.as_str(), "path is empty"))?;

    let mut current = root;
    for (i, segment) in parents.iter().enumerate() {
        let next = current_next(parents, last, i);
        let target = slot(current, segment, path)?;
        if !matches!(target, Value::Object(_) | Value::Array(_)) {
            *target = if as_index(next).is_some() {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
        }
        current = target;
    }

    *slot(current, last, path)? = value;
    Ok(())
}

fn current_next<'a>(parents: &'a [String], last: &'a str, i: usize) -> &'a str {
    parents.get(i + 1).map_or(last, String::as_str)
}

/// Removes and returns the value at `path`.
///
/// Removing an array element shifts the following elements down.
pub(crate) fn remove(root: &mut Value, path: &Path) -> Option<Value> {
    let (last, parents) = path.segments.split_last()?;
    let parent = parents
        .iter()
        .try_fold(root, |value, segment| child_mut(value, segment))?;

    match parent {
        Value::Object(map) => map.shift_remove(last.as_str()),
        Value::Array(items) => {
            let index = as_index(last).filter(|i| *i < items.len())?;
            Some(items.remove(index))
        }
        _ => None,
    }
}
