/* 📖 # Why is PathValue separate from Path?

Everything pathlib-like about a path (joining, parents, name and suffix views,
relative_to) depends only on the segment sequence and the separator. PathValue holds
exactly those two things and nothing that could touch a backing store, so it can be
compared, hashed, sorted and derived freely. Path adds the accessor on top.

Segments live in an `Arc<[Segment]>`: a PathValue is never mutated after
construction, and cloning one is a refcount bump.
*/

use std::cmp::Ordering;
use std::fmt;
use std::ops::Div;
use std::sync::Arc;

use pathable_base::{PathableResult, Segment, construction_err};

use crate::parser::{PathArg, SEPARATOR, canonicalize, split_text};

/// Immutable `(segments, separator)` pair with pathlib-style derived views.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PathValue {
    segments: Arc<[Segment]>,
    separator: char,
}

impl PathValue {
    /// Parse constructor arguments using the default separator.
    pub fn new<I, A>(args: I) -> PathableResult<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<PathArg>,
    {
        Self::with_separator(args, SEPARATOR)
    }

    /// Parse constructor arguments, splitting text on `separator`.
    pub fn with_separator<I, A>(args: I, separator: char) -> PathableResult<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<PathArg>,
    {
        let segments = canonicalize(args, separator)?;
        Ok(Self::from_parsed(segments, separator))
    }

    /// The path with no segments.
    pub fn empty(separator: char) -> Self {
        Self::from_parsed(Vec::new(), separator)
    }

    /// Wraps segments that are already canonical for `separator`.
    pub(crate) fn from_parsed(segments: Vec<Segment>, separator: char) -> Self {
        Self {
            segments: segments.into(),
            separator,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn extended(&self, extra: impl IntoIterator<Item = Segment>) -> Self {
        let mut segments = self.segments.to_vec();
        segments.extend(extra);
        Self::from_parsed(segments, self.separator)
    }

    /// Append canonicalized arguments.
    pub fn join<I, A>(&self, args: I) -> PathableResult<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<PathArg>,
    {
        let extra = canonicalize(args, self.separator)?;
        Ok(self.extended(extra))
    }

    /// Append one already-parsed segment. Text keys must not contain the separator.
    pub(crate) fn join_segment(&self, segment: Segment) -> Self {
        self.extended([segment])
    }

    /// Drop the last segment. The parent of the empty path is itself.
    pub fn parent(&self) -> Self {
        match self.segments.split_last() {
            Some((_, rest)) => Self::from_parsed(rest.to_vec(), self.separator),
            None => self.clone(),
        }
    }

    /// All ancestors, nearest first; the last one is the empty path.
    pub fn parents(&self) -> Vec<Self> {
        (0..self.segments.len())
            .rev()
            .map(|end| Self::from_parsed(self.segments[..end].to_vec(), self.separator))
            .collect()
    }

    /// String form of the last segment, or `""` for the empty path.
    pub fn name(&self) -> String {
        self.segments
            .last()
            .map(|segment| segment.to_string())
            .unwrap_or_default()
    }

    /// Final dot-suffix of the name, e.g. `".gz"`.
    pub fn suffix(&self) -> String {
        let name = self.name();
        match name.rfind('.') {
            Some(i) if i > 0 && i < name.len() - 1 => name[i..].to_string(),
            _ => String::new(),
        }
    }

    /// All dot-suffixes of the name, e.g. `[".tar", ".gz"]`.
    pub fn suffixes(&self) -> Vec<String> {
        let name = self.name();
        if name.ends_with('.') {
            return Vec::new();
        }
        name.trim_start_matches('.')
            .split('.')
            .skip(1)
            .map(|suffix| format!(".{suffix}"))
            .collect()
    }

    /// The name without its final suffix.
    pub fn stem(&self) -> String {
        let name = self.name();
        match name.rfind('.') {
            Some(i) if i > 0 && i < name.len() - 1 => name[..i].to_string(),
            _ => name,
        }
    }

    /// Replace the last segment with `name`.
    pub fn with_name(&self, name: &str) -> PathableResult<Self> {
        if self.segments.is_empty() {
            return Err(construction_err!("{:?} has an empty name", self.to_string()));
        }
        if name.is_empty() || name == "." || name.contains(self.separator) {
            return Err(construction_err!("invalid name {:?}", name));
        }
        let mut segments = self.segments.to_vec();
        if let Some(last) = segments.last_mut() {
            *last = Segment::from(name);
        }
        Ok(Self::from_parsed(segments, self.separator))
    }

    /// Replace the final suffix of the name; an empty `suffix` removes it.
    pub fn with_suffix(&self, suffix: &str) -> PathableResult<Self> {
        if suffix.contains(self.separator)
            || (!suffix.is_empty() && !suffix.starts_with('.'))
            || suffix == "."
        {
            return Err(construction_err!("invalid suffix {:?}", suffix));
        }
        let name = self.name();
        if name.is_empty() {
            return Err(construction_err!("{:?} has an empty name", self.to_string()));
        }
        let old_suffix = self.suffix();
        let base = &name[..name.len() - old_suffix.len()];
        self.with_name(&format!("{base}{suffix}"))
    }

    /// True when the parsed prefix arguments are a leading run of this path.
    ///
    /// Arguments that fail to parse are never a prefix.
    pub fn is_relative_to<I, A>(&self, prefix: I) -> bool
    where
        I: IntoIterator<Item = A>,
        A: Into<PathArg>,
    {
        canonicalize(prefix, self.separator)
            .map(|prefix| self.segments.starts_with(&prefix))
            .unwrap_or(false)
    }

    /// This path with the parsed prefix stripped.
    pub fn relative_to<I, A>(&self, prefix: I) -> PathableResult<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<PathArg>,
    {
        if self.segments.is_empty() {
            return Err(construction_err!("cannot compute relative path of an empty path"));
        }
        let prefix = canonicalize(prefix, self.separator)?;
        if !self.segments.starts_with(&prefix) {
            let prefix = Self::from_parsed(prefix, self.separator);
            return Err(construction_err!(
                "{:?} is not relative to {:?}",
                self.to_string(),
                prefix.to_string()
            ));
        }
        Ok(Self::from_parsed(
            self.segments[prefix.len()..].to_vec(),
            self.separator,
        ))
    }
}

impl Default for PathValue {
    fn default() -> Self {
        Self::empty(SEPARATOR)
    }
}

impl From<&str> for PathValue {
    fn from(text: &str) -> Self {
        let mut segments = Vec::new();
        split_text(text, SEPARATOR, &mut segments);
        Self::from_parsed(segments, SEPARATOR)
    }
}

impl Ord for PathValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.separator
            .cmp(&other.separator)
            .then_with(|| self.segments.cmp(&other.segments))
    }
}

impl PartialOrd for PathValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separator)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathValue({:?})", self.to_string())
    }
}

/// Arguments whose parsing cannot fail, usable with the `/` operator.
pub trait InfallibleArg {
    fn append_to(self, separator: char, segments: &mut Vec<Segment>);
}

impl InfallibleArg for &str {
    fn append_to(self, separator: char, segments: &mut Vec<Segment>) {
        split_text(self, separator, segments);
    }
}

impl InfallibleArg for String {
    fn append_to(self, separator: char, segments: &mut Vec<Segment>) {
        split_text(&self, separator, segments);
    }
}

impl InfallibleArg for i64 {
    fn append_to(self, _separator: char, segments: &mut Vec<Segment>) {
        segments.push(Segment::Index(self));
    }
}

impl InfallibleArg for usize {
    fn append_to(self, _separator: char, segments: &mut Vec<Segment>) {
        segments.push(Segment::from(self));
    }
}

impl InfallibleArg for Segment {
    fn append_to(self, separator: char, segments: &mut Vec<Segment>) {
        match self {
            Segment::Key(key) => split_text(&key, separator, segments),
            index @ Segment::Index(_) => segments.push(index),
        }
    }
}

impl<T: InfallibleArg> Div<T> for &PathValue {
    type Output = PathValue;

    fn div(self, rhs: T) -> PathValue {
        let mut segments = self.segments.to_vec();
        rhs.append_to(self.separator, &mut segments);
        PathValue::from_parsed(segments, self.separator)
    }
}

impl<T: InfallibleArg> Div<T> for PathValue {
    type Output = PathValue;

    fn div(self, rhs: T) -> PathValue {
        &self / rhs
    }
}
