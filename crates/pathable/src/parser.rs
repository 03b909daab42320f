use pathable_base::{PathableResult, Segment, construction_err};

use crate::path_value::PathValue;

/// Default separator used when none is configured.
pub const SEPARATOR: char = '/';

/// One constructor argument, before canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PathArg {
    /// Text, split on the separator.
    Text(String),
    /// Byte string, decoded as ASCII and then treated as text.
    Bytes(Vec<u8>),
    /// Integer, kept as a single index segment.
    Int(i128),
    /// Segments of another path, spliced in.
    Segments(Vec<Segment>),
}

impl From<&str> for PathArg {
    fn from(text: &str) -> Self {
        PathArg::Text(text.to_string())
    }
}

impl From<String> for PathArg {
    fn from(text: String) -> Self {
        PathArg::Text(text)
    }
}

impl From<&String> for PathArg {
    fn from(text: &String) -> Self {
        PathArg::Text(text.clone())
    }
}

impl From<&[u8]> for PathArg {
    fn from(bytes: &[u8]) -> Self {
        PathArg::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for PathArg {
    fn from(bytes: &[u8; N]) -> Self {
        PathArg::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PathArg {
    fn from(bytes: Vec<u8>) -> Self {
        PathArg::Bytes(bytes)
    }
}

macro_rules! int_path_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathArg {
                fn from(value: $ty) -> Self {
                    PathArg::Int(i128::from(value))
                }
            }
        )*
    };
}

int_path_arg!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<usize> for PathArg {
    fn from(value: usize) -> Self {
        PathArg::Int(value as i128)
    }
}

impl From<Segment> for PathArg {
    fn from(segment: Segment) -> Self {
        PathArg::Segments(vec![segment])
    }
}

impl From<&Segment> for PathArg {
    fn from(segment: &Segment) -> Self {
        PathArg::Segments(vec![segment.clone()])
    }
}

impl From<&PathValue> for PathArg {
    fn from(path: &PathValue) -> Self {
        PathArg::Segments(path.segments().to_vec())
    }
}

impl From<PathValue> for PathArg {
    fn from(path: PathValue) -> Self {
        PathArg::Segments(path.segments().to_vec())
    }
}

/// Builds a `Vec<PathArg>` from mixed argument types.
///
/// ```
/// use pathable::{PathArg, path_args};
///
/// let args = path_args!["a/b", 0, b"c"];
/// assert_eq!(args[1], PathArg::Int(0));
/// let none: Vec<PathArg> = path_args![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! path_args {
    () => {
        ::std::vec::Vec::<$crate::PathArg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::PathArg::from($arg)),+]
    };
}

/// Splits text on `separator`, dropping empty and `"."` tokens.
pub(crate) fn split_text(text: &str, separator: char, out: &mut Vec<Segment>) {
    out.extend(
        text.split(separator)
            .filter(|token| !token.is_empty() && *token != ".")
            .map(Segment::from),
    );
}

/// Canonicalize constructor arguments into an ordered segment sequence.
///
/// Text is split on `separator`; spliced segments of another path are re-split the
/// same way, so a key holding the separator never survives into the result.
pub fn canonicalize<I, A>(args: I, separator: char) -> PathableResult<Vec<Segment>>
where
    I: IntoIterator<Item = A>,
    A: Into<PathArg>,
{
    let mut segments = Vec::new();
    for arg in args {
        match arg.into() {
            PathArg::Text(text) => split_text(&text, separator, &mut segments),
            PathArg::Bytes(bytes) => {
                if !bytes.is_ascii() {
                    return Err(construction_err!(
                        "byte argument is not ASCII text: {:?}",
                        String::from_utf8_lossy(&bytes)
                    ));
                }
                let text = String::from_utf8_lossy(&bytes);
                split_text(&text, separator, &mut segments);
            }
            PathArg::Int(value) => {
                let index = i64::try_from(value).map_err(|_| {
                    construction_err!("integer argument {} does not fit a segment index", value)
                })?;
                segments.push(Segment::Index(index));
            }
            PathArg::Segments(spliced) => {
                for segment in spliced {
                    match segment {
                        Segment::Key(key) => split_text(&key, separator, &mut segments),
                        index @ Segment::Index(_) => segments.push(index),
                    }
                }
            }
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(segments: &[&str]) -> Vec<Segment> {
        segments.iter().map(|s| Segment::from(*s)).collect()
    }

    #[test]
    fn test_empty() {
        let result = canonicalize(path_args![], SEPARATOR).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_simple() {
        let result = canonicalize(["test", "test1", "test2"], SEPARATOR).unwrap();
        assert_eq!(result, keys(&["test", "test1", "test2"]));
    }

    #[test]
    fn test_separator_splits_in_order() {
        let result = canonicalize(["a/b", "c"], SEPARATOR).unwrap();
        assert_eq!(result, keys(&["a", "b", "c"]));
    }

    #[test]
    fn test_drops_empty_and_current_dir() {
        let result = canonicalize(["test", ".", "test1/./test2//", ""], SEPARATOR).unwrap();
        assert_eq!(result, keys(&["test", "test1", "test2"]));
    }

    #[test]
    fn test_custom_separator() {
        let result = canonicalize(["a.b", "c/d"], '.').unwrap();
        assert_eq!(result, keys(&["a", "b", "c/d"]));
    }

    #[test]
    fn test_integers_kept_as_indices() {
        let result = canonicalize(path_args!["list", 0, 2usize], SEPARATOR).unwrap();
        assert_eq!(
            result,
            vec![Segment::from("list"), Segment::Index(0), Segment::Index(2)]
        );
    }

    #[test]
    fn test_bytes_decoded() {
        let result = canonicalize(path_args![b"part1/part2"], SEPARATOR).unwrap();
        assert_eq!(result, keys(&["part1", "part2"]));
    }

    #[test]
    fn test_non_ascii_bytes_rejected() {
        let err = canonicalize(path_args![vec![0xffu8, 0x41]], SEPARATOR).unwrap_err();
        assert!(err.to_string().starts_with("invalid path construction"));
    }

    #[test]
    fn test_oversized_integer_rejected() {
        let err = canonicalize(path_args![u64::MAX], SEPARATOR).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_spliced_path_value() {
        let inner = PathValue::from("x/y");
        let result = canonicalize(path_args![&inner, "z"], SEPARATOR).unwrap();
        assert_eq!(result, keys(&["x", "y", "z"]));
    }

    #[test]
    fn test_idempotent() {
        let once = canonicalize(path_args!["a/./b", 3, "c//d"], SEPARATOR).unwrap();
        let twice = canonicalize(once.clone(), SEPARATOR).unwrap();
        assert_eq!(once, twice);
    }
}
