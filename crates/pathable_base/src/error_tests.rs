/* 📖 # Why use a separate file for these error tests?

These tests install a global tracing subscriber to observe span traces. Keeping them
apart from the unit tests in error.rs keeps that global setup out of the simple cases.
*/

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{PathableError, PathableResult, ResultExt, Segment};
    use expect_test::expect;
    use std::io;
    use tracing::info_span;
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    /// Set up tracing with ErrorLayer for tests.
    /// Uses `try_init()` to handle multiple tests running concurrently.
    fn setup_tracing_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(ErrorLayer::default())
            .try_init();
    }

    fn resolve_step(segment: &str) -> PathableResult<()> {
        let _span = info_span!("resolve_step", segment).entered();
        Err(Box::new(PathableError::not_found(Some(Segment::from(segment)))))
    }

    #[test]
    fn test_span_trace_captured_in_span() {
        setup_tracing_subscriber();
        let err = resolve_step("missing").unwrap_err();
        let trace = err.span_trace().to_string();
        assert!(trace.contains("resolve_step"), "trace was: {trace}");
    }

    #[test]
    fn test_not_found_rendering() {
        let err = resolve_step("missing")
            .context("reading a/b/missing")
            .unwrap_err();
        expect![[r#"reading a/b/missing: segment not found: missing"#]]
            .assert_eq(&err.to_string());
    }

    #[test]
    fn test_kind_renderings() {
        let rendered: Vec<String> = vec![
            PathableError::not_found(None),
            PathableError::not_traversable(Some(Segment::from("leaf"))),
            PathableError::not_traversable(None),
            PathableError::type_mismatch(Segment::from("a"), "integer index"),
            PathableError::construction("name must not be empty"),
            PathableError::file(
                "dir/file.txt",
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ),
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();
        expect![[r#"
            path not found
            node at segment 'leaf' is not traversable
            root node is not traversable
            segment 'a' has the wrong type: expected integer index
            invalid path construction: name must not be empty
            File error at dir/file.txt: denied"#]]
        .assert_eq(&rendered.join("\n"));
    }

    #[test]
    fn test_pattern_match_on_kind() {
        let err = PathableError::type_mismatch(Segment::from("x"), "integer index");
        match err.kind() {
            ErrorKind::TypeMismatch { segment, expected } => {
                assert_eq!(segment, &Segment::from("x"));
                assert_eq!(*expected, "integer index");
            }
            _ => panic!("Expected TypeMismatch variant"),
        }
    }
}
