//! Test macros.

/// Name of the enclosing function, as a `&'static str`.
///
/// Works inside `#[test]` functions and inside async test bodies.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::test_name_from_type_name(type_name_of(f))
    }};
}

/// Create a [`SnapContext`](crate::SnapContext) for the enclosing test.
///
/// Snapshots are named after the test source file and the test function,
/// and stored next to the source file (in `__snapshots__` unless `snap.toml`
/// says otherwise).
///
/// # Panics
///
/// Panics when `snap.toml` is invalid.
///
/// # Example
///
/// ```ignore
/// use layered_snap_harness::snap_context;
///
/// #[test]
/// fn test_render_report() {
///     let mut snaps = snap_context!();
///     snaps.snap(".txt", &render_report(), Some(3));
/// }
/// ```
#[macro_export]
macro_rules! snap_context {
    () => {
        $crate::SnapContext::for_test(
            env!("CARGO_MANIFEST_DIR"),
            file!(),
            $crate::function_name!(),
        )
        .unwrap_or_else(|err| panic!("{}", err))
    };
}
