//! Helper macro for runtime-support exports.
//!
//! Provides `runtime_fn!`, which generates `pub unsafe extern "C" fn`
//! definitions under either their plain C name or an Itanium-mangled C++ name,
//! and marks them weak when the `weak-linkage` feature is on.

/// Generate an exported runtime-support entry point.
///
/// # Usage
///
/// ```ignore
/// runtime_fn! {
///     /// C-named entry point, exported as `__cxa_example`.
///     fn __cxa_example(arg: usize) -> usize {
///         arg
///     }
/// }
///
/// runtime_fn! {
///     /// C++ operator, exported under the mangled name that matches the
///     /// target's `size_t` (`unsigned long`, `unsigned int`).
///     @mangled("_Znwm", "_Znwj")
///     fn operator_new(size: usize) -> *mut c_void {
///         allocate_or_trap(AllocRequest::plain(size))
///     }
/// }
/// ```
macro_rules! runtime_fn {
    (
        $(#[$meta:meta])*
        @mangled($ulong:literal, $uint:literal)
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) $(-> $ret:ty)?
        $body:block
    ) => {
        $(#[$meta])*
        #[cfg_attr(not(cxxrt_size_t_uint), unsafe(export_name = $ulong))]
        #[cfg_attr(cxxrt_size_t_uint, unsafe(export_name = $uint))]
        #[cfg_attr(feature = "weak-linkage", linkage = "weak")]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) $(-> $ret)?
        $body
    };

    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) $(-> $ret:ty)?
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        #[cfg_attr(feature = "weak-linkage", linkage = "weak")]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) $(-> $ret)?
        $body
    };
}

#[allow(unused_imports)]
pub(crate) use runtime_fn;
