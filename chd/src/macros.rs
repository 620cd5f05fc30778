//! Compile time construction.
//!
//! Unlike [`Phf::try_from_keys`](crate::Phf::try_from_keys), [`phf!`] is zero-cost in runtime:
//! the function is built while the macro expands and embedded into the binary as a `static`. Use
//! it whenever the keys are fixed and can be written down as string literals. For keys computed
//! by a program, build the function in `build.rs` and emit it with
//! [`codegen`](chd_bare::codegen) instead.
//!
//!
//! # Errors
//!
//! Problems are reported as compiler errors. Repeated keys are pointed at on both occurrences:
//!
//! ```compile_fail
//! static WORDS: &chd::Phf = chd::phf! {
//!     "alpha", "beta", "alpha",
//! };
//! ```
//!
//! Keys must be string literals:
//!
//! ```compile_fail
//! static WORDS: &chd::Phf = chd::phf!(1, 2, 3);
//! ```

#[doc(hidden)]
pub use chd_macros;

// Two reasons for `macro_rules!` instead of a direct reexport:
// 1. Document the accepted syntax.
// 2. Pass `$crate` to the macro.

/// Create a [`Phf`](crate::Phf) in compile time.
///
/// See [module-level documentation](self) for more information.
///
///
/// # Example
///
/// [`phf!`] returns a `&'static Phf`:
///
/// ```rust
/// static WORDS: &chd::Phf = chd::phf! {
///     "alpha", "beta", "gamma",
/// };
///
/// let indices = [WORDS.evaluate("alpha"), WORDS.evaluate("beta"), WORDS.evaluate("gamma")];
/// assert!(indices.iter().all(|&index| index < WORDS.output_size()));
/// assert!(indices[0] != indices[1] && indices[1] != indices[2] && indices[0] != indices[2]);
/// ```
///
///
/// # Settings
///
/// [`Settings`](crate::Settings) can be overridden by `name = literal;` pairs before the keys.
/// Recognized names are `seed`, `alpha`, `items_per_bucket`, `division_mode`, and
/// `displacement_limit`:
///
/// ```rust
/// static PRIMES: &chd::Phf = chd::phf! {
///     seed = 7;
///     alpha = 90;
///     division_mode = true;
///     "two", "three", "five", "seven",
/// };
///
/// assert_eq!(PRIMES.seed(), 7);
/// assert!(PRIMES.division_mode());
/// ```
#[cfg(doc)]
#[macro_export]
macro_rules! phf {
    // Not actually valid/usable macro rules, but close enough for docs.
    (
        $($setting:ident = $value:literal;)*
        $($key:literal),* $(,)?
    ) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! phf {
    ($($tt:tt)*) => {
        $crate::macros::chd_macros::phf!(crate $crate; $($tt)*)
    };
}

pub use phf;
