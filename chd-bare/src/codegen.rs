#![cfg(feature = "codegen")]

//! Code generation.
//!
//! This module is useful for building perfect hash functions in `build.rs` and embedding them
//! into the binary, so that no construction happens at runtime.
//!
//! [`Phf`](crate::Phf), integers, booleans, strings, arrays, slices, and options can be
//! codegen-ed. For custom types (e.g. a table of values indexed by the function), implement the
//! [`Codegen`] trait manually.
//!
//! The generated code never allocates: the displacement map is emitted as a `&'static [u32]`, so
//! the result can initialize a `static` or a `const`.
//!
//!
//! # Typing
//!
//! The generated values are not guaranteed to contain enough type annotations to infer the exact
//! type that was generated. For example, `1u64` will be generated as just `1`.
//!
//! If necessary, add type annotations manually at the call site.
//!
//!
//! # Example
//!
//! ```rust
//! # extern crate chd_bare as chd;
//! # fn main() -> Result<(), chd::BuildError> {
//! let phf = chd::Phf::try_from_keys(&["alpha", "beta", "gamma"], &chd::Settings::new())?;
//!
//! // Convert to code
//! let code = chd::codegen::CodeGenerator::new().generate(&phf);
//! assert!(code.to_string().contains("__from_raw_parts"));
//! # Ok(())
//! # }
//! ```
//!
//! ```ignore
//! // Immutable function, built at compile time
//! static WORDS: chd::Phf = include!(concat!(env!("OUT_DIR"), "/words.rs"));
//! ```

use alloc::{
    borrow::ToOwned,
    format,
    string::{String, ToString},
    vec::Vec,
};
use proc_macro2::{Ident, Literal, TokenStream, TokenTree};
use quote::{format_ident, quote};
use std::collections::{HashMap, HashSet};

/// Code generator.
pub struct CodeGenerator {
    /// Mapping from crate names to paths, as provided with [`set_crate`](Self::set_crate).
    crate_paths: HashMap<String, TokenStream>,

    /// Mapping from paths (as passed to [`path`](Self::path)) to identifiers (as aliased with
    /// `use {path} as {ident};`).
    path_to_alias: HashMap<String, Ident>,

    /// Identifiers already used for aliases.
    aliases: HashSet<String>,
}

impl CodeGenerator {
    /// *This method is a hack to add private documentation to public items.*
    ///
    /// We generate code of the following format:
    ///
    /// ```ignore
    /// { // wrap in braces to add scope to an expression
    ///     use ::chd::Phf as __Phf;
    ///     use ::chd::low_level::Displacements as __Displacements;
    ///     // other imports...
    ///     {piece} // the code returned by `Codegen::generate_piece`
    /// }
    /// ```
    ///
    /// Items are imported with `use` and then used by alias instead of directly. This keeps the
    /// output short, and the mangled names are unlikely to collide with user items.
    #[allow(dead_code, clippy::missing_const_for_fn, reason = "docs hack")]
    fn __private_docs() {}

    /// Create a code generator with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            crate_paths: HashMap::new(),
            path_to_alias: HashMap::new(),
            aliases: HashSet::new(),
        }
    }

    /// Configure name-to-path mapping for crates.
    ///
    /// By default, `chd` is mapped to `::chd`. Reconfiguring this is necessary to generate code
    /// from a proc-macro, where the crate is only reachable through `$crate`.
    #[inline]
    pub fn set_crate(&mut self, name: &str, path: TokenStream) {
        self.crate_paths.insert(name.into(), path);
    }

    /// Turn a value into code.
    #[inline]
    #[must_use]
    pub fn generate<T: Codegen>(mut self, value: &T) -> TokenStream {
        let value = self.piece(value);

        let mut uses = Vec::new();
        for (path, alias) in core::mem::take(&mut self.path_to_alias) {
            let (crate_name, rest) = path.split_once("::").unwrap_or((path.as_str(), ""));
            let crate_path = if let Some(crate_path) = self.crate_paths.get(crate_name) {
                crate_path.clone()
            } else {
                let ident = format_ident!("{crate_name}");
                quote!(:: #ident)
            };
            let components = rest
                .split("::")
                .filter(|component| !component.is_empty())
                .map(|component| format_ident!("{component}"));

            uses.push(quote!(use #crate_path #(:: #components)* as #alias;));
        }
        // Deterministic output, regardless of hash map order
        uses.sort_by_cached_key(ToString::to_string);

        quote!(
            {
                #(#uses)*
                #value
            }
        )
    }

    /// Turn a value into a recursively useable piece of code.
    #[inline]
    pub fn piece<T: Codegen>(&mut self, piece: &T) -> TokenStream {
        piece.generate_piece(self)
    }

    /// Produce code for an array from an iterator.
    #[inline]
    pub fn array<'a, T: 'a + Codegen>(
        &mut self,
        elements: impl IntoIterator<Item = &'a T>,
    ) -> TokenStream {
        let elements = elements.into_iter().map(|element| self.piece(element));
        quote!([#(#elements),*])
    }

    /// Resolve a path.
    ///
    /// The input string must look like `crate::path::inside::it`, or just `crate`. Semantically,
    /// this path must be `use`able. This is different from using the path directly for two reasons:
    ///
    /// - This method resolves crates according to the paths configured by
    ///   [`CodeGenerator::set_crate`].
    /// - This method replaces long paths with short aliases imported just once with `use`, reducing
    ///   code size.
    #[inline]
    pub fn path(&mut self, path: &str) -> TokenStream {
        if let Some(alias) = self.path_to_alias.get(path) {
            return quote!(#alias);
        }

        let base = format!("__{}", path.rsplit_once("::").map_or(path, |(_, last)| last));
        let mut alias = base.clone();
        let mut suffix = 2_u32;
        while self.aliases.contains(&alias) {
            alias = format!("{base}{suffix}");
            suffix = suffix.wrapping_add(1);
        }
        self.aliases.insert(alias.clone());

        let alias = format_ident!("{alias}");
        self.path_to_alias.insert(path.to_owned(), alias.clone());
        quote!(#alias)
    }
}

impl Default for CodeGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Values that can be turned into code.
///
/// This trait is a subtrait of `Sized`, as Rust expressions can only evaluate to sized objects.
///
///
/// # Private constructors
///
/// Types like [`Phf`](crate::Phf) don't have public constructors that consume all the stored
/// state. Generated code calls a public constructor with a mangled name and `#[doc(hidden)]`
/// instead, such as `Phf::__from_raw_parts`.
pub trait Codegen: Sized {
    /// Emit a piece of code corresponding to this value.
    ///
    /// This method is only supposed to be called recursively from [`Codegen`] implementations. Call
    /// [`CodeGenerator::generate`] to produce the complete code output for a single value.
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream;
}

/// Implement [`Codegen`] for types by calling methods on [`Literal`].
macro_rules! literal {
    ($($ty:ty => $method:ident,)*) => {
        $(
            impl Codegen for $ty {
                #[inline]
                fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
                    TokenTree::Literal(Literal::$method(*self)).into()
                }
            }
        )*
    };
}

literal! {
    u8 => u8_unsuffixed,
    u16 => u16_unsuffixed,
    u32 => u32_unsuffixed,
    u64 => u64_unsuffixed,
    usize => usize_unsuffixed,
    // We can't codegen `str` itself, as it's `!Sized`, so do the next best thing.
    &'_ str => string,
}

impl Codegen for bool {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        TokenTree::Ident(format_ident!("{self}")).into()
    }
}

impl<T: Codegen, const N: usize> Codegen for [T; N] {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        gen.array(self)
    }
}

impl<T: Codegen> Codegen for &T {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let target = gen.piece(*self);
        quote!(&#target)
    }
}

impl<T: Codegen> Codegen for &[T] {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let array = gen.array(*self);
        quote!(&#array)
    }
}

impl<T: Codegen> Codegen for Option<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        match &self {
            None => gen.path("core::option::Option::None"),
            Some(value) => {
                let some = gen.path("core::option::Option::Some");
                let value = gen.piece(value);
                quote!(#some(#value))
            }
        }
    }
}
