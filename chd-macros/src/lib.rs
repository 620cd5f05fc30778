//! Procedural macros for [`chd`](https://docs.rs/chd). Use that crate instead.

#![allow(clippy::std_instead_of_alloc, reason = "we're not in #[no_std]")]

mod parse;

use self::parse::PhfInput;
use chd::{codegen::CodeGenerator, Phf};
use proc_macro_error2::{emit_call_site_error, emit_error};
use quote::quote;
use std::collections::HashMap;
use syn::{parse_macro_input, LitStr};

/// Report repeated keys on both occurrences.
///
/// Returns `false` if any diagnostics were emitted.
fn check_duplicates(keys: &[LitStr], values: &[String]) -> bool {
    let mut seen = HashMap::new();
    let mut unique = true;
    for (i, value) in values.iter().enumerate() {
        if let Some(j) = seen.insert(value, i) {
            emit_error!(keys[j], "this key is equal to...");
            emit_error!(keys[i], "...this key");
            unique = false;
        }
    }
    unique
}

// This option does not enable the `proc_macro_hack` crate. It only tweaks the error output to be
// valid in expression position.
/// Build a [`Phf`] from string literals during macro expansion.
///
/// Invoke this through `chd::phf!`, which documents the syntax.
#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn phf(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as PhfInput);

    let keys: Vec<LitStr> = input.keys.into_iter().collect();
    let values: Vec<String> = keys.iter().map(LitStr::value).collect();
    if !check_duplicates(&keys, &values) {
        return quote! {}.into();
    }

    let phf = match Phf::try_from_keys(&values, &input.context.settings) {
        Ok(phf) => phf,
        Err(error) => {
            emit_call_site_error!("failed to build a perfect hash function: {}", error);
            return quote! {}.into();
        }
    };

    let krate = input.crate_path.0.unwrap_or_else(|| quote!(::chd));
    let mut gen = CodeGenerator::new();
    gen.set_crate("chd", krate.clone());
    let phf = gen.generate(&phf);
    quote! {{
        static __CHD_PHF: #krate::Phf = #phf;
        &__CHD_PHF
    }}
    .into()
}
