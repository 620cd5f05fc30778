//! Displacement map storage, usable in a `const` context.

use core::ops::Deref;

/// The per-bucket displacement values of a [`Phf`](crate::Phf).
///
/// A function built in runtime owns its map; a function produced by codegen or by the `phf!`
/// macro references a `&'static [u32]` embedded in the binary. Both forms are read-only: a built
/// function is never modified.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Displacements {
    /// Data embedded in the binary.
    Static(&'static [u32]),

    /// Runtime-allocated data.
    #[cfg(feature = "alloc")]
    Owned(alloc::vec::Vec<u32>),
}

impl Displacements {
    /// Reference static data.
    #[inline]
    #[must_use]
    pub const fn from_static(map: &'static [u32]) -> Self {
        Self::Static(map)
    }

    /// The largest stored displacement, or 0 for an empty map.
    #[inline]
    #[must_use]
    pub fn max(&self) -> u32 {
        self.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(feature = "alloc")]
impl From<alloc::vec::Vec<u32>> for Displacements {
    #[inline]
    fn from(map: alloc::vec::Vec<u32>) -> Self {
        Self::Owned(map)
    }
}

impl Deref for Displacements {
    type Target = [u32];

    #[inline]
    fn deref(&self) -> &[u32] {
        match self {
            Self::Static(map) => map,
            #[cfg(feature = "alloc")]
            Self::Owned(map) => map,
        }
    }
}

impl PartialEq for Displacements {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl Eq for Displacements {}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for Displacements {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let displacements = gen.path("chd::low_level::Displacements");
        let map = gen.array(&**self);
        quote::quote!(#displacements::from_static(&#map))
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::Displacements;
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    impl Serialize for Displacements {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for displacement in &**self {
                seq.serialize_element(displacement)?;
            }
            seq.end()
        }
    }

    #[cfg(feature = "alloc")]
    impl<'de> serde::Deserialize<'de> for Displacements {
        #[inline]
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            alloc::vec::Vec::<u32>::deserialize(deserializer).map(Into::into)
        }
    }
}
