//! `Describe` implementations for scalars and standard containers.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use super::{Describe, ScalarKind, TypeDesc};

macro_rules! describe_scalar {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDesc {
                    TypeDesc::Scalar($kind)
                }
            }
        )*
    };
}

describe_scalar! {
    bool => ScalarKind::Bool,
    char => ScalarKind::Char,
    String => ScalarKind::Str,
    PathBuf => ScalarKind::Path,
    i8 => ScalarKind::Int { bits: 8, signed: true },
    i16 => ScalarKind::Int { bits: 16, signed: true },
    i32 => ScalarKind::Int { bits: 32, signed: true },
    i64 => ScalarKind::Int { bits: 64, signed: true },
    isize => ScalarKind::Int { bits: 64, signed: true },
    u8 => ScalarKind::Int { bits: 8, signed: false },
    u16 => ScalarKind::Int { bits: 16, signed: false },
    u32 => ScalarKind::Int { bits: 32, signed: false },
    u64 => ScalarKind::Int { bits: 64, signed: false },
    usize => ScalarKind::Int { bits: 64, signed: false },
    f32 => ScalarKind::Float { bits: 32 },
    f64 => ScalarKind::Float { bits: 64 },
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDesc {
        TypeDesc::Optional(Box::new(T::describe()))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDesc {
        TypeDesc::Sequence(Box::new(T::describe()))
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn describe() -> TypeDesc {
        TypeDesc::Sequence(Box::new(T::describe()))
    }
}

impl<T: Describe> Describe for Box<[T]> {
    fn describe() -> TypeDesc {
        TypeDesc::VariableTuple(Box::new(T::describe()))
    }
}

// Boxing only adds indirection; a boxed record is still resolved lazily,
// which is what lets the builder report self-referential records.
impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDesc {
        T::describe()
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe() -> TypeDesc {
        TypeDesc::Set(Box::new(T::describe()))
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe() -> TypeDesc {
        TypeDesc::Set(Box::new(T::describe()))
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDesc {
        TypeDesc::Mapping(Box::new(K::describe()), Box::new(V::describe()))
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDesc {
        TypeDesc::Mapping(Box::new(K::describe()), Box::new(V::describe()))
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDesc {
        TypeDesc::FixedTuple(vec![T::describe(); N])
    }
}

macro_rules! describe_tuple {
    ($($name:ident),+) => {
        impl<$($name: Describe),+> Describe for ($($name,)+) {
            fn describe() -> TypeDesc {
                TypeDesc::FixedTuple(vec![$($name::describe()),+])
            }
        }
    };
}

describe_tuple!(A);
describe_tuple!(A, B);
describe_tuple!(A, B, C);
describe_tuple!(A, B, C, D);
describe_tuple!(A, B, C, D, E);
describe_tuple!(A, B, C, D, E, F);

macro_rules! describe_opaque {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDesc {
                    TypeDesc::Opaque { name: stringify!($ty) }
                }
            }
        )*
    };
}

// 128-bit integers do not fit the JSON number model used during assembly.
describe_opaque!(i128, u128, ());
