//! Structural type representation.
//!
//! Types are small trees over class constructors (identified by their fully
//! qualified name) and type-parameter references. Class constructors are
//! deliberately name-based rather than `DeclId`-based: the same name resolves
//! to different declarations depending on which module's session looks it
//! up, which is exactly what expect/actual matching needs.

use crate::ids::TypeParamId;
use mpp_common::Atom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Unresolved / erroneous type. Always interned at index 0.
    pub const ERROR: TypeId = TypeId(0);

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}

/// Declaration-site or use-site variance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

impl Variance {
    pub const fn keyword(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::In => "in",
            Variance::Out => "out",
        }
    }
}

/// A type argument with its use-site projection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// `*`
    Star,
    Invariant(TypeId),
    /// `out T`
    Out(TypeId),
    /// `in T`
    In(TypeId),
}

impl TypeArgument {
    pub const fn projected(variance: Variance, ty: TypeId) -> Self {
        match variance {
            Variance::Invariant => TypeArgument::Invariant(ty),
            Variance::In => TypeArgument::In(ty),
            Variance::Out => TypeArgument::Out(ty),
        }
    }

    /// The argument type, `None` for a star projection.
    pub const fn type_id(self) -> Option<TypeId> {
        match self {
            TypeArgument::Star => None,
            TypeArgument::Invariant(ty) | TypeArgument::Out(ty) | TypeArgument::In(ty) => Some(ty),
        }
    }

    /// Same projection kind with a different argument type.
    pub const fn with_type(self, ty: TypeId) -> Self {
        match self {
            TypeArgument::Star => TypeArgument::Star,
            TypeArgument::Invariant(_) => TypeArgument::Invariant(ty),
            TypeArgument::Out(_) => TypeArgument::Out(ty),
            TypeArgument::In(_) => TypeArgument::In(ty),
        }
    }

    pub fn same_projection(self, other: Self) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

pub type TypeArguments = SmallVec<[TypeArgument; 2]>;

/// Structural type data, hash-consed by `TypeInterner`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// Unresolved type; produced by the host for references it could not bind.
    Error,
    /// `fq.Name<args>?`
    Class {
        fq_name: Atom,
        args: TypeArguments,
        nullable: bool,
    },
    /// Reference to a type parameter, `T` or `T?`.
    TypeParameter { param: TypeParamId, nullable: bool },
}

impl TypeData {
    pub const fn is_nullable(&self) -> bool {
        match self {
            TypeData::Error => false,
            TypeData::Class { nullable, .. } | TypeData::TypeParameter { nullable, .. } => {
                *nullable
            }
        }
    }
}
