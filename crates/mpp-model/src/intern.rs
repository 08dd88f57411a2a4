//! Type interning for structural deduplication.
//!
//! Converts `TypeData` trees into `TypeId` handles so that structural type
//! equality inside one session is a `u32` compare. The interner is shared by
//! every session of a `DeclarationStore` and may be extended from several
//! checking threads (substitution creates new types on the fly).

use crate::ids::TypeParamId;
use crate::types::{TypeArgument, TypeArguments, TypeData, TypeId};
use mpp_common::Atom;
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + std::hash::Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

/// Type interning table.
pub struct TypeInterner {
    types: RwLock<ValueInterner<TypeData>>,
    error: Arc<TypeData>,
}

impl TypeInterner {
    /// Create a new interner with `TypeId::ERROR` pre-registered.
    pub fn new() -> Self {
        let mut types = ValueInterner::new();
        let error = types.intern(TypeData::Error);
        debug_assert_eq!(error, TypeId::ERROR.0);
        TypeInterner {
            types: RwLock::new(types),
            error: Arc::new(TypeData::Error),
        }
    }

    pub fn intern(&self, data: TypeData) -> TypeId {
        if data == TypeData::Error {
            return TypeId::ERROR;
        }
        // Fast path: already interned.
        {
            let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(&id) = types.map.get(&data) {
                return TypeId(id);
            }
        }
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        TypeId(types.intern(data))
    }

    /// Structural data for `id`. Unknown ids read as the error type.
    pub fn lookup(&self, id: TypeId) -> Arc<TypeData> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.0).unwrap_or_else(|| self.error.clone())
    }

    pub fn class(&self, fq_name: Atom, args: TypeArguments, nullable: bool) -> TypeId {
        self.intern(TypeData::Class {
            fq_name,
            args,
            nullable,
        })
    }

    /// Non-generic, non-null class type.
    pub fn simple_class(&self, fq_name: Atom) -> TypeId {
        self.class(fq_name, TypeArguments::new(), false)
    }

    pub fn type_param(&self, param: TypeParamId, nullable: bool) -> TypeId {
        self.intern(TypeData::TypeParameter { param, nullable })
    }

    /// `id` with its top-level nullability forced on or off.
    pub fn with_nullability(&self, id: TypeId, nullable: bool) -> TypeId {
        match &*self.lookup(id) {
            TypeData::Error => TypeId::ERROR,
            TypeData::Class {
                fq_name,
                args,
                nullable: current,
            } => {
                if *current == nullable {
                    id
                } else {
                    self.class(*fq_name, args.clone(), nullable)
                }
            }
            TypeData::TypeParameter {
                param,
                nullable: current,
            } => {
                if *current == nullable {
                    id
                } else {
                    self.type_param(*param, nullable)
                }
            }
        }
    }

    /// Argument list of a class type; empty for anything else.
    pub fn type_arguments(&self, id: TypeId) -> TypeArguments {
        match &*self.lookup(id) {
            TypeData::Class { args, .. } => args.clone(),
            _ => TypeArguments::new(),
        }
    }

    pub fn class_name(&self, id: TypeId) -> Option<Atom> {
        match &*self.lookup(id) {
            TypeData::Class { fq_name, .. } => Some(*fq_name),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }

    pub fn is_empty(&self) -> bool {
        // The error type is always present.
        false
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner")
            .field("len", &self.len())
            .finish()
    }
}

/// Invariant argument list, as used for a class applied to its own parameters.
pub(crate) fn arguments_of(params: impl IntoIterator<Item = TypeId>) -> TypeArguments {
    params.into_iter().map(TypeArgument::Invariant).collect()
}
