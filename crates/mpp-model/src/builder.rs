//! Fluent construction of declarations before registration in a store.

use crate::declarations::{
    CallableData, CallableKind, ClassData, ClassKind, ClassModifiers, DeclFlags,
    DeclarationKind, FunctionModifiers, Modality, PropertyModifiers, TypeAliasData,
    ValueParameter, Visibility,
};
use crate::ids::TypeParamId;
use crate::types::TypeId;
use mpp_common::{Atom, SourceAnchor};

/// Builder for a declaration that has not been assigned a `DeclId` yet.
///
/// Callables may leave the return type unset; the store fills in
/// `kotlin.Unit` for functions and the class type for constructors.
#[derive(Clone, Debug)]
pub struct DeclBuilder {
    pub(crate) name: Atom,
    pub(crate) visibility: Visibility,
    pub(crate) modality: Modality,
    pub(crate) flags: DeclFlags,
    pub(crate) type_params: Vec<TypeParamId>,
    pub(crate) source: SourceAnchor,
    pub(crate) kind: PendingKind,
}

#[derive(Clone, Debug)]
pub(crate) enum PendingKind {
    Class(ClassData),
    TypeAlias(TypeAliasData),
    Callable {
        kind: CallableKind,
        receiver: Option<TypeId>,
        value_params: Vec<ValueParameter>,
        return_type: Option<TypeId>,
    },
}

impl DeclBuilder {
    fn new(name: Atom, kind: PendingKind) -> Self {
        DeclBuilder {
            name,
            visibility: Visibility::Public,
            modality: Modality::Final,
            flags: DeclFlags::empty(),
            type_params: Vec::new(),
            source: SourceAnchor::default(),
            kind,
        }
    }

    pub fn class(name: Atom, class_kind: ClassKind) -> Self {
        let modality = match class_kind {
            ClassKind::Interface => Modality::Abstract,
            _ => Modality::Final,
        };
        let mut builder = Self::new(
            name,
            PendingKind::Class(ClassData {
                class_kind,
                ..ClassData::default()
            }),
        );
        builder.modality = modality;
        builder
    }

    pub fn type_alias(name: Atom, expanded: TypeId) -> Self {
        Self::new(name, PendingKind::TypeAlias(TypeAliasData { expanded }))
    }

    pub fn function(name: Atom) -> Self {
        Self::callable(
            name,
            CallableKind::Function {
                modifiers: FunctionModifiers::empty(),
            },
        )
    }

    /// Constructors are named `<init>`; pass the interned atom.
    pub fn constructor(init_name: Atom) -> Self {
        Self::callable(
            init_name,
            CallableKind::Constructor {
                modifiers: FunctionModifiers::empty(),
                is_primary: false,
            },
        )
    }

    pub fn property(name: Atom, ty: TypeId) -> Self {
        Self::callable(
            name,
            CallableKind::Property {
                is_var: false,
                modifiers: PropertyModifiers::empty(),
            },
        )
        .returns(ty)
    }

    fn callable(name: Atom, kind: CallableKind) -> Self {
        Self::new(
            name,
            PendingKind::Callable {
                kind,
                receiver: None,
                value_params: Vec::new(),
                return_type: None,
            },
        )
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn expect(self) -> Self {
        self.with_flags(DeclFlags::EXPECT)
    }

    /// Actual with the explicit `actual` keyword.
    pub fn actual(self) -> Self {
        self.with_flags(DeclFlags::ACTUAL | DeclFlags::ACTUAL_MODIFIER)
    }

    /// Actual without the keyword (e.g. a member of an actual class).
    pub fn implicit_actual(self) -> Self {
        self.with_flags(DeclFlags::ACTUAL)
    }

    pub fn with_type_params(mut self, params: impl IntoIterator<Item = TypeParamId>) -> Self {
        self.type_params.extend(params);
        self
    }

    pub fn with_source(mut self, source: SourceAnchor) -> Self {
        self.source = source;
        self
    }

    // ---- classes ----

    pub fn with_class_modifiers(mut self, modifiers: ClassModifiers) -> Self {
        if let PendingKind::Class(class) = &mut self.kind {
            class.modifiers |= modifiers;
        }
        self
    }

    pub fn with_supertype(mut self, supertype: TypeId) -> Self {
        if let PendingKind::Class(class) = &mut self.kind {
            class.supertypes.push(supertype);
        }
        self
    }

    pub fn with_enum_entries(mut self, entries: impl IntoIterator<Item = Atom>) -> Self {
        if let PendingKind::Class(class) = &mut self.kind {
            class.enum_entries.extend(entries);
        }
        self
    }

    // ---- callables ----

    pub fn with_receiver(mut self, receiver: TypeId) -> Self {
        if let PendingKind::Callable { receiver: r, .. } = &mut self.kind {
            *r = Some(receiver);
        }
        self
    }

    pub fn with_value_param(mut self, param: ValueParameter) -> Self {
        if let PendingKind::Callable { value_params, .. } = &mut self.kind {
            value_params.push(param);
        }
        self
    }

    pub fn returns(mut self, ty: TypeId) -> Self {
        if let PendingKind::Callable { return_type, .. } = &mut self.kind {
            *return_type = Some(ty);
        }
        self
    }

    pub fn with_function_modifiers(mut self, added: FunctionModifiers) -> Self {
        if let PendingKind::Callable { kind, .. } = &mut self.kind {
            match kind {
                CallableKind::Function { modifiers }
                | CallableKind::Constructor { modifiers, .. } => *modifiers |= added,
                CallableKind::Property { .. } => {}
            }
        }
        self
    }

    pub fn with_property_modifiers(mut self, added: PropertyModifiers) -> Self {
        if let PendingKind::Callable {
            kind: CallableKind::Property { modifiers, .. },
            ..
        } = &mut self.kind
        {
            *modifiers |= added;
        }
        self
    }

    /// Marks a property as `var`.
    pub fn var(mut self) -> Self {
        if let PendingKind::Callable {
            kind: CallableKind::Property { is_var, .. },
            ..
        } = &mut self.kind
        {
            *is_var = true;
        }
        self
    }

    /// Marks a constructor as the primary constructor.
    pub fn primary(mut self) -> Self {
        if let PendingKind::Callable {
            kind: CallableKind::Constructor { is_primary, .. },
            ..
        } = &mut self.kind
        {
            *is_primary = true;
        }
        self
    }

    pub(crate) const fn is_constructor(&self) -> bool {
        matches!(
            self.kind,
            PendingKind::Callable {
                kind: CallableKind::Constructor { .. },
                ..
            }
        )
    }

    pub(crate) const fn is_classifier(&self) -> bool {
        matches!(self.kind, PendingKind::Class(_) | PendingKind::TypeAlias(_))
    }

    /// Resolve the pending payload; `default_return` is used when a callable
    /// has no explicit return type.
    pub(crate) fn into_kind(self, default_return: TypeId) -> DeclarationKind {
        match self.kind {
            PendingKind::Class(class) => DeclarationKind::Class(class),
            PendingKind::TypeAlias(alias) => DeclarationKind::TypeAlias(alias),
            PendingKind::Callable {
                kind,
                receiver,
                value_params,
                return_type,
            } => DeclarationKind::Callable(CallableData {
                kind,
                receiver,
                value_params,
                return_type: return_type.unwrap_or(default_return),
            }),
        }
    }
}
