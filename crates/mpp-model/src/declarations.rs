//! Declaration data.
//!
//! A `Declaration` is the read-only view the matcher consumes. The
//! per-category payload is a closed sum type (`DeclarationKind`) so the
//! evaluator can match over category pairs instead of testing runtime types.

use crate::ids::{DeclId, ModuleId, TypeParamId};
use crate::types::{TypeId, Variance};
use bitflags::bitflags;
use mpp_common::{Atom, SourceAnchor};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

// =============================================================================
// Visibility / Modality / ClassKind
// =============================================================================

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Protected,
    Internal,
    #[default]
    Public,
}

impl Visibility {
    pub const fn keyword(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::Public => "public",
        }
    }
}

/// `Private < Protected < Public` and `Private < Internal < Public`;
/// `Protected` and `Internal` are incomparable.
impl PartialOrd for Visibility {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use Visibility::*;
        match (self, other) {
            _ if self == other => Some(Ordering::Equal),
            (Private, _) | (_, Public) => Some(Ordering::Less),
            (_, Private) | (Public, _) => Some(Ordering::Greater),
            (Protected, Internal) | (Internal, Protected) => None,
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    #[default]
    Final,
    Open,
    Abstract,
    Sealed,
}

impl Modality {
    pub const fn keyword(self) -> &'static str {
        match self {
            Modality::Final => "final",
            Modality::Open => "open",
            Modality::Abstract => "abstract",
            Modality::Sealed => "sealed",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    #[serde(rename = "enum")]
    EnumClass,
    #[serde(rename = "annotation")]
    AnnotationClass,
}

impl ClassKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Object => "object",
            ClassKind::EnumClass => "enum class",
            ClassKind::AnnotationClass => "annotation class",
        }
    }
}

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// Declaration status flags.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DeclFlags: u8 {
        const EXPECT = 1 << 0;
        /// Actual status, explicit or implied by an enclosing actual class.
        const ACTUAL = 1 << 1;
        /// The `actual` keyword is written on the declaration itself.
        const ACTUAL_MODIFIER = 1 << 2;
        const STATIC = 1 << 3;
        /// Compiler-generated (fake overrides, synthesized members).
        const SYNTHETIC = 1 << 4;
        /// Declared inside a function body.
        const LOCAL = 1 << 5;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClassModifiers: u8 {
        const COMPANION = 1 << 0;
        const INNER = 1 << 1;
        const INLINE = 1 << 2;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FunctionModifiers: u8 {
        const SUSPEND = 1 << 0;
        const INLINE = 1 << 1;
        const INFIX = 1 << 2;
        const OPERATOR = 1 << 3;
        const TAILREC = 1 << 4;
        const EXTERNAL = 1 << 5;
    }
}

impl FunctionModifiers {
    /// Modifiers an actual function may add but never drop.
    pub const SUBSET_CHECKED: FunctionModifiers = FunctionModifiers::EXTERNAL
        .union(FunctionModifiers::INFIX)
        .union(FunctionModifiers::INLINE)
        .union(FunctionModifiers::OPERATOR)
        .union(FunctionModifiers::TAILREC);
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PropertyModifiers: u8 {
        const CONST = 1 << 0;
        const LATEINIT = 1 << 1;
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// A declared type parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: Atom,
    pub variance: Variance,
    pub is_reified: bool,
    pub upper_bounds: SmallVec<[TypeId; 1]>,
}

impl TypeParameter {
    pub fn new(name: Atom) -> Self {
        TypeParameter {
            name,
            variance: Variance::Invariant,
            is_reified: false,
            upper_bounds: SmallVec::new(),
        }
    }

    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    pub fn reified(mut self) -> Self {
        self.is_reified = true;
        self
    }

    pub fn with_upper_bound(mut self, bound: TypeId) -> Self {
        self.upper_bounds.push(bound);
        self
    }
}

/// Compile-time value of a parameter default.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    String(String),
    Char(char),
    /// `EnumClass.ENTRY`, by fully qualified class name and entry name.
    EnumEntry { class: Atom, entry: Atom },
    /// `Foo::class`
    Class(Atom),
    Array(Vec<ConstValue>),
    /// A default expression that is not a compile-time constant.
    NonConstant,
}

impl ConstValue {
    pub const fn is_constant(&self) -> bool {
        !matches!(self, ConstValue::NonConstant)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueParameter {
    pub name: Atom,
    pub ty: TypeId,
    pub is_vararg: bool,
    pub is_noinline: bool,
    pub is_crossinline: bool,
    pub default_value: Option<ConstValue>,
}

impl ValueParameter {
    pub fn new(name: Atom, ty: TypeId) -> Self {
        ValueParameter {
            name,
            ty,
            is_vararg: false,
            is_noinline: false,
            is_crossinline: false,
            default_value: None,
        }
    }

    pub fn vararg(mut self) -> Self {
        self.is_vararg = true;
        self
    }

    pub fn noinline(mut self) -> Self {
        self.is_noinline = true;
        self
    }

    pub fn crossinline(mut self) -> Self {
        self.is_crossinline = true;
        self
    }

    pub fn with_default(mut self, value: ConstValue) -> Self {
        self.default_value = Some(value);
        self
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

// =============================================================================
// Declaration payloads
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassData {
    pub class_kind: ClassKind,
    pub modifiers: ClassModifiers,
    pub supertypes: Vec<TypeId>,
    /// Declared members in declaration order: callables, constructors and
    /// nested classifiers.
    pub members: Vec<DeclId>,
    pub enum_entries: Vec<Atom>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeAliasData {
    pub expanded: TypeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallableKind {
    Function {
        modifiers: FunctionModifiers,
    },
    Constructor {
        modifiers: FunctionModifiers,
        is_primary: bool,
    },
    Property {
        is_var: bool,
        modifiers: PropertyModifiers,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallableData {
    pub kind: CallableKind,
    /// Extension receiver type.
    pub receiver: Option<TypeId>,
    pub value_params: Vec<ValueParameter>,
    pub return_type: TypeId,
}

impl CallableData {
    /// Function modifiers of a function or constructor.
    pub const fn function_modifiers(&self) -> Option<FunctionModifiers> {
        match self.kind {
            CallableKind::Function { modifiers } | CallableKind::Constructor { modifiers, .. } => {
                Some(modifiers)
            }
            CallableKind::Property { .. } => None,
        }
    }

    pub const fn is_inline(&self) -> bool {
        match self.function_modifiers() {
            Some(modifiers) => modifiers.contains(FunctionModifiers::INLINE),
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    Class(ClassData),
    TypeAlias(TypeAliasData),
    Callable(CallableData),
}

/// The five declaration categories the matcher distinguishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationCategory {
    Class,
    TypeAlias,
    Function,
    Constructor,
    Property,
}

impl DeclarationCategory {
    pub const fn is_classifier(self) -> bool {
        matches!(self, Self::Class | Self::TypeAlias)
    }

    pub const fn is_callable(self) -> bool {
        !self.is_classifier()
    }
}

// =============================================================================
// Declaration
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub id: DeclId,
    pub name: Atom,
    pub fq_name: Atom,
    pub package: Atom,
    pub module: ModuleId,
    /// Containing class for members.
    pub container: Option<DeclId>,
    pub visibility: Visibility,
    pub modality: Modality,
    pub flags: DeclFlags,
    pub type_params: Vec<TypeParamId>,
    pub source: SourceAnchor,
    pub kind: DeclarationKind,
}

impl Declaration {
    pub const fn category(&self) -> DeclarationCategory {
        match &self.kind {
            DeclarationKind::Class(_) => DeclarationCategory::Class,
            DeclarationKind::TypeAlias(_) => DeclarationCategory::TypeAlias,
            DeclarationKind::Callable(callable) => match callable.kind {
                CallableKind::Function { .. } => DeclarationCategory::Function,
                CallableKind::Constructor { .. } => DeclarationCategory::Constructor,
                CallableKind::Property { .. } => DeclarationCategory::Property,
            },
        }
    }

    #[inline]
    pub const fn is_expect(&self) -> bool {
        self.flags.contains(DeclFlags::EXPECT)
    }

    #[inline]
    pub const fn is_actual(&self) -> bool {
        self.flags.contains(DeclFlags::ACTUAL)
    }

    #[inline]
    pub const fn has_actual_modifier(&self) -> bool {
        self.flags.contains(DeclFlags::ACTUAL_MODIFIER)
    }

    #[inline]
    pub const fn is_static(&self) -> bool {
        self.flags.contains(DeclFlags::STATIC)
    }

    #[inline]
    pub const fn is_synthetic(&self) -> bool {
        self.flags.contains(DeclFlags::SYNTHETIC)
    }

    #[inline]
    pub const fn is_local(&self) -> bool {
        self.flags.contains(DeclFlags::LOCAL)
    }

    #[inline]
    pub const fn is_member(&self) -> bool {
        self.container.is_some()
    }

    pub const fn as_class(&self) -> Option<&ClassData> {
        match &self.kind {
            DeclarationKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub const fn as_callable(&self) -> Option<&CallableData> {
        match &self.kind {
            DeclarationKind::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub const fn as_type_alias(&self) -> Option<&TypeAliasData> {
        match &self.kind {
            DeclarationKind::TypeAlias(alias) => Some(alias),
            _ => None,
        }
    }

    pub const fn class_kind(&self) -> Option<ClassKind> {
        match &self.kind {
            DeclarationKind::Class(class) => Some(class.class_kind),
            _ => None,
        }
    }

    pub fn is_annotation_class(&self) -> bool {
        self.class_kind() == Some(ClassKind::AnnotationClass)
    }

    pub fn is_enum_class(&self) -> bool {
        self.class_kind() == Some(ClassKind::EnumClass)
    }

    pub fn is_inline_class(&self) -> bool {
        self.as_class()
            .is_some_and(|class| class.modifiers.contains(ClassModifiers::INLINE))
    }

    pub fn is_primary_constructor(&self) -> bool {
        matches!(
            self.as_callable().map(|c| c.kind),
            Some(CallableKind::Constructor {
                is_primary: true,
                ..
            })
        )
    }
}
