//! Declaration model for expect/actual matching.
//!
//! Declarations live in a single arena (`DeclarationStore`) and refer to
//! each other by index:
//!
//! - **Ids**: `DeclId`, `ModuleId`, `TypeParamId` are `Copy` handles; a
//!   member's containing class and a class's member list are both plain
//!   index lookups, so the class/member back-reference never forms an
//!   ownership cycle.
//! - **Types**: structural `TypeData` hash-consed into `TypeId` handles by a
//!   thread-safe `TypeInterner`.
//! - **Sessions**: a `Session` is the view of the store from one module, with
//!   lookups into that module and its transitive dependencies.

pub mod builder;
pub mod declarations;
pub mod ids;
mod intern;
pub mod session;
pub mod store;
pub mod types;

pub use builder::DeclBuilder;
pub use declarations::{
    CallableData, CallableKind, ClassData, ClassKind, ClassModifiers, ConstValue, DeclFlags,
    Declaration, DeclarationCategory, DeclarationKind, FunctionModifiers, Modality,
    PropertyModifiers, TypeAliasData, TypeParameter, ValueParameter, Visibility,
};
pub use ids::{DeclId, ModuleId, TypeParamId};
pub use intern::TypeInterner;
pub use session::Session;
pub use store::{DeclarationStore, ModuleInfo, well_known};
pub use types::{TypeArgument, TypeArguments, TypeData, TypeId, Variance};
