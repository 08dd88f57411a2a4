//! Project description files.
//!
//! A project file lists modules in dependency order together with their
//! declarations:
//!
//! ```json
//! {
//!   "options": { "errorTypes": "lenient" },
//!   "modules": [
//!     { "name": "common", "declarations": [
//!         { "kind": "function", "name": "f", "package": "app", "expect": true,
//!           "parameters": [{ "name": "x", "type": "kotlin.Int" }],
//!           "returns": "kotlin.String" } ] },
//!     { "name": "jvm", "dependsOn": ["common"], "declarations": [ ... ] }
//!   ]
//! }
//! ```
//!
//! Types are written `pkg.Name<Arg, out Arg, in Arg, *>?`. A bare name that
//! matches a type parameter in scope (own parameters first, then enclosing
//! classes) refers to that parameter; `<error>` is the error type.

use anyhow::{Context, Result, bail};
use mpp_common::SourceAnchor;
use mpp_model::{
    ClassKind, ClassModifiers, ConstValue, DeclBuilder, DeclFlags, DeclId, DeclarationStore,
    FunctionModifiers, Modality, ModuleId, PropertyModifiers, TypeArgument, TypeArguments, TypeId,
    TypeParamId, TypeParameter, ValueParameter, Variance, Visibility,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::config::ProjectOptions;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectFile {
    #[serde(default)]
    pub options: ProjectOptions,
    pub modules: Vec<ModuleSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleSpec {
    pub name: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<DeclSpec>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
    Typealias,
    Function,
    Constructor,
    Property,
}

impl DeclKind {
    const fn class_kind(self) -> Option<ClassKind> {
        match self {
            DeclKind::Class => Some(ClassKind::Class),
            DeclKind::Interface => Some(ClassKind::Interface),
            DeclKind::Object => Some(ClassKind::Object),
            DeclKind::Enum => Some(ClassKind::EnumClass),
            DeclKind::Annotation => Some(ClassKind::AnnotationClass),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclSpec {
    pub kind: DeclKind,
    /// Constructors may leave the name out.
    #[serde(default)]
    pub name: String,
    /// Top-level declarations only; members live in their class's package.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub expect: bool,
    /// Actual with the `actual` keyword.
    #[serde(default)]
    pub actual: bool,
    /// Actual without the keyword (members of actual classes).
    #[serde(default)]
    pub implicit_actual: bool,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub modality: Option<Modality>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub synthetic: bool,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub type_parameters: Vec<TypeParamSpec>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub enum_entries: Vec<String>,
    #[serde(default)]
    pub members: Vec<DeclSpec>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParamSpec>,
    #[serde(default)]
    pub returns: Option<String>,
    /// Property type.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Type alias right-hand side.
    #[serde(default)]
    pub expands_to: Option<String>,
    #[serde(default, rename = "var")]
    pub is_var: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub source: Option<SourceSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeParamSpec {
    pub name: String,
    #[serde(default)]
    pub variance: Variance,
    #[serde(default)]
    pub reified: bool,
    #[serde(default)]
    pub bounds: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub vararg: bool,
    #[serde(default)]
    pub noinline: bool,
    #[serde(default)]
    pub crossinline: bool,
    /// `true`, `1`, `"text"`, `[...]`, `{"enum": "app.Color", "entry": "RED"}`,
    /// `{"class": "app.Foo"}`, `{"char": "c"}` or `{"expression": "..."}` for
    /// a default that is not a compile-time constant.
    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub file: String,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub length: u32,
}

/// A project ready to be checked.
pub struct LoadedProject {
    pub store: DeclarationStore,
    pub options: ProjectOptions,
}

pub fn load_project(path: &Path) -> Result<LoadedProject> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read project file {}", path.display()))?;
    parse_project(&text).with_context(|| format!("invalid project file {}", path.display()))
}

pub fn parse_project(text: &str) -> Result<LoadedProject> {
    let file: ProjectFile = serde_json::from_str(text).context("malformed project JSON")?;
    let store = ProjectBuilder::default().build(&file)?;
    Ok(LoadedProject {
        store,
        options: file.options,
    })
}

/// Type parameters visible at the current declaration, innermost last.
type Scope = Vec<(String, TypeParamId)>;

#[derive(Default)]
struct ProjectBuilder {
    store: DeclarationStore,
}

impl ProjectBuilder {
    fn build(mut self, file: &ProjectFile) -> Result<DeclarationStore> {
        for module in &file.modules {
            if self.store.module_named(&module.name).is_some() {
                bail!("module '{}' is declared twice", module.name);
            }
            let mut dependencies = Vec::with_capacity(module.depends_on.len());
            for dep in &module.depends_on {
                let Some(id) = self.store.module_named(dep) else {
                    bail!(
                        "module '{}' depends on '{dep}', which is not declared before it",
                        module.name
                    );
                };
                dependencies.push(id);
            }
            let id = self.store.add_module(&module.name, &dependencies);

            let mut scope = Scope::new();
            for decl in &module.declarations {
                let path = format!("{}:{}", module.name, decl.name);
                self.declare(id, decl, None, "", &mut scope, &path)?;
            }
            debug!(
                module = %module.name,
                declarations = module.declarations.len(),
                "loaded module"
            );
        }
        Ok(self.store)
    }

    fn declare(
        &mut self,
        module: ModuleId,
        spec: &DeclSpec,
        container: Option<DeclId>,
        parent_package: &str,
        scope: &mut Scope,
        path: &str,
    ) -> Result<DeclId> {
        if spec.name.is_empty() && spec.kind != DeclKind::Constructor {
            bail!("{path}: declaration without a name");
        }
        if spec.kind.class_kind().is_none() && !spec.members.is_empty() {
            bail!("{path}: members are only allowed on classes");
        }
        let package = match (&spec.package, container) {
            (Some(package), None) => package.as_str(),
            _ => parent_package,
        };

        let scope_len = scope.len();
        let type_params = self.declare_type_params(spec, scope, path)?;
        let builder = self.builder(spec, container, scope, path)?;
        let builder = self.apply_common(builder, spec, type_params);
        let id = self.store.register(module, package, container, builder);

        for member in &spec.members {
            let member_path = format!("{path}.{}", member.name);
            self.declare(module, member, Some(id), package, scope, &member_path)?;
        }
        scope.truncate(scope_len);
        Ok(id)
    }

    /// Registers the type parameters and pushes them onto `scope`. Bounds
    /// are resolved afterwards so they may mention any of the parameters.
    fn declare_type_params(
        &mut self,
        spec: &DeclSpec,
        scope: &mut Scope,
        path: &str,
    ) -> Result<Vec<TypeParamId>> {
        let mut ids = Vec::with_capacity(spec.type_parameters.len());
        for param in &spec.type_parameters {
            let name = self.store.intern(&param.name);
            let mut declared = TypeParameter::new(name).with_variance(param.variance);
            if param.reified {
                declared = declared.reified();
            }
            let id = self.store.add_type_param(declared);
            scope.push((param.name.clone(), id));
            ids.push(id);
        }
        for (param, &id) in spec.type_parameters.iter().zip(&ids) {
            let bounds = param
                .bounds
                .iter()
                .map(|bound| self.parse_type(bound, scope, path))
                .collect::<Result<Vec<_>>>()?;
            self.store.set_upper_bounds(id, bounds);
        }
        Ok(ids)
    }

    fn builder(
        &mut self,
        spec: &DeclSpec,
        container: Option<DeclId>,
        scope: &Scope,
        path: &str,
    ) -> Result<DeclBuilder> {
        let name = self.store.intern(&spec.name);

        if let Some(class_kind) = spec.kind.class_kind() {
            let mut builder = DeclBuilder::class(name, class_kind)
                .with_class_modifiers(class_modifiers(&spec.modifiers, path)?);
            for supertype in &spec.supertypes {
                builder = builder.with_supertype(self.parse_type(supertype, scope, path)?);
            }
            let entries: Vec<_> = spec
                .enum_entries
                .iter()
                .map(|entry| self.store.intern(entry))
                .collect();
            return Ok(builder.with_enum_entries(entries));
        }

        let mut builder = match spec.kind {
            DeclKind::Typealias => {
                let Some(expanded) = &spec.expands_to else {
                    bail!("{path}: typealias needs 'expandsTo'");
                };
                return Ok(DeclBuilder::type_alias(name, self.parse_type(expanded, scope, path)?));
            }
            DeclKind::Function => DeclBuilder::function(name)
                .with_function_modifiers(function_modifiers(&spec.modifiers, path)?),
            DeclKind::Constructor => {
                if container.is_none() {
                    bail!("{path}: constructor outside a class");
                }
                let mut builder = DeclBuilder::constructor(self.store.constructor_name())
                    .with_function_modifiers(function_modifiers(&spec.modifiers, path)?);
                if spec.primary {
                    builder = builder.primary();
                }
                builder
            }
            DeclKind::Property => {
                let Some(ty) = spec.ty.as_ref().or(spec.returns.as_ref()) else {
                    bail!("{path}: property needs a 'type'");
                };
                let ty = self.parse_type(ty, scope, path)?;
                let mut builder = DeclBuilder::property(name, ty)
                    .with_property_modifiers(property_modifiers(&spec.modifiers, path)?);
                if spec.is_var {
                    builder = builder.var();
                }
                builder
            }
            _ => unreachable!("classifier kinds are handled above"),
        };

        if let Some(receiver) = &spec.receiver {
            builder = builder.with_receiver(self.parse_type(receiver, scope, path)?);
        }
        for param in &spec.parameters {
            let ty = self.parse_type(&param.ty, scope, path)?;
            let mut value = ValueParameter::new(self.store.intern(&param.name), ty);
            if param.vararg {
                value = value.vararg();
            }
            if param.noinline {
                value = value.noinline();
            }
            if param.crossinline {
                value = value.crossinline();
            }
            if let Some(default) = &param.default {
                let default = self
                    .const_value(default)
                    .with_context(|| format!("{path}: default of parameter '{}'", param.name))?;
                value = value.with_default(default);
            }
            builder = builder.with_value_param(value);
        }
        if spec.kind == DeclKind::Function {
            if let Some(returns) = &spec.returns {
                builder = builder.returns(self.parse_type(returns, scope, path)?);
            }
        }
        Ok(builder)
    }

    fn apply_common(
        &mut self,
        mut builder: DeclBuilder,
        spec: &DeclSpec,
        type_params: Vec<TypeParamId>,
    ) -> DeclBuilder {
        if let Some(visibility) = spec.visibility {
            builder = builder.with_visibility(visibility);
        }
        if let Some(modality) = spec.modality {
            builder = builder.with_modality(modality);
        }
        if spec.expect {
            builder = builder.expect();
        }
        if spec.actual {
            builder = builder.actual();
        } else if spec.implicit_actual {
            builder = builder.implicit_actual();
        }
        for (set, flag) in [
            (spec.is_static, DeclFlags::STATIC),
            (spec.synthetic, DeclFlags::SYNTHETIC),
            (spec.local, DeclFlags::LOCAL),
        ] {
            if set {
                builder = builder.with_flags(flag);
            }
        }
        if let Some(source) = &spec.source {
            let file = self.store.intern(&source.file);
            builder = builder.with_source(SourceAnchor::new(file, source.start, source.length));
        }
        builder.with_type_params(type_params)
    }

    fn parse_type(&mut self, text: &str, scope: &Scope, path: &str) -> Result<TypeId> {
        TypeParser::new(text)
            .parse(&mut self.store, scope)
            .with_context(|| format!("{path}: cannot read type '{text}'"))
    }

    fn const_value(&mut self, value: &Value) -> Result<ConstValue> {
        Ok(match value {
            Value::Null => ConstValue::NonConstant,
            Value::Bool(value) => ConstValue::Bool(*value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => ConstValue::Int(value),
                None => bail!("{number} is not an integer"),
            },
            Value::String(value) => ConstValue::String(value.clone()),
            Value::Array(items) => ConstValue::Array(
                items
                    .iter()
                    .map(|item| self.const_value(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(fields) => {
                let text = |key: &str| fields.get(key).and_then(Value::as_str);
                if let (Some(class), Some(entry)) = (text("enum"), text("entry")) {
                    ConstValue::EnumEntry {
                        class: self.store.intern(class),
                        entry: self.store.intern(entry),
                    }
                } else if let Some(class) = text("class") {
                    ConstValue::Class(self.store.intern(class))
                } else if let Some(c) = text("char") {
                    let mut chars = c.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => ConstValue::Char(c),
                        _ => bail!("'{c}' is not a single character"),
                    }
                } else if fields.contains_key("expression") {
                    ConstValue::NonConstant
                } else {
                    bail!("unrecognised default value {value}");
                }
            }
        })
    }
}

fn class_modifiers(words: &[String], path: &str) -> Result<ClassModifiers> {
    let mut modifiers = ClassModifiers::empty();
    for word in words {
        modifiers |= match word.as_str() {
            "companion" => ClassModifiers::COMPANION,
            "inner" => ClassModifiers::INNER,
            "inline" | "value" => ClassModifiers::INLINE,
            _ => bail!("{path}: '{word}' is not a class modifier"),
        };
    }
    Ok(modifiers)
}

fn function_modifiers(words: &[String], path: &str) -> Result<FunctionModifiers> {
    let mut modifiers = FunctionModifiers::empty();
    for word in words {
        modifiers |= match word.as_str() {
            "suspend" => FunctionModifiers::SUSPEND,
            "inline" => FunctionModifiers::INLINE,
            "infix" => FunctionModifiers::INFIX,
            "operator" => FunctionModifiers::OPERATOR,
            "tailrec" => FunctionModifiers::TAILREC,
            "external" => FunctionModifiers::EXTERNAL,
            _ => bail!("{path}: '{word}' is not a function modifier"),
        };
    }
    Ok(modifiers)
}

fn property_modifiers(words: &[String], path: &str) -> Result<PropertyModifiers> {
    let mut modifiers = PropertyModifiers::empty();
    for word in words {
        modifiers |= match word.as_str() {
            "const" => PropertyModifiers::CONST,
            "lateinit" => PropertyModifiers::LATEINIT,
            _ => bail!("{path}: '{word}' is not a property modifier"),
        };
    }
    Ok(modifiers)
}

// =============================================================================
// Type strings
// =============================================================================

/// Recursive-descent reader for `pkg.Name<out T, *>?` type strings.
pub struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    pub const fn new(text: &'a str) -> Self {
        TypeParser { text, pos: 0 }
    }

    pub fn parse(
        mut self,
        store: &mut DeclarationStore,
        scope: &[(String, TypeParamId)],
    ) -> Result<TypeId> {
        let ty = self.parse_type(store, scope)?;
        self.skip_whitespace();
        if self.pos != self.text.len() {
            bail!("unexpected '{}' after the type", &self.text[self.pos..]);
        }
        Ok(ty)
    }

    fn parse_type(
        &mut self,
        store: &mut DeclarationStore,
        scope: &[(String, TypeParamId)],
    ) -> Result<TypeId> {
        self.skip_whitespace();
        if self.eat("<error>") {
            return Ok(TypeId::ERROR);
        }
        let name = self.identifier()?;

        let mut args = TypeArguments::new();
        self.skip_whitespace();
        if self.eat("<") {
            loop {
                args.push(self.parse_argument(store, scope)?);
                self.skip_whitespace();
                if self.eat(",") {
                    continue;
                }
                if self.eat(">") {
                    break;
                }
                bail!("expected ',' or '>' at offset {}", self.pos);
            }
        }
        self.skip_whitespace();
        let nullable = self.eat("?");

        if args.is_empty() && !name.contains('.') {
            if let Some(&(_, param)) = scope.iter().rev().find(|(param, _)| param == name) {
                return Ok(store.types().type_param(param, nullable));
            }
        }
        let fq_name = store.intern(name);
        Ok(store.types().class(fq_name, args, nullable))
    }

    fn parse_argument(
        &mut self,
        store: &mut DeclarationStore,
        scope: &[(String, TypeParamId)],
    ) -> Result<TypeArgument> {
        self.skip_whitespace();
        if self.eat("*") {
            return Ok(TypeArgument::Star);
        }
        if self.eat_keyword("out") {
            return Ok(TypeArgument::Out(self.parse_type(store, scope)?));
        }
        if self.eat_keyword("in") {
            return Ok(TypeArgument::In(self.parse_type(store, scope)?));
        }
        Ok(TypeArgument::Invariant(self.parse_type(store, scope)?))
    }

    fn identifier(&mut self) -> Result<&'a str> {
        let rest = &self.text[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '$')))
            .unwrap_or(rest.len());
        if len == 0 {
            bail!("expected a type name at offset {}", self.pos);
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.text[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// `out`/`in` followed by whitespace.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = &self.text[self.pos..];
        let is_keyword = rest.starts_with(keyword)
            && rest[keyword.len()..].starts_with(char::is_whitespace);
        if is_keyword {
            self.pos += keyword.len();
        }
        is_keyword
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }
}
