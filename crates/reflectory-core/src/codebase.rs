//! In-memory type system built from a declaration snapshot.
//!
//! [`Codebase`] plays the role of the host runtime: it links a class with its
//! parent, interfaces and used traits, and reports the resulting member
//! tables. Nothing is cached; every load walks the declarations again.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::trace;
use reflectory_types::{
    ClassDecl, ClassKind, CodebaseSnapshot, FunctionDecl, MethodDecl, ParamDecl, PropertyDecl,
};

use crate::native::{
    LoadError, Modifiers, NativeClass, NativeFunction, NativeMethod, NativeParameter,
    NativeProperty, ParameterOwner, TypeSystem,
};
use crate::Error;

/// Declarations indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Codebase {
    classes: HashMap<String, ClassDecl>,
    functions: HashMap<String, FunctionDecl>,
}

impl Codebase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index all declarations of a snapshot.
    pub fn from_snapshot(snapshot: CodebaseSnapshot) -> crate::Result<Self> {
        let mut codebase = Self::new();
        for class in snapshot.classes {
            codebase.add_class(class)?;
        }
        for function in snapshot.functions {
            codebase.add_function(function)?;
        }
        Ok(codebase)
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON snapshot file.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add a class-like declaration.
    ///
    /// Fails if the name is taken, or if the declaration repeats a method
    /// name (compared case-insensitively) or a property name.
    pub fn add_class(&mut self, class: ClassDecl) -> crate::Result<()> {
        if self.classes.contains_key(&class.name) {
            return Err(Error::DuplicateDeclaration(class.name));
        }
        for (i, method) in class.methods.iter().enumerate() {
            if class.methods[..i]
                .iter()
                .any(|m| m.name.eq_ignore_ascii_case(&method.name))
            {
                return Err(Error::DuplicateDeclaration(format!(
                    "{}::{}()",
                    class.name, method.name
                )));
            }
        }
        for (i, property) in class.properties.iter().enumerate() {
            if class.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(Error::DuplicateDeclaration(format!(
                    "{}::${}",
                    class.name, property.name
                )));
            }
        }
        self.classes.insert(class.name.clone(), class);
        Ok(())
    }

    pub fn add_function(&mut self, function: FunctionDecl) -> crate::Result<()> {
        if self.functions.contains_key(&function.name) {
            return Err(Error::DuplicateDeclaration(function.name));
        }
        self.functions.insert(function.name.clone(), function);
        Ok(())
    }

    /// Get the raw declaration of a class-like type.
    pub fn declaration(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    /// Resolve a declaration and verify its whole ancestry exists.
    ///
    /// `stack` holds the declarations being linked, `linked` those already
    /// verified during this load.
    fn link<'a>(
        &'a self,
        name: &str,
        stack: &mut Vec<String>,
        linked: &mut HashSet<String>,
    ) -> Result<&'a ClassDecl, LoadError> {
        if stack.iter().any(|n| n == name) {
            return Err(LoadError::CircularDependency {
                name: name.to_string(),
            });
        }
        let decl = self.classes.get(name).ok_or_else(|| LoadError::NotFound {
            name: name.to_string(),
        })?;
        if linked.contains(name) {
            return Ok(decl);
        }

        stack.push(name.to_string());
        let dependencies = decl
            .parent
            .iter()
            .map(|parent| (parent, ClassKind::Class))
            .chain(decl.interfaces.iter().map(|i| (i, ClassKind::Interface)))
            .chain(decl.traits.iter().map(|t| (t, ClassKind::Trait)));
        for (dependency, expected) in dependencies {
            match self.link(dependency, stack, linked) {
                Ok(dependency_decl) if dependency_decl.kind != expected => {
                    return Err(LoadError::InvalidDependency {
                        name: name.to_string(),
                        dependency: dependency.clone(),
                        expected,
                    });
                }
                Ok(_) => {}
                Err(LoadError::NotFound { .. }) => {
                    return Err(LoadError::MissingDependency {
                        name: name.to_string(),
                        missing: dependency.clone(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        stack.pop();
        linked.insert(name.to_string());

        Ok(decl)
    }

    fn interface_names(&self, decl: &ClassDecl, names: &mut Vec<String>) {
        if let Some(parent) = decl.parent.as_deref().and_then(|p| self.classes.get(p)) {
            self.interface_names(parent, names);
        }
        for interface in &decl.interfaces {
            // Already collected together with everything it extends.
            if names.contains(interface) {
                continue;
            }
            names.push(interface.clone());
            if let Some(extended) = self.classes.get(interface) {
                self.interface_names(extended, names);
            }
        }
    }

    /// Collect methods in lookup order: own, used traits, parent, interfaces.
    ///
    /// The first method of a given name shadows later ones, except that an
    /// abstract trait method yields to an implementation inherited from the
    /// parent.
    fn methods(&self, decl: &ClassDecl) -> Vec<NativeMethod> {
        let mut methods = Vec::new();
        self.collect_methods(decl, &mut methods, &mut HashSet::new());
        trace!("resolved {} methods for {}", methods.len(), decl.name);
        methods
    }

    fn collect_methods<'a>(
        &'a self,
        decl: &'a ClassDecl,
        methods: &mut Vec<NativeMethod>,
        visited: &mut HashSet<&'a str>,
    ) {
        if !visited.insert(&decl.name) {
            return;
        }

        for method in &decl.methods {
            push_method(methods, native_method(&decl.name, decl.kind, method));
        }

        let (required, provided): (Vec<_>, Vec<_>) = self
            .trait_methods(decl, &mut HashSet::new())
            .into_iter()
            .partition(|m| m.is_abstract);
        for method in provided {
            push_method(methods, native_method(&decl.name, decl.kind, method));
        }

        let inherited_from = methods.len();
        if let Some(parent) = decl.parent.as_deref().and_then(|p| self.classes.get(p)) {
            self.collect_methods(parent, methods, visited);
        }
        for method in required {
            let method = native_method(&decl.name, decl.kind, method);
            match methods
                .iter()
                .position(|m| m.name.eq_ignore_ascii_case(&method.name))
            {
                Some(i) if i >= inherited_from && methods[i].is_abstract() => methods[i] = method,
                Some(_) => {}
                None => methods.push(method),
            }
        }

        for interface in decl.interfaces.iter().filter_map(|i| self.classes.get(i)) {
            self.collect_methods(interface, methods, visited);
        }
    }

    /// Trait members are copied into the using declaration.
    fn trait_methods<'a>(
        &'a self,
        decl: &'a ClassDecl,
        visited: &mut HashSet<&'a str>,
    ) -> Vec<&'a MethodDecl> {
        let mut methods = Vec::new();
        for used in decl.traits.iter().filter_map(|t| self.classes.get(t)) {
            if visited.insert(&used.name) {
                methods.extend(used.methods.iter());
                methods.extend(self.trait_methods(used, visited));
            }
        }
        methods
    }

    fn properties(&self, decl: &ClassDecl) -> Vec<NativeProperty> {
        let mut properties: Vec<NativeProperty> = decl
            .properties
            .iter()
            .map(|p| native_property(&decl.name, p))
            .collect();

        let push = |properties: &mut Vec<NativeProperty>, property: NativeProperty| {
            if !properties.iter().any(|p| p.name == property.name) {
                properties.push(property);
            }
        };

        for used in decl.traits.iter().filter_map(|t| self.classes.get(t)) {
            for property in self.properties(used) {
                push(
                    &mut properties,
                    NativeProperty {
                        class: decl.name.clone(),
                        ..property
                    },
                );
            }
        }
        if let Some(parent) = decl.parent.as_deref().and_then(|p| self.classes.get(p)) {
            for property in self.properties(parent) {
                if !property.is_private() {
                    push(&mut properties, property);
                }
            }
        }
        properties
    }
}

impl TypeSystem for Codebase {
    fn load_class(&self, name: &str) -> Result<NativeClass, LoadError> {
        trace!("loading class {}", name);
        let decl = self.link(name, &mut Vec::new(), &mut HashSet::new())?;

        let mut modifiers = Modifiers::empty();
        if decl.is_abstract || decl.kind == ClassKind::Interface {
            modifiers |= Modifiers::ABSTRACT;
        }
        if decl.is_final {
            modifiers |= Modifiers::FINAL;
        }

        let mut interface_names = Vec::new();
        self.interface_names(decl, &mut interface_names);

        Ok(NativeClass {
            name: decl.name.clone(),
            kind: decl.kind,
            modifiers,
            parent: decl.parent.clone(),
            interface_names,
            methods: self.methods(decl),
            properties: self.properties(decl),
            attributes: decl.attributes.clone(),
        })
    }

    fn load_function(&self, name: &str) -> Result<NativeFunction, LoadError> {
        let decl = self.functions.get(name).ok_or_else(|| LoadError::NotFound {
            name: name.to_string(),
        })?;
        let owner = ParameterOwner::Function {
            name: decl.name.clone(),
        };
        Ok(NativeFunction {
            name: decl.name.clone(),
            return_type: decl.return_type.clone(),
            parameters: native_parameters(&owner, &decl.parameters),
            attributes: decl.attributes.clone(),
        })
    }

    fn is_subtype_of(&self, class: &str, ancestor: &str) -> bool {
        self.extends(class, ancestor, &mut Vec::new())
    }
}

impl Codebase {
    fn extends<'a>(&'a self, class: &'a str, ancestor: &str, seen: &mut Vec<&'a str>) -> bool {
        if class == ancestor {
            return true;
        }
        if seen.contains(&class) {
            return false;
        }
        seen.push(class);
        let Some(decl) = self.classes.get(class) else {
            return false;
        };
        decl.parent
            .iter()
            .chain(decl.interfaces.iter())
            .any(|super_type| self.extends(super_type, ancestor, seen))
    }
}

fn push_method(methods: &mut Vec<NativeMethod>, method: NativeMethod) {
    if !methods.iter().any(|m| m.name.eq_ignore_ascii_case(&method.name)) {
        methods.push(method);
    }
}

fn native_method(class: &str, kind: ClassKind, decl: &MethodDecl) -> NativeMethod {
    let mut modifiers = Modifiers::from_visibility(decl.visibility);
    if decl.is_static {
        modifiers |= Modifiers::STATIC;
    }
    if decl.is_abstract || kind == ClassKind::Interface {
        modifiers |= Modifiers::ABSTRACT;
    }
    if decl.is_final {
        modifiers |= Modifiers::FINAL;
    }
    let owner = ParameterOwner::Method {
        class: class.to_string(),
        method: decl.name.clone(),
    };
    NativeMethod {
        class: class.to_string(),
        name: decl.name.clone(),
        modifiers,
        return_type: decl.return_type.clone(),
        parameters: native_parameters(&owner, &decl.parameters),
        attributes: decl.attributes.clone(),
    }
}

fn native_parameters(owner: &ParameterOwner, params: &[ParamDecl]) -> Vec<NativeParameter> {
    params
        .iter()
        .enumerate()
        .map(|(position, param)| NativeParameter {
            owner: owner.clone(),
            name: param.name.clone(),
            position,
            ty: param.ty.clone(),
            is_optional: param.is_optional || param.is_variadic,
            is_variadic: param.is_variadic,
            attributes: param.attributes.clone(),
        })
        .collect()
}

fn native_property(class: &str, decl: &PropertyDecl) -> NativeProperty {
    let mut modifiers = Modifiers::from_visibility(decl.visibility);
    if decl.is_static {
        modifiers |= Modifiers::STATIC;
    }
    if decl.is_readonly {
        modifiers |= Modifiers::READONLY;
    }
    NativeProperty {
        class: class.to_string(),
        name: decl.name.clone(),
        modifiers,
        ty: decl.ty.clone(),
        attributes: decl.attributes.clone(),
    }
}
