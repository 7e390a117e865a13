//! Named factories and recursive instantiation
//!
//! Objects are built from a dotted name (`module.Name`) registered up front,
//! plus keyword arguments. Keyword arguments are either plain JSON values or
//! objects built by a nested instantiation, which lets a whole object graph
//! be described by a serializable `InstantiateSpec`.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::Error;

/// Factory building an object from keyword arguments
pub type Factory = Arc<dyn Fn(&mut Kwargs) -> Result<Box<dyn Any + Send>> + Send + Sync>;

/// A single keyword argument
enum Arg {
    Value(Value),
    Object(Box<dyn Any + Send>),
}

/// Keyword arguments handed to a factory
#[derive(Default)]
pub struct Kwargs {
    args: BTreeMap<String, Arg>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            args: map.into_iter().map(|(k, v)| (k, Arg::Value(v))).collect(),
        }
    }

    pub fn insert_value(&mut self, name: impl Into<String>, value: Value) {
        self.args.insert(name.into(), Arg::Value(value));
    }

    pub fn insert_object<T: Any + Send>(&mut self, name: impl Into<String>, object: T) {
        self.args.insert(name.into(), Arg::Object(Box::new(object)));
    }

    fn insert_boxed(&mut self, name: String, object: Box<dyn Any + Send>) {
        self.args.insert(name, Arg::Object(object));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Remove and return a required argument
    ///
    /// JSON values are deserialized into `T`; built objects are downcast.
    pub fn take<T: DeserializeOwned + Any>(&mut self, name: &str) -> Result<T, Error> {
        self.take_opt(name)?.ok_or_else(|| {
            Error::type_error(format!("Missing required keyword argument '{}'", name))
        })
    }

    /// Remove and return an optional argument
    pub fn take_opt<T: DeserializeOwned + Any>(&mut self, name: &str) -> Result<Option<T>, Error> {
        match self.args.remove(name) {
            None => Ok(None),
            Some(Arg::Value(value)) => serde_json::from_value(value).map(Some).map_err(|e| {
                Error::type_error(format!(
                    "Invalid keyword argument '{}' (expected {}): {}",
                    name,
                    type_name::<T>(),
                    e
                ))
            }),
            Some(Arg::Object(object)) => object.downcast::<T>().map(|b| Some(*b)).map_err(|_| {
                Error::type_error(format!(
                    "Keyword argument '{}' is not a {}",
                    name,
                    type_name::<T>()
                ))
            }),
        }
    }

    /// Remove and return a built object that has no serde representation
    pub fn take_object<T: Any>(&mut self, name: &str) -> Result<T, Error> {
        match self.args.remove(name) {
            Some(Arg::Object(object)) => object.downcast::<T>().map(|b| *b).map_err(|_| {
                Error::type_error(format!(
                    "Keyword argument '{}' is not a {}",
                    name,
                    type_name::<T>()
                ))
            }),
            Some(Arg::Value(_)) => Err(Error::type_error(format!(
                "Keyword argument '{}' must be a built object, not a plain value",
                name
            ))),
            None => Err(Error::type_error(format!(
                "Missing required keyword argument '{}'",
                name
            ))),
        }
    }

    /// Fail if any argument was left unconsumed
    pub fn finish(self) -> Result<(), Error> {
        if self.args.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = self.args.keys().map(String::as_str).collect();
        Err(Error::type_error(format!(
            "Unexpected keyword argument(s): {}",
            names.join(", ")
        )))
    }
}

/// Serializable description of an object to build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantiateSpec {
    /// Full dotted name, `module.Name`
    pub class_name: String,
    #[serde(default)]
    pub init_kwargs: Map<String, Value>,
    /// Arguments to build first, by argument name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebuild_init: Option<BTreeMap<String, InstantiateSpec>>,
}

impl InstantiateSpec {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            init_kwargs: Map::new(),
            rebuild_init: None,
        }
    }

    pub fn with_kwarg(mut self, name: impl Into<String>, value: Value) -> Self {
        self.init_kwargs.insert(name.into(), value);
        self
    }

    pub fn with_nested(mut self, name: impl Into<String>, spec: InstantiateSpec) -> Self {
        self.rebuild_init
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), spec);
        self
    }
}

/// Table of factories, grouped by module
#[derive(Default, Clone)]
pub struct Registry {
    modules: HashMap<String, HashMap<String, Factory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its full dotted name
    pub fn register<T, F>(&mut self, class_name: &str, build: F) -> Result<(), Error>
    where
        T: Any + Send,
        F: Fn(&mut Kwargs) -> Result<T> + Send + Sync + 'static,
    {
        let (module, name) = split_class_name(class_name)?;
        let factory: Factory = Arc::new(move |kwargs: &mut Kwargs| -> Result<Box<dyn Any + Send>> {
            let object = build(kwargs)?;
            Ok(Box::new(object))
        });
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(name.to_string(), factory);
        Ok(())
    }

    pub fn contains(&self, class_name: &str) -> bool {
        split_class_name(class_name)
            .ok()
            .and_then(|(module, name)| self.modules.get(module)?.get(name))
            .is_some()
    }

    /// Resolve one element of a module
    pub fn import_from_string(&self, module: &str, element: &str) -> Result<Factory, Error> {
        let elements = self
            .modules
            .get(module)
            .ok_or_else(|| Error::lookup_error(format!("No module named '{}'", module)))?;
        elements.get(element).cloned().ok_or_else(|| {
            Error::lookup_error(format!(
                "Cannot import name '{}' from '{}'",
                element, module
            ))
        })
    }

    /// Resolve several elements of a module, in order
    pub fn import_many(&self, module: &str, elements: &[&str]) -> Result<Vec<Factory>, Error> {
        elements
            .iter()
            .map(|element| self.import_from_string(module, element))
            .collect()
    }

    /// Build an object from its spec, building nested arguments first
    pub fn instantiate<T: Any>(&self, spec: &InstantiateSpec) -> Result<T> {
        let object = self.instantiate_any(spec)?;
        object.downcast::<T>().map(|b| *b).map_err(|_| {
            Error::type_error(format!(
                "'{}' did not build a {}",
                spec.class_name,
                type_name::<T>()
            ))
            .into()
        })
    }

    /// Build an object from its spec without fixing its type
    pub fn instantiate_any(&self, spec: &InstantiateSpec) -> Result<Box<dyn Any + Send>> {
        let (module, name) = split_class_name(&spec.class_name)?;
        let factory = self.import_from_string(module, name)?;

        let mut kwargs = Kwargs::from_map(spec.init_kwargs.clone());
        if let Some(nested) = &spec.rebuild_init {
            for (arg_name, nested_spec) in nested {
                let object = self.instantiate_any(nested_spec)?;
                kwargs.insert_boxed(arg_name.clone(), object);
            }
        }

        factory(&mut kwargs)
    }
}

fn split_class_name(class_name: &str) -> Result<(&str, &str), Error> {
    match class_name.rsplit_once('.') {
        Some((module, name)) if !module.is_empty() && !name.is_empty() => Ok((module, name)),
        _ => Err(Error::lookup_error(format!(
            "'{}' is not a full 'module.Name' class name",
            class_name
        ))),
    }
}
