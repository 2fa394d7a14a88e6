//! Decoding by encoded type name.
//!
//! A snapshot carries its root type name, so it can be decoded without a
//! compile-time target as long as that name was registered beforehand:
//!
//! ```rust
//! use serde_spytext::Registry;
//! use serde::Deserialize;
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! #[serde(rename = "no.steria.Person")]
//! struct Person { name: String }
//!
//! let mut registry = Registry::new();
//! registry.register::<Person>("no.steria.Person");
//!
//! let decoded = registry.decode("<no.steria.Person;name=Ada>").unwrap().unwrap();
//! let person = decoded.downcast::<Person>().unwrap();
//! assert_eq!(person.name, "Ada");
//!
//! assert!(registry.decode("<null>").unwrap().is_none());
//! ```

use crate::de::Deserializer;
use crate::ser::ROOT_NULL;
use crate::split::split;
use crate::{Error, Options, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Type-erased decode step for one registered type.
trait DynDecoder: Send + Sync {
    fn decode_dyn(&self, text: &str, options: Options) -> Result<Box<dyn Any + Send>>;

    fn target(&self) -> &'static str;
}

struct TypedDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> DynDecoder for TypedDecoder<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn decode_dyn(&self, text: &str, options: Options) -> Result<Box<dyn Any + Send>> {
        let mut deserializer = Deserializer::with_options(text, options);
        let value = T::deserialize(&mut deserializer)?;
        Ok(Box::new(value))
    }

    fn target(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Maps encoded type names to decoders.
///
/// Build it once, then share it: decoding only reads the table, and the
/// registry is `Send + Sync`.
#[derive(Default)]
pub struct Registry {
    decoders: IndexMap<String, Box<dyn DynDecoder>>,
    options: Options,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that decodes with the given options.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Registry {
            decoders: IndexMap::new(),
            options,
        }
    }

    /// Registers `T` under an encoded type name, replacing any earlier entry.
    ///
    /// The name must be the serde container name of `T` (after any
    /// `#[serde(rename)]`): decoding still checks the root type name against
    /// `T` unless the registry was built with [`Options::lenient`].
    pub fn register<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        let name = name.into();
        let decoder = TypedDecoder::<T> {
            _marker: PhantomData,
        };
        debug!(name = %name, rust_type = decoder.target(), "registering type");
        self.decoders.insert(name, Box::new(decoder));
        self
    }

    /// Decodes text whose root type name has been registered.
    ///
    /// `<null>` decodes to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeResolution`] for an unregistered name, or any
    /// error the registered type's decode reports.
    pub fn decode(&self, text: &str) -> Result<Option<Box<dyn Any + Send>>> {
        if text == ROOT_NULL {
            return Ok(None);
        }
        let tokens = split(text)?;
        let name = tokens[0];
        match self.decoders.get(name) {
            Some(decoder) => {
                debug!(name, rust_type = decoder.target(), "decoding registered type");
                decoder.decode_dyn(text, self.options).map(Some)
            }
            None => {
                debug!(name, "type not registered");
                Err(Error::type_resolution(name))
            }
        }
    }

    /// Decodes registered text and downcasts it to `T`.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`decode`](Self::decode), returns
    /// [`Error::TypeResolution`] when the name is registered for a type other
    /// than `T`.
    pub fn decode_as<T: 'static>(&self, text: &str) -> Result<Option<T>> {
        match self.decode(text)? {
            None => Ok(None),
            Some(value) => match value.downcast::<T>() {
                Ok(typed) => Ok(Some(*typed)),
                Err(_) => {
                    let name = split(text)?[0];
                    Err(Error::type_mismatch(name, std::any::type_name::<T>()))
                }
            },
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.decoders.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}
