// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property store: a fixed set of named values with declared defaults.
//!
//! ## Overview
//!
//! A [`PropertyStore`] is built from a list of [`PropertyDecl`]s and never grows afterwards.
//! Writes return a [`ChangeSet`] naming the properties whose value actually changed; the
//! owner of the store runs its own "after properties changed" hook with it.
//!
//! Each declaration carries [`PropertyFlags`]:
//! - [`PropertyFlags::PERSIST`]: written by [`PropertyStore::store_persisted`] and read back by
//!   [`PropertyStore::restore_persisted`].
//! - [`PropertyFlags::REPAINT`]: a change asks the owner for a full repaint.

use std::collections::BTreeSet;

use folio_units::Unit;
use serde::Serialize;

use crate::blob::Blob;
use crate::error::{PropertyError, StoreError};

bitflags::bitflags! {
    /// Per-property behavior flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// Property is written to and read from persisted blobs.
        const PERSIST = 0b0000_0001;
        /// A change to this property invalidates the whole scene.
        const REPAINT = 0b0000_0010;
    }
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self::PERSIST
    }
}

/// A property value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean switch.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Number(f64),
    /// Measurement unit.
    Unit(Unit),
    /// Free text.
    Text(String),
}

impl Value {
    /// Name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Number(_) => "number",
            Self::Unit(_) => "unit",
            Self::Text(_) => "text",
        }
    }

    /// True if both values are of the same kind.
    pub fn same_kind(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// True unless this is a non-finite number.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Number(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Read `json` as a value of the same kind as `self`.
    pub fn read_like(&self, json: &serde_json::Value) -> Option<Self> {
        match self {
            Self::Bool(_) => json.as_bool().map(Self::Bool),
            Self::Int(_) => json.as_i64().map(Self::Int),
            Self::Number(_) => json.as_f64().map(Self::Number),
            Self::Unit(_) => serde_json::from_value(json.clone()).ok().map(Self::Unit),
            Self::Text(_) => json.as_str().map(|s| Self::Text(s.to_owned())),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Unit> for Value {
    fn from(v: Unit) -> Self {
        Self::Unit(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Declaration of a single property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDecl {
    /// Property name; also its key in persisted blobs.
    pub name: &'static str,
    /// Initial value; fixes the property's kind.
    pub default: Value,
    /// Behavior flags.
    pub flags: PropertyFlags,
}

impl PropertyDecl {
    /// A persisted property without further flags.
    pub fn new(name: &'static str, default: impl Into<Value>) -> Self {
        Self {
            name,
            default: default.into(),
            flags: PropertyFlags::default(),
        }
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Names of properties whose value changed in one write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet(BTreeSet<&'static str>);

impl ChangeSet {
    /// An empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `name` changed.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of changed properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Changed names in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    /// Record that `name` changed.
    pub fn insert(&mut self, name: &'static str) {
        self.0.insert(name);
    }

    /// Merge another change set into this one.
    pub fn absorb(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

/// A fixed set of named values.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyStore {
    decls: Vec<PropertyDecl>,
    values: Vec<Value>,
}

impl PropertyStore {
    /// Create a store holding every declared default.
    pub fn new(decls: Vec<PropertyDecl>) -> Self {
        let values = decls.iter().map(|d| d.default.clone()).collect();
        Self { decls, values }
    }

    /// The declarations this store was built from.
    pub fn declarations(&self) -> &[PropertyDecl] {
        &self.decls
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slot(name).map(|i| &self.values[i])
    }

    /// Current value of `name` if it is a number.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Current value of `name` if it is an integer.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Current value of `name` if it is a boolean.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Current value of `name` if it is a unit.
    pub fn unit(&self, name: &str) -> Option<Unit> {
        match self.get(name)? {
            Value::Unit(v) => Some(*v),
            _ => None,
        }
    }

    /// Iterate `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.decls.iter().map(|d| d.name).zip(self.values.iter())
    }

    /// Write a single property.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<ChangeSet, PropertyError> {
        self.set_many([(name, value.into())])
    }

    /// Write several properties at once.
    ///
    /// Every entry is validated before anything is written, so a rejected batch leaves the
    /// store untouched.
    pub fn set_many<'a, I>(&mut self, entries: I) -> Result<ChangeSet, PropertyError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut staged = Vec::new();
        for (name, value) in entries {
            let slot = self
                .slot(name)
                .ok_or_else(|| PropertyError::Unknown(name.to_owned()))?;
            let decl = &self.decls[slot];
            if !decl.default.same_kind(&value) {
                return Err(PropertyError::TypeMismatch {
                    name: decl.name,
                    expected: decl.default.kind(),
                    found: value.kind(),
                });
            }
            staged.push((slot, value));
        }
        let mut changes = ChangeSet::new();
        for (slot, value) in staged {
            if self.values[slot] != value {
                self.values[slot] = value;
                changes.insert(self.decls[slot].name);
            }
        }
        Ok(changes)
    }

    /// Restore every default.
    pub fn reset(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for (decl, value) in self.decls.iter().zip(self.values.iter_mut()) {
            if *value != decl.default {
                *value = decl.default.clone();
                changes.insert(decl.name);
            }
        }
        changes
    }

    /// True if any property named in `changes` carries all of `flags`.
    pub fn any_flagged(&self, changes: &ChangeSet, flags: PropertyFlags) -> bool {
        self.decls
            .iter()
            .any(|d| d.flags.contains(flags) && changes.contains(d.name))
    }

    /// Write every persisted property into `blob`, keyed by name.
    pub fn store_persisted(&self, blob: &mut Blob) -> Result<(), StoreError> {
        for (decl, value) in self.decls.iter().zip(&self.values) {
            if !decl.flags.contains(PropertyFlags::PERSIST) {
                continue;
            }
            if !value.is_finite() {
                return Err(StoreError::NonFinite {
                    key: decl.name.to_owned(),
                });
            }
            blob.write(decl.name, value)?;
        }
        Ok(())
    }

    /// Read every persisted property from `blob`.
    ///
    /// Absent keys, and keys holding a value of the wrong kind, fall back to the declared
    /// default.
    pub fn restore_persisted(&mut self, blob: &Blob) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for (decl, value) in self.decls.iter().zip(self.values.iter_mut()) {
            if !decl.flags.contains(PropertyFlags::PERSIST) {
                continue;
            }
            let restored = match blob.get(decl.name) {
                None => decl.default.clone(),
                Some(json) => decl.default.read_like(json).unwrap_or_else(|| {
                    tracing::warn!(
                        key = decl.name,
                        expected = decl.default.kind(),
                        "persisted value has the wrong kind; using default"
                    );
                    decl.default.clone()
                }),
            };
            if *value != restored {
                *value = restored;
                changes.insert(decl.name);
            }
        }
        changes
    }

    fn slot(&self, name: &str) -> Option<usize> {
        self.decls.iter().position(|d| d.name == name)
    }
}
