// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted key/value blobs and the [`Store`] trait.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json};

use crate::error::StoreError;

/// Key under which every node writes its type tag.
pub const TAG_KEY: &str = "@";

/// Key under which a node writes its serialized children.
pub const CHILDREN_KEY: &str = "children";

/// A generic key/value record, backed by a JSON object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Blob(Map<String, Json>);

impl Blob {
    /// An empty blob.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` under `key`, replacing any previous entry.
    pub fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_value(value)?;
        self.0.insert(key.to_owned(), json);
        Ok(())
    }

    /// Deserialize the entry under `key`. Absent keys read as `Ok(None)`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.0
            .get(key)
            .map(|json| T::deserialize(json))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Raw JSON entry under `key`.
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.0.get(key)
    }

    /// Store a raw JSON entry.
    pub fn insert_raw(&mut self, key: &str, json: Json) {
        self.0.insert(key.to_owned(), json);
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the blob has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Move every entry of `other` into this blob, replacing entries with the same key.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// The type tag written under [`TAG_KEY`], if any.
    pub fn tag(&self) -> Option<&str> {
        self.0.get(TAG_KEY).and_then(Json::as_str)
    }

    /// Render as a JSON document.
    pub fn to_json_string(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Parse a JSON document. The document must be an object.
    pub fn from_json_str(text: &str) -> Result<Self, StoreError> {
        Ok(Self(serde_json::from_str(text)?))
    }

    /// Unwrap into a JSON value.
    pub fn into_json(self) -> Json {
        Json::Object(self.0)
    }
}

impl From<Map<String, Json>> for Blob {
    fn from(map: Map<String, Json>) -> Self {
        Self(map)
    }
}

impl TryFrom<Json> for Blob {
    type Error = StoreError;

    fn try_from(json: Json) -> Result<Self, Self::Error> {
        match json {
            Json::Object(map) => Ok(Self(map)),
            _ => Err(StoreError::Malformed {
                key: CHILDREN_KEY.to_owned(),
            }),
        }
    }
}

/// Persist to and restore from a [`Blob`].
pub trait Store {
    /// Write this value's state into `blob`.
    fn store(&self, blob: &mut Blob) -> Result<(), StoreError>;

    /// Replace this value's state with what `blob` holds.
    fn restore(&mut self, blob: &Blob) -> Result<(), StoreError>;
}
