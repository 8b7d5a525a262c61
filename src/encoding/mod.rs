//! Index key encoding and decoding
//!
//! Keys are compact `/`-separated byte strings, one layout per category:
//!
//! | Category | Layout |
//! |---|---|
//! | type declaration | `name/namespace/modifiers` |
//! | method declaration | `selector/arity` |
//! | field declaration | `name` |
//! | reference | `name` |
//!
//! Decoding fills a `DecodedKey` in place. Every decode overwrites all
//! fields, so one value can be reused across many keys.

use crate::error::SearchError;
use crate::index::Category;
use crate::Result;

/// Field separator inside encoded keys
pub const SEPARATOR: u8 = b'/';

pub fn type_decl_key(name: &str, namespace: &str, modifiers: u32) -> Vec<u8> {
    format!("{}/{}/{}", name, namespace, modifiers).into_bytes()
}

pub fn method_decl_key(selector: &str, arity: u32) -> Vec<u8> {
    format!("{}/{}", selector, arity).into_bytes()
}

pub fn field_decl_key(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

pub fn reference_key(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

/// Decoded type declaration key
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeDeclKey {
    pub name: String,
    pub namespace: String,
    pub modifiers: u32,
}

impl TypeDeclKey {
    pub fn decode_from(&mut self, key: &[u8]) -> Result<()> {
        let text = utf8(Category::TypeDecl, key)?;
        let (name, rest) = text
            .split_once('/')
            .ok_or_else(|| decode_error(Category::TypeDecl, "missing namespace"))?;
        // Namespaces may themselves contain separators
        let (namespace, modifiers) = rest
            .rsplit_once('/')
            .ok_or_else(|| decode_error(Category::TypeDecl, "missing modifiers"))?;
        let modifiers = modifiers
            .parse()
            .map_err(|_| decode_error(Category::TypeDecl, "modifiers are not a number"))?;

        overwrite(&mut self.name, name);
        overwrite(&mut self.namespace, namespace);
        self.modifiers = modifiers;
        Ok(())
    }

    pub fn encode(&self) -> Vec<u8> {
        type_decl_key(&self.name, &self.namespace, self.modifiers)
    }
}

/// Decoded method declaration key
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodDeclKey {
    pub selector: String,
    pub arity: u32,
}

impl MethodDeclKey {
    pub fn decode_from(&mut self, key: &[u8]) -> Result<()> {
        let text = utf8(Category::MethodDecl, key)?;
        let (selector, arity) = text
            .rsplit_once('/')
            .ok_or_else(|| decode_error(Category::MethodDecl, "missing arity"))?;
        let arity = arity
            .parse()
            .map_err(|_| decode_error(Category::MethodDecl, "arity is not a number"))?;

        overwrite(&mut self.selector, selector);
        self.arity = arity;
        Ok(())
    }

    pub fn encode(&self) -> Vec<u8> {
        method_decl_key(&self.selector, self.arity)
    }
}

/// Decoded single-name key (fields and references)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameKey {
    pub name: String,
}

impl NameKey {
    fn decode_from(&mut self, category: Category, key: &[u8]) -> Result<()> {
        let text = utf8(category, key)?;
        overwrite(&mut self.name, text);
        Ok(())
    }
}

/// Structured form of an index key
///
/// Produced by a pattern's decoder and handed by shared reference to
/// `matches_decoded_key` and to requestors. Anything that wants to keep
/// it past the next decode must clone it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedKey {
    Type(TypeDeclKey),
    Method(MethodDeclKey),
    Field(NameKey),
    Reference(NameKey),
    /// Undecoded key bytes, for pattern kinds with their own layout
    Raw { category: Category, bytes: Vec<u8> },
}

impl DecodedKey {
    /// Empty decode target for a category
    pub fn blank(category: Category) -> Self {
        match category {
            Category::TypeDecl => DecodedKey::Type(TypeDeclKey::default()),
            Category::MethodDecl => DecodedKey::Method(MethodDeclKey::default()),
            Category::FieldDecl => DecodedKey::Field(NameKey::default()),
            Category::Reference => DecodedKey::Reference(NameKey::default()),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            DecodedKey::Type(_) => Category::TypeDecl,
            DecodedKey::Method(_) => Category::MethodDecl,
            DecodedKey::Field(_) => Category::FieldDecl,
            DecodedKey::Reference(_) => Category::Reference,
            DecodedKey::Raw { category, .. } => *category,
        }
    }

    /// Decode `key` of `category` into this value, replacing all of its state
    pub fn decode(&mut self, category: Category, key: &[u8]) -> Result<()> {
        match (category, &mut *self) {
            (Category::TypeDecl, DecodedKey::Type(k)) => k.decode_from(key),
            (Category::MethodDecl, DecodedKey::Method(k)) => k.decode_from(key),
            (Category::FieldDecl, DecodedKey::Field(k)) => k.decode_from(category, key),
            (Category::Reference, DecodedKey::Reference(k)) => k.decode_from(category, key),
            _ => {
                *self = DecodedKey::blank(category);
                self.decode(category, key)
            }
        }
    }

    /// Keep the key bytes undecoded
    pub fn decode_raw(&mut self, category: Category, key: &[u8]) {
        match self {
            DecodedKey::Raw {
                category: c,
                bytes,
            } => {
                *c = category;
                bytes.clear();
                bytes.extend_from_slice(key);
            }
            _ => {
                *self = DecodedKey::Raw {
                    category,
                    bytes: key.to_vec(),
                }
            }
        }
    }

    /// Primary name (type name, selector, field or referenced name)
    pub fn name(&self) -> Option<&str> {
        match self {
            DecodedKey::Type(k) => Some(&k.name),
            DecodedKey::Method(k) => Some(&k.selector),
            DecodedKey::Field(k) | DecodedKey::Reference(k) => Some(&k.name),
            DecodedKey::Raw { .. } => None,
        }
    }

    /// Re-encode into index key bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            DecodedKey::Type(k) => k.encode(),
            DecodedKey::Method(k) => k.encode(),
            DecodedKey::Field(k) => field_decl_key(&k.name),
            DecodedKey::Reference(k) => reference_key(&k.name),
            DecodedKey::Raw { bytes, .. } => bytes.clone(),
        }
    }
}

fn utf8(category: Category, key: &[u8]) -> Result<&str> {
    std::str::from_utf8(key).map_err(|e| decode_error(category, &e.to_string()))
}

fn decode_error(category: Category, reason: &str) -> SearchError {
    SearchError::KeyDecode {
        category,
        reason: reason.to_string(),
    }
}

fn overwrite(target: &mut String, value: &str) {
    target.clear();
    target.push_str(value);
}
