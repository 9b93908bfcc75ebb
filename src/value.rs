// Runtime value model: the tagged universe every reader/evaluator/printer
// operation works over.

use crate::env::Environment;
use std::rc::Rc;

/// A value restricted to the kinds admissible as hash-map keys. Carried
/// separately from `Value` so maps can implement `Eq`/`Hash` without having
/// to reject Closures/Builtins/collections at every lookup.
#[derive(Debug, Clone)]
pub enum AtomKey {
    Integer(i64),
    Float(u64), // bit pattern of the f64, so NaN/negative-zero hash consistently
    String(String),
    Keyword(String),
}

impl PartialEq for AtomKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AtomKey::Integer(a), AtomKey::Integer(b)) => a == b,
            (AtomKey::Float(a), AtomKey::Float(b)) => a == b,
            (AtomKey::String(a), AtomKey::String(b)) => a == b,
            (AtomKey::Keyword(a), AtomKey::Keyword(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for AtomKey {}

impl AtomKey {
    pub fn from_value(v: &Value) -> Option<AtomKey> {
        match v {
            Value::Integer(n) => Some(AtomKey::Integer(*n)),
            Value::Float(n) => Some(AtomKey::Float(n.to_bits())),
            Value::String(s) => Some(AtomKey::String(s.clone())),
            Value::Keyword(k) => Some(AtomKey::Keyword(k.clone())),
            _ => None,
        }
    }

    pub fn into_value(&self) -> Value {
        match self {
            AtomKey::Integer(n) => Value::Integer(*n),
            AtomKey::Float(bits) => Value::Float(f64::from_bits(*bits)),
            AtomKey::String(s) => Value::String(s.clone()),
            AtomKey::Keyword(k) => Value::Keyword(k.clone()),
        }
    }
}

/// An insertion-order-preserving map from `AtomKey` to `Value`. A plain
/// `Vec` of pairs with linear lookup: maps in this language are small
/// (built from literal `{...}` forms or a handful of `assoc` calls), so the
/// simplicity of a vector outweighs the complexity of pulling in an ordered
/// hash-map dependency.
#[derive(Debug, Clone, Default)]
pub struct PlpMap {
    entries: Vec<(AtomKey, Value)>,
}

impl PlpMap {
    pub fn new() -> Self {
        PlpMap { entries: Vec::new() }
    }

    /// Builds a map from alternating key/value items, rejecting duplicate
    /// keys (same tag and payload) the way `{...}` literals and `hash-map`
    /// both must.
    pub fn from_pairs(pairs: Vec<(AtomKey, Value)>) -> Result<Self, String> {
        let mut entries: Vec<(AtomKey, Value)> = Vec::with_capacity(pairs.len());
        for (k, v) in pairs {
            if entries.iter().any(|(ek, _)| *ek == k) {
                return Err(format!("{:?}", k.into_value()));
            }
            entries.push((k, v));
        }
        Ok(PlpMap { entries })
    }

    pub fn get(&self, key: &AtomKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &AtomKey) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Returns a new map with the given key set or overwritten, preserving
    /// the original insertion position on overwrite.
    pub fn assoc(&self, key: AtomKey, value: Value) -> Self {
        let mut entries = self.entries.clone();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
        PlpMap { entries }
    }

    /// Returns a new map with the given key removed, if present.
    pub fn dissoc(&self, key: &AtomKey) -> Self {
        let entries = self.entries.iter().filter(|(k, _)| k != key).cloned().collect();
        PlpMap { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AtomKey, Value)> {
        self.entries.iter()
    }
}

impl PartialEq for PlpMap {
    /// Order-independent: two maps are equal when they hold the same set of
    /// key/value pairs, regardless of insertion order.
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries
            .iter()
            .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

#[derive(Debug)]
pub struct LambdaData {
    pub params: Vec<String>,
    pub body: Value,
    pub env: Rc<Environment>,
}

pub type BuiltinFn = fn(&[Value]) -> Result<Value, crate::error::PlpError>;

#[derive(Debug)]
pub struct BuiltinData {
    pub name: &'static str,
    pub func: BuiltinFn,
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Symbol(String),
    Keyword(String),
    Nil,
    List(Rc<Vec<Value>>),
    Vector(Rc<Vec<Value>>),
    HashMap(Rc<PlpMap>),
    Closure(Rc<LambdaData>),
    Builtin(Rc<BuiltinData>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(items))
    }

    /// True unless the value is Nil or Boolean(false) — the only two falsy
    /// values in the language. Zero, empty strings, and empty collections
    /// are all truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// The tag name surfaced by the `type` builtin and by error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Boolean",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Keyword(_) => "Keyword",
            Value::Nil => "Nil",
            Value::List(_) => "List",
            Value::Vector(_) => "Vector",
            Value::HashMap(_) => "HashMap",
            Value::Closure(_) => "Closure",
            Value::Builtin(_) => "Builtin",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::HashMap(a), Value::HashMap(b)) => a == b,
            // Invariant I2: List and Vector cross-compare by pairwise equality.
            (Value::List(a), Value::List(b))
            | (Value::List(a), Value::Vector(b))
            | (Value::Vector(a), Value::List(b))
            | (Value::Vector(a), Value::Vector(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            // Invariant I5: closures and builtins never compare equal, even to themselves.
            _ => false,
        }
    }
}
