use std::collections::HashMap;

use super::value::Value;

/// A single flat variable namespace. There is no scope nesting: loop and
/// branch bodies read and write the same store as top-level code, and
/// assigning to an unknown name declares it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    store: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.store.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.store.get_mut(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        let _ = self.store.insert(name.to_string(), value);
    }
}
