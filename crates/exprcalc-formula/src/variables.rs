//! Variable collection

use ahash::AHashMap;
use exprcalc_core::Variant;

/// Key under which a variable or function name is compared
///
/// Names match when their Unicode lowercase forms are equal.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive map of variable names to values
///
/// The name is stored as first given, lookups ignore case.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: AHashMap<String, (String, Variant)>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any value stored under the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Variant>) {
        let name = name.into();
        let value = value.into();
        match self.values.get_mut(&name_key(&name)) {
            Some(entry) => entry.1 = value,
            None => {
                self.values.insert(name_key(&name), (name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.values.get(&name_key(name)).map(|(_, value)| value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Variant> {
        self.values.remove(&name_key(name)).map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name_key(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Iterate over `(name, value)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.values
            .values()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<N: Into<String>, V: Into<Variant>> FromIterator<(N, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut variables = Variables::new();
        variables.extend(iter);
        variables
    }
}

impl<N: Into<String>, V: Into<Variant>> Extend<(N, V)> for Variables {
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}
