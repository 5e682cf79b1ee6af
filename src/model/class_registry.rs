//! Ordered list of class names. The position of a name is its class index.

/// Ordered class names. Duplicate names are kept as distinct indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    names: Vec<String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from free-form text, one class per line.
    pub fn from_text(text: &str) -> Self {
        let mut registry = Self::new();
        registry.set_from_text(text);
        registry
    }

    /// Replace the registry with the non-empty, trimmed lines, preserving order.
    ///
    /// Input without any usable line leaves the registry empty.
    pub fn set_classes<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        log::debug!("Class registry now holds {} classes", self.names.len());
    }

    /// Replace the registry from newline-separated text.
    pub fn set_from_text(&mut self, text: &str) {
        self.set_classes(text.split('\n'));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Name at `index`, or the index itself as text when out of range.
    pub fn name_of(&self, index: usize) -> String {
        self.get(index)
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string())
    }

    /// Step `current` by `step` positions, wrapping at both ends.
    ///
    /// Returns `None` for an empty registry.
    pub fn cycle(&self, current: usize, step: isize) -> Option<usize> {
        if self.names.is_empty() {
            return None;
        }
        let len = self.names.len() as isize;
        let current = (current % self.names.len()) as isize;
        Some((current + step).rem_euclid(len) as usize)
    }

    /// Index to export for a box that captured `class_index` and `class_name`.
    ///
    /// The captured name wins: the stored index is kept only while it still points
    /// at that name, otherwise the first index holding the name is used. Returns
    /// `None` if the name no longer exists.
    pub fn resolve(&self, class_index: usize, class_name: &str) -> Option<usize> {
        if self.get(class_index) == Some(class_name) {
            return Some(class_index);
        }
        self.names.iter().position(|n| n == class_name)
    }


    pub fn names(&self) -> &[String] {
        &self.names
    }
}
