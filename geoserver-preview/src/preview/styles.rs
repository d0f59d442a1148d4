// ABOUTME: Cyclic selection over the styles a layer exposes
// ABOUTME: An empty list means the server picks the layer's default style

/// Ordered style names with a cursor. Cycling wraps in both directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSelection {
    names: Vec<String>,
    index: usize,
}

impl StyleSelection {
    pub fn new(names: Vec<String>) -> Self {
        Self { names, index: 0 }
    }

    /// Replace the list and reset the cursor to the first entry.
    pub fn set_styles(&mut self, names: Vec<String>) {
        self.names = names;
        self.index = 0;
    }

    /// Style to request, or `None` for the server default.
    pub fn current(&self) -> Option<&str> {
        self.names.get(self.index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Advance to the next style. Returns false when there is nothing to cycle.
    pub fn next(&mut self) -> bool {
        if self.names.is_empty() {
            return false;
        }
        self.index = (self.index + 1) % self.names.len();
        true
    }

    /// Step back to the previous style. Returns false when there is nothing to cycle.
    pub fn prev(&mut self) -> bool {
        if self.names.is_empty() {
            return false;
        }
        self.index = (self.index + self.names.len() - 1) % self.names.len();
        true
    }
}
