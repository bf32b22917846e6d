//! Reader options.

/// Options for reading project files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Decode presentation tables, views, filters and groups (default: true).
    pub read_presentation_data: bool,
    /// Stop after the project properties; no entity tables are decoded.
    pub read_properties_only: bool,
    /// Fail the read when any diagnostic was recorded.
    pub strict: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            read_presentation_data: true,
            read_properties_only: false,
            strict: false,
        }
    }
}

impl ReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip views and tables.
    #[must_use]
    pub fn without_presentation_data(mut self) -> Self {
        self.read_presentation_data = false;
        self
    }

    /// Read project properties only.
    #[must_use]
    pub fn properties_only(mut self) -> Self {
        self.read_properties_only = true;
        self
    }

    /// Enable strict mode.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}
