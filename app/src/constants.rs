//! Application-wide constants
//!
//! Single source of truth for configuration defaults.

/// Configuration file lookup
pub mod files {
    /// Environment variable naming the configuration file
    pub const PATH_ENV: &str = "DATAFLOW_CONFIG";
    /// File read from the working directory when the variable is unset
    pub const DEFAULT_FILE: &str = "dataflow.json";
}

/// Default theme colors (RGB)
pub mod colors {
    /// Palette entry button
    pub const SOURCE_BUTTON: [u8; 3] = [25, 119, 0];
    /// Palette entry button under the cursor
    pub const SOURCE_BUTTON_HOVERED: [u8; 3] = [25, 255, 0];
    /// Palette entry button while pressed
    pub const SOURCE_BUTTON_ACTIVE: [u8; 3] = [25, 119, 0];
    /// Title bar of a node that has completed an execution
    pub const COMPLETION_TITLE_BAR: [u8; 3] = [37, 28, 138];
}

/// Default canvas settings
pub mod defaults {
    /// Use ANSI colors when rendering
    pub const COLOR: bool = true;
    /// Print attribute handles next to labels
    pub const SHOW_IDS: bool = false;
    /// Session prompt
    pub const PROMPT: &str = "dataflow> ";
}
