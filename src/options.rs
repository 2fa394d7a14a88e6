//! Configuration options for spytext encoding and decoding.
//!
//! The grammar itself has no knobs: escaping, delimiters and the date layout are
//! fixed. [`Options`] only controls how strictly input is checked.
//!
//! ## Examples
//!
//! ```rust
//! use serde_spytext::{from_str_with_options, Options};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Point { x: i32, y: i32 }
//!
//! // Accept snapshots written under a different type name
//! let options = Options::lenient();
//! let point: Point = from_str_with_options("<geo.Point;x=1;y=2>", options).unwrap();
//! assert_eq!(point.x, 1);
//! ```

/// Default limit on nested `<...>` units.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for spytext encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use serde_spytext::Options;
///
/// let options = Options::new().with_max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// assert!(options.check_type_names);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of nested objects/arrays, on both encode and decode.
    pub max_depth: usize,
    /// Require encoded object type names to match the target's serde name.
    pub check_type_names: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
            check_type_names: true,
        }
    }
}

impl Options {
    /// Creates default options (type names checked, depth limit of 128).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that accept any encoded type name for a struct target.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_spytext::Options;
    ///
    /// assert!(!Options::lenient().check_type_names);
    /// ```
    #[must_use]
    pub fn lenient() -> Self {
        Options {
            check_type_names: false,
            ..Default::default()
        }
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables the type name check on decode.
    #[must_use]
    pub fn with_type_name_check(mut self, check: bool) -> Self {
        self.check_type_names = check;
        self
    }
}
