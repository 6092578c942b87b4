//! Render surface settings and their static schema.
//!
//! Every recognized settings key is a [`FieldKey`]. The schema fixes each key's
//! name, its default and its position in the canonical ordering used by the
//! fingerprint and by [`Spec::to_source`](super::Spec::to_source). All fields are
//! integers.

use serde::Serialize;

use super::error::ParseError;

/// A recognized settings key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// Image width in pixels
    Width,
    /// Image height in pixels
    Height,
    /// Left edge of the viewport
    Left,
    /// Right edge of the viewport
    Right,
    /// Bottom edge of the viewport
    Bottom,
    /// Top edge of the viewport
    Top,
}

impl FieldKey {
    /// All keys in canonical order.
    pub const ALL: [Self; 6] =
        [Self::Width, Self::Height, Self::Left, Self::Right, Self::Bottom, Self::Top];

    /// Name of the key as written in a settings block.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Top => "top",
        }
    }

    /// Value used when the settings block does not override the key.
    #[must_use]
    pub const fn default_value(self) -> i64 {
        match self {
            Self::Width => 600,
            Self::Height => 400,
            Self::Left => -10,
            Self::Right => 10,
            Self::Bottom => -7,
            Self::Top => 7,
        }
    }

    /// Look up a key by its exact name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

/// Validated render surface configuration.
///
/// Fields can only be built through [`Fields::default`] or
/// [`Fields::with_overrides`], both of which guarantee `left < right` and
/// `bottom < top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fields {
    width: i64,
    height: i64,
    left: i64,
    right: i64,
    bottom: i64,
    top: i64,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            width: FieldKey::Width.default_value(),
            height: FieldKey::Height.default_value(),
            left: FieldKey::Left.default_value(),
            right: FieldKey::Right.default_value(),
            bottom: FieldKey::Bottom.default_value(),
            top: FieldKey::Top.default_value(),
        }
    }
}

impl Fields {
    /// Apply overrides on top of the defaults and validate the bounds.
    ///
    /// Later overrides of the same key win.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidBoundary`] when `left >= right` or
    /// `bottom >= top` after the overrides are applied.
    pub fn with_overrides(
        overrides: impl IntoIterator<Item = (FieldKey, i64)>,
    ) -> Result<Self, ParseError> {
        let mut fields = Self::default();
        for (key, value) in overrides {
            *fields.slot(key) = value;
        }
        fields.check_bounds()?;
        Ok(fields)
    }

    fn slot(&mut self, key: FieldKey) -> &mut i64 {
        match key {
            FieldKey::Width => &mut self.width,
            FieldKey::Height => &mut self.height,
            FieldKey::Left => &mut self.left,
            FieldKey::Right => &mut self.right,
            FieldKey::Bottom => &mut self.bottom,
            FieldKey::Top => &mut self.top,
        }
    }

    fn check_bounds(&self) -> Result<(), ParseError> {
        if self.left >= self.right {
            return Err(ParseError::InvalidBoundary {
                lower_name: FieldKey::Left.name(),
                lower: self.left,
                upper_name: FieldKey::Right.name(),
                upper: self.right,
            });
        }
        if self.bottom >= self.top {
            return Err(ParseError::InvalidBoundary {
                lower_name: FieldKey::Bottom.name(),
                lower: self.bottom,
                upper_name: FieldKey::Top.name(),
                upper: self.top,
            });
        }
        Ok(())
    }

    /// Value of a field by key.
    #[must_use]
    pub const fn get(&self, key: FieldKey) -> i64 {
        match key {
            FieldKey::Width => self.width,
            FieldKey::Height => self.height,
            FieldKey::Left => self.left,
            FieldKey::Right => self.right,
            FieldKey::Bottom => self.bottom,
            FieldKey::Top => self.top,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i64 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i64 {
        self.height
    }

    #[must_use]
    pub const fn left(&self) -> i64 {
        self.left
    }

    #[must_use]
    pub const fn right(&self) -> i64 {
        self.right
    }

    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.bottom
    }

    #[must_use]
    pub const fn top(&self) -> i64 {
        self.top
    }
}
