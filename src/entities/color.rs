/// Value of the default flag that marks a colour's default image
const DEFAULT_FLAG: &str = "yes";

/// Product colour
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Color {
    pub id: i64,
    pub name: String,
}

/// Image record attached to a product and one of its colours
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColorImage {
    pub id: i64,
    pub color_id: i64,
    /// CDN-relative path of the original/full image
    pub original_path: Option<String>,
    /// CDN-relative path of the medium/thumbnail image
    pub medium_path: Option<String>,
    pub is_default: Option<String>,
}

impl ColorImage {
    /// Whether the image is explicitly flagged as its colour's default
    #[must_use]
    pub fn is_flagged_default(&self) -> bool {
        self.is_default.as_deref() == Some(DEFAULT_FLAG)
    }

    /// CDN path stored in a field, `None` when absent or empty
    #[must_use]
    pub fn path(&self, field: ImageField) -> Option<&str> {
        let path = match field {
            ImageField::Original => self.original_path.as_deref(),
            ImageField::Medium => self.medium_path.as_deref(),
        };
        path.filter(|p| !p.is_empty())
    }
}

/// Image path fields, processed in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageField {
    Original,
    Medium,
}

impl ImageField {
    pub const ALL: [Self; 2] = [Self::Original, Self::Medium];

    /// The medium field feeds the product's `_default`/`_hover` images
    #[must_use]
    pub const fn is_hover_source(self) -> bool {
        matches!(self, Self::Medium)
    }
}
