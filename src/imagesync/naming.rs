//! Output filename derivation

use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z]+").expect("valid slug pattern"));

/// Lower-case a colour name and collapse every run of non-alphanumeric
/// characters into a single hyphen
#[must_use]
pub fn slugify(name: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

/// Filename rules for one product
#[derive(Debug, Clone)]
pub struct ProductNaming {
    /// `<code lower-cased, '/' removed>_`, repeated in CDN filenames
    code_token: String,
    /// Code with `/` replaced by `-`
    dir_name: String,
}

impl ProductNaming {
    #[must_use]
    pub fn new(product_code: &str) -> Self {
        Self {
            code_token: format!("{}_", product_code.to_lowercase().replace('/', "")),
            dir_name: product_code.replace('/', "-"),
        }
    }

    /// Product output/cache subdirectory name
    #[must_use]
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// Remove the product code token from a source filename.
    ///
    /// Every occurrence of the token is removed and the match is
    /// case-sensitive, so `AB12_x.jpg` is left untouched for code `AB/12`.
    #[must_use]
    pub fn clean_source_name(&self, existing: &str) -> String {
        existing.replace(&self.code_token, "")
    }

    /// `<slug>_<colorId>_<imageId>_<cleaned>`
    #[must_use]
    pub fn image_name(
        &self,
        color_name: &str,
        color_id: i64,
        image_id: i64,
        cleaned: &str,
    ) -> String {
        format!("{}_{color_id}_{image_id}_{cleaned}", slugify(color_name))
    }

    /// `<dir name>_default.<ext>`
    #[must_use]
    pub fn default_name(&self, cleaned: &str) -> String {
        format!("{}_default.{}", self.dir_name, extension(cleaned))
    }

    /// `<dir name>_hover.<ext>`
    #[must_use]
    pub fn hover_name(&self, cleaned: &str) -> String {
        format!("{}_hover.{}", self.dir_name, extension(cleaned))
    }
}

/// Text after the last `.`, or the whole name when there is none
fn extension(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Deep Red"), "deep-red");
        assert_eq!(slugify("Black / White"), "black-white");
        assert_eq!(slugify("  Navy!!"), "-navy-");
        assert_eq!(slugify("Crème Brûlée"), "cr-me-br-l-e");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_derived_image_name() {
        let naming = ProductNaming::new("AB/12");
        let cleaned = naming.clean_source_name("ab12_photo.jpg");

        assert_eq!(cleaned, "photo.jpg");
        assert_eq!(naming.dir_name(), "AB-12");
        assert_eq!(
            naming.image_name("Deep Red", 7, 99, &cleaned),
            "deep-red_7_99_photo.jpg"
        );
    }

    #[test]
    fn test_token_removal_is_case_sensitive() {
        let naming = ProductNaming::new("AB/12");
        assert_eq!(naming.clean_source_name("AB12_photo.jpg"), "AB12_photo.jpg");
        assert_eq!(naming.clean_source_name("photo.jpg"), "photo.jpg");
        assert_eq!(naming.clean_source_name("ab12_side_ab12_2.jpg"), "side_2.jpg");
    }

    #[test]
    fn test_only_slash_is_stripped_from_token() {
        let naming = ProductNaming::new("Ab 12/X");
        assert_eq!(naming.clean_source_name("ab 12x_shoe.png"), "shoe.png");
        assert_eq!(naming.dir_name(), "Ab 12-X");
    }

    #[test]
    fn test_default_and_hover_names() {
        let naming = ProductNaming::new("X/9");
        assert_eq!(naming.default_name("shoe.jpg"), "X-9_default.jpg");
        assert_eq!(naming.hover_name("shoe.jpg"), "X-9_hover.jpg");
        assert_eq!(naming.default_name("archive.tar.gz"), "X-9_default.gz");
        assert_eq!(naming.hover_name("noext"), "X-9_hover.noext");
    }
}
