//! Line-oriented processing log written once at the end of a build

use std::path::{Path, PathBuf};

use crate::entities::Product;

/// Log file name, placed directly under the output directory
pub const LOG_FILE_NAME: &str = "build_product_images.log";

/// Accumulated processing log for a run
#[derive(Debug, Clone)]
pub struct RunLog {
    /// Prefix removed from logged paths
    root: PathBuf,
    lines: Vec<String>,
}

impl RunLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lines: Vec::new(),
        }
    }

    /// Append a product header and its processed files
    pub fn record_product(&mut self, product: &Product, files: &[PathBuf]) {
        self.lines.push(format!(
            "product id={} code={} name={} images_count={}",
            product.id,
            product.code,
            product.name,
            files.len()
        ));

        if files.is_empty() {
            return;
        }

        for file in files {
            self.lines.push(format!("\t{}", self.display_path(file)));
        }
        self.lines.push(String::new());
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Write the whole log, replacing any previous file
    pub async fn write(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, self.render()).await
    }

    /// Path with the root prefix removed, keeping the leading separator
    fn display_path(&self, file: &Path) -> String {
        match file.strip_prefix(&self.root) {
            Ok(relative) => format!("/{}", relative.display()),
            Err(_) => file.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, code: &str, name: &str) -> Product {
        Product {
            id,
            code: code.to_string(),
            integration_id: None,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_render_product_with_files() {
        let root = PathBuf::from("/srv/out");
        let mut log = RunLog::new(&root);

        log.record_product(
            &product(5, "AB/12", "Runner"),
            &[
                root.join("products/AB-12/deep-red_7_99_photo.jpg"),
                root.join("products/AB-12/AB-12_default.jpg"),
            ],
        );

        assert_eq!(
            log.render(),
            "product id=5 code=AB/12 name=Runner images_count=2\n\
             \t/products/AB-12/deep-red_7_99_photo.jpg\n\
             \t/products/AB-12/AB-12_default.jpg\n\
             \n"
        );
    }

    #[test]
    fn test_render_product_without_files() {
        let mut log = RunLog::new("/srv/out");
        log.record_product(&product(6, "CD/34", "Walker"), &[]);
        log.record_product(&product(7, "EF", "Hiker"), &[]);

        assert_eq!(
            log.render(),
            "product id=6 code=CD/34 name=Walker images_count=0\n\
             product id=7 code=EF name=Hiker images_count=0\n"
        );
    }

    #[tokio::test]
    async fn test_write_replaces_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(LOG_FILE_NAME);
        std::fs::write(&path, "stale\nstale\n").unwrap();

        let mut log = RunLog::new(temp_dir.path());
        log.record_product(&product(1, "X", "Thing"), &[]);
        log.write(&path).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "product id=1 code=X name=Thing images_count=0\n"
        );
    }
}
