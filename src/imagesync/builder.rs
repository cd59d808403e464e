//! Materialize the renamed product image tree from local assets

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{ColorMap, LOG_FILE_NAME, LocalResolver, ProductNaming, Result, RunLog};
use crate::entities::{Catalog, ImageField, Product, ProductFilter};

/// Settings for `build_product_images`
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Image cache filled by `download_product_images`
    pub input_root: PathBuf,
    /// Prefix stripped from stored CDN paths
    pub cdn_base_url: String,
    /// Output directory; products go to `products/`, the log next to it
    pub output_dir: PathBuf,
}

impl BuildConfig {
    /// Directory reset at the start of every run
    #[must_use]
    pub fn products_root(&self) -> PathBuf {
        self.output_dir.join("products")
    }

    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(LOG_FILE_NAME)
    }
}

/// What happened to one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductOutcome {
    /// Directory reset succeeded; files written in processing order
    Built(Vec<PathBuf>),
    /// The product directory could not be created; nothing was processed
    DirFailed,
}

/// Result of a full build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Built products with the files written for each
    pub built: Vec<(Product, Vec<PathBuf>)>,
    /// Products skipped because their directory could not be created
    pub failed: Vec<Product>,
    pub log: Option<RunLog>,
}

impl BuildReport {
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.built.iter().map(|(_, files)| files.len()).sum()
    }

    #[cfg(test)]
    pub fn files_for(&self, product_id: i64) -> Option<&[PathBuf]> {
        self.built
            .iter()
            .find(|(product, _)| product.id == product_id)
            .map(|(_, files)| files.as_slice())
    }
}

/// Builds the output tree product by product
pub struct ImageBuilder<'a, C: Catalog> {
    catalog: &'a C,
    config: BuildConfig,
    resolver: LocalResolver,
}

impl<'a, C: Catalog> ImageBuilder<'a, C> {
    pub fn new(catalog: &'a C, config: BuildConfig) -> Self {
        let resolver = LocalResolver::new(&config.input_root, config.cdn_base_url.clone());
        Self {
            catalog,
            config,
            resolver,
        }
    }

    /// Reset the output tree, build every matching master product and write
    /// the run log.
    pub async fn run(&self, filter: &ProductFilter) -> Result<BuildReport> {
        let products_root = self.config.products_root();
        reset_root(&products_root).await?;

        let products = self.catalog.list_master_products(filter).await?;
        info!("Building images for {} products", products.len());

        let mut report = BuildReport::default();
        let mut log = RunLog::new(&self.config.output_dir);

        for product in products {
            info!(
                "Processing product id={} code={} name={}",
                product.id, product.code, product.name
            );

            match self.build_product(&product).await? {
                ProductOutcome::Built(files) => {
                    log.record_product(&product, &files);
                    report.built.push((product, files));
                }
                ProductOutcome::DirFailed => report.failed.push(product),
            }
        }

        log.write(&self.config.log_path()).await?;

        info!(
            "Build complete: {} products, {} images, {} failed",
            report.built.len(),
            report.image_count(),
            report.failed.len()
        );

        report.log = Some(log);
        Ok(report)
    }

    /// Reset one product's directory and copy its images into it.
    ///
    /// A directory that cannot be deleted aborts the run; one that cannot be
    /// created only skips the product.
    pub async fn build_product(&self, product: &Product) -> Result<ProductOutcome> {
        let naming = ProductNaming::new(&product.code);
        let product_dir = self.config.products_root().join(naming.dir_name());

        match fs::remove_dir_all(&product_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = fs::create_dir(&product_dir).await {
            warn!("Creation of the directory {:?} failed: {}", product_dir, e);
            return Ok(ProductOutcome::DirFailed);
        }

        let colors = self.catalog.list_colors(product.id).await?;
        let images = self.catalog.list_color_images(product.id).await?;
        let color_map = ColorMap::build(colors, images);
        debug!(
            "Product {} has {} colours with {} images",
            product.id,
            color_map.len(),
            color_map.image_count()
        );

        let mut processed = Vec::new();

        for bucket in color_map.iter() {
            for (idx, image) in bucket.images.iter().enumerate() {
                for field in ImageField::ALL {
                    let Some(cdn_path) = image.path(field) else {
                        continue;
                    };
                    let Some(source) = self.resolver.resolve(cdn_path) else {
                        debug!("No local asset for {}", cdn_path);
                        continue;
                    };

                    let existing = source
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let cleaned = naming.clean_source_name(&existing);

                    let target = product_dir.join(naming.image_name(
                        &bucket.color.name,
                        bucket.color.id,
                        image.id,
                        &cleaned,
                    ));
                    copy_asset(&source, &target).await?;
                    processed.push(target);

                    if bucket.is_default(idx) && field.is_hover_source() {
                        let extras = [naming.default_name(&cleaned), naming.hover_name(&cleaned)];
                        for name in extras {
                            let target = product_dir.join(name);
                            copy_asset(&source, &target).await?;
                            processed.push(target);
                        }
                    }
                }
            }
        }

        Ok(ProductOutcome::Built(processed))
    }
}

/// Delete and recreate the products root
async fn reset_root(root: &Path) -> Result<()> {
    match fs::remove_dir_all(root).await {
        Ok(()) => info!("Emptied {:?}", root),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    fs::create_dir_all(root).await?;
    Ok(())
}

/// Copy a file, replacing any existing destination
async fn copy_asset(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).await?;
    debug!("Copied {:?} -> {:?}", source, target);
    Ok(())
}
