//! Populate the local image cache from the CDN

use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

use super::{ColorMap, Downloader, ProductNaming, RemoteResolver, Result};
use crate::entities::{Catalog, ImageField, ProductFilter};

/// Settings for `download_product_images`
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub cdn_base_url: String,
    /// Cache root; each product gets a subdirectory named after its code
    pub cache_root: PathBuf,
}

/// Counts for a download run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub products: usize,
    /// Assets downloaded in this run
    pub fetched: usize,
    /// Assets already present in the cache
    pub cached: usize,
    /// Assets the CDN answered with an error status for
    pub skipped: usize,
    /// Products whose cache directory could not be created
    pub failed_dirs: usize,
}

/// Downloads missing product images into the cache
pub struct ImageFetcher<'a, C: Catalog> {
    catalog: &'a C,
    config: FetchConfig,
    resolver: RemoteResolver,
    downloader: Downloader,
}

impl<'a, C: Catalog> ImageFetcher<'a, C> {
    pub fn new(catalog: &'a C, config: FetchConfig) -> Result<Self> {
        let resolver = RemoteResolver::new(config.cdn_base_url.clone());
        let downloader = Downloader::new()?;

        Ok(Self {
            catalog,
            config,
            resolver,
            downloader,
        })
    }

    /// Fetch every image of every matching master product that is not
    /// cached yet. The cache is never cleared.
    pub async fn run(&self, filter: &ProductFilter) -> Result<FetchReport> {
        fs::create_dir_all(&self.config.cache_root).await?;

        let products = self.catalog.list_master_products(filter).await?;
        let mut report = FetchReport::default();

        for product in products {
            info!(
                "Processing product id={} code={} name={}",
                product.id, product.code, product.name
            );
            report.products += 1;

            let naming = ProductNaming::new(&product.code);
            let product_dir = self.config.cache_root.join(naming.dir_name());

            if !product_dir.is_dir()
                && let Err(e) = fs::create_dir(&product_dir).await
            {
                warn!("Creation of the directory {:?} failed: {}", product_dir, e);
                report.failed_dirs += 1;
                continue;
            }

            let colors = self.catalog.list_colors(product.id).await?;
            let images = self.catalog.list_color_images(product.id).await?;
            let color_map = ColorMap::build(colors, images);

            for bucket in color_map.iter() {
                for image in &bucket.images {
                    for field in ImageField::ALL {
                        let Some(asset) = image
                            .path(field)
                            .and_then(|path| self.resolver.resolve(path, &product_dir))
                        else {
                            continue;
                        };

                        if asset.cached {
                            debug!("Already cached: {:?}", asset.cache_path);
                            report.cached += 1;
                            continue;
                        }

                        match self.downloader.fetch(&asset.url, &asset.cache_path).await {
                            Ok(()) => report.fetched += 1,
                            Err(e) if e.is_skippable() => {
                                warn!("{}", e);
                                report.skipped += 1;
                            }
                            Err(e) => return Err(e.into()),
                        }
                    }
                }
            }
        }

        info!(
            "Download complete: {} products, {} fetched, {} cached, {} skipped, {} failed directories",
            report.products, report.fetched, report.cached, report.skipped, report.failed_dirs
        );

        Ok(report)
    }
}
