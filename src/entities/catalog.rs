//! Read-only access to the product catalog

use async_trait::async_trait;
use sqlx::{Any, QueryBuilder};

use super::{Color, ColorImage, Product, ProductFilter};
use crate::db::{ConnectionManager, LogicalDatabase};
use crate::imagesync::Result;

/// Source of products, colours and colour images
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Master products (no parent), restricted by the filter, in store order
    async fn list_master_products(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

    /// Colours of a master product, one row per colour ID
    async fn list_colors(&self, product_id: i64) -> Result<Vec<Color>>;

    /// Images of a master product in presentation order
    async fn list_color_images(&self, product_id: i64) -> Result<Vec<ColorImage>>;
}

/// Catalog backed by the `profile` and `core` databases
pub struct SqlCatalog<'a> {
    db: &'a ConnectionManager,
}

impl<'a> SqlCatalog<'a> {
    #[must_use]
    pub const fn new(db: &'a ConnectionManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Catalog for SqlCatalog<'_> {
    async fn list_master_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let pool = self.db.pool(LogicalDatabase::Profile).await?;

        let mut query = QueryBuilder::<Any>::new(
            "SELECT \
                `productID` AS id, \
                `productCode` AS code, \
                `productIntegrationID` AS integration_id, \
                `productName` AS name \
             FROM `product` \
             WHERE (`productParentID` = 0 OR `productParentID` IS NULL)",
        );

        if !filter.is_all() {
            query.push(" AND `productID` IN (");
            let mut ids = query.separated(", ");
            for id in filter.ids() {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");
        }

        let products = query.build_query_as::<Product>().fetch_all(pool).await?;
        Ok(products)
    }

    async fn list_colors(&self, product_id: i64) -> Result<Vec<Color>> {
        let pool = self.db.pool(LogicalDatabase::Profile).await?;

        let colors = sqlx::query_as::<_, Color>(
            "SELECT \
                `pc`.`colourID` AS id, \
                `pc`.`colourDesc` AS name \
             FROM `product` AS `p` \
             INNER JOIN `product-colour` AS `pc` ON `p`.`productColourID` = `pc`.`colourID` \
             WHERE `p`.`productParentID` = ? \
             GROUP BY `pc`.`colourID`, `pc`.`colourDesc`",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await?;

        Ok(colors)
    }

    async fn list_color_images(&self, product_id: i64) -> Result<Vec<ColorImage>> {
        let pool = self.db.pool(LogicalDatabase::Core).await?;

        let images = sqlx::query_as::<_, ColorImage>(
            "SELECT \
                `productImageID` AS id, \
                `colourID` AS color_id, \
                `productImageFileOriginalHTTPLocation` AS original_path, \
                `productImageFileMediumHTTPLocation` AS medium_path, \
                `productImageIsDefault` AS is_default \
             FROM `product-image` \
             WHERE `productID` = ? \
             ORDER BY `productImageSortOrder` ASC, `productImageID` ASC",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await?;

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::AnyPool;
    use tempfile::TempDir;

    const PROFILE_SCHEMA: &[&str] = &[
        "CREATE TABLE `product` (
            `productID` INTEGER PRIMARY KEY,
            `productCode` TEXT NOT NULL,
            `productIntegrationID` TEXT,
            `productName` TEXT NOT NULL,
            `productParentID` INTEGER DEFAULT 0,
            `productColourID` INTEGER
        )",
        "CREATE TABLE `product-colour` (
            `colourID` INTEGER PRIMARY KEY,
            `colourDesc` TEXT NOT NULL
        )",
        "INSERT INTO `product` VALUES (1, 'AB/12', 'INT-1', 'Runner', 0, NULL)",
        "INSERT INTO `product` VALUES (2, 'CD/34', NULL, 'Walker', 0, NULL)",
        "INSERT INTO `product` VALUES (3, 'EF/56', NULL, 'Hiker', NULL, NULL)",
        // Variants of product 1: two sizes share colour 7
        "INSERT INTO `product` VALUES (10, 'AB/12-S', NULL, 'Runner S', 1, 7)",
        "INSERT INTO `product` VALUES (11, 'AB/12-M', NULL, 'Runner M', 1, 7)",
        "INSERT INTO `product` VALUES (12, 'AB/12-L', NULL, 'Runner L', 1, 9)",
        "INSERT INTO `product-colour` VALUES (7, 'Deep Red')",
        "INSERT INTO `product-colour` VALUES (9, 'Navy')",
    ];

    const CORE_SCHEMA: &[&str] = &[
        "CREATE TABLE `product-image` (
            `productImageID` INTEGER PRIMARY KEY,
            `productID` INTEGER NOT NULL,
            `colourID` INTEGER NOT NULL,
            `productImageFileOriginalHTTPLocation` TEXT,
            `productImageFileMediumHTTPLocation` TEXT,
            `productImageIsDefault` TEXT,
            `productImageSortOrder` INTEGER NOT NULL
        )",
        "INSERT INTO `product-image` VALUES (100, 1, 7, '/img/a.jpg', '/img/a_m.jpg', NULL, 3)",
        "INSERT INTO `product-image` VALUES (101, 1, 7, '/img/b.jpg', NULL, 'yes', 1)",
        "INSERT INTO `product-image` VALUES (102, 1, 9, NULL, '/img/c_m.jpg', NULL, 2)",
        "INSERT INTO `product-image` VALUES (103, 2, 9, '/img/d.jpg', NULL, NULL, 1)",
    ];

    async fn seed(pool: &AnyPool, statements: &[&str]) {
        for statement in statements {
            sqlx::query(statement).execute(pool).await.unwrap();
        }
    }

    async fn setup() -> (TempDir, ConnectionManager) {
        let dir = TempDir::new().unwrap();
        let url = |name: &str| format!("sqlite://{}?mode=rwc", dir.path().join(name).display());
        let manager = ConnectionManager::new(url("core.sqlite"), url("profile.sqlite"));

        seed(manager.pool(LogicalDatabase::Profile).await.unwrap(), PROFILE_SCHEMA).await;
        seed(manager.pool(LogicalDatabase::Core).await.unwrap(), CORE_SCHEMA).await;

        (dir, manager)
    }

    #[tokio::test]
    async fn test_lists_only_master_products() {
        let (_dir, manager) = setup().await;
        let catalog = SqlCatalog::new(&manager);

        let products = catalog
            .list_master_products(&ProductFilter::all())
            .await
            .unwrap();
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(products[0].code, "AB/12");
        assert_eq!(products[0].integration_id.as_deref(), Some("INT-1"));
        assert_eq!(products[0].name, "Runner");

        manager.close().await;
    }

    #[tokio::test]
    async fn test_filter_restricts_products() {
        let (_dir, manager) = setup().await;
        let catalog = SqlCatalog::new(&manager);

        let products = catalog
            .list_master_products(&ProductFilter::only([3, 1, 10]))
            .await
            .unwrap();
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        // 10 is a variant and never listed
        assert_eq!(ids, vec![1, 3]);

        let none = catalog
            .list_master_products(&ProductFilter::only([999]))
            .await
            .unwrap();
        assert!(none.is_empty());

        manager.close().await;
    }

    #[tokio::test]
    async fn test_colors_are_deduplicated() {
        let (_dir, manager) = setup().await;
        let catalog = SqlCatalog::new(&manager);

        let mut colors = catalog.list_colors(1).await.unwrap();
        colors.sort_by_key(|c| c.id);

        assert_eq!(
            colors,
            vec![
                Color {
                    id: 7,
                    name: "Deep Red".to_string()
                },
                Color {
                    id: 9,
                    name: "Navy".to_string()
                },
            ]
        );
        assert!(catalog.list_colors(2).await.unwrap().is_empty());

        manager.close().await;
    }

    #[tokio::test]
    async fn test_images_follow_sort_order() {
        let (_dir, manager) = setup().await;
        let catalog = SqlCatalog::new(&manager);

        let images = catalog.list_color_images(1).await.unwrap();
        let ids: Vec<i64> = images.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![101, 102, 100]);

        assert!(images[0].is_flagged_default());
        assert_eq!(images[0].original_path.as_deref(), Some("/img/b.jpg"));
        assert_eq!(images[0].medium_path, None);
        assert_eq!(images[1].color_id, 9);

        manager.close().await;
    }
}
