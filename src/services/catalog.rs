use crate::entities::menu_item::{self, Entity as MenuItem};
use crate::errors::ServiceError;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;
use tracing::instrument;

/// Read-only access to the menu
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All menu items in insertion order
    #[instrument(skip(self))]
    pub async fn list_menu_items(&self) -> Result<Vec<menu_item::Model>, ServiceError> {
        Ok(MenuItem::find()
            .order_by_asc(menu_item::Column::Id)
            .all(&*self.db)
            .await?)
    }
}
