use crate::entities::menu_item;
use crate::errors::ServiceError;
use crate::AppState;
use axum::{extract::State, Json};

/// `[id, name, price, description, image_path]`
pub type MenuRow = (i32, String, f64, Option<String>, Option<String>);

impl From<menu_item::Model> for MenuRow {
    fn from(item: menu_item::Model) -> Self {
        (
            item.id,
            item.name,
            item.price,
            item.description,
            item.image_path,
        )
    }
}

pub async fn list_menu(State(state): State<AppState>) -> Result<Json<Vec<MenuRow>>, ServiceError> {
    let items = state.catalog.list_menu_items().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
