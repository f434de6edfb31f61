//! Sample rows inserted at startup.
//!
//! Menu rows use `ON CONFLICT DO NOTHING` and the sample customer is skipped on
//! any unique conflict, so seeding an already-seeded store neither fails nor
//! duplicates or overwrites rows.

use crate::auth;
use crate::entities::{
    customer::{self, Entity as Customer},
    menu_item::{self, Entity as MenuItem},
};
use crate::errors::ServiceError;
use crate::services::accounts::is_unique_violation;
use sea_orm::{
    sea_query::{Condition, OnConflict},
    ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set,
};
use tracing::{debug, info};

struct SampleMenuItem {
    name: &'static str,
    price: f64,
    description: &'static str,
    image_path: &'static str,
}

static SAMPLE_MENU: [SampleMenuItem; 2] = [
    SampleMenuItem {
        name: "Pizza",
        price: 10.99,
        description: "Delicious cheese pizza",
        image_path: "pizza.jpg",
    },
    SampleMenuItem {
        name: "Burger",
        price: 8.99,
        description: "Juicy beef burger",
        image_path: "burger.jpg",
    },
];

const SAMPLE_USERNAME: &str = "joy";
const SAMPLE_EMAIL: &str = "joy@example.com";
const SAMPLE_PASSWORD: &str = "password123";
const SAMPLE_SECURITY_QUESTION: &str = "What is your pet's name?";
const SAMPLE_SECURITY_ANSWER: &str = "Fluffy";

/// Insert the sample menu and the sample customer
pub async fn populate_sample_data(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let inserted_items = seed_menu(db).await?;
    let inserted_customer = seed_customer(db).await?;
    info!(
        inserted_items,
        inserted_customer, "Sample data seeding finished"
    );
    Ok(())
}

async fn seed_menu(db: &DatabaseConnection) -> Result<u64, ServiceError> {
    let rows = SAMPLE_MENU.iter().map(|item| menu_item::ActiveModel {
        id: NotSet,
        name: Set(item.name.to_string()),
        price: Set(item.price),
        description: Set(Some(item.description.to_string())),
        image_path: Set(Some(item.image_path.to_string())),
    });

    let inserted = MenuItem::insert_many(rows)
        .on_conflict(
            OnConflict::column(menu_item::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    debug!(inserted, "menu items seeded");
    Ok(inserted)
}

async fn seed_customer(db: &DatabaseConnection) -> Result<bool, ServiceError> {
    let existing = Customer::find()
        .filter(
            Condition::any()
                .add(customer::Column::Username.eq(SAMPLE_USERNAME))
                .add(customer::Column::Email.eq(SAMPLE_EMAIL)),
        )
        .one(db)
        .await?;
    if existing.is_some() {
        debug!("sample customer already present");
        return Ok(false);
    }

    let (password_hash, security_answer_hash) = tokio::task::spawn_blocking(|| {
        Ok::<_, argon2::password_hash::Error>((
            auth::hash_secret(SAMPLE_PASSWORD)?,
            auth::hash_secret(SAMPLE_SECURITY_ANSWER)?,
        ))
    })
    .await??;

    insert_sample_customer(db, password_hash, security_answer_hash).await
}

/// Insert the sample customer; a username or email taken in the meantime means skip
async fn insert_sample_customer(
    db: &DatabaseConnection,
    password_hash: String,
    security_answer_hash: String,
) -> Result<bool, ServiceError> {
    let sample = customer::ActiveModel {
        id: NotSet,
        username: Set(SAMPLE_USERNAME.to_string()),
        email: Set(SAMPLE_EMAIL.to_string()),
        age: Set(Some(25)),
        gender: Set(Some("female".to_string())),
        security_question: Set(SAMPLE_SECURITY_QUESTION.to_string()),
        security_answer_hash: Set(security_answer_hash),
        password_hash: Set(password_hash),
        role: Set(customer::DEFAULT_ROLE.to_string()),
    };

    match Customer::insert(sample).exec_without_returning(db).await {
        Ok(inserted) => Ok(inserted > 0),
        Err(err) if is_unique_violation(&err) => {
            debug!("sample customer conflicts with an existing account");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use sea_orm::{ActiveModelTrait, PaginatorTrait};

    async fn migrated_pool() -> DatabaseConnection {
        let pool = establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        })
        .await
        .expect("in-memory sqlite");
        run_migrations(&pool).await.expect("migrations");
        pool
    }

    fn account(username: &str, email: &str) -> customer::ActiveModel {
        customer::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            age: Set(None),
            gender: Set(None),
            security_question: Set("q".to_string()),
            security_answer_hash: Set("hash".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(customer::DEFAULT_ROLE.to_string()),
        }
    }

    #[tokio::test]
    async fn sample_customer_insert_skips_taken_email() {
        let pool = migrated_pool().await;
        account("someone-else", SAMPLE_EMAIL)
            .insert(&pool)
            .await
            .unwrap();

        let inserted = insert_sample_customer(&pool, "p".into(), "a".into())
            .await
            .unwrap();

        assert!(!inserted);
        assert_eq!(Customer::find().count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sample_customer_insert_skips_taken_username() {
        let pool = migrated_pool().await;
        account(SAMPLE_USERNAME, "other@example.com")
            .insert(&pool)
            .await
            .unwrap();

        let inserted = insert_sample_customer(&pool, "p".into(), "a".into())
            .await
            .unwrap();

        assert!(!inserted);
    }

    #[tokio::test]
    async fn populate_twice_keeps_one_of_each() {
        let pool = migrated_pool().await;
        populate_sample_data(&pool).await.unwrap();
        populate_sample_data(&pool).await.unwrap();

        assert_eq!(MenuItem::find().count(&pool).await.unwrap(), 2);
        assert_eq!(Customer::find().count(&pool).await.unwrap(), 1);
    }
}
