use crate::auth;
use crate::entities::customer::{self, Entity as Customer, DEFAULT_ROLE};
use crate::errors::ServiceError;
use crate::services::activity::ActivityRecorder;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    Set, SqlErr,
};
use serde::{de, Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Registration and credential checks for customers
#[derive(Clone)]
pub struct AccountService {
    db: Arc<DatabaseConnection>,
    activity: ActivityRecorder,
}

/// Input for registering a customer
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCustomerInput {
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    pub security_question: String,
    pub security_answer: String,
    pub password: String,
}

/// Accept the age as a number or as numeric text; blank text counts as absent.
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AgeInput {
        Number(i32),
        Text(String),
    }

    match Option::<AgeInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(AgeInput::Number(age)) => Ok(Some(age)),
        Some(AgeInput::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(AgeInput::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid age: {text}"))),
    }
}

/// Login payload; `role` is what the client asked to sign in as
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Outcome of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCustomer {
    pub id: i32,
    pub username: String,
    pub role: String,
}

impl AccountService {
    pub fn new(db: Arc<DatabaseConnection>, activity: ActivityRecorder) -> Self {
        auth::prepare_dummy_hash();
        Self { db, activity }
    }

    /// Register a new customer.
    ///
    /// Fails with [`ServiceError::DuplicateAccount`] when the username or email is taken.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(
        &self,
        input: RegisterCustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        let RegisterCustomerInput {
            username,
            email,
            age,
            gender,
            security_question,
            security_answer,
            password,
        } = input;

        let (password_hash, security_answer_hash) =
            hash_credentials(password, security_answer).await?;

        let model = customer::ActiveModel {
            id: NotSet,
            username: Set(username),
            email: Set(email),
            age: Set(age),
            gender: Set(gender),
            security_question: Set(security_question),
            security_answer_hash: Set(security_answer_hash),
            password_hash: Set(password_hash),
            role: Set(DEFAULT_ROLE.to_string()),
        };

        let customer = model.insert(&*self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                ServiceError::DuplicateAccount
            } else {
                ServiceError::DatabaseError(err)
            }
        })?;

        self.activity
            .record_best_effort(&format!("New user registered: {}", customer.username))
            .await;

        info!("Customer registered: {}", customer.id);
        Ok(customer)
    }

    /// Verify an email/password pair.
    ///
    /// Unknown emails and wrong passwords both fail with
    /// [`ServiceError::InvalidCredentials`] after the same amount of hashing work.
    #[instrument(skip(self, credentials))]
    pub async fn login(
        &self,
        credentials: LoginCredentials,
    ) -> Result<AuthenticatedCustomer, ServiceError> {
        let LoginCredentials {
            email,
            password,
            role: requested_role,
        } = credentials;

        let found = Customer::find()
            .filter(customer::Column::Email.eq(email))
            .one(&*self.db)
            .await?;

        let (found, verified) = tokio::task::spawn_blocking(move || {
            let verified = match &found {
                Some(customer) => auth::verify_secret(&password, &customer.password_hash),
                None => auth::verify_against_dummy(&password),
            };
            (found, verified)
        })
        .await?;

        let customer = match found {
            Some(customer) if verified => customer,
            _ => return Err(ServiceError::InvalidCredentials),
        };

        if let Some(requested) = requested_role.as_deref() {
            if requested != customer.role {
                debug!(
                    requested,
                    stored = %customer.role,
                    "login role differs from stored role"
                );
            }
        }

        self.activity
            .record_best_effort(&format!("User {} logged in", customer.username))
            .await;

        Ok(AuthenticatedCustomer {
            id: customer.id,
            username: customer.username,
            role: customer.role,
        })
    }
}

/// Hash the password and security answer off the async workers
async fn hash_credentials(
    password: String,
    security_answer: String,
) -> Result<(String, String), ServiceError> {
    let hashes = tokio::task::spawn_blocking(move || {
        Ok::<_, argon2::password_hash::Error>((
            auth::hash_secret(&password)?,
            auth::hash_secret(&security_answer)?,
        ))
    })
    .await??;
    Ok(hashes)
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("UNIQUE constraint failed")
}
