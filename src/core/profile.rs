//! Business profile business logic.
//!
//! Every signed-in user gets exactly one profile. It is created lazily on first sign-in with
//! a default business name and the configured currency label.

use crate::{
    entities::{BusinessProfile, business_profile},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Business name used when the user supplies none
pub const DEFAULT_BUSINESS_NAME: &str = "My Business";

/// Retrieves the user's profile.
pub async fn get_business_profile(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<business_profile::Model> {
    BusinessProfile::find()
        .filter(business_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })
}

/// Returns the user's profile, creating one first if it does not exist.
pub async fn ensure_business_profile(
    db: &DatabaseConnection,
    user_id: &str,
    business_name: Option<&str>,
    currency: &str,
) -> Result<business_profile::Model> {
    match get_business_profile(db, user_id).await {
        Ok(profile) => return Ok(profile),
        Err(Error::ProfileNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    let business_name = business_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BUSINESS_NAME);

    info!("Creating business profile for user {user_id}");
    let now = chrono::Utc::now();
    let profile = business_profile::ActiveModel {
        user_id: Set(user_id.to_string()),
        business_name: Set(business_name.to_string()),
        currency: Set(currency.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(profile.insert(db).await?)
}
