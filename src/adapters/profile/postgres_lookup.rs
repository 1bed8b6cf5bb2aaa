//! PostgreSQL adapter for BusinessProfileLookup

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::domain::dialogue::{BusinessProfile, ProfileResolution};
use crate::domain::foundation::UserId;
use crate::ports::{BusinessProfileLookup, ProfileLookupError};

/// Reads users, questions and prompts tables.
///
/// User ids are Telegram numeric ids; anything else is unauthorized.
pub struct PgBusinessProfileLookup {
    pool: PgPool,
}

impl PgBusinessProfileLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `None` for unknown users, `Some(None)` for users with no business type.
    async fn business_category(
        &self,
        telegram_id: i64,
    ) -> Result<Option<Option<String>>, ProfileLookupError> {
        let row = sqlx::query("SELECT business_type FROM users WHERE telegram_id = $1")
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(|r| r.try_get::<Option<String>, _>("business_type"))
            .transpose()
            .map_err(db_error)
    }

    async fn questions(&self, business_category: &str) -> Result<Vec<String>, ProfileLookupError> {
        let rows = sqlx::query(
            r#"
            SELECT question_text
            FROM questions
            WHERE business_type = $1
            ORDER BY id
            "#,
        )
        .bind(business_category)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(|r| r.try_get::<String, _>("question_text"))
            .collect::<Result<_, _>>()
            .map_err(db_error)
    }

    async fn template(&self, business_category: &str) -> Result<Option<String>, ProfileLookupError> {
        let row = sqlx::query(
            r#"
            SELECT prompt_text
            FROM prompts
            WHERE business_type = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(business_category)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(|r| r.try_get::<String, _>("prompt_text"))
            .transpose()
            .map_err(db_error)
    }
}

#[async_trait]
impl BusinessProfileLookup for PgBusinessProfileLookup {
    async fn resolve(&self, user_id: &UserId) -> Result<ProfileResolution, ProfileLookupError> {
        let Some(telegram_id) = parse_telegram_id(user_id) else {
            debug!(user_id = %user_id, "Non-numeric user id, treating as unauthorized");
            return Ok(ProfileResolution::Unauthorized);
        };

        let business_category = match self.business_category(telegram_id).await? {
            None => return Ok(ProfileResolution::Unauthorized),
            Some(None) => {
                debug!(user_id = %user_id, "User has no business type");
                return Ok(ProfileResolution::Authorized(uncategorized()));
            }
            Some(Some(category)) => category,
        };

        let questions = self.questions(&business_category).await?;
        let template = self.template(&business_category).await?;

        Ok(ProfileResolution::Authorized(BusinessProfile::new(
            business_category,
            questions,
            template,
        )))
    }
}

/// Registered user without a business type: nothing to ask.
fn uncategorized() -> BusinessProfile {
    BusinessProfile::new("", Vec::new(), None)
}

fn parse_telegram_id(user_id: &UserId) -> Option<i64> {
    user_id.as_str().trim().parse().ok()
}

fn db_error(e: sqlx::Error) -> ProfileLookupError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ProfileLookupError::Unavailable(e.to_string())
        }
        other => ProfileLookupError::Database(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_parse() {
        assert_eq!(parse_telegram_id(&UserId::from(123456789_i64)), Some(123456789));
        assert_eq!(parse_telegram_id(&UserId::new("-1001").unwrap()), Some(-1001));
    }

    #[test]
    fn non_numeric_ids_do_not_parse() {
        assert_eq!(parse_telegram_id(&UserId::new("alice").unwrap()), None);
        assert_eq!(parse_telegram_id(&UserId::new("12a").unwrap()), None);
    }

    #[test]
    fn user_without_business_type_has_no_questions() {
        use crate::domain::dialogue::{DialogueMachine, Output};

        let transition = DialogueMachine::new(String::new()).open(
            UserId::from(42_i64),
            ProfileResolution::Authorized(uncategorized()),
        );

        assert_eq!(transition.outputs(), &[Output::NoQuestionsConfigured]);
    }

    #[test]
    fn pool_errors_are_unavailable() {
        assert!(matches!(
            db_error(sqlx::Error::PoolTimedOut),
            ProfileLookupError::Unavailable(_)
        ));
        assert!(matches!(
            db_error(sqlx::Error::RowNotFound),
            ProfileLookupError::Database(_)
        ));
    }
}
