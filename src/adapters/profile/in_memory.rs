//! In-memory BusinessProfileLookup.
//!
//! Useful for testing and local runs without a database. Data can be
//! changed between calls, which lets tests observe re-resolution after a
//! restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::{BusinessProfile, ProfileResolution};
use crate::domain::foundation::UserId;
use crate::ports::{BusinessProfileLookup, ProfileLookupError};

#[derive(Debug, Clone, Default)]
struct Category {
    questions: Vec<String>,
    template: Option<String>,
}

/// In-memory profile lookup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBusinessProfileLookup {
    users: Arc<RwLock<HashMap<UserId, String>>>,
    categories: Arc<RwLock<HashMap<String, Category>>>,
    unavailable: Arc<AtomicBool>,
    resolve_count: Arc<AtomicUsize>,
}

impl InMemoryBusinessProfileLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user under a business category.
    pub async fn add_user(&self, user_id: UserId, business_category: impl Into<String>) {
        self.users.write().await.insert(user_id, business_category.into());
    }

    pub async fn remove_user(&self, user_id: &UserId) {
        self.users.write().await.remove(user_id);
    }

    /// Replaces the ordered question list of a category.
    pub async fn set_questions<I, S>(&self, business_category: &str, questions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories = self.categories.write().await;
        categories.entry(business_category.to_string()).or_default().questions =
            questions.into_iter().map(Into::into).collect();
    }

    /// Appends one question to a category.
    pub async fn add_question(&self, business_category: &str, question: impl Into<String>) {
        let mut categories = self.categories.write().await;
        categories
            .entry(business_category.to_string())
            .or_default()
            .questions
            .push(question.into());
    }

    pub async fn set_template(&self, business_category: &str, template: impl Into<String>) {
        let mut categories = self.categories.write().await;
        categories.entry(business_category.to_string()).or_default().template =
            Some(template.into());
    }

    /// Makes every subsequent `resolve` fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `resolve` calls made so far.
    pub fn resolve_count(&self) -> usize {
        self.resolve_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BusinessProfileLookup for InMemoryBusinessProfileLookup {
    async fn resolve(&self, user_id: &UserId) -> Result<ProfileResolution, ProfileLookupError> {
        self.resolve_count.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProfileLookupError::Unavailable(
                "in-memory lookup switched off".to_string(),
            ));
        }

        let Some(business_category) = self.users.read().await.get(user_id).cloned() else {
            return Ok(ProfileResolution::Unauthorized);
        };

        let category = self
            .categories
            .read()
            .await
            .get(&business_category)
            .cloned()
            .unwrap_or_default();

        Ok(ProfileResolution::Authorized(BusinessProfile::new(
            business_category,
            category.questions,
            category.template,
        )))
    }
}
