//! Business profile snapshot consumed at dialogue start.

/// Questions and template configured for one business category.
///
/// A snapshot: the dialogue copies what it needs when the session starts
/// and never re-reads it, except after a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub business_category: String,
    /// Ordered questions; order is the presentation order.
    pub questions: Vec<String>,
    /// Review-generation template appended after the numbered answers.
    pub template: Option<String>,
}

impl BusinessProfile {
    pub fn new(
        business_category: impl Into<String>,
        questions: Vec<String>,
        template: Option<String>,
    ) -> Self {
        Self {
            business_category: business_category.into(),
            questions,
            template,
        }
    }
}

/// Authorization decision plus profile for an authorized user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileResolution {
    Unauthorized,
    Authorized(BusinessProfile),
}

impl ProfileResolution {
    pub fn is_authorized(&self) -> bool {
        matches!(self, ProfileResolution::Authorized(_))
    }
}
