//! The users list feed.

use crate::feed::{FeedEngine, FeedTuning};
use crate::model::{UserId, UserRole, UserSummary};
use crate::query::{FilterKey, FilterMode, FilterValue};
use crate::source::PageRequest;

/// Paginated users list with single-select role and activation filters.
#[derive(Debug)]
pub struct UsersFeed {
    engine: FeedEngine<UserSummary>,
}

impl UsersFeed {
    /// Filter key for the role chips.
    pub const ROLE: &'static str = "role";
    /// Filter key for the activation chips.
    pub const ENABLED: &'static str = "enabled";

    /// Create an idle users feed. The shell calls
    /// [`reset`](FeedEngine::reset) on mount.
    pub fn new(tuning: FeedTuning) -> Self {
        Self {
            engine: FeedEngine::new(
                tuning,
                [
                    (FilterKey::new(Self::ROLE), FilterMode::Single),
                    (FilterKey::new(Self::ENABLED), FilterMode::Single),
                ],
            ),
        }
    }

    /// The underlying engine, read-only.
    pub fn engine(&self) -> &FeedEngine<UserSummary> {
        &self.engine
    }

    /// The underlying engine, for the generic operations.
    pub fn engine_mut(&mut self) -> &mut FeedEngine<UserSummary> {
        &mut self.engine
    }

    /// The accumulated user rows.
    pub fn users(&self) -> &[UserSummary] {
        self.engine.items()
    }

    /// Toggle the role filter chip. Selecting the active role clears it.
    ///
    /// Returns the page-0 request for the new query.
    pub fn toggle_role(&mut self, role: UserRole) -> Option<PageRequest> {
        self.engine
            .set_filter(&FilterKey::new(Self::ROLE), FilterValue::new(role.as_str()))
    }

    /// Toggle the activation filter chip. Selecting the active state
    /// clears it.
    pub fn toggle_enabled(&mut self, enabled: bool) -> Option<PageRequest> {
        self.engine.set_filter(
            &FilterKey::new(Self::ENABLED),
            FilterValue::new(if enabled { "true" } else { "false" }),
        )
    }

    /// Flip the activation flag after the remote toggle succeeded.
    ///
    /// Returns whether the user was found in the accumulation.
    pub fn apply_activation(&mut self, id: &UserId, enabled: bool) -> bool {
        self.engine
            .patch_item(|user| &user.id == id, |user| user.enabled = enabled)
    }

    /// Promote the account to administrator after the remote update
    /// succeeded.
    pub fn apply_promote_admin(&mut self, id: &UserId) -> bool {
        self.engine
            .patch_item(|user| &user.id == id, |user| user.role = UserRole::Admin)
    }

    /// Record a failed remote update. The row keeps its previous values.
    pub fn update_failed(&mut self, message: impl Into<String>) {
        self.engine.record_mutation_error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeedError;
    use crate::source::PageResponse;
    use std::time::Instant;

    fn user(id: &str, role: UserRole, enabled: bool) -> UserSummary {
        UserSummary {
            id: UserId::new(id).expect("valid user ID"),
            email: format!("{id}@example.com"),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            role,
            enabled,
        }
    }

    fn loaded_feed() -> UsersFeed {
        let mut feed = UsersFeed::new(FeedTuning::default());
        let request = feed.engine_mut().reset();
        feed.engine_mut().apply_response(
            request.token(),
            Ok(PageResponse::new(vec![
                user("user-1", UserRole::Customer, true),
                user("user-2", UserRole::Customer, false),
            ])),
            Instant::now(),
        );
        feed
    }

    #[test]
    fn role_and_activation_filters_are_independent() {
        let mut feed = UsersFeed::new(FeedTuning::default());
        feed.toggle_role(UserRole::Admin);
        let request = feed.toggle_enabled(true).expect("filter change");
        assert_eq!(
            request.query().values(&FilterKey::new(UsersFeed::ROLE)),
            &[FilterValue::new("ROLE_ADMIN")],
            "Setting one chip row leaves the other selected"
        );
        assert_eq!(
            request.query().values(&FilterKey::new(UsersFeed::ENABLED)),
            &[FilterValue::new("true")]
        );
    }

    #[test]
    fn toggling_the_active_role_clears_it() {
        let mut feed = UsersFeed::new(FeedTuning::default());
        feed.toggle_role(UserRole::Admin);
        let request = feed.toggle_role(UserRole::Admin).expect("cleared");
        assert!(request
            .query()
            .values(&FilterKey::new(UsersFeed::ROLE))
            .is_empty());
    }

    #[test]
    fn activation_toggle_flips_one_row() {
        let mut feed = loaded_feed();
        let id = UserId::new("user-2").expect("valid user ID");
        assert!(feed.apply_activation(&id, true));
        assert!(feed.users()[1].enabled);
        assert!(feed.users()[0].enabled, "Other rows untouched");
    }

    #[test]
    fn promotion_changes_only_the_role() {
        let mut feed = loaded_feed();
        let id = UserId::new("user-1").expect("valid user ID");
        assert!(feed.apply_promote_admin(&id));
        assert_eq!(feed.users()[0].role, UserRole::Admin);
        assert!(feed.users()[0].enabled, "Activation untouched");
        assert_eq!(feed.users()[1].role, UserRole::Customer);
    }

    #[test]
    fn mutation_of_a_missing_user_is_reported() {
        let mut feed = loaded_feed();
        let id = UserId::new("user-99").expect("valid user ID");
        assert!(!feed.apply_promote_admin(&id));
    }

    #[test]
    fn failed_update_records_the_error() {
        let mut feed = loaded_feed();
        feed.update_failed("HTTP 403");
        assert!(matches!(
            feed.engine().last_error(),
            Some(FeedError::Mutation { .. })
        ));
    }
}
