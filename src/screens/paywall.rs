//! Paywall step. The paid path is a stub that routes into the free tier.

use crate::auth::models::{PlanStatus, ProfileUpdate, ProfileUpdateError};
use crate::auth::AuthContext;

pub const FREE_TIER_LABEL: &str = "Try for Free (10 tokens/day)";
pub const PAYMENT_PENDING: &str =
    "Payment integration will be available soon. For now, enjoy the free tier!";

#[derive(Debug, Default)]
pub struct PaywallScreen;

impl PaywallScreen {
    /// Confirm the free tier: marks the profile `free` and completes the step.
    pub async fn choose_free(&self, auth: &AuthContext) -> Result<(), ProfileUpdateError> {
        auth.update_user_profile(ProfileUpdate {
            status: Some(PlanStatus::Free),
            ..Default::default()
        })
        .await
    }

    /// Paid path, currently a stub: surfaces [`PAYMENT_PENDING`] and falls
    /// through to the free tier.
    pub async fn unlock_access(&self, auth: &AuthContext) -> Result<&'static str, ProfileUpdateError> {
        self.choose_free(auth).await?;
        Ok(PAYMENT_PENDING)
    }
}
