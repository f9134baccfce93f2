//! Lock key construction.

use common::{PlanId, UserId};

/// Namespace prefix for all flash-sale lock keys.
pub const LOCK_KEY_PREFIX: &str = "eshop-flash-sales";

/// Builds the lock key serializing result creation for one (plan, user) pair.
///
/// Every handler instance racing on the same pair computes the same key, so
/// the lock provider turns their attempts into a total order. Attempts for
/// different pairs use different keys and stay fully concurrent.
pub fn result_creation_key(plan_id: PlanId, user_id: UserId) -> String {
    format!("{LOCK_KEY_PREFIX}-creating-result_{plan_id}-{user_id}")
}
