//! Permission tier resolution.

use crate::collaborators::Permissions;
use crate::config::PermissionTier;
use crate::player::PlayerId;

/// The cheapest tier the player holds, if any.
///
/// Ties go to the tier listed first in the configuration.
pub fn cheapest_tier<'a>(
    tiers: &'a [PermissionTier],
    permissions: &dyn Permissions,
    player: &PlayerId,
) -> Option<&'a PermissionTier> {
    tiers
        .iter()
        .filter(|tier| permissions.has_permission(player, &tier.permission))
        .min_by_key(|tier| tier.cost)
}
