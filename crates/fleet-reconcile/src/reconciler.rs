use crate::vehicle::FleetSnapshot;

/// Vehicles present in one snapshot and absent from another, keyed by id
pub type DifferenceSet = FleetSnapshot;

/// Both directions of a fleet comparison
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconciliation {
    /// Visible to operators, invisible to end users
    pub admin_only: DifferenceSet,
    /// Visible to end users, invisible to operators
    pub user_only: DifferenceSet,
}

/// Entries of `left` whose id is not a key of `right`
///
/// Membership is decided on the id alone. A vehicle present on both sides with
/// different field values is a match and never shows up here; do not turn this
/// into a value-aware comparison without a product decision.
pub fn difference(left: &FleetSnapshot, right: &FleetSnapshot) -> DifferenceSet {
    left.iter()
        .filter(|(id, _)| !right.contains_key(*id))
        .map(|(id, vehicle)| (id.clone(), vehicle.clone()))
        .collect()
}

/// Compare the admin and user snapshots of one asset type
pub fn reconcile(admin: &FleetSnapshot, user: &FleetSnapshot) -> Reconciliation {
    Reconciliation {
        admin_only: difference(admin, user),
        user_only: difference(user, admin),
    }
}
