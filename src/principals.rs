use std::collections::BTreeSet;

/// Read-only view over users and groups, as much of the directory as the
/// access engine needs. Group management itself lives elsewhere.
pub trait PrincipalDirectory: Send + Sync {
    /// Ids of every group the user belongs to.
    fn groups_containing(&self, user_id: &str) -> BTreeSet<String>;

    /// Member user ids of a group, or empty for an unknown group.
    fn members(&self, group_id: &str) -> Vec<String>;
}

/// The principal-id set a grant can reach a user through: the user's own
/// id plus every group containing it. This is the OR side of the access
/// rule; the AND side is the ancestor chain.
pub fn principal_id_set(directory: &dyn PrincipalDirectory, principal_id: &str) -> BTreeSet<String> {
    let mut ids = directory.groups_containing(principal_id);
    ids.insert(principal_id.to_string());
    ids
}
