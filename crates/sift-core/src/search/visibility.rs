//! Who may see which item

use crate::models::{ContentItem, Identity};

/// Whether `identity` (or an anonymous caller, for `None`) may see `item`.
///
/// Deleted items are never visible. Admins see everything else. An item is
/// restricted only when it has an owner and an allowed-viewer list; a
/// restricted item is visible to its owner, to anyone named in the viewer or
/// editor lists (directly or through a group), and to users granted the item
/// explicitly.
pub fn is_visible(item: &ContentItem, identity: Option<&Identity>) -> bool {
    if item.is_deleted {
        return false;
    }
    if identity.is_some_and(|user| user.is_admin) {
        return true;
    }
    if item.owner.is_none() || item.allowed_viewers.is_none() {
        return true;
    }
    let Some(user) = identity else {
        return false;
    };

    let named_in = |list: &Option<Vec<String>>| {
        list.as_ref()
            .is_some_and(|entries| entries.iter().any(|entry| user.is_principal(entry)))
    };

    item.owner.as_deref().is_some_and(|owner| user.is_principal(owner))
        || named_in(&item.allowed_viewers)
        || named_in(&item.allowed_editors)
        || user.has_item_grant(&item.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted() -> ContentItem {
        ContentItem::article("Secret", "hidden body")
            .with_owner("alice")
            .with_allowed_viewers(["bob"])
    }

    #[test]
    fn unrestricted_items_are_public() {
        let item = ContentItem::article("Open", "");
        assert!(is_visible(&item, None));

        let owned_no_list = ContentItem::article("Owned", "").with_owner("alice");
        assert!(is_visible(&owned_no_list, None));
    }

    #[test]
    fn restricted_item_hidden_from_strangers() {
        let item = restricted();
        assert!(!is_visible(&item, None));
        assert!(!is_visible(&item, Some(&Identity::new("carol"))));
    }

    #[test]
    fn restricted_item_visible_to_owner_viewer_and_admin() {
        let item = restricted();
        assert!(is_visible(&item, Some(&Identity::new("alice"))));
        assert!(is_visible(&item, Some(&Identity::new("bob"))));
        assert!(is_visible(&item, Some(&Identity::admin("root"))));
    }

    #[test]
    fn group_membership_grants_access() {
        let item = ContentItem::article("Team", "")
            .with_owner("team-a")
            .with_allowed_viewers(Vec::<String>::new());
        assert!(is_visible(
            &item,
            Some(&Identity::new("dave").with_groups(["team-a"]))
        ));

        let viewers = ContentItem::article("Docs", "")
            .with_owner("alice")
            .with_allowed_viewers(["readers"]);
        assert!(is_visible(
            &viewers,
            Some(&Identity::new("erin").with_groups(["readers"]))
        ));
    }

    #[test]
    fn editors_and_explicit_grants_can_view() {
        let item = restricted().with_allowed_editors(["frank"]);
        assert!(is_visible(&item, Some(&Identity::new("frank"))));

        let granted = Identity::new("gina").with_view_item(item.id);
        assert!(is_visible(&item, Some(&granted)));

        let edit_granted = Identity::new("hank").with_edit_item(item.id);
        assert!(is_visible(&item, Some(&edit_granted)));
    }

    #[test]
    fn deleted_items_are_never_visible() {
        let item = ContentItem::article("Gone", "").deleted();
        assert!(!is_visible(&item, None));
        assert!(!is_visible(&item, Some(&Identity::admin("root"))));
    }
}
