// src/notifier/translate.rs

use notify::event::ModifyKind;
use notify::EventKind;

use crate::types::ChangeMask;

/// Translate a backend event kind into the flags reported to observers.
///
/// Access-only and `Other` events carry no change and map to the empty mask;
/// the catch-all `Any` kind is reported as a modification.
pub fn change_mask_for(kind: &EventKind) -> ChangeMask {
    match kind {
        EventKind::Create(_) => ChangeMask::CREATED,
        EventKind::Modify(ModifyKind::Name(_)) => ChangeMask::RENAMED,
        EventKind::Modify(_) | EventKind::Any => ChangeMask::MODIFIED,
        EventKind::Remove(_) => ChangeMask::DELETED,
        EventKind::Access(_) | EventKind::Other => ChangeMask::empty(),
    }
}

impl From<&EventKind> for ChangeMask {
    fn from(kind: &EventKind) -> Self {
        change_mask_for(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{
        AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode,
    };

    #[test]
    fn kinds_map_to_single_flags() {
        let cases = [
            (EventKind::Create(CreateKind::File), ChangeMask::CREATED),
            (
                EventKind::Modify(ModifyKind::Name(RenameMode::From)),
                ChangeMask::RENAMED,
            ),
            (
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                ChangeMask::MODIFIED,
            ),
            (
                EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
                ChangeMask::MODIFIED,
            ),
            (EventKind::Any, ChangeMask::MODIFIED),
            (EventKind::Remove(RemoveKind::File), ChangeMask::DELETED),
        ];

        for (kind, expected) in cases {
            assert_eq!(change_mask_for(&kind), expected, "kind {kind:?}");
        }
    }

    #[test]
    fn access_and_other_carry_no_change() {
        assert!(change_mask_for(&EventKind::Access(AccessKind::Any)).is_empty());
        assert!(ChangeMask::from(&EventKind::Other).is_empty());
    }
}
