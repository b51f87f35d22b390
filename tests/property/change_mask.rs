use notify::EventKind;
use notify::event::{
    AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode,
};
use proptest::prelude::*;
use pathwatch::ChangeMask;
use pathwatch::notifier::change_mask_for;

fn event_kind_strategy() -> impl Strategy<Value = EventKind> {
    prop_oneof![
        Just(EventKind::Any),
        Just(EventKind::Other),
        Just(EventKind::Access(AccessKind::Any)),
        Just(EventKind::Create(CreateKind::Any)),
        Just(EventKind::Create(CreateKind::File)),
        Just(EventKind::Create(CreateKind::Folder)),
        Just(EventKind::Modify(ModifyKind::Any)),
        Just(EventKind::Modify(ModifyKind::Data(DataChange::Content))),
        Just(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))),
        Just(EventKind::Modify(ModifyKind::Name(RenameMode::From))),
        Just(EventKind::Modify(ModifyKind::Name(RenameMode::To))),
        Just(EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
        Just(EventKind::Remove(RemoveKind::Any)),
        Just(EventKind::Remove(RemoveKind::File)),
        Just(EventKind::Remove(RemoveKind::Folder)),
    ]
}

proptest! {
    #[test]
    fn every_event_maps_to_at_most_one_known_bit(kind in event_kind_strategy()) {
        let mask = change_mask_for(&kind);

        prop_assert!(mask.bits().count_ones() <= 1);
        prop_assert!(ChangeMask::all().contains(mask));
        prop_assert_eq!(mask.is_empty(), matches!(kind, EventKind::Access(_) | EventKind::Other));
        prop_assert_eq!(mask.contains(ChangeMask::DELETED), matches!(kind, EventKind::Remove(_)));
    }
}
