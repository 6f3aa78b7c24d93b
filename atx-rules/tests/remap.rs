use atx_rules::*;

const PUBLIC: AccessTransform = AccessTransform::access(AccessChange::Public);
const PROTECTED_FINAL: AccessTransform =
    AccessTransform::new(AccessChange::Protected, FinalChange::Add);
const DEFINALIZE: AccessTransform = AccessTransform::finality(FinalChange::Remove);

fn sample_rules() -> AccessRuleStore {
    let mut b = AccessRuleStore::builder();
    b.class("net.minecraft.World", PUBLIC)
        .unwrap()
        .field("net/minecraft/World", "height", DEFINALIZE)
        .unwrap()
        .method(
            "net/minecraft/World",
            MethodKey::new("tick", "(Lnet/minecraft/Chunk;J)V"),
            PROTECTED_FINAL,
        )
        .unwrap()
        .class("net/minecraft/World$Section", PUBLIC)
        .unwrap()
        .all_methods("net/minecraft/Chunk", PUBLIC)
        .unwrap();
    b.build()
}

/// A mapping in which every name in `sample_rules` maps to itself.
fn identity_mapping() -> NameMapping {
    let mut b = NameMapping::builder();
    b.class("net/minecraft/World", "net/minecraft/World")
        .class("net/minecraft/World$Section", "net/minecraft/World$Section")
        .class("net/minecraft/Chunk", "net/minecraft/Chunk")
        .field("net/minecraft/World", "height", "height")
        .method(
            "net/minecraft/World",
            MethodKey::new("tick", "(Lnet/minecraft/Chunk;J)V"),
            "tick",
        );
    b.build()
}

#[test]
fn identity_mapping_preserves_store() {
    let rules = sample_rules();
    let remapped = remap(&rules, &identity_mapping()).unwrap();
    assert_eq!(remapped.store, rules);
    assert!(remapped.report.is_clean());
}

#[test]
fn empty_mapping_keeps_every_key_and_reports() {
    let rules = sample_rules();
    let remapped = remap(&rules, &NameMapping::default()).unwrap();
    assert_eq!(remapped.store, rules);
    assert_eq!(remapped.report.unresolved_classes(), 3);
    assert_eq!(remapped.report.unresolved_members(), 0);
    assert!(
        remapped
            .report
            .unresolved()
            .contains(&UnresolvedName::Class("net/minecraft/World".into()))
    );
}

#[test]
fn output_is_independent_of_input() {
    let rules = sample_rules();
    let remapped = remap(&rules, &identity_mapping()).unwrap();
    drop(rules);
    assert_eq!(remapped.store.len(), 3);
}

#[test]
fn method_rename_keeps_descriptor() {
    let mut rules = AccessRuleStore::builder();
    rules
        .method("Foo", MethodKey::new("bar", "(I)V"), PUBLIC)
        .unwrap();
    let mut mapping = NameMapping::builder();
    mapping
        .class("Foo", "Foo")
        .method("Foo", MethodKey::new("bar", "(I)V"), "doThing");

    let remapped = remap(&rules.build(), &mapping.build()).unwrap();
    let foo = remapped.store.get("Foo").unwrap();
    assert_eq!(foo.method(&MethodKey::new("doThing", "(I)V")), Some(PUBLIC));
    assert_eq!(foo.method(&MethodKey::new("bar", "(I)V")), None);
}

#[test]
fn obfuscated_to_named() {
    let mut rules = AccessRuleStore::builder();
    rules
        .class("a", PUBLIC)
        .unwrap()
        .class("a$b", PUBLIC)
        .unwrap()
        .field("a", "c", DEFINALIZE)
        .unwrap()
        .method("a", MethodKey::new("d", "(La$b;)La;"), PUBLIC)
        .unwrap();

    let mut mapping = NameMapping::builder();
    mapping
        .class("a", "net/minecraft/World")
        .field("a", "c", "height")
        .method("a", MethodKey::new("d", "(La$b;)La;"), "copy");

    let remapped = remap(&rules.build(), &mapping.build()).unwrap();
    assert!(remapped.report.is_clean());

    let store = &remapped.store;
    assert_eq!(store.class_transform("net/minecraft/World"), Some(&PUBLIC));
    // Nested class follows its outer class.
    assert_eq!(store.class_transform("net/minecraft/World$b"), Some(&PUBLIC));

    let world = store.get("net/minecraft/World").unwrap();
    assert_eq!(world.field("height"), Some(DEFINALIZE));
    assert_eq!(
        world.method(&MethodKey::new(
            "copy",
            "(Lnet/minecraft/World$b;)Lnet/minecraft/World;"
        )),
        Some(PUBLIC)
    );
}

#[test]
fn member_collision_after_remap() {
    let mut rules = AccessRuleStoreBuilder::with_policy(ConflictPolicy::Reject);
    rules
        .field("a", "x", PUBLIC)
        .unwrap()
        .field("a", "y", DEFINALIZE)
        .unwrap();
    let rules = rules.build();

    let mut mapping = NameMapping::builder();
    mapping
        .class("a", "A")
        .field("a", "x", "value")
        .field("a", "y", "value");
    let mapping = mapping.build();

    let err = RuleRemapper::new(&mapping)
        .with_policy(ConflictPolicy::Reject)
        .remap(&rules)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Conflicting rules for A value: public vs -f"
    );

    let merged = RuleRemapper::new(&mapping).remap(&rules).unwrap();
    assert_eq!(
        merged.store.get("A").unwrap().field("value"),
        Some(AccessTransform::new(AccessChange::Public, FinalChange::Remove))
    );
    assert_eq!(
        merged.report.conflicts(),
        &[RuleTarget::Field("A".into(), "value".to_owned())]
    );
}

#[test]
fn merged_collisions_are_reported() {
    let mut rules = AccessRuleStore::builder();
    rules
        .class("a", PUBLIC)
        .unwrap()
        .class("b", AccessTransform::access(AccessChange::Private))
        .unwrap()
        .class("c", PUBLIC)
        .unwrap();
    let mut mapping = NameMapping::builder();
    mapping
        .class("a", "Same")
        .class("b", "Same")
        .class("c", "Other");

    let remapped = remap(&rules.build(), &mapping.build()).unwrap();
    assert_eq!(remapped.store.class_transform("Same"), Some(&PUBLIC));
    assert!(remapped.report.unresolved().is_empty());
    assert_eq!(
        remapped.report.conflicts(),
        &[RuleTarget::Class("Same".into())]
    );
    assert!(!remapped.report.is_clean());
}

#[test]
fn identical_rules_meeting_are_not_conflicts() {
    let mut rules = AccessRuleStore::builder();
    rules.class("a", PUBLIC).unwrap().class("b", PUBLIC).unwrap();
    let mut mapping = NameMapping::builder();
    mapping.class("a", "Same").class("b", "Same");

    let remapped = remap(&rules.build(), &mapping.build()).unwrap();
    assert!(remapped.report.conflicts().is_empty());
    assert!(remapped.report.is_clean());
}
