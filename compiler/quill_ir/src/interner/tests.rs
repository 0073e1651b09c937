use super::*;

#[test]
fn test_intern_and_lookup() {
    let interner = StringInterner::new();

    let deps = interner.intern("extra_deps");
    let other = interner.intern("other");
    let deps2 = interner.intern("extra_deps");

    assert_eq!(deps, deps2);
    assert_ne!(deps, other);
    assert_eq!(interner.lookup(deps), "extra_deps");
    assert_eq!(interner.lookup(other), "other");
}

#[test]
fn test_empty_string() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn test_builtins_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.get("invoker").is_some());
    assert!(interner.get("mark_used_from").is_some());
    assert!(interner.get("never_seen_before").is_none());
}

#[test]
fn test_lookup_out_of_range_is_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(u32::MAX)), "");
}

#[test]
fn test_len_grows_once_per_distinct_string() {
    let interner = StringInterner::new();
    let before = interner.len();
    interner.intern("a_new_name");
    interner.intern("a_new_name");
    assert_eq!(interner.len(), before + 1);
    assert!(!interner.is_empty());
}

#[test]
fn test_shared_interner() {
    let interner = SharedInterner::new();
    let interner2 = interner.clone();

    let name = interner.intern("shared");
    assert_eq!(interner2.lookup(name), "shared");
    assert_eq!(interner2.intern("shared"), name);
}
