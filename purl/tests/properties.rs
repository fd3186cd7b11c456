//! Property-based invariants of the knit and render steps.
//!
//! 1. Knitting a payload onto its own result is a fixed point
//! 2. Re-rendering an unchanged triple never touches the DOM
//! 3. An unchanged payload never reaches `reconcile`
//! 4. Incremental patches converge on the same DOM as a fresh paint
//! 5. Arbitrary payloads never panic the knitter

mod common;

use common::{PageAttrs, Profile, ProfilePage};
use proptest::prelude::*;
use purl::{Component, DiffTemplate, Knit, MemoryDom, Payload, PushOutcome};
use serde_json::json;

// ── Helpers ──────────────────────────────────────────────────────────

type Page = Component<ProfilePage, DiffTemplate>;

fn mount() -> Page {
    Component::mount(
        ProfilePage::default(),
        DiffTemplate,
        MemoryDom::new(),
        PageAttrs::default(),
    )
    .unwrap()
}

fn arb_profile_payload() -> impl Strategy<Value = Payload> {
    ("[A-Za-z <&>]{0,12}", 0u32..1000, any::<bool>()).prop_map(|(name, unread, extra)| {
        if extra {
            json!({ "name": name, "unreadCount": unread, "ignored": [1, 2, 3] })
        } else {
            json!({ "name": name, "unreadCount": unread })
        }
    })
}

fn arb_any_payload() -> impl Strategy<Value = Payload> {
    let leaf = prop_oneof![
        Just(Payload::Null),
        any::<bool>().prop_map(Payload::from),
        any::<i64>().prop_map(Payload::from),
        ".{0,8}".prop_map(Payload::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Payload::from),
            proptest::collection::btree_map("[a-zA-Z]{1,12}", inner, 0..4)
                .prop_map(|map| Payload::Object(map.into_iter().collect())),
        ]
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Knit is a fixed point
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn knit_is_idempotent(payload in arb_profile_payload()) {
        let first = Profile::knit(None, &payload).unwrap();
        let second = Profile::knit(Some(&first), &payload).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Render idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rerender_is_noop(payload in arb_profile_payload(), expanded in any::<bool>()) {
        let mut page = mount();
        page.push(&payload);
        page.update_state(|s| s.expanded = expanded);
        let before = page.root().mutation_count();

        let report = page.update_state(|_| {}).unwrap();

        prop_assert!(report.is_noop());
        prop_assert_eq!(page.root().mutation_count(), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Unchanged payloads are gated
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_payload_is_not_knitted(payload in arb_profile_payload()) {
        let mut page = mount();
        page.push(&payload);
        let knits = page.stats().knits;
        let model = page.model().cloned();

        prop_assert_eq!(page.push(&payload), PushOutcome::Unchanged);
        prop_assert_eq!(page.stats().knits, knits);
        prop_assert_eq!(page.model().cloned(), model);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Patches converge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn patches_converge_on_fresh_paint(
        steps in proptest::collection::vec((arb_profile_payload(), any::<bool>()), 1..8),
    ) {
        let mut page = mount();
        for (payload, expanded) in &steps {
            page.push(payload);
            page.update_state(|s| s.expanded = *expanded);
        }

        let (last_payload, last_expanded) = steps.last().unwrap();
        let mut fresh = mount();
        fresh.update_state(|s| s.expanded = *last_expanded);
        fresh.push(last_payload);

        prop_assert_eq!(page.root().to_html(), fresh.root().to_html());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Never panics on arbitrary input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_payloads_never_panic(payload in arb_any_payload()) {
        let mut page = mount();
        let outcome = page.push(&payload);
        if !payload.is_object() {
            prop_assert_eq!(outcome, PushOutcome::Failed);
        }
        // the DOM always holds a complete paint
        prop_assert!(page.root().content().is_some());
    }
}
