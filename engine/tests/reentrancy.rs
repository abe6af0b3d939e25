//! Context register visibility and re-entrant execution.
//!
//! Targets are `MockHost` handlers that get the running `Outbox` back, so
//! they can read the context register and call `execute` themselves.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use outbox_engine::{ActiveContext, Outbox, OutboxEvent, TargetCall};
use outbox_primitives::{Hash, HostError, OutboxError, U256};

use common::*;

type Seen<T> = Rc<RefCell<Vec<T>>>;

fn seen<T>() -> Seen<T> {
    Rc::new(RefCell::new(Vec::new()))
}

// ── Context register ──

#[test]
fn test_context_visible_only_during_call() {
    let mut fx = Fixture::new();
    fx.send_and_publish(messages(3));

    let observed: Seen<Option<ActiveContext>> = seen();
    let log = observed.clone();
    fx.host.register(bob(), move |outbox: &mut Outbox, _, _| {
        log.borrow_mut().push(outbox.context().current().cloned());
        Ok(())
    });

    assert!(!fx.outbox.context().is_active());
    fx.execute(2).unwrap();
    assert!(!fx.outbox.context().is_active());
    assert_eq!(fx.outbox.context().sender(), None);

    let observed = observed.borrow();
    let ctx = observed[0].as_ref().expect("context set during call");
    let msg = &fx.sent[2];
    assert_eq!(ctx.sender, msg.sender);
    assert_eq!(ctx.origin_block, msg.origin_block);
    assert_eq!(ctx.destination_block, msg.destination_block);
    assert_eq!(ctx.timestamp, msg.timestamp);
    assert_eq!(ctx.output_id, 2);
    assert_eq!(ctx.amount, U256::from(3 * ONE));
}

#[test]
fn test_context_reports_rescaled_amount() {
    let mut fx = Fixture::with_decimals(6);
    fx.send_and_publish(vec![message_to(bob(), 2_500_000_000_000_000_000, 0)]);

    fx.execute(0).unwrap();
    let ctx = fx.host.deliveries()[0].context.clone().unwrap();
    assert_eq!(ctx.amount, U256::from(2_500_000u64));
}

#[test]
fn test_context_cleared_after_failed_call() {
    let mut fx = Fixture::new();
    fx.send_and_publish(messages(1));
    fx.host.reject_calls(bob(), "boom");

    fx.execute(0).unwrap_err();
    assert!(!fx.outbox.context().is_active());
}

#[test]
fn test_funds_arrive_before_call() {
    let mut fx = Fixture::new();
    fx.send_and_publish(messages(1));

    let balances: Seen<U256> = seen();
    let log = balances.clone();
    fx.host.register(bob(), move |_, host, call: &TargetCall<'_>| {
        log.borrow_mut().push(host.balance_of(&call.target));
        Ok(())
    });

    fx.execute(0).unwrap();
    assert_eq!(balances.borrow().as_slice(), &[U256::from(ONE)]);
}

// ── Re-entrancy ──

#[test]
fn test_reentry_with_same_index_is_already_spent() {
    let mut fx = Fixture::new();
    fx.send_and_publish(messages(1));
    let proof = fx.proof(0);
    let msg = fx.sent[0].clone();

    let results: Seen<Result<(), OutboxError>> = seen();
    let log = results.clone();
    fx.host.register(bob(), move |outbox: &mut Outbox, host, _| {
        let again = outbox.execute(host, &proof, 0, &msg).map(|_| ());
        log.borrow_mut().push(again);
        Ok(())
    });

    fx.execute(0).unwrap();
    assert_eq!(
        results.borrow().as_slice(),
        &[Err(OutboxError::AlreadySpent { index: 0 })]
    );
    // Released once.
    assert_eq!(fx.host.balance_of(&bob()), U256::from(ONE));
}

#[test]
fn test_nested_execution_restores_outer_context() {
    let mut fx = Fixture::new();
    fx.send_and_publish(vec![message_to(bob(), ONE, 0), message_to(carol(), 5 * ONE, 1)]);
    let inner_proof = fx.proof(1);
    let inner_msg = fx.sent[1].clone();

    let inner_seen: Seen<Option<u64>> = seen();
    let log = inner_seen.clone();
    fx.host.register(carol(), move |outbox: &mut Outbox, _, _| {
        log.borrow_mut().push(outbox.context().output_id());
        Ok(())
    });

    let outer_seen: Seen<Option<u64>> = seen();
    let log = outer_seen.clone();
    fx.host.register(bob(), move |outbox: &mut Outbox, host, call| {
        outbox
            .execute(host, &inner_proof, 1, &inner_msg)
            .map_err(|err| revert_with(call.target, err))?;
        log.borrow_mut().push(outbox.context().output_id());
        Ok(())
    });

    fx.execute(0).unwrap();

    assert_eq!(inner_seen.borrow().as_slice(), &[Some(1)]);
    assert_eq!(outer_seen.borrow().as_slice(), &[Some(0)]);
    assert!(!fx.outbox.context().is_active());
    assert!(fx.outbox.is_spent(0));
    assert!(fx.outbox.is_spent(1));
    assert_eq!(fx.host.balance_of(&carol()), U256::from(5 * ONE));
    assert_eq!(fx.host.deliveries().len(), 2);
}

#[test]
fn test_outer_failure_rolls_back_nested_success() {
    let mut fx = Fixture::new();
    fx.send_and_publish(vec![message_to(bob(), ONE, 0), message_to(carol(), 5 * ONE, 1)]);
    let inner_proof = fx.proof(1);
    let inner_msg = fx.sent[1].clone();
    let events_before = fx.outbox.events().len();

    fx.host.register(bob(), move |outbox: &mut Outbox, host, call| {
        outbox
            .execute(host, &inner_proof, 1, &inner_msg)
            .map_err(|err| revert_with(call.target, err))?;
        Err(HostError::CallReverted {
            target: call.target,
            reason: "late failure".into(),
        })
    });

    let err = fx.execute(0).unwrap_err();
    assert!(err.to_string().contains("late failure"), "{err}");

    assert!(!fx.outbox.is_spent(0));
    assert!(!fx.outbox.is_spent(1));
    assert_eq!(fx.host.balance_of(&carol()), U256::ZERO);
    assert_eq!(fx.host.custody_balance(), U256::from(CUSTODY_FUNDS));
    assert!(fx.host.deliveries().is_empty());
    assert_eq!(fx.outbox.events().len(), events_before);

    // Both messages stay executable on their own.
    fx.host.register(bob(), |_, _, _| Ok(()));
    fx.execute(1).unwrap();
    fx.execute(0).unwrap();
}

#[test]
fn test_swallowed_inner_failure_keeps_outer() {
    let mut fx = Fixture::new();
    fx.send_and_publish(vec![message_to(bob(), ONE, 0), message_to(carol(), 5 * ONE, 1)]);
    let inner_proof = fx.proof(1);
    let inner_msg = fx.sent[1].clone();
    fx.host.reject_calls(carol(), "carol is closed");

    let inner_results: Seen<bool> = seen();
    let log = inner_results.clone();
    fx.host.register(bob(), move |outbox: &mut Outbox, host, _| {
        let ok = outbox.execute(host, &inner_proof, 1, &inner_msg).is_ok();
        log.borrow_mut().push(ok);
        Ok(())
    });

    fx.execute(0).unwrap();

    assert_eq!(inner_results.borrow().as_slice(), &[false]);
    assert!(fx.outbox.is_spent(0));
    assert!(!fx.outbox.is_spent(1));
    assert_eq!(fx.host.balance_of(&bob()), U256::from(ONE));
    assert_eq!(fx.host.balance_of(&carol()), U256::ZERO);
    assert_eq!(fx.host.deliveries().len(), 1);
    assert_eq!(fx.host.deliveries()[0].target, bob());
}

// ── Root publication inside a call ──

#[test]
fn test_root_published_in_failed_call_is_rolled_back() {
    let mut fx = Fixture::new();
    fx.send_and_publish(messages(1));
    let events_before = fx.outbox.events().len();

    fx.host.register(bob(), |outbox: &mut Outbox, _, call| {
        outbox
            .publish_root(&publisher(), 10, Hash::repeat_byte(0x10))
            .map_err(|err| revert_with(call.target, err))?;
        Err(HostError::CallReverted {
            target: call.target,
            reason: "after publishing".into(),
        })
    });

    fx.execute(0).unwrap_err();

    assert_eq!(fx.outbox.root(10).unwrap_err(), OutboxError::UnknownEpoch { epoch: 10 });
    assert_eq!(fx.outbox.roots().len(), 1);
    assert_eq!(fx.outbox.events().len(), events_before);

    // The epoch is free again and the rolled-back root no longer resolves.
    fx.outbox
        .publish_root(&publisher(), 10, Hash::repeat_byte(0x11))
        .unwrap();
    assert_eq!(fx.outbox.root(10).unwrap(), Hash::repeat_byte(0x11));
    assert!(matches!(
        fx.outbox.roots().resolve(0, &Hash::repeat_byte(0x10)),
        Err(OutboxError::Unproven { index: 0, .. })
    ));
}

#[test]
fn test_root_published_in_successful_call_is_kept() {
    let mut fx = Fixture::new();
    fx.send_and_publish(messages(1));

    fx.host.register(bob(), |outbox: &mut Outbox, _, call| {
        outbox
            .publish_root(&publisher(), 10, Hash::repeat_byte(0x10))
            .map_err(|err| revert_with(call.target, err))
    });

    fx.execute(0).unwrap();

    assert_eq!(fx.outbox.root(10).unwrap(), Hash::repeat_byte(0x10));
    assert!(matches!(
        fx.outbox.events()[1],
        OutboxEvent::RootPublished { epoch: 10, .. }
    ));
    assert!(matches!(
        fx.outbox.events()[2],
        OutboxEvent::MessageExecuted { index: 0, .. }
    ));
}
