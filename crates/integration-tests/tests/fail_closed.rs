//! Fail-closed defaults of the backend client.
//!
//! Two reads deliberately swallow failures: the cart renders empty and the
//! admin check answers "no". These run against a client whose every call
//! fails with a connect error, so a passing test shows the defaults hold
//! under total backend loss.

use sprtshop_core::Role;
use sprtshop_integration_tests::{test_identity, unreachable_backend};

#[tokio::test]
async fn admin_check_answers_false_when_the_backend_is_down() {
    let backend = unreachable_backend();
    let caller = test_identity("alice");

    // Resolves (no indefinite pending) and fails closed.
    assert!(!backend.is_caller_admin(Some(&caller)).await);
}

#[tokio::test]
async fn admin_check_answers_false_for_signed_out_callers_without_a_call() {
    let backend = unreachable_backend();
    assert!(!backend.is_caller_admin(None).await);
}

#[tokio::test]
async fn cart_read_masks_failure_with_an_empty_cart() {
    let backend = unreachable_backend();
    let caller = test_identity("alice");

    assert!(backend.get_cart_or_default(Some(&caller)).await.is_empty());
}

#[tokio::test]
async fn signed_out_callers_have_an_empty_cart_without_a_call() {
    let backend = unreachable_backend();
    assert!(backend.get_cart_or_default(None).await.is_empty());
}

#[tokio::test]
async fn signed_out_callers_are_guests_without_a_call() {
    let backend = unreachable_backend();

    let role = backend
        .get_caller_role(None)
        .await
        .expect("guest role needs no backend");
    assert_eq!(role, Role::Guest);
}

#[tokio::test]
async fn unmasked_reads_propagate_the_failure() {
    let backend = unreachable_backend();
    let caller = test_identity("alice");

    // The catalog and raw cart reads have no safe default; handlers render
    // their error state instead.
    assert!(backend.get_products().await.is_err());
    assert!(backend.get_cart(&caller).await.is_err());
    assert!(backend.get_caller_role(Some(&caller)).await.is_err());
}
