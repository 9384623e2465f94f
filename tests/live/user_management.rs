//! Registration and role management against the live gateway.

use tdei_harness::faker;
use tdei_harness::user_management::*;

use crate::common;

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn roles_without_token_is_401() {
    common::init_tracing();
    let err = roles(&common::anonymous()).await.unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn roles_lists_system_roles() {
    common::init_tracing();
    let listed = roles(&common::admin()).await.unwrap();
    assert!(!listed.is_empty());
    assert!(listed.iter().all(|r| !r.name.is_empty()));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn register_rejects_invalid_payloads() {
    common::init_tracing();
    let anonymous = common::anonymous();

    let no_email = Register {
        email: None,
        ..faker::user()
    };
    let no_password = Register {
        password: None,
        ..faker::user()
    };
    let bad_email = Register {
        email: Some("not-an-email".to_string()),
        ..faker::user()
    };
    let weak_password = Register {
        password: Some("password".to_string()),
        ..faker::user()
    };

    for (case, register) in [
        ("missing email", no_email),
        ("missing password", no_password),
        ("empty payload", Register::default()),
        ("invalid email", bad_email),
        ("weak password", weak_password),
    ] {
        let err = register_user(&anonymous, &register).await.unwrap_err();
        assert_eq!(common::status(&err), Some(400), "{case}");
    }
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn register_returns_created_user() {
    common::init_tracing();
    let register = faker::user();
    let user = register_user(&common::anonymous(), &register).await.unwrap();
    assert!(!user.id.is_empty());
    assert_eq!(Some(user.email), register.email);
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn permission_without_token_is_401() {
    let seed = common::seed().await;
    let details = RoleDetails::for_org(&[TdeiRole::Poc], seed.org_id(), &seed.producer_user.email);
    let err = permission(&common::anonymous(), &details).await.unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn permission_for_unknown_user_is_404() {
    let seed = common::seed().await;
    let unknown = faker::user().email.unwrap_or_default();
    let details = RoleDetails::for_org(&[TdeiRole::Poc], seed.org_id(), &unknown);
    let err = permission(&common::admin(), &details).await.unwrap_err();
    assert_eq!(common::status(&err), Some(404));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn permission_on_own_account_is_400() {
    let seed = common::seed().await;
    let config = common::config();
    let details = RoleDetails::for_org(&[TdeiRole::Poc], seed.org_id(), config.username());
    let err = permission(&common::admin(), &details).await.unwrap_err();
    assert_eq!(common::status(&err), Some(400));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn grant_then_revoke_permission() {
    let seed = common::seed().await;
    let admin = common::admin();
    let user = register_user(&common::anonymous(), &faker::user())
        .await
        .unwrap();
    let details = RoleDetails::for_org(&[TdeiRole::FlexDataGenerator], seed.org_id(), &user.email);

    assert_eq!(permission(&admin, &details).await.unwrap(), "Successful!");

    let memberships = org_roles(&admin, &user.id).await.unwrap();
    let seeded = memberships
        .iter()
        .find(|m| m.tdei_org_id == seed.org_id())
        .expect("membership in seeded organization");
    assert!(seeded.roles.iter().any(|r| r == TdeiRole::FlexDataGenerator.as_str()));

    revoke_permission(&admin, &details).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn seeded_producer_holds_data_generator_roles() {
    let seed = common::seed().await;
    let memberships = org_roles(&common::admin(), &seed.producer_user.id)
        .await
        .unwrap();
    let seeded = memberships
        .iter()
        .find(|m| m.tdei_org_id == seed.org_id())
        .expect("producer should belong to the seeded organization");
    for role in TdeiRole::DATA_GENERATORS {
        assert!(
            seeded.roles.iter().any(|r| r == role.as_str()),
            "missing {role}"
        );
    }
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn project_group_roles_lists_memberships() {
    let seed = common::seed().await;
    project_group_roles(&common::admin(), &seed.producer_user.id)
        .await
        .unwrap();
}
