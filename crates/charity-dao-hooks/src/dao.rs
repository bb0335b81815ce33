//! DAO profile and governance workflows.

use tracing::info;

use charity_dao_core::chain::{DaoRegistry, Session};
use charity_dao_core::content::ContentStore;
use charity_dao_core::model::{DaoProfile, GovernanceDocument};
use charity_dao_core::DaoResult;

use crate::staging::{commit, stage, Published};

/// Upload the governance text, then record name, description and the
/// governance locator with `daoUpdate`.
pub async fn update_dao(
    store: &dyn ContentStore,
    registry: &dyn DaoRegistry,
    session: &Session,
    profile: &DaoProfile,
) -> DaoResult<Published> {
    let staged = stage(store, &profile.governance().document()).await?;
    let published = commit(
        &staged,
        registry.dao_update(session, profile.name(), profile.description(), &staged.locator),
    )
    .await?;
    info!(name = profile.name(), tx = %published.tx, "dao record updated");
    Ok(published)
}

/// Upload new governance rules and record them with `governanceUpdate`.
pub async fn update_governance(
    store: &dyn ContentStore,
    registry: &dyn DaoRegistry,
    session: &Session,
    governance: &GovernanceDocument,
) -> DaoResult<Published> {
    let staged = stage(store, &governance.document()).await?;
    let published = commit(&staged, registry.governance_update(session, &staged.locator)).await?;
    info!(tx = %published.tx, "governance updated");
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Event, FakeDeployment, Op};
    use alloy_primitives::Address;
    use assert_matches::assert_matches;
    use charity_dao_core::DaoError;

    fn session() -> Session {
        Session::new(Address::repeat_byte(0x0a))
    }

    #[tokio::test]
    async fn update_dao_writes_uploaded_locator() {
        let fake = FakeDeployment::new();
        let profile = DaoProfile::new(
            "Giving Circle",
            "Funds local food banks.",
            GovernanceDocument::new("One token, one vote.\r\n").unwrap(),
        )
        .unwrap();

        let published = update_dao(&fake, &fake, &session(), &profile).await.unwrap();

        let events = fake.events();
        assert_eq!(events.len(), 2);
        assert_matches!(&events[0], Event::Upload { name, .. } if name == "governance.jsonld");
        assert_matches!(
            &events[1],
            Event::DaoUpdate { name, governance_uri, .. }
                if name == "Giving Circle" && *governance_uri == published.locator
        );
        assert_eq!(fake.document(&published.locator).unwrap(), b"One token, one vote.\n");
    }

    #[tokio::test]
    async fn rejected_dao_update_is_uncommitted() {
        let fake = FakeDeployment::new();
        fake.fail(Op::DaoUpdate);

        let err = update_dao(&fake, &fake, &session(), &DaoProfile::default())
            .await
            .unwrap_err();
        assert_matches!(err, DaoError::Uncommitted { .. });
        assert!(fake.document(err.orphaned_locator().unwrap()).is_some());
    }

    #[tokio::test]
    async fn governance_upload_failure_skips_chain() {
        let fake = FakeDeployment::new();
        fake.fail(Op::Upload);

        let err = update_governance(&fake, &fake, &session(), &GovernanceDocument::default())
            .await
            .unwrap_err();
        assert_matches!(err, DaoError::UploadFailed(_));
        assert!(fake.events().is_empty());
    }
}
