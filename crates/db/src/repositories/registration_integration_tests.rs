//! Integration tests for the registration transaction.
//!
//! Runs against a disposable Postgres container: registration must
//! persist the user, organization, Administrator role, and membership
//! together, or none of them.

#[cfg(test)]
mod tests {
    use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
    use testcontainers::{ContainerAsync, runners::AsyncRunner};
    use testcontainers_modules::postgres::Postgres;

    use crate::entities::{organization_users, organizations, roles, users};
    use crate::migration::Migrator;
    use crate::repositories::{ADMINISTRATOR_ROLE, NewRegistration, UserRepository};
    use sea_orm_migration::MigratorTrait;

    async fn migrated_db() -> (ContainerAsync<Postgres>, DatabaseConnection) {
        let node = Postgres::default().start().await.unwrap();
        let host = node.get_host().await.unwrap();
        let port = node.get_host_port_ipv4(5432).await.unwrap();
        let db = crate::connect(&format!("postgres://postgres:postgres@{host}:{port}/postgres"))
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();
        (node, db)
    }

    fn registration(email: &str) -> NewRegistration {
        NewRegistration {
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
            user_type: "tenant".to_string(),
            organization_name: "Ada Works".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_persists_user_org_role_and_membership() {
        let (_node, db) = migrated_db().await;
        let repo = UserRepository::new(db.clone());

        let (user, organization) = repo.register(registration("ada@example.com")).await.unwrap();

        let role = roles::Entity::find()
            .filter(roles::Column::OrganizationId.eq(organization.id))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(role.name, ADMINISTRATOR_ROLE);

        let membership = organization_users::Entity::find()
            .filter(organization_users::Column::UserId.eq(user.id))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.organization_id, organization.id);
        assert_eq!(membership.role_id, role.id);

        // Tenants start unverified with a pending token.
        assert!(user.email_verified_at.is_none());
        assert!(user.verification_token.is_some());
    }

    #[tokio::test]
    async fn test_register_rolls_back_all_rows_when_membership_insert_fails() {
        let (_node, db) = migrated_db().await;

        // Sabotage the last step of the transaction: the membership insert
        // hits a missing table after user, organization, and role are in.
        db.execute_unprepared("DROP TABLE organization_users")
            .await
            .unwrap();

        let repo = UserRepository::new(db.clone());
        let result = repo.register(registration("ada@example.com")).await;
        assert!(result.is_err());

        assert_eq!(users::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(organizations::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(roles::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_no_second_organization() {
        let (_node, db) = migrated_db().await;
        let repo = UserRepository::new(db.clone());

        repo.register(registration("ada@example.com")).await.unwrap();
        let result = repo.register(registration("ada@example.com")).await;
        assert!(result.is_err());

        assert_eq!(users::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(organizations::Entity::find().count(&db).await.unwrap(), 1);
    }
}
