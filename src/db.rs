// connexion BD + création du schéma depuis les entités

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::models::{
    document, donation, event, event_registration, membership, message, news, pending_donation,
    resource, role, users,
};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Crée les tables manquantes (CREATE TABLE IF NOT EXISTS), dans l'ordre des clés étrangères
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, role::Entity).await?;
    create_table(db, &schema, users::Entity).await?;
    create_table(db, &schema, membership::Entity).await?;
    create_table(db, &schema, event::Entity).await?;
    create_table(db, &schema, event_registration::Entity).await?;
    create_table(db, &schema, donation::Entity).await?;
    create_table(db, &schema, pending_donation::Entity).await?;
    create_table(db, &schema, news::Entity).await?;
    create_table(db, &schema, message::Entity).await?;
    create_table(db, &schema, resource::Entity).await?;
    create_table(db, &schema, document::Entity).await?;

    // Un membre ne peut être inscrit qu'une fois à un même événement
    // (les non-membres ont membership_id NULL et ne sont pas concernés)
    let unique_registration = Index::create()
        .name("idx_event_registrations_event_membership")
        .table(event_registration::Entity)
        .col(event_registration::Column::EventId)
        .col(event_registration::Column::MembershipId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(db.get_database_backend().build(&unique_registration)).await?;

    // Un paiement ne produit qu'un don (plusieurs NULL restent possibles)
    let unique_payment = Index::create()
        .name("idx_donations_payment_reference")
        .table(donation::Entity)
        .col(donation::Column::PaymentReference)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(db.get_database_backend().build(&unique_payment)).await?;

    Ok(())
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}

/// Base SQLite en mémoire avec le schéma complet, pour les tests
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    use sea_orm::ConnectOptions;

    // Une seule connexion: chaque connexion SQLite en mémoire a sa propre base
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.expect("sqlite in memory");
    create_schema(&db).await.expect("schema");
    db
}
