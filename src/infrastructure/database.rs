use crate::entities::{albums, photos, users};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::env;
use std::time::Duration;
use tracing::info;

pub async fn setup_database() -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    info!("📂 Database: {}", db_url);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

/// Creates the schema from the entities. Tables are created in dependency
/// order: photos reference both users and albums.
pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let stmts = vec![
        schema
            .create_table_from_entity(users::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(albums::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(photos::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in stmts {
        let stmt = builder.build(&stmt);
        db.execute(stmt).await?;
    }

    // Listing and membership queries filter on these constantly
    let _ = db
        .execute(sea_orm::Statement::from_string(
            builder,
            "CREATE INDEX IF NOT EXISTS idx_photos_user_id ON photos(user_id);".to_string(),
        ))
        .await;
    let _ = db
        .execute(sea_orm::Statement::from_string(
            builder,
            "CREATE INDEX IF NOT EXISTS idx_photos_album_id ON photos(album_id);".to_string(),
        ))
        .await;

    Ok(())
}
