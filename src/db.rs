use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Users double as shops once the shop_* columns are populated
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            avatar TEXT,
            role TEXT NOT NULL DEFAULT 'SELLER',
            status TEXT NOT NULL DEFAULT 'PENDING',
            shop_name TEXT,
            shop_slug TEXT UNIQUE,
            shop_description TEXT,
            shop_avatar TEXT,
            shop_cover TEXT,
            featured_games TEXT,
            is_verified BOOLEAN NOT NULL DEFAULT 0,
            is_vip_shop BOOLEAN NOT NULL DEFAULT 0,
            vip_shop_end_time TEXT,
            is_strategic_partner BOOLEAN NOT NULL DEFAULT 0,
            partner_tier TEXT,
            partner_since TEXT,
            commission_rate REAL NOT NULL DEFAULT 5.0,
            rating REAL NOT NULL DEFAULT 5.0,
            total_reviews INTEGER NOT NULL DEFAULT 0,
            total_sales INTEGER NOT NULL DEFAULT 0,
            total_views INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_active_at TEXT NOT NULL,
            approved_at TEXT
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            icon TEXT,
            fields_schema TEXT NOT NULL DEFAULT '[]',
            is_active BOOLEAN NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS accs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT,
            price INTEGER NOT NULL,
            original_price INTEGER,
            game_id INTEGER NOT NULL REFERENCES games(id),
            seller_id INTEGER NOT NULL REFERENCES users(id),
            images TEXT NOT NULL DEFAULT '[]',
            attributes TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'PENDING',
            views INTEGER NOT NULL DEFAULT 0,
            admin_note TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            approved_at TEXT,
            sold_at TEXT
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            content TEXT NOT NULL,
            excerpt TEXT,
            thumbnail TEXT,
            game TEXT,
            source_url TEXT,
            source_name TEXT,
            status TEXT NOT NULL DEFAULT 'DRAFT',
            views INTEGER NOT NULL DEFAULT 0,
            published_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rating INTEGER NOT NULL,
            content TEXT,
            buyer_name TEXT NOT NULL,
            seller_id INTEGER NOT NULL REFERENCES users(id),
            is_verified BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS otp_verifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            code TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            attempts INTEGER NOT NULL DEFAULT 0,
            verified BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS site_settings (
            id TEXT PRIMARY KEY,
            contact_email TEXT,
            contact_phone TEXT,
            facebook_url TEXT,
            zalo_url TEXT,
            discord_url TEXT,
            youtube_url TEXT,
            telegram_url TEXT,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Migration: partner tier metadata on users
    // We attempt to add columns. If they exist, it might fail, so we ignore errors
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE users ADD COLUMN partner_tier TEXT".to_owned(),
        ))
        .await;
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE users ADD COLUMN partner_since TEXT".to_owned(),
        ))
        .await;

    // Migration: original_price for strike-through pricing on listings
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE accs ADD COLUMN original_price INTEGER".to_owned(),
        ))
        .await;

    Ok(())
}
