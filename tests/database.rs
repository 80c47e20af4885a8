use serde_json::json;
use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};
use std::env;

use orbital_catalog::{
    database::{CatalogStore, Database},
    models::ObservationYear,
};

async fn setup_test_db() -> Pool<MySql> {
    dotenvy::dotenv().ok();
    let database_url =
        env::var("DATABASE_URL").expect("Environment variable DATABASE_URL required");

    MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

fn year_2024() -> ObservationYear {
    ObservationYear::try_from(2024).unwrap()
}

#[ignore = "requires a MySQL database in DATABASE_URL"]
#[tokio::test]
async fn test_fetch_asteroids_by_date_range() {
    let pool = setup_test_db().await;

    sqlx::query("DROP TABLE IF EXISTS asteroids")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE asteroids (
            id INT PRIMARY KEY,
            name VARCHAR(64),
            diameter DOUBLE,
            albedo DECIMAL(6, 3),
            tp_cal DATE
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO asteroids VALUES
            (1, '2024 AB', 0.35, 0.125, '2024-01-01'),
            (2, 'Apophis', NULL, NULL, '2024-12-31'),
            (3, 'Bennu', 0.49, 0.044, '2023-12-31'),
            (4, 'Ryugu', 0.9, 0.045, '2025-01-01')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let db = Database::new(pool.clone());
    let asteroids = db.fetch_asteroids(year_2024()).await.unwrap();

    assert_eq!(asteroids.len(), 2);
    assert_eq!(
        serde_json::to_value(&asteroids[0]).unwrap(),
        json!({
            "id": 1,
            "name": "2024 AB",
            "diameter": 0.35,
            "albedo": 0.125,
            "tp_cal": "2024-01-01"
        })
    );
    assert_eq!(asteroids[1].tp_cal(), Some("2024-12-31"));
    assert_eq!(serde_json::to_value(&asteroids[1]).unwrap()["diameter"], json!(null));
}

#[ignore = "requires a MySQL database in DATABASE_URL"]
#[tokio::test]
async fn test_fetch_comets_coerces_values() {
    let pool = setup_test_db().await;

    sqlx::query("DROP TABLE IF EXISTS comets")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE comets (
            id INT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(64),
            diameter VARCHAR(16),
            eccentricity DOUBLE,
            inclination DECIMAL(8, 4),
            perihelion FLOAT,
            M1 DOUBLE,
            Q DOUBLE,
            n INT,
            tp_cal VARCHAR(32)
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO comets (name, diameter, eccentricity, inclination, perihelion, M1, Q, n, tp_cal)
         VALUES
            ('C/Test', '0', 0.99, 12.5000, 0.5, 11.0, 250.0, 1, '2024-05-01'),
            ('C/Measured', '3.2', 0.5, 7.25, 1.5, 9.5, 4.0, 2, '2024-May-02.5'),
            ('C/Unknown', NULL, NULL, NULL, NULL, NULL, NULL, NULL, '2024-06-01'),
            ('C/Old', '1.0', 0.1, 1.0, 1.0, 1.0, 1.0, 1, '2019-01-01'),
            ('C/Compact', '1.5', 0.2, 2.0, 1.0, 1.0, 1.0, 1, '20240421.1429')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let db = Database::new(pool.clone());
    let comets = db.fetch_comets(year_2024()).await.unwrap();

    assert_eq!(comets.len(), 4);
    assert_eq!(comets[0].name, "C/Test");
    assert_eq!(comets[0].diameter, 0.0);
    assert_eq!(comets[0].inclination, 12.5);
    assert_eq!(comets[1].diameter, 3.2);
    assert_eq!(comets[1].n, 2.0);
    assert_eq!(comets[2].diameter, 0.0);
    assert_eq!(comets[2].m1, 0.0);
    assert_eq!(comets[3].name, "C/Compact");
    assert!(comets.iter().all(|c| c.tp_cal.contains("2024")));
}

#[ignore = "requires a MySQL database in DATABASE_URL"]
#[tokio::test]
async fn test_ping() {
    let pool = setup_test_db().await;
    let db = Database::new(pool);
    db.ping().await.unwrap();
}
