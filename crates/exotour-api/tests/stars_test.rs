//! Integration tests for the star routes.

mod common;

use axum::http::StatusCode;

// --- list ---

#[tokio::test]
async fn test_list_stars_groups_records_by_host() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = common::get_json(app, "/api/v1/stars").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let stars = json.as_array().unwrap();
    let hosts: Vec<&str> = stars.iter().map(|s| s["host"].as_str().unwrap()).collect();
    assert_eq!(hosts, vec!["HD 1", "Kepler-42", "TRAPPIST-1"]);
    assert_eq!(stars[1]["planet_count"], 2);
    assert_eq!(stars[2]["planet_count"], 1);
}

// --- details ---

#[tokio::test]
async fn test_get_star_renders_details_and_planet_cards() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = common::get_json(app, "/api/v1/stars/Kepler-42").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["effective_temperature"], "3269 K");
    assert_eq!(json["metallicity"], "0");
    assert_eq!(json["distance"], "40.00 parsecs (~130.40 light-years)");
    assert_eq!(json["spectral_type"], "M5 V");
    assert_eq!(json["mass"], "Unknown");
    let planets = json["planets"].as_array().unwrap();
    assert_eq!(planets.len(), 2);
    assert_eq!(planets[0]["name"], "Kepler-42 b");
    assert_eq!(planets[0]["detail_path"], "/exoplanet/1");
    assert_eq!(planets[1]["mass"], "Unknown");
}

#[tokio::test]
async fn test_get_star_with_encoded_host_name() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app, "/api/v1/stars/HD%201").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["host"], "HD 1");
}

#[tokio::test]
async fn test_get_unknown_star_returns_404_with_message() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = common::get_json(app, "/api/v1/stars/Nowhere-9").await;

    // Assert
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["message"], "Star not found.");
}
