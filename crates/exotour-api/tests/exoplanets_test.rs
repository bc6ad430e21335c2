//! Integration tests for the exoplanet routes.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_get_exoplanet_renders_details() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = common::get_json(app, "/api/v1/exoplanets/3").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "TRAPPIST-1 e");
    assert_eq!(json["host"], "TRAPPIST-1");
    assert_eq!(json["equilibrium_temperature"], "250 K (~-23.15 °C)");
    assert_eq!(json["star_luminosity"], "Log(Lum) = -3.28");
    assert_eq!(json["in_habitable_zone"], "Yes");
    assert_eq!(json["distance"], "Unknown");
    assert_eq!(json["back_path"], "/hwo/TRAPPIST-1");
}

#[tokio::test]
async fn test_earth_comparison_caps_at_one_hundred_percent() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = common::get_json(app, "/api/v1/exoplanets/4").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let comparison = &json["earth_comparison"];
    assert_eq!(comparison["mass_percent"], 100.0);
    assert_eq!(comparison["exceeds_mass_scale"], true);
    assert_eq!(json["in_habitable_zone"], "No");
}

#[tokio::test]
async fn test_get_unknown_exoplanet_returns_404_with_message() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = common::get_json(app, "/api/v1/exoplanets/9999").await;

    // Assert
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["message"], "Exoplanet not found.");
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let app = common::build_test_app();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/exoplanets/abc")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
