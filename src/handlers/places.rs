// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for the category endpoints
// PURPOSE: Parse requests, dispatch to the places service, return responses

use crate::errors::PlacesError;
use crate::models::PlacesQuery;
use crate::services::{GeoapifyClient, PlaceService, PlacesCache};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

/// Upstream category filter per endpoint
/// DOCUMENTATION: Adding a category is one new constant plus one route
const CATEGORY_HOTELS: &str = "accommodation.hotel";
const CATEGORY_RESTAURANTS: &str = "catering.restaurant";
const CATEGORY_ACTIVITIES: &str = "leisure";
const CATEGORY_MALLS: &str = "commercial.shopping_mall";

/// Shared request path behind every category endpoint
/// DOCUMENTATION: An empty result set is reported as NoResults (404); all
/// other outcomes are the fetched JSON array or a taxonomy error
async fn get_places(
    client: web::Data<GeoapifyClient>,
    cache: web::Data<Arc<PlacesCache>>,
    query: web::Query<PlacesQuery>,
    categories: &str,
) -> Result<HttpResponse, PlacesError> {
    let data =
        PlaceService::fetch_places(client.get_ref(), cache.get_ref(), &query, categories).await?;

    if data.is_empty() {
        return Err(PlacesError::NoResults);
    }

    Ok(HttpResponse::Ok().json(data))
}

/// GET /api/hotels
pub async fn get_hotels(
    client: web::Data<GeoapifyClient>,
    cache: web::Data<Arc<PlacesCache>>,
    query: web::Query<PlacesQuery>,
) -> Result<impl Responder, PlacesError> {
    get_places(client, cache, query, CATEGORY_HOTELS).await
}

/// GET /api/restaurants
pub async fn get_restaurants(
    client: web::Data<GeoapifyClient>,
    cache: web::Data<Arc<PlacesCache>>,
    query: web::Query<PlacesQuery>,
) -> Result<impl Responder, PlacesError> {
    get_places(client, cache, query, CATEGORY_RESTAURANTS).await
}

/// GET /api/activities
pub async fn get_activities(
    client: web::Data<GeoapifyClient>,
    cache: web::Data<Arc<PlacesCache>>,
    query: web::Query<PlacesQuery>,
) -> Result<impl Responder, PlacesError> {
    get_places(client, cache, query, CATEGORY_ACTIVITIES).await
}

/// GET /api/malls
pub async fn get_malls(
    client: web::Data<GeoapifyClient>,
    cache: web::Data<Arc<PlacesCache>>,
    query: web::Query<PlacesQuery>,
) -> Result<impl Responder, PlacesError> {
    get_places(client, cache, query, CATEGORY_MALLS).await
}

/// Configuration for the category routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/hotels", web::get().to(get_hotels))
        .route("/restaurants", web::get().to(get_restaurants))
        .route("/activities", web::get().to(get_activities))
        .route("/malls", web::get().to(get_malls));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Place;
    use actix_web::{http::StatusCode, test, App};

    fn test_app_data() -> (web::Data<GeoapifyClient>, Arc<PlacesCache>) {
        (
            web::Data::new(GeoapifyClient::new("test-key".to_string())),
            Arc::new(PlacesCache::new(900)),
        )
    }

    #[actix_web::test]
    async fn test_missing_parameters_answer_400() {
        let (client, cache) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(client)
                .app_data(web::Data::new(cache))
                .service(web::scope("/api").configure(config)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/hotels").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(
            body["error"],
            "Missing required parameters: either location or lat/lng coordinates"
        );
    }

    #[actix_web::test]
    async fn test_out_of_range_coordinates_answer_400() {
        let (client, cache) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(client)
                .app_data(web::Data::new(cache))
                .service(web::scope("/api").configure(config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/restaurants?lat=91&lng=200")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_cached_result_served_as_200_json_array() {
        let (client, cache) = test_app_data();
        cache
            .set(
                PlacesCache::generate_key(48.8566, 2.3522, CATEGORY_HOTELS),
                vec![Place {
                    id: "p1".to_string(),
                    name: "Le Meurice".to_string(),
                    location: "228 Rue de Rivoli, Paris".to_string(),
                    type_field: "hotel".to_string(),
                }],
            )
            .await;

        let app = test::init_service(
            App::new()
                .app_data(client)
                .app_data(web::Data::new(cache))
                .service(web::scope("/api").configure(config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/hotels?lat=48.8566&lng=2.3522")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body[0]["id"], "p1");
        assert_eq!(body[0]["type"], "hotel");
    }

    #[actix_web::test]
    async fn test_empty_result_answers_404() {
        // An empty cached sequence exercises the zero-features path without
        // reaching upstream
        let (client, cache) = test_app_data();
        cache
            .set(
                PlacesCache::generate_key(48.8566, 2.3522, CATEGORY_ACTIVITIES),
                Vec::new(),
            )
            .await;

        let app = test::init_service(
            App::new()
                .app_data(client)
                .app_data(web::Data::new(cache))
                .service(web::scope("/api").configure(config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/activities?lat=48.8566&lng=2.3522")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "No results found");
    }
}
