//! Map search endpoints: actions by country, nearby locations and combined
//! text/country search.

use axum::extract::State;
use axum::Json;
use database::geo::{self, Nearby};
use database::search::{self, SearchFilter};
use database::{action, Action, Resource};
use geo_core::{country, geo::validate_radius, GeoPoint};
use serde::{Deserialize, Serialize};

use super::params::{self, PageQuery};
use super::{ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountryActions {
    pub actions: Vec<Action>,
    pub count: usize,
    pub country: String,
    pub searched_variations: Vec<String>,
}

/// `GET /api/get_actions_by_country.php?country=`
pub async fn actions_by_country(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountryQuery>,
) -> Result<Json<Success<CountryActions>>> {
    let Some(requested) = params::text(query.country.as_deref()) else {
        return Err(ApiError::Validation("Country parameter is required".to_string()));
    };

    let searched_variations = country::variants(requested);
    let actions = action::list_by_country(state.db.pool(), &searched_variations).await?;

    tracing::debug!(
        country = requested,
        variations = searched_variations.len(),
        found = actions.len(),
        "Actions by country"
    );

    Ok(ok(CountryActions {
        count: actions.len(),
        actions,
        country: requested.to_string(),
        searched_variations,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Counts {
    pub actions: i64,
    pub resources: i64,
    pub total: i64,
}

impl Counts {
    fn new(actions: i64, resources: i64) -> Self {
        Self {
            actions,
            resources,
            total: actions + resources,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NearbyLocations {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub actions: Vec<Nearby<Action>>,
    pub resources: Vec<Nearby<Resource>>,
    pub counts: Counts,
}

/// `GET /api/get_nearby_locations.php?lat=&lng=&radius=&limit=`
pub async fn nearby_locations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NearbyQuery>,
) -> Result<Json<Success<NearbyLocations>>> {
    let lat = params::number::<f64>("lat", query.lat.as_deref())?;
    let lng = params::number::<f64>("lng", query.lng.as_deref())?;
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(ApiError::Validation(
            "Latitude and longitude are required".to_string(),
        ));
    };
    let center = GeoPoint::new(lat, lng)?;

    let radius_km = params::number::<f64>("radius", query.radius.as_deref())?
        .unwrap_or(state.limits.default_radius_km);
    let radius_km = validate_radius(radius_km)?;
    let limit = params::resolve_limit(&state.limits, query.limit.as_deref())? as usize;

    let actions = geo::nearby_actions(state.db.pool(), &center, radius_km, limit).await?;
    let resources = geo::nearby_resources(state.db.pool(), &center, radius_km, limit).await?;

    Ok(ok(NearbyLocations {
        center,
        radius_km,
        counts: Counts::new(actions.len() as i64, resources.len() as i64),
        actions,
        resources,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub country: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub actions: Vec<Action>,
    pub resources: Vec<Resource>,
    pub counts: Counts,
    pub pagination: Pagination,
}

/// `GET /api/search_by_location.php?search=&country=&limit=&offset=`
pub async fn search_by_location(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Success<SearchResults>>> {
    let text = params::text(query.search.as_deref());
    let requested_country = params::text(query.country.as_deref());

    if text.is_none() && requested_country.is_none() {
        return Err(ApiError::Validation(
            "Provide a search term or a country".to_string(),
        ));
    }

    let (limit, offset) = query.page.resolve(&state.limits)?;
    let filter = SearchFilter {
        text: text.map(String::from),
        countries: requested_country.map(country::variants).unwrap_or_default(),
    };

    let actions = search::search_actions(state.db.pool(), &filter, limit, offset).await?;
    let resources = search::search_resources(state.db.pool(), &filter, limit, offset).await?;

    let counts = Counts::new(actions.total, resources.total);
    let has_more = offset.saturating_add(limit) < actions.total.max(resources.total);

    Ok(ok(SearchResults {
        actions: actions.items,
        resources: resources.items,
        pagination: Pagination {
            limit,
            offset,
            total: counts.total,
            has_more,
        },
        counts,
    }))
}
