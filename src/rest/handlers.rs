use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{service, storage::Storage};

use super::{
    error::ApiError,
    models::{
        ClientResponse, CountryResponse, CreateRepairRequest, ErrorResponse, HealthResponse,
        MachineResponse, MachineTypeResponse, RepairResponse, RepairTypeResponse, RootResponse,
    },
    AppState,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "Maintenance API is running".to_string(),
    })
}

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn list_clients<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<ClientResponse>> {
    let clients = state.storage.list_clients()?;
    Ok(Json(clients.into_iter().map(Into::into).collect()))
}

pub async fn list_countries<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<CountryResponse>> {
    let countries = state.storage.list_countries()?;
    Ok(Json(countries.into_iter().map(Into::into).collect()))
}

pub async fn list_machine_types<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<MachineTypeResponse>> {
    let machine_types = state.storage.list_machine_types()?;
    Ok(Json(machine_types.into_iter().map(Into::into).collect()))
}

pub async fn list_machines<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<MachineResponse>> {
    let machines = state.storage.list_machines()?;
    Ok(Json(machines.into_iter().map(Into::into).collect()))
}

pub async fn list_repair_types<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<RepairTypeResponse>> {
    let repair_types = state.storage.list_repair_types()?;
    Ok(Json(repair_types.into_iter().map(Into::into).collect()))
}

pub async fn list_repairs<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<RepairResponse>> {
    let repairs = state.storage.list_repairs()?;
    Ok(Json(repairs.into_iter().map(Into::into).collect()))
}

pub async fn create_repair<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<CreateRepairRequest>,
) -> ApiResult<RepairResponse> {
    let repair = service::create_repair(&state.storage, request.into())?;
    Ok(Json(repair.into()))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::rest::router;
    use crate::storage::{
        NewClient, NewCountry, NewMachine, NewMachineType, NewRepairType, SqliteStorage,
        StorageRead,
    };

    struct Fixture {
        _dir: TempDir,
        storage: SqliteStorage,
        machine_id: i64,
        repair_type_id: i64,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let storage = SqliteStorage::new(dir.path().join("maintenance.sqlite"));
        storage.init().unwrap();

        let country = service::create_country(
            &storage,
            NewCountry {
                name: "Switzerland".into(),
            },
        )
        .unwrap();
        let machine_type = service::create_machine_type(
            &storage,
            NewMachineType {
                country_id: country.id,
                year_of_manufacture: 2021,
                brand: "Mikron".into(),
            },
        )
        .unwrap();
        let client = service::create_client(
            &storage,
            NewClient {
                name: "Precision Parts".into(),
                address: Some("Harbour Road 12".into()),
            },
        )
        .unwrap();
        let machine = service::create_machine(
            &storage,
            NewMachine {
                machine_type_id: machine_type.id,
                client_id: client.id,
                serial_number: "SN-001".into(),
            },
        )
        .unwrap();
        let repair_type = service::create_repair_type(
            &storage,
            NewRepairType {
                name: "Axis recalibration".into(),
                duration_days: 2,
                cost: "420.00".parse().unwrap(),
                notes: None,
            },
        )
        .unwrap();

        Fixture {
            _dir: dir,
            storage,
            machine_id: machine.id,
            repair_type_id: repair_type.id,
        }
    }

    fn app(fixture: &Fixture) -> Router {
        router(fixture.storage.clone())
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn post_json(app: Router, uri: &str, body: String) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_running() {
        let fixture = fixture();
        let response = get(app(&fixture), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload: RootResponse = read_json(response).await;
        assert_eq!(payload.message, "Maintenance API is running");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let fixture = fixture();
        let response = get(app(&fixture), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload: HealthResponse = read_json(response).await;
        assert_eq!(payload.status, "ok");
    }

    #[tokio::test]
    async fn list_clients_returns_stored_clients() {
        let fixture = fixture();
        let response = get(app(&fixture), "/clients").await;
        assert_eq!(response.status(), StatusCode::OK);

        let clients: Vec<ClientResponse> = read_json(response).await;
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].name, "Precision Parts");
        assert_eq!(clients[0].address.as_deref(), Some("Harbour Road 12"));
    }

    #[tokio::test]
    async fn list_reference_tables() {
        let fixture = fixture();

        let countries: Vec<CountryResponse> =
            read_json(get(app(&fixture), "/countries").await).await;
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].name, "Switzerland");

        let machine_types: Vec<MachineTypeResponse> =
            read_json(get(app(&fixture), "/machine-types").await).await;
        assert_eq!(machine_types.len(), 1);
        assert_eq!(machine_types[0].brand, "Mikron");
        assert_eq!(machine_types[0].year_of_manufacture, 2021);

        let response = get(app(&fixture), "/repair-types").await;
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let raw: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(raw[0]["cost"], "420.00");
        assert_eq!(raw[0]["duration_days"], 2);
    }

    #[tokio::test]
    async fn create_repair_returns_record_and_bumps_machine_counter() {
        let fixture = fixture();
        let body = format!(
            r#"{{"machine_id": {}, "repair_type_id": {}, "start_date": "2024-01-01"}}"#,
            fixture.machine_id, fixture.repair_type_id
        );

        let response = post_json(app(&fixture), "/repairs", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let created: RepairResponse = read_json(response).await;
        assert_eq!(created.id, 1);
        assert_eq!(created.machine_id, fixture.machine_id);
        assert_eq!(created.repair_type_id, fixture.repair_type_id);
        assert_eq!(
            created.start_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(created.end_date, None);
        assert_eq!(created.notes, None);

        let machines: Vec<MachineResponse> =
            read_json(get(app(&fixture), "/machines").await).await;
        assert_eq!(machines.len(), 1);
        assert_eq!(machines[0].serial_number, "SN-001");
        assert_eq!(machines[0].repair_count, 1);

        let repairs: Vec<RepairResponse> = read_json(get(app(&fixture), "/repairs").await).await;
        assert_eq!(repairs, vec![created]);
    }

    #[tokio::test]
    async fn create_repair_round_trips_optional_fields() {
        let fixture = fixture();
        let body = format!(
            r#"{{"machine_id": {}, "repair_type_id": {}, "start_date": "2024-03-04", "end_date": "2024-03-06", "notes": "replaced encoder"}}"#,
            fixture.machine_id, fixture.repair_type_id
        );

        let response = post_json(app(&fixture), "/repairs", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let created: RepairResponse = read_json(response).await;
        assert_eq!(
            created.end_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
        );
        assert_eq!(created.notes.as_deref(), Some("replaced encoder"));
    }

    #[tokio::test]
    async fn create_repair_for_unknown_machine_is_not_found() {
        let fixture = fixture();
        let body = format!(
            r#"{{"machine_id": 99999, "repair_type_id": {}, "start_date": "2024-01-01"}}"#,
            fixture.repair_type_id
        );

        let response = post_json(app(&fixture), "/repairs", body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload: ErrorResponse = read_json(response).await;
        assert_eq!(payload.message, "machine 99999 not found");

        assert!(fixture.storage.list_repairs().unwrap().is_empty());
        assert_eq!(fixture.storage.list_machines().unwrap()[0].repair_count, 0);
    }

    #[tokio::test]
    async fn create_repair_with_unknown_repair_type_is_server_error() {
        let fixture = fixture();
        let body = format!(
            r#"{{"machine_id": {}, "repair_type_id": 31337, "start_date": "2024-01-01"}}"#,
            fixture.machine_id
        );

        let response = post_json(app(&fixture), "/repairs", body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload: ErrorResponse = read_json(response).await;
        assert_eq!(payload.message, "internal server error");
        assert_eq!(fixture.storage.list_machines().unwrap()[0].repair_count, 0);
    }

    #[tokio::test]
    async fn create_repair_rejects_malformed_body() {
        let fixture = fixture();
        let response = post_json(
            app(&fixture),
            "/repairs",
            r#"{"machine_id": 1, "start_date": "not-a-date"}"#.to_string(),
        )
        .await;
        assert!(response.status().is_client_error());
        assert!(fixture.storage.list_repairs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn trailing_slash_paths_are_served() {
        let fixture = fixture();
        let body = format!(
            r#"{{"machine_id": {}, "repair_type_id": {}, "start_date": "2024-05-02"}}"#,
            fixture.machine_id, fixture.repair_type_id
        );

        let response = post_json(app(&fixture), "/repairs/", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let created: RepairResponse = read_json(response).await;

        let clients: Vec<ClientResponse> = read_json(get(app(&fixture), "/clients/").await).await;
        assert_eq!(clients.len(), 1);
        let machines: Vec<MachineResponse> =
            read_json(get(app(&fixture), "/machines/").await).await;
        assert_eq!(machines[0].repair_count, 1);
        let repairs: Vec<RepairResponse> = read_json(get(app(&fixture), "/repairs/").await).await;
        assert_eq!(repairs, vec![created]);
    }

    #[tokio::test]
    async fn unknown_endpoint_is_not_found() {
        let fixture = fixture();
        let response = get(app(&fixture), "/warehouses").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload: ErrorResponse = read_json(response).await;
        assert_eq!(payload.message, "endpoint not found");
    }
}
