use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{accounts, cards, debts, envelopes, goals, recurring, transactions, wishlist};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/envelopes", get(envelopes::list).post(envelopes::configure))
        .route("/envelopes/distribute", post(envelopes::distribute))
        .route("/envelopes/{id}", axum::routing::delete(envelopes::remove))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/summary", get(transactions::summary))
        .route(
            "/transactions/{id}",
            axum::routing::patch(transactions::update).delete(transactions::remove),
        )
        .route("/debts", get(debts::list).post(debts::create))
        .route("/debts/summary", get(debts::summary))
        .route("/debts/{id}", axum::routing::delete(debts::remove))
        .route("/debts/{id}/status", axum::routing::patch(debts::update_status))
        .route("/debts/{id}/amortize", post(debts::amortize))
        .route("/debts/{id}/amortizations", get(debts::list_amortizations))
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/summary", get(goals::summary))
        .route(
            "/goals/{id}",
            axum::routing::put(goals::update).delete(goals::remove),
        )
        .route("/goals/{id}/contribute", post(goals::contribute))
        .route("/goals/{id}/contributions", get(goals::list_contributions))
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/{id}",
            axum::routing::put(accounts::update).delete(accounts::remove),
        )
        .route("/cards", get(cards::list).post(cards::create))
        .route(
            "/cards/{id}",
            axum::routing::patch(cards::set_active).delete(cards::remove),
        )
        .route("/cards/{id}/invoices", get(cards::list_invoices))
        .route("/cards/{id}/invoices/current", get(cards::current_invoice))
        .route(
            "/cards/{card_id}/invoices/{invoice_id}/charge",
            post(cards::charge_invoice),
        )
        .route(
            "/cards/{card_id}/invoices/{invoice_id}/pay",
            post(cards::pay_invoice),
        )
        .route("/wishlist", get(wishlist::list).post(wishlist::create))
        .route(
            "/wishlist/{id}",
            axum::routing::put(wishlist::update).delete(wishlist::remove),
        )
        .route("/wishlist/{id}/purchase", post(wishlist::purchase))
        .route("/recurring", get(recurring::list).post(recurring::create))
        .route(
            "/recurring/{id}",
            axum::routing::put(recurring::update).delete(recurring::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn basic_auth() -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("alice:password")
        )
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_credentials_are_rejected() {
        let app = test_router().await;
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/envelopes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(res.status().is_client_error());
    }

    #[tokio::test]
    async fn wrong_credentials_are_unauthorized() {
        let app = test_router().await;
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/envelopes")
                    .header(
                        header::AUTHORIZATION,
                        format!(
                            "Basic {}",
                            base64::engine::general_purpose::STANDARD.encode("alice:wrong")
                        ),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn configure_and_distribute_through_http() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/envelopes",
                serde_json::json!({
                    "month": "2025-03",
                    "envelopes": [
                        {"name": "Custos", "target_percent": 55},
                        {"name": "Lazer", "target_percent": 45},
                    ],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/envelopes/distribute",
                serde_json::json!({"amount_cents": 100_000, "month": "2025-03"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let envelopes = body["envelopes"].as_array().unwrap();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0]["name"], "Custos");
        assert_eq!(envelopes[0]["allocated_cents"], 55_000);
        assert_eq!(envelopes[1]["allocated_cents"], 45_000);
    }

    #[tokio::test]
    async fn distribute_without_envelopes_is_unprocessable() {
        let app = test_router().await;
        let res = app
            .oneshot(json_request(
                "POST",
                "/envelopes/distribute",
                serde_json::json!({"amount_cents": 100_000, "month": "2025-03"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
