use crate::gameroom::ServerMessage;
use crate::gameroom::SessionManager;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use serde::Deserialize;

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub async fn tables(manager: web::Data<SessionManager>) -> impl Responder {
    HttpResponse::Ok().json(manager.tables().await)
}

pub async fn table(
    manager: web::Data<SessionManager>,
    path: web::Path<String>,
) -> impl Responder {
    match manager.table(&path.into_inner()).await {
        Some(detail) => HttpResponse::Ok().json(detail),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "table not found" })),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTable {
    pub game: String,
    pub name: Option<String>,
    pub table_id: Option<String>,
}

pub async fn create_table(
    manager: web::Data<SessionManager>,
    body: web::Json<CreateTable>,
) -> impl Responder {
    let body = body.into_inner();
    match manager
        .create_table(&body.game, body.name, body.table_id)
        .await
    {
        Ok(info) => HttpResponse::Created().json(info),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub game: Option<String>,
    pub table: Option<String>,
    pub nick: Option<String>,
}

/// Upgrades the connection and hands it to the bridge task.
pub async fn ws(
    manager: web::Data<SessionManager>,
    query: web::Query<WsQuery>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let query = query.into_inner();
    let game = query.game.unwrap_or_else(|| "holdem".to_string());
    let table = query.table.unwrap_or_else(|| "new".to_string());
    let nick = query.nick.unwrap_or_else(|| "guest".to_string());
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            actix_web::rt::spawn(bridge(manager, game, table, nick, session, stream));
            response
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Pumps frames between the websocket and the session manager until either
/// side drops. Outbound state is drained with priority so clients observe
/// transitions in order.
async fn bridge(
    manager: web::Data<SessionManager>,
    game: String,
    table: String,
    nick: String,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    use futures::StreamExt;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let (table_id, conn) = match manager.connect(&game, &table, &nick, tx).await {
        Ok(attached) => attached,
        Err(e) => {
            let _ = session
                .text(ServerMessage::error(&e.to_string()).to_json())
                .await;
            let _ = session.close(None).await;
            return;
        }
    };
    log::debug!("[bridge {}] {} connected", table_id, nick);
    'sesh: loop {
        tokio::select! {
            biased;
            msg = rx.recv() => match msg {
                Some(json) => if session.text(json).await.is_err() { break 'sesh },
                None => break 'sesh,
            },
            msg = stream.next() => match msg {
                Some(Ok(actix_ws::Message::Text(text))) => manager.dispatch(&table_id, conn, &text).await,
                Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                Some(Err(_)) => break 'sesh,
                None => break 'sesh,
                _ => continue 'sesh,
            },
        }
    }
    manager.disconnect(&table_id, conn).await;
    log::debug!("[bridge {}] {} disconnected", table_id, nick);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use actix_web::App;
    use actix_web::http::StatusCode;
    use actix_web::test;

    macro_rules! app {
        ($manager:expr) => {
            test::init_service(
                App::new()
                    .app_data($manager)
                    .route("/health", web::get().to(health))
                    .service(
                        web::scope("/api")
                            .route("/tables", web::get().to(tables))
                            .route("/tables", web::post().to(create_table))
                            .route("/tables/{table_id}", web::get().to(table)),
                    ),
            )
        };
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let manager = web::Data::new(SessionManager::new(Config::default()));
        let app = app!(manager).await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn table_admin_round_trip() {
        let manager = web::Data::new(SessionManager::new(Config::default()));
        let app = app!(manager).await;
        let create = test::TestRequest::post()
            .uri("/api/tables")
            .set_json(serde_json::json!({"game": "holdem", "table_id": "t1"}))
            .to_request();
        let resp = test::call_service(&app, create).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let duplicate = test::TestRequest::post()
            .uri("/api/tables")
            .set_json(serde_json::json!({"game": "holdem", "table_id": "t1"}))
            .to_request();
        let resp = test::call_service(&app, duplicate).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/tables").to_request())
                .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body.as_array().map(|t| t.len()), Some(1));

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/tables/t1").to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], "t1");
        assert_eq!(body["game"], "holdem");
        assert_eq!(body["max_players"], 9);
        assert_eq!(body["player_count"], 0);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/tables/nope").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
