use crate::config::ConfigUpdate;
use crate::control::command::CommandKind;
use crate::presentation::StatusBoard;
use crate::session::{SessionEvent, SessionHandle};
use actix_web::{delete, get, post, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};

/// Shared by every worker: the way in (session events) and the way out (status board).
#[derive(Debug, Clone)]
pub struct ControlState {
    pub session: SessionHandle,
    pub board: StatusBoard,
}

async fn forward(state: &ControlState, event: SessionEvent) -> HttpResponse {
    match state.session.send(event).await {
        Ok(()) => HttpResponse::Accepted().finish(),
        Err(e) => {
            warn!("Dropping request: {}", e);
            HttpResponse::ServiceUnavailable().body(e.to_string())
        }
    }
}

#[get("/status")]
async fn status(state: web::Data<ControlState>) -> impl Responder {
    HttpResponse::Ok().json(state.board.snapshot())
}

#[post("/camera/start")]
async fn camera_start(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::StartCamera).await
}

#[post("/camera/stop")]
async fn camera_stop(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::StopCamera).await
}

#[post("/detection/start")]
async fn detection_start(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::StartDetection).await
}

#[post("/detection/stop")]
async fn detection_stop(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::StopDetection).await
}

#[post("/detection/toggle")]
async fn detection_toggle(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::ToggleDetection).await
}

#[post("/link/connect")]
async fn link_connect(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::Connect).await
}

#[post("/link/disconnect")]
async fn link_disconnect(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::Disconnect).await
}

#[post("/command/{kind}")]
async fn command(state: web::Data<ControlState>, kind: web::Path<String>) -> impl Responder {
    match kind.parse::<CommandKind>() {
        Ok(kind) => forward(&state, SessionEvent::Manual(kind)).await,
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

#[put("/config")]
async fn update_config(state: web::Data<ControlState>, update: web::Json<ConfigUpdate>) -> impl Responder {
    forward(&state, SessionEvent::UpdateConfig(update.into_inner())).await
}

#[delete("/log")]
async fn clear_log(state: web::Data<ControlState>) -> impl Responder {
    forward(&state, SessionEvent::ClearLog).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(status)
        .service(camera_start)
        .service(camera_stop)
        .service(detection_start)
        .service(detection_stop)
        .service(detection_toggle)
        .service(link_connect)
        .service(link_disconnect)
        .service(command)
        .service(update_config)
        .service(clear_log);
}

pub async fn serve(bind: &str, state: ControlState) -> std::io::Result<()> {
    info!("Control surface listening on {}", bind);
    let data = web::Data::new(state);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}
