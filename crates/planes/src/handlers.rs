use super::*;
use actix_web::HttpResponse;
use actix_web::web;
use serde_json::Value;

/// Mounts every flight endpoint onto an application.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/test-conn", web::get().to(test_conn))
        .route("/planes", web::get().to(list))
        .route("/planes", web::post().to(create))
        .route("/planes/{id}", web::get().to(find))
        .route("/planes/{id}", web::put().to(update))
        .route("/planes/{id}", web::delete().to(delete))
        .route("/total", web::get().to(total))
        .route("/is_late", web::get().to(total_late));
}

/// Path ids coerce like any other number; one that is not a 32-bit
/// integer can never match a row.
fn identify(path: &str) -> Result<i32, ApiError> {
    let number = loose::number(Some(&Value::from(path)));
    let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
    match number {
        Some(n) if n.fract() == 0.0 && range.contains(&n) => Ok(n as i32),
        _ => {
            log::info!("plane with id {} not found", path);
            Err(ApiError::NotFound(number.filter(|n| n.is_finite())))
        }
    }
}

fn validate(body: Option<web::Json<Value>>) -> Result<Draft, ApiError> {
    let body = body.map(web::Json::into_inner).unwrap_or(Value::Null);
    Draft::validate(body).map_err(|errors| {
        if let Some(first) = errors.first() {
            log::info!("rejected payload: {}", first.reason());
        }
        ApiError::Validation(errors)
    })
}

fn storage(e: StorageError) -> ApiError {
    log::error!("{}", e);
    ApiError::from(e)
}

pub async fn test_conn(hangar: web::Data<dyn Hangar>) -> Result<HttpResponse, ApiError> {
    let solution = hangar.solution().await.map_err(storage)?;
    log::info!("the solution is: {}", solution);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "solution": solution })))
}

pub async fn list(hangar: web::Data<dyn Hangar>) -> Result<HttpResponse, ApiError> {
    let rows = hangar.list().await.map_err(storage)?;
    log::info!("fetched all {} planes", rows.len());
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn find(
    hangar: web::Data<dyn Hangar>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = identify(&path)?;
    let rows = hangar.find(id).await.map_err(storage)?;
    match rows.first().map(FlightRecord::id) {
        Some(found) => {
            log::info!("fetched plane with id {}", found);
            Ok(HttpResponse::Ok().json(rows))
        }
        None => {
            log::info!("plane with id {} not found", id);
            Err(ApiError::NotFound(Some(f64::from(id))))
        }
    }
}

pub async fn create(
    hangar: web::Data<dyn Hangar>,
    body: Option<web::Json<Value>>,
) -> Result<HttpResponse, ApiError> {
    let draft = validate(body)?;
    let id = hangar.create(&draft).await.map_err(storage)?;
    let created = draft.echo(id);
    log::info!("created {}", created);
    Ok(HttpResponse::Created().json(created))
}

pub async fn update(
    hangar: web::Data<dyn Hangar>,
    path: web::Path<String>,
    body: Option<web::Json<Value>>,
) -> Result<HttpResponse, ApiError> {
    let draft = validate(body)?;
    let id = identify(&path)?;
    let affected = hangar.update(id, &draft).await.map_err(storage)?;
    log::info!("updated rows: {}", affected);
    match affected {
        0 => {
            log::info!("plane with id {} not found", id);
            Err(ApiError::NotFound(Some(f64::from(id))))
        }
        _ => Ok(HttpResponse::Created().json(draft.echo(id))),
    }
}

pub async fn delete(
    hangar: web::Data<dyn Hangar>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = identify(&path)?;
    let affected = hangar.delete(id).await.map_err(storage)?;
    log::info!("deleted rows: {}", affected);
    match affected {
        0 => Err(ApiError::NotFound(Some(f64::from(id)))),
        _ => Ok(HttpResponse::Ok().json(serde_json::json!({
            "id": id,
            "message": format!("Record with id {} deleted", id),
        }))),
    }
}

pub async fn total(hangar: web::Data<dyn Hangar>) -> Result<HttpResponse, ApiError> {
    let total = hangar.total().await.map_err(storage)?;
    log::info!("total planes: {}", total);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "total_planes": total })))
}

pub async fn total_late(hangar: web::Data<dyn Hangar>) -> Result<HttpResponse, ApiError> {
    let total = hangar.total_late().await.map_err(storage)?;
    log::info!("total late: {}", total);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "total_is_late": total })))
}
