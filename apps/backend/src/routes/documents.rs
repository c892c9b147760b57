use actix_web::{web, HttpRequest, HttpResponse};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::headers::required_header;
use crate::middleware::auth_gate::AuthGate;
use crate::routes::body_value;
use crate::state::app_state::AppState;

/// Name under which the pipeline files a document: the owner's id as a
/// directory and the SHA-256 of id and filename as the file name. The
/// pipeline already holds files under these names, so the digest is fixed.
pub fn storage_name(user_id: i64, filename: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.to_string().as_bytes());
    hasher.update(filename.as_bytes());
    format!("{user_id}/{}", hex::encode(hasher.finalize()))
}

async fn upload_file(
    req: HttpRequest,
    user: CurrentUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let filename = required_header(&req, "x-filename")?;
    let title = required_header(&req, "title")?;
    let stored_as = storage_name(user.identity, &filename);

    let upstream = app_state
        .gateway
        .upload_document(user.identity, &title, &stored_as, body)
        .await?;
    if !upstream.is_success() {
        return Ok(upstream.into_http_response());
    }

    app_state
        .store
        .add_document(user.identity, &filename, &stored_as)
        .await?;
    info!(user_id = user.identity, storage_name = %stored_as, "document uploaded");

    Ok(HttpResponse::Ok().body("Upload successful"))
}

async fn list_documents(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let documents = app_state.store.list_documents(user.identity).await?;
    Ok(HttpResponse::Ok().json(documents))
}

async fn delete_document(
    user: CurrentUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let stored_as = body_value(&body, "storage name")?;

    let owned = app_state
        .store
        .list_documents(user.identity)
        .await?
        .iter()
        .any(|d| d.storage_name == stored_as);
    if !owned {
        return Err(AppError::not_found(
            ErrorCode::DocumentNotFound,
            "No such document for this user",
        ));
    }

    let upstream = app_state
        .gateway
        .delete_document(user.identity, stored_as)
        .await?;
    if !upstream.is_success() {
        return Ok(upstream.into_http_response());
    }

    app_state
        .store
        .delete_document(user.identity, stored_as)
        .await?;
    info!(user_id = user.identity, storage_name = %stored_as, "document deleted");

    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/upload/file")
            .wrap(AuthGate::standard())
            .route(web::post().to(upload_file)),
    )
    .service(
        web::resource("/api/get/documents")
            .wrap(AuthGate::standard())
            .route(web::get().to(list_documents)),
    )
    .service(
        web::resource("/api/delete/document")
            .wrap(AuthGate::standard())
            .route(web::delete().to(delete_document)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_name_is_scoped_by_owner() {
        let a = storage_name(7, "report.pdf");
        assert!(a.starts_with("7/"));
        assert_eq!(a.len(), 2 + 64);
        assert_eq!(a, storage_name(7, "report.pdf"));
        assert_ne!(a, storage_name(8, "report.pdf"));
        assert_ne!(a, storage_name(7, "other.pdf"));
    }

    #[test]
    fn storage_name_digest_covers_concatenation() {
        let expected = hex::encode(Sha256::digest(b"12notes.txt"));
        assert_eq!(storage_name(12, "notes.txt"), format!("12/{expected}"));
    }
}
