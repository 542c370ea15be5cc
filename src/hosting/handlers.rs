use crate::Multiplier;
use crate::Sampler;
use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use actix_web::web;
use serde::Serialize;

/// Wire envelope for a single draw.
#[derive(Debug, Serialize)]
struct Envelope {
    result: Multiplier,
}

/// Mounts the multiplier endpoint.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/get", web::get().to(get));
}

pub async fn get(sampler: web::Data<Sampler>) -> HttpResponse {
    let multiplier = sampler.sample();
    let response = respond(&Envelope { result: multiplier });
    log::info!("sampled multiplier {}", multiplier);
    response
}

/// The 200 status and JSON content type are committed before encoding,
/// so an encoding failure leaves the caller with an empty body.
fn respond<T>(body: &T) -> HttpResponse
where
    T: Serialize,
{
    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::json());
    match encode(body) {
        Ok(bytes) => response.body(bytes),
        Err(e) => {
            log::error!("failed to encode response: {}", e);
            response.finish()
        }
    }
}

/// Newline-terminated JSON, one document per response.
fn encode<T>(body: &T) -> serde_json::Result<Vec<u8>>
where
    T: Serialize,
{
    let mut bytes = serde_json::to_vec(body)?;
    bytes.push(b'\n');
    Ok(bytes)
}
