use crate::error::NotelyError;
use actix_web::HttpRequest;
use notely_infra::NotelyContext;

pub const DISPATCH_KEY_HEADER: &str = "x-dispatch-key";

/// Guards the dispatch trigger route. When a dispatch key is configured
/// the external cron scheduler has to present it, otherwise the route is
/// open. Nothing else is known about the caller, there are no user
/// credentials on this route.
pub fn protect_dispatch_route(req: &HttpRequest, ctx: &NotelyContext) -> Result<(), NotelyError> {
    let expected_key = match &ctx.config.dispatch_key {
        Some(key) => key,
        None => return Ok(()),
    };

    match req.headers().get(DISPATCH_KEY_HEADER) {
        Some(given_key) => match given_key.to_str() {
            Ok(given_key) if given_key == expected_key => Ok(()),
            Ok(_) => Err(NotelyError::Unauthorized(format!(
                "Invalid dispatch key provided in {} header",
                DISPATCH_KEY_HEADER
            ))),
            Err(_) => Err(NotelyError::Unauthorized(
                "Malformed dispatch key provided".to_string(),
            )),
        },
        None => Err(NotelyError::Unauthorized(format!(
            "Unable to find dispatch key in {} header",
            DISPATCH_KEY_HEADER
        ))),
    }
}
