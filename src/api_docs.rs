use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::health::health_check),
    tags(
        (name = "shopacc", description = "Game account marketplace API")
    )
)]
pub struct ApiDoc;
