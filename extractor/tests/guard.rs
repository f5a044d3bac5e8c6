use actix_web::{App, HttpResponse, http::StatusCode, test, web};
use common::{
    env_config::JwtConfig,
    jwt::{ADMIN_ROLE, TokenRequest, JwtClaims, generate_jwt},
};
use uuid::Uuid;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "guard-test-secret".to_string(),
        expiration_hours: 1,
    }
}

fn token(role: &str) -> String {
    generate_jwt(
        TokenRequest {
            user_id: Uuid::new_v4(),
            role: role.to_string(),
        },
        &jwt_config(),
    )
    .unwrap()
}

async fn whoami(claims: web::ReqData<JwtClaims>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "role": claims.role }))
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(jwt_config()))
                .wrap(extractor::middleware())
                .service(
                    web::scope("/user")
                        .wrap(extractor::auth_middleware())
                        .route("", web::get().to(whoami)),
                )
                .service(
                    web::scope("/admin")
                        .wrap(extractor::admin_middleware())
                        .route("", web::get().to(whoami)),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let app = app!();
    let res = test::call_service(&app, test::TestRequest::get().uri("/user").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn garbage_token_is_unauthorized() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/user")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn user_token_reaches_user_scope() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/user")
        .insert_header(("Authorization", format!("Bearer {}", token("user"))))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "user");
}

#[actix_web::test]
async fn user_token_is_forbidden_on_admin_scope() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {}", token("user"))))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_token_reaches_admin_scope() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {}", token(ADMIN_ROLE))))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}
