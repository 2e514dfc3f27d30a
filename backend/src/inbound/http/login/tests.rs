//! Handler-level coverage for login and the protected endpoint.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FixtureUserDirectory, MockAuthenticationStrategy, MockUserDirectory, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{AuthResult, Email, Error, PasswordHash, User, UserId};
use crate::inbound::http::pages::home;
use crate::inbound::http::protected::auth_required;
use crate::inbound::http::test_utils::TestSessions;

#[fixture]
fn user() -> User {
    User::new(
        UserId::new("2f24vvg").expect("id"),
        Email::new("test@test.com").expect("email"),
        PasswordHash::new("hash"),
    )
}

fn strategy_returning(result: AuthResult) -> MockAuthenticationStrategy {
    let mut strategy = MockAuthenticationStrategy::new();
    strategy.expect_name().return_const("mock");
    strategy
        .expect_verify()
        .times(1)
        .returning(move |_| result.clone());
    strategy
}

fn build_state(
    strategy: MockAuthenticationStrategy,
    directory: impl UserDirectory + 'static,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(Arc::new(strategy), Arc::new(directory)))
}

macro_rules! init_app {
    ($sessions:expr, $state:expr) => {
        test::init_service(
            $sessions
                .app()
                .app_data($state)
                .service(home)
                .service(login)
                .service(auth_required),
        )
        .await
    };
}

fn form(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

fn location(res: &ServiceResponse) -> &str {
    res.headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

#[rstest]
#[case(AuthFailure::UnknownEmail, "Invalid credentials. No email address.\n")]
#[case(AuthFailure::WrongPassword, "Invalid credentials. Wrong Password.\n")]
#[actix_web::test]
async fn rejected_logins_answer_200_with_reason(
    #[case] failure: AuthFailure,
    #[case] expected: &str,
) {
    let sessions = TestSessions::new();
    let state = build_state(
        strategy_returning(Ok(AuthOutcome::Failure(failure))),
        FixtureUserDirectory::default(),
    );
    let app = init_app!(sessions, state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form(form("nobody@test.com", "password"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, expected);
}

#[rstest]
#[case(form("", "password"))]
#[case(form("test@test.com", ""))]
#[actix_web::test]
async fn blank_fields_are_missing_credentials(#[case] request: LoginRequest) {
    let sessions = TestSessions::new();
    let mut strategy = MockAuthenticationStrategy::new();
    strategy.expect_verify().times(0);
    let state = build_state(strategy, FixtureUserDirectory::default());
    let app = init_app!(sessions, state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form(request)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "Missing credentials");
}

#[rstest]
#[actix_web::test]
async fn empty_body_is_missing_credentials() {
    let sessions = TestSessions::new();
    let mut strategy = MockAuthenticationStrategy::new();
    strategy.expect_verify().times(0);
    let state = build_state(strategy, FixtureUserDirectory::default());
    let app = init_app!(sessions, state);

    let res =
        test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "Missing credentials");
}

#[rstest]
#[actix_web::test]
async fn strategy_errors_use_the_error_handler() {
    let sessions = TestSessions::new();
    let state = build_state(
        strategy_returning(Err(Error::service_unavailable("user directory unavailable"))),
        FixtureUserDirectory::default(),
    );
    let app = init_app!(sessions, state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(form("test@test.com", "password"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.message(), "user directory unavailable");
}

#[rstest]
#[actix_web::test]
async fn successful_form_login_redirects_and_unlocks_protected_route(user: User) {
    let sessions = TestSessions::new();
    let state = build_state(
        strategy_returning(Ok(AuthOutcome::Success(user.clone()))),
        FixtureUserDirectory::new(vec![user]),
    );
    let app = init_app!(sessions, state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form(form("test@test.com", "password"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), AUTH_REQUIRED_PATH);
    let cookie = session_cookie(&res);

    for _ in 0..2 {
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(AUTH_REQUIRED_PATH)
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            test::read_body(res).await,
            "you hit the authentication endpoint\n"
        );
    }
}

#[rstest]
#[actix_web::test]
async fn successful_json_login_persists_the_user_id(user: User) {
    let sessions = TestSessions::new();
    let state = build_state(
        strategy_returning(Ok(AuthOutcome::Success(user.clone()))),
        FixtureUserDirectory::new(vec![user]),
    );
    let app = init_app!(sessions, state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(form("test@test.com", "password"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(sessions.record_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn protected_route_without_cookie_redirects_home() {
    let sessions = TestSessions::new();
    let state = build_state(
        MockAuthenticationStrategy::new(),
        FixtureUserDirectory::default(),
    );
    let app = init_app!(sessions, state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri(AUTH_REQUIRED_PATH).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn removed_user_is_unauthenticated(user: User) {
    let sessions = TestSessions::new();
    let state = build_state(
        strategy_returning(Ok(AuthOutcome::Success(user))),
        FixtureUserDirectory::default(),
    );
    let app = init_app!(sessions, state);

    let login_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form(form("test@test.com", "password"))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(AUTH_REQUIRED_PATH)
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn directory_fault_during_restore_is_unauthenticated(user: User) {
    let sessions = TestSessions::new();
    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_by_id()
        .returning(|_| Err(UserDirectoryError::transport("connection refused")));
    let state = build_state(
        strategy_returning(Ok(AuthOutcome::Success(user))),
        directory,
    );
    let app = init_app!(sessions, state);

    let login_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form(form("test@test.com", "password"))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(AUTH_REQUIRED_PATH)
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn forged_cookie_is_unauthenticated() {
    let sessions = TestSessions::new();
    let state = build_state(
        MockAuthenticationStrategy::new(),
        FixtureUserDirectory::default(),
    );
    let app = init_app!(sessions, state);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(AUTH_REQUIRED_PATH)
            .cookie(Cookie::new("session", "not-a-sealed-value"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn session_user_is_only_restored_by_routes_that_need_it(user: User) {
    let sessions = TestSessions::new();
    let restored = user.clone();
    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_by_id()
        .times(1)
        .returning(move |_| Ok(Some(restored.clone())));
    let state = build_state(
        strategy_returning(Ok(AuthOutcome::Success(user))),
        directory,
    );
    let app = init_app!(sessions, state);

    let login_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form(form("test@test.com", "password"))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res);

    let home_res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(home_res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(AUTH_REQUIRED_PATH)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
