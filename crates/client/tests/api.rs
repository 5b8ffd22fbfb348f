use aula_client::{
    course::{Level, SearchCriteria},
    review::ReviewDraft,
    AuthError, Client, CourseId, Endpoints, Error, LessonId,
};
use mockito::{Matcher, Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;

const TOKEN_PATH: &str = "/realms/aula/protocol/openid-connect/token";

fn client_for(server: &ServerGuard) -> Client {
    Client::new(
        Endpoints {
            gateway: server.url(),
            issuer: format!("{}/realms/aula", server.url()),
            client_id: "aula-tui".to_string(),
        },
        ("ana".to_string(), "secret".to_string().into()),
    )
}

fn token_mock(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "tok", "refresh_token": "ref", "token_type": "Bearer"}"#)
        .expect(hits)
        .create()
}

#[test]
fn logs_in_with_password_grant() {
    let mut server = Server::new();
    let token = server
        .mock("POST", TOKEN_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "password".into()),
            Matcher::UrlEncoded("username".into(), "ana".into()),
            Matcher::UrlEncoded("password".into(), "secret".into()),
            Matcher::UrlEncoded("client_id".into(), "aula-tui".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "tok", "refresh_token": "ref"}"#)
        .create();

    let client = client_for(&server);
    client.login().unwrap();

    token.assert();
    assert!(client.auth_state().is_authenticated());
}

#[test]
fn bad_credentials_are_reported() {
    let mut server = Server::new();
    let _token = server
        .mock("POST", TOKEN_PATH)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "invalid_grant", "error_description": "Invalid user credentials"}"#)
        .create();

    let client = client_for(&server);
    assert!(matches!(client.login(), Err(AuthError::LoginFailed)));
}

#[test]
fn courses_are_fetched_with_bearer_token() {
    let mut server = Server::new();
    let token = token_mock(&mut server, 1);
    let courses = server
        .mock("GET", "/cursos")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"idCurso": 1, "titulo": "Rust"}, {"id_curso": 2, "titulo": "Go"}]"#)
        .create();

    let client = client_for(&server);
    let got = client.courses().unwrap();

    token.assert();
    courses.assert();
    assert_eq!(
        got.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![Some(CourseId(1)), Some(CourseId(2))]
    );
}

#[test]
fn rejected_token_is_refreshed_once() {
    let mut server = Server::new();
    let token = token_mock(&mut server, 2);
    let rejected = server
        .mock("GET", "/cursos")
        .with_status(401)
        .create();
    let accepted = server
        .mock("GET", "/cursos")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    let client = client_for(&server);
    assert!(client.courses().unwrap().is_empty());

    token.assert();
    rejected.assert();
    accepted.assert();
}

#[test]
fn server_errors_are_not_retried() {
    let mut server = Server::new();
    let _token = token_mock(&mut server, 1);
    let failing = server
        .mock("POST", "/cursos/3/lecciones/9/completar")
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create();

    let client = client_for(&server);
    let err = client
        .mark_lesson_completed(CourseId(3), LessonId(9))
        .unwrap_err();

    failing.assert();
    match err {
        Error::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        e => panic!("unexpected error {e:?}"),
    }
}

#[test]
fn search_uses_criteria_and_filters_category() {
    let mut server = Server::new();
    let _token = token_mock(&mut server, 1);
    let search = server
        .mock("GET", "/cursos/criteria")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("titulo".into(), "rust".into()),
            Matcher::UrlEncoded("nivel".into(), "Avanzado".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"idCurso": 1, "titulo": "Rust async", "categoria": "Backend"},
                {"idCurso": 2, "titulo": "Rust gamedev", "categoria": "Juegos"}]"#,
        )
        .create();

    let client = client_for(&server);
    let found = client
        .search_courses(&SearchCriteria {
            title: " rust ".to_string(),
            level: Some(Level::Advanced),
            status: None,
            category: "back".to_string(),
        })
        .unwrap();

    search.assert();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Rust async");
}

#[test]
fn progress_may_repeat_ids() {
    let mut server = Server::new();
    let _token = token_mock(&mut server, 1);
    let _progress = server
        .mock("GET", "/cursos/3/progreso")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[1, 1, \"2\"]")
        .create();

    let client = client_for(&server);
    assert_eq!(
        client.student_progress(CourseId(3)).unwrap(),
        vec![LessonId(1), LessonId(1), LessonId(2)]
    );
}

#[test]
fn quota_is_patched() {
    let mut server = Server::new();
    let _token = token_mock(&mut server, 1);
    let patch = server
        .mock("PATCH", "/cursos/3/cupos")
        .match_query(Matcher::UrlEncoded("cantidad".into(), "25".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"idCurso": 3, "titulo": "Rust", "cuposMaximos": 25}"#)
        .create();

    let client = client_for(&server);
    let course = client.update_quota(CourseId(3), 25).unwrap();

    patch.assert();
    assert_eq!(course.max_seats, Some(25));
}

#[test]
fn reviews_are_listed_and_created() {
    let mut server = Server::new();
    let _token = token_mock(&mut server, 1);
    let list = server
        .mock("GET", "/reviews")
        .match_query(Matcher::UrlEncoded("courseId".into(), "4".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1, "courseId": 4, "rating": 4, "comment": "bien"}]"#)
        .create();
    let create = server
        .mock("POST", "/reviews")
        .match_body(Matcher::PartialJsonString(
            r#"{"courseId": 4, "rating": 5, "comment": "excelente"}"#.to_string(),
        ))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 2, "courseId": 4, "userId": 8, "rating": 5, "comment": "excelente"}"#)
        .create();

    let client = client_for(&server);
    assert_eq!(client.course_reviews(CourseId(4)).unwrap().len(), 1);

    let mut draft = ReviewDraft::new(CourseId(4));
    draft.comment = "excelente".to_string();
    let created = client.create_review(&draft).unwrap();

    list.assert();
    create.assert();
    assert_eq!(created.rating, 5);
}

#[test]
fn invalid_reviews_are_not_sent() {
    let mut server = Server::new();
    let create = server.mock("POST", "/reviews").expect(0).create();

    let client = client_for(&server);
    let err = client.create_review(&ReviewDraft::new(CourseId(4))).unwrap_err();

    create.assert();
    assert!(matches!(err, Error::InvalidReview(_)));
}

#[test]
fn health_needs_no_login() {
    let mut server = Server::new();
    let token = token_mock(&mut server, 0);
    let health = server
        .mock("GET", "/actuator/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "UP"}"#)
        .create();

    let client = client_for(&server);
    assert_eq!(client.health().unwrap().status, "UP");

    health.assert();
    token.assert();
}
