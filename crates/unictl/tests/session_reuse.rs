use std::{
    net::SocketAddr,
    process::{Command, Output, Stdio},
    sync::{Arc, Mutex},
    time::SystemTime,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

const LOGIN_REQUIRED: &str = r#"{"data":[],"meta":{"rc":"error","msg":"api.err.LoginRequired"}}"#;
const STATIONS: &str = r#"{"data":[{"mac":"aa:bb:cc:dd:ee:ff","ip":"192.168.1.23","hostname":"kids-ipad"}],"meta":{"rc":"ok"}}"#;

type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

/// Hands out a session cookie on login and requires it everywhere else.
async fn handle(State(seen): State<Seen>, uri: Uri, headers: HeaderMap) -> Response {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = uri.path().to_string();
    seen.lock().unwrap().push((path.clone(), cookie.clone()));

    if path == "/api/login" {
        let mut response = (StatusCode::OK, r#"{"meta":{"rc":"ok"}}"#).into_response();
        response.headers_mut().insert(
            header::SET_COOKIE,
            HeaderValue::from_static("unifises=from-login; Path=/"),
        );
        return response;
    }
    match cookie.as_deref() {
        Some("unifises=from-login") => (StatusCode::OK, STATIONS).into_response(),
        _ => (StatusCode::UNAUTHORIZED, LOGIN_REQUIRED).into_response(),
    }
}

async fn start() -> (SocketAddr, Seen) {
    let seen = Seen::default();
    let app = Router::new().fallback(handle).with_state(Arc::clone(&seen));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn unictl_command(data_dir: &str, addr: SocketAddr) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_unictl"));
    cmd.arg(format!("--data-dir={data_dir}"))
        .arg(format!("--port={}", addr.port()))
        .arg("--plain-http")
        .env("UNICTL_LOG_FILE", format!("{data_dir}.log"))
        .env("RUST_LOG", "debug")
        .stdin(Stdio::null())
        .stderr(Stdio::inherit());
    cmd
}

async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn login_once_then_reuse_saved_session() {
    let (addr, seen) = start().await;
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let data_dir = format!("{}/{now}", env!("CARGO_TARGET_TMPDIR"));

    let mut login = unictl_command(&data_dir, addr);
    login
        .arg("login")
        .arg("--controller=127.0.0.1")
        .arg("--username=admin")
        .env("UNICTL_PASSWORD", "secret");
    let output = run(login).await;
    assert!(output.status.success());

    let mut list = unictl_command(&data_dir, addr);
    list.arg("list-clients");
    let output = run(list).await;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "aa:bb:cc:dd:ee:ff\t192.168.1.23\tkids-ipad\n");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("/api/login".to_string(), None),
            (
                "/api/s/default/stat/sta".to_string(),
                Some("unifises=from-login".to_string())
            ),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn commands_require_a_saved_session() {
    let (addr, seen) = start().await;
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let data_dir = format!("{}/empty-{now}", env!("CARGO_TARGET_TMPDIR"));

    let mut block = unictl_command(&data_dir, addr);
    block.arg("block").arg("aa:bb:cc:dd:ee:ff");
    let output = run(block).await;

    assert!(!output.status.success());
    assert!(seen.lock().unwrap().is_empty());
}
