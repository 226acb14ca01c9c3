use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ViewState {
    user: Option<String>,
    phase: String,
    count: u64,
    click_times: Vec<String>,
    achievement: Option<String>,
    disabled: bool,
    theme: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct UserRecord {
    count: u64,
    #[serde(rename = "clickTimes")]
    click_times: Vec<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("click_widget_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_click_widget"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn post(client: &Client, url: String) -> reqwest::Response {
    client.post(url).send().await.unwrap()
}

async fn login(client: &Client, base_url: &str, name: &str) -> ViewState {
    let response = client
        .post(format!("{base_url}/api/login"))
        .json(&serde_json::json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_clicks_count_and_hit_first_achievement() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view = login(&client, &server.base_url, "http-alice").await;
    assert_eq!(view.user.as_deref(), Some("http-alice"));
    assert_eq!(view.phase, "active");
    assert_eq!(view.count, 0);

    let mut view = view;
    for _ in 0..5 {
        let response = post(&client, format!("{}/api/click", server.base_url)).await;
        assert!(response.status().is_success());
        view = response.json().await.unwrap();
    }
    assert_eq!(view.count, 5);
    assert_eq!(view.click_times.len(), 5);
    assert_eq!(view.achievement.as_deref(), Some("🎉 Achievement: 5 clicks!"));
    assert!(!view.disabled);

    let stored: UserRecord = client
        .get(format!("{}/api/users/http-alice", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored.count, 5);
    assert_eq!(stored.click_times, view.click_times);

    let response = post(&client, format!("{}/api/reset", server.base_url)).await;
    let reset: ViewState = response.json().await.unwrap();
    assert_eq!(reset.count, 0);
    assert!(reset.click_times.is_empty());
    assert_eq!(reset.achievement, None);
}

#[tokio::test]
async fn http_click_while_logged_out_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    login(&client, &server.base_url, "http-bob").await;
    post(&client, format!("{}/api/click", server.base_url)).await;
    let view: ViewState = post(&client, format!("{}/api/logout", server.base_url))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view.user, None);
    assert_eq!(view.phase, "idle");

    let response = post(&client, format!("{}/api/click", server.base_url)).await;
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    assert_eq!(response.text().await.unwrap(), "Please log in first!");

    let stored: UserRecord = client
        .get(format!("{}/api/users/http-bob", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored.count, 1);
}

#[tokio::test]
async fn http_login_requires_name() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/login", server.base_url))
        .json(&serde_json::json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_theme_toggle_and_index_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: ViewState = client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after: ViewState = post(&client, format!("{}/api/theme", server.base_url))
        .await
        .json()
        .await
        .unwrap();
    assert_ne!(before.theme, after.theme);

    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(&format!("data-theme=\"{}\"", after.theme)));
}
