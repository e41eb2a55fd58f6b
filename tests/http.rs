use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct FoodLogEntry {
    id: i64,
    name: String,
    calories_consumed: i64,
    weight_grams: f64,
    #[serde(default)]
    meal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MealSection {
    meal: Option<String>,
    label: String,
    entries: Vec<FoodLogEntry>,
    total_calories: i64,
}

#[derive(Debug, Deserialize)]
struct DayLogResponse {
    date: String,
    entries: Vec<FoodLogEntry>,
    total_calories: i64,
    meals: Vec<MealSection>,
}

#[derive(Debug, Deserialize)]
struct DailyTarget {
    calories: i64,
    protein_grams: i64,
    carbs_grams: i64,
    fat_grams: i64,
}

#[derive(Debug, Deserialize)]
struct WeightTrend {
    magnitude_kg: f64,
    direction: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    target: DailyTarget,
    consumed: i64,
    remaining: i64,
    weight_trend: WeightTrend,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    target: DailyTarget,
    bmr: f64,
    tdee: f64,
}

#[derive(Debug, Deserialize)]
struct Notification {
    title: String,
}

struct TestServer {
    base_url: String,
    child: Child,
    _data_dir: tempfile::TempDir,
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

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/summary")).send().await {
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
    let data_dir = tempfile::tempdir().expect("temp data dir");
    let child = Command::new(env!("CARGO_BIN_EXE_calorie_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir.path())
        .env("FOOD_LOOKUP_SOURCE", "local")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        child,
        _data_dir: data_dir,
    }
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

async fn notifications(client: &Client, base_url: &str) -> Vec<Notification> {
    client
        .get(format!("{base_url}/api/notifications"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn set_notifications(client: &Client, base_url: &str, enabled: bool) {
    let response = client
        .put(format!("{base_url}/api/preferences"))
        .json(&serde_json::json!({
            "dark_mode": false,
            "notifications": enabled,
            "metric_units": true,
            "reminders": false
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn day_log(client: &Client, base_url: &str, date: &str) -> DayLogResponse {
    client
        .get(format!("{base_url}/api/foods?date={date}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_add_and_remove_food() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let date = "2026-03-02";

    let before = day_log(&client, &server.base_url, date).await;

    let response = client
        .post(format!("{}/api/foods", server.base_url))
        .json(&serde_json::json!({ "name": "manzana", "weight_grams": 182, "date": date }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let entry: FoodLogEntry = response.json().await.unwrap();
    assert_eq!(entry.name, "Manzana");
    assert_eq!(entry.calories_consumed, 95);
    assert_eq!(entry.weight_grams, 182.0);

    let after = day_log(&client, &server.base_url, date).await;
    assert_eq!(after.date, date);
    assert_eq!(after.total_calories, before.total_calories + 95);
    assert_eq!(after.entries.last().map(|e| e.id), Some(entry.id));

    let response = client
        .delete(format!("{}/api/foods/{}?date={date}", server.base_url, entry.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let restored = day_log(&client, &server.base_url, date).await;
    assert_eq!(restored.total_calories, before.total_calories);

    let again = client
        .delete(format!("{}/api/foods/{}?date={date}", server.base_url, entry.id))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_unknown_food_is_not_logged() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let date = "2026-03-03";

    let response = client
        .post(format!("{}/api/foods", server.base_url))
        .json(&serde_json::json!({ "name": "xyzxyz", "weight_grams": 100, "date": date }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(day_log(&client, &server.base_url, date).await.entries.is_empty());

    let recent = notifications(&client, &server.base_url).await;
    assert_eq!(recent[0].title, "Alimento no encontrado");

    let lookup = client
        .get(format!("{}/api/lookup?q=xyzxyz", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_rejects_invalid_submissions() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let zero_weight = client
        .post(format!("{}/api/foods", server.base_url))
        .json(&serde_json::json!({ "name": "pan", "weight_grams": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(zero_weight.status(), StatusCode::BAD_REQUEST);

    let blank_name = client
        .post(format!("{}/api/foods", server.base_url))
        .json(&serde_json::json!({ "name": "  ", "weight_grams": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);

    let bad_date = client
        .get(format!("{}/api/summary?date=19-10-2026", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_profile_drives_target_and_summary() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let date = "2026-03-04";

    let profile: ProfileResponse = client
        .put(format!("{}/api/profile", server.base_url))
        .json(&serde_json::json!({
            "weight_kg": 70,
            "height_cm": 175,
            "age_years": 28,
            "goal": "maintain",
            "activity_level": "sedentary"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!((profile.bmr - 1709.6).abs() < 1e-6);
    assert!((profile.tdee - 2051.52).abs() < 1e-6);
    assert_eq!(profile.target.calories, 2052);
    assert_eq!(profile.target.protein_grams, 128);
    assert_eq!(profile.target.carbs_grams, 231);
    assert_eq!(profile.target.fat_grams, 68);

    let response = client
        .put(format!("{}/api/profile/targets", server.base_url))
        .json(&serde_json::json!({
            "target_override": {
                "calories": 2000,
                "protein_grams": 120,
                "carbs_grams": 240,
                "fat_grams": 65
            }
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    for (name, grams) in [("huevo", 100), ("pan", 100)] {
        let response = client
            .post(format!("{}/api/foods", server.base_url))
            .json(&serde_json::json!({ "name": name, "weight_grams": grams, "date": date }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let summary: SummaryResponse = client
        .get(format!("{}/api/summary?date={date}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.target.calories, 2000);
    assert_eq!(summary.consumed, 155 + 265);
    assert_eq!(summary.remaining, 2000 - 420);
    assert_eq!(summary.weight_trend.direction, "loss");
    let expected = ((420.0 - 2000.0) * 7.0 / 7700.0_f64).abs();
    assert!((summary.weight_trend.magnitude_kg - expected).abs() < 1e-9);

    let cleared = client
        .put(format!("{}/api/profile/targets", server.base_url))
        .json(&serde_json::json!({ "target_override": null }))
        .send()
        .await
        .unwrap();
    assert!(cleared.status().is_success());

    let target: DailyTarget = client
        .get(format!("{}/api/target", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(target.calories, 2052);
}

#[tokio::test]
async fn http_food_log_groups_entries_by_meal() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let date = "2026-03-05";

    for (name, grams, meal) in [
        ("huevo", 100, Some("Desayuno")),
        ("pan", 50, Some("breakfast")),
        ("arroz", 200, Some("dinner")),
        ("manzana", 100, None),
    ] {
        let mut body = serde_json::json!({ "name": name, "weight_grams": grams, "date": date });
        if let Some(meal) = meal {
            body["meal"] = serde_json::json!(meal);
        }
        let response = client
            .post(format!("{}/api/foods", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let log = day_log(&client, &server.base_url, date).await;
    assert_eq!(log.total_calories, 155 + 133 + 260 + 52);
    assert_eq!(log.entries[0].meal.as_deref(), Some("breakfast"));
    assert!(log.entries[3].meal.is_none());

    let labels: Vec<_> = log.meals.iter().map(|section| section.label.as_str()).collect();
    assert_eq!(labels, ["Desayuno", "Almuerzo", "Cena", "Snacks", "Otros"]);
    assert_eq!(log.meals[0].meal.as_deref(), Some("breakfast"));
    assert_eq!(log.meals[0].entries.len(), 2);
    assert_eq!(log.meals[0].total_calories, 155 + 133);
    assert_eq!(log.meals[1].total_calories, 0);
    assert_eq!(log.meals[2].total_calories, 260);
    assert_eq!(log.meals[4].total_calories, 52);

    let unknown_meal = client
        .post(format!("{}/api/foods", server.base_url))
        .json(&serde_json::json!({
            "name": "pan",
            "weight_grams": 50,
            "date": date,
            "meal": "brunch"
        }))
        .send()
        .await
        .unwrap();
    assert!(unknown_meal.status().is_client_error());
    assert_eq!(day_log(&client, &server.base_url, date).await.entries.len(), 4);
}

#[tokio::test]
async fn http_disabling_notifications_mutes_the_feed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // Make sure the newest notification is known before muting.
    set_notifications(&client, &server.base_url, true).await;
    let saved = client
        .put(format!("{}/api/profile/targets", server.base_url))
        .json(&serde_json::json!({ "reminder": "20:00" }))
        .send()
        .await
        .unwrap();
    assert!(saved.status().is_success());
    let before = notifications(&client, &server.base_url).await;
    assert_eq!(before[0].title, "Objetivo actualizado");

    set_notifications(&client, &server.base_url, false).await;
    let preferences: serde_json::Value = client
        .get(format!("{}/api/preferences", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(preferences["notifications"], false);

    let lookup = client
        .get(format!("{}/api/lookup?q=xyzxyz", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);

    let muted = notifications(&client, &server.base_url).await;
    assert_eq!(muted.len(), before.len());
    assert_eq!(muted[0].title, before[0].title);

    set_notifications(&client, &server.base_url, true).await;
    let lookup = client
        .get(format!("{}/api/lookup?q=xyzxyz", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
    let resumed = notifications(&client, &server.base_url).await;
    assert_eq!(resumed[0].title, "Alimento no encontrado");
}
