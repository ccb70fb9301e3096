// Live integration tests for the Medassist API
// Run with: cargo test --test live_api -- --ignored
// Requires a running server (default: cargo run -p medassist-api)

use serde_json::{json, Value};
use uuid::Uuid;

const API_BASE_URL: &str = "http://localhost:5000";

fn unique(prefix: &str) -> (String, String) {
    let tag = Uuid::now_v7().simple().to_string();
    (format!("{prefix}{tag}"), format!("{prefix}{tag}@x.com"))
}

#[tokio::test]
#[ignore] // Run with: cargo test --test live_api -- --ignored
async fn test_full_auth_and_report_workflow() {
    let client = reqwest::Client::new();

    println!("🧪 Testing full auth + report workflow...");

    // Step 1: Sign up
    println!("\n📝 Step 1: Signing up...");
    let (username, email) = unique("alice");
    let signup_response = client
        .post(format!("{}/auth/signup", API_BASE_URL))
        .json(&json!({"username": username, "email": email, "password": "pw1"}))
        .send()
        .await
        .expect("Failed to sign up");

    assert_eq!(
        signup_response.status(),
        201,
        "Expected 201 Created, got {}",
        signup_response.status()
    );
    let signup_body: Value = signup_response.json().await.expect("Failed to parse signup");
    let token = signup_body["token"].as_str().expect("No token").to_string();
    println!("✅ Signed up: {}", signup_body["user"]["id"]);

    // Step 2: Login with the wrong password
    println!("\n🔒 Step 2: Login with wrong password...");
    let bad_login = client
        .post(format!("{}/auth/login", API_BASE_URL))
        .json(&json!({"email": email, "password": "wrongpw"}))
        .send()
        .await
        .expect("Failed to call login");
    assert_eq!(bad_login.status(), 401);
    println!("✅ Wrong password rejected");

    // Step 3: Login with the right password
    println!("\n🔑 Step 3: Login...");
    let login = client
        .post(format!("{}/auth/login", API_BASE_URL))
        .json(&json!({"email": email, "password": "pw1"}))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(login.status(), 200);
    println!("✅ Logged in");

    // Step 4: Whoami
    println!("\n🪪 Step 4: /auth/me...");
    let me = client
        .get(format!("{}/auth/me", API_BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to call /auth/me");
    assert_eq!(me.status(), 200);
    let me_body: Value = me.json().await.expect("Failed to parse /auth/me");
    assert_eq!(me_body["user"]["username"], json!(username));
    println!("✅ Identity resolved: {}", me_body["user"]["username"]);

    // Step 5: Create two reports
    println!("\n📄 Step 5: Creating reports...");
    for (expected_id, symptom) in [(1, "fever"), (2, "cough")] {
        let created = client
            .post(format!("{}/api/reports", API_BASE_URL))
            .bearer_auth(&token)
            .json(&json!({"symptom": symptom}))
            .send()
            .await
            .expect("Failed to create report");
        assert_eq!(created.status(), 201);
        let report: Value = created.json().await.expect("Failed to parse report");
        assert_eq!(report["id"], json!(expected_id));
    }
    println!("✅ Created reports 1 and 2");

    // Step 6: List reports in order
    println!("\n📋 Step 6: Listing reports...");
    let listed = client
        .get(format!("{}/api/reports", API_BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list reports");
    assert_eq!(listed.status(), 200);
    let reports: Vec<Value> = listed.json().await.expect("Failed to parse reports");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["id"], json!(1));
    assert_eq!(reports[1]["id"], json!(2));
    println!("✅ Found {} report(s) in order", reports.len());

    // Step 7: A second account sees none of them
    println!("\n🙈 Step 7: Checking ownership scoping...");
    let (username2, email2) = unique("eve");
    let other: Value = client
        .post(format!("{}/auth/signup", API_BASE_URL))
        .json(&json!({"username": username2, "email": email2, "password": "pw2"}))
        .send()
        .await
        .expect("Failed to sign up second user")
        .json()
        .await
        .expect("Failed to parse second signup");
    let other_token = other["token"].as_str().expect("No token");
    let other_reports: Vec<Value> = client
        .get(format!("{}/api/reports", API_BASE_URL))
        .bearer_auth(other_token)
        .send()
        .await
        .expect("Failed to list other reports")
        .json()
        .await
        .expect("Failed to parse other reports");
    assert!(other_reports.is_empty());
    println!("✅ Other account sees no reports");

    // Step 8: Rename via profile
    println!("\n✏️  Step 8: Renaming...");
    let renamed = client
        .put(format!("{}/api/user/profile", API_BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"name": format!("{username}-renamed")}))
        .send()
        .await
        .expect("Failed to update profile");
    assert_eq!(renamed.status(), 200);
    println!("✅ Renamed");

    println!("\n🎉 All tests passed!");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflict() {
    let client = reqwest::Client::new();

    let (username, email) = unique("carol");
    let first = client
        .post(format!("{}/auth/signup", API_BASE_URL))
        .json(&json!({"username": username, "email": email, "password": "pw1"}))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/auth/signup", API_BASE_URL))
        .json(&json!({"username": format!("{username}2"), "email": email, "password": "pw2"}))
        .send()
        .await
        .expect("Failed to call signup");
    assert_eq!(second.status(), 400);
    let body: Value = second.json().await.expect("Failed to parse conflict body");
    println!("✅ Conflict body: {body}");
    assert_eq!(body["error"], json!("username or email already exists"));
}

#[tokio::test]
#[ignore]
async fn test_health_endpoint() {
    let client = reqwest::Client::new();

    println!("🏥 Testing health endpoint...");
    let response = client
        .get(format!("{}/health", API_BASE_URL))
        .send()
        .await
        .expect("Failed to call health endpoint");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    println!("✅ Health check: {:?}", body);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore]
async fn test_predict_and_chat() {
    let client = reqwest::Client::new();

    let predict = client
        .post(format!("{}/predict", API_BASE_URL))
        .json(&json!({"symptoms": ["fever", "chills", "muscle aches"]}))
        .send()
        .await
        .expect("Failed to call predict");
    assert_eq!(predict.status(), 200);
    let body: Value = predict.json().await.expect("Failed to parse predictions");
    println!("✅ Top prediction: {}", body["predictions"][0]["disease"]);
    assert_eq!(body["predictions"].as_array().unwrap().len(), 3);

    let chat = client
        .post(format!("{}/chat", API_BASE_URL))
        .json(&json!({"question": "how to prevent the flu?"}))
        .send()
        .await
        .expect("Failed to call chat");
    assert_eq!(chat.status(), 200);
    let answer: Value = chat.json().await.expect("Failed to parse answer");
    println!("✅ Chat answer: {}", answer["answer"]);
    assert_eq!(answer["confidence"], json!(85));
}
