//! API integration tests

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("CATALOG_TEST_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

async fn get_json(client: &Client, path: &str) -> Value {
    let response = client
        .get(format!("{}{}", base_url(), path))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success(), "GET {} -> {}", path, response.status());
    response.json().await.expect("Failed to parse response")
}

async fn create_author(client: &Client, name: &str, last_name: &str) -> i64 {
    let response = client
        .post(format!("{}/authors", base_url()))
        .json(&json!({
            "name": name,
            "lastName": last_name,
            "country": "Colombia",
            "birthDate": "1927-03-06"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No author ID")
}

async fn create_book(client: &Client, title: &str, authors: &[i64]) -> i64 {
    let response = client
        .post(format!("{}/books", base_url()))
        .json(&json!({
            "title": title,
            "publishedAt": "1967-05-30",
            "authorsId": authors
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
}

fn find<'a>(list: &'a Value, id: i64) -> Option<&'a Value> {
    list.as_array()?.iter().find(|v| v["id"].as_i64() == Some(id))
}

fn author_ids(book: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = book["authors"]
        .as_array()
        .expect("No authors array")
        .iter()
        .filter_map(|a| a["id"].as_i64())
        .collect();
    ids.sort_unstable();
    ids
}

async fn status_of(request: reqwest::RequestBuilder) -> StatusCode {
    request.send().await.expect("Failed to send request").status()
}

fn author_payload(name: &str, last_name: &str, country: &str, birth_date: &str) -> Value {
    json!({
        "name": name,
        "lastName": last_name,
        "country": country,
        "birthDate": birth_date
    })
}

fn timestamp(value: &Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(value.as_str().expect("Timestamp is not a string"))
        .expect("Invalid timestamp")
}

fn unique(label: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{} {}", label, nanos)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let body = get_json(&client(), "/health").await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_author_shows_derived_fields() {
    let client = client();
    let id = create_author(&client, "Gabriel", "García Márquez").await;

    let index = get_json(&client, "/authors").await;
    let author = find(&index["authors"], id).expect("Author missing from list");
    assert_eq!(author["fullName"], "Gabriel García Márquez");
    assert_eq!(author["birthDate"], "1927-03-06");
    assert_eq!(author["formattedBirthDate"], "06/03/1927");
    assert_eq!(author["booksCount"], 0);
}

#[tokio::test]
#[ignore]
async fn test_create_book_links_author() {
    let client = client();
    let author = create_author(&client, "Gabriel", "García Márquez").await;
    let book = create_book(&client, "Cien años de soledad", &[author]).await;

    let detail = get_json(&client, &format!("/authors/{}", author)).await;
    assert_eq!(detail["booksCount"], 1);
    assert_eq!(detail["books"][0]["bookId"], book);

    let shown = get_json(&client, &format!("/books/{}", book)).await;
    assert_eq!(author_ids(&shown), vec![author]);
}

#[tokio::test]
#[ignore]
async fn test_create_book_without_authors_fails() {
    let client = client();
    let title = unique("Sin autores");

    let response = client
        .post(format!("{}/books", base_url()))
        .json(&json!({ "title": title, "publishedAt": "1967-05-30", "authorsId": [] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let index = get_json(&client, "/books").await;
    let titles: Vec<&str> = index["books"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["title"].as_str())
        .collect();
    assert!(!titles.contains(&title.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_unknown_author_rolls_back() {
    let client = client();
    let author = create_author(&client, "Álvaro", "Mutis").await;
    let title = unique("Rollback");

    let response = client
        .post(format!("{}/books", base_url()))
        .json(&json!({
            "title": title,
            "publishedAt": "1986-01-01",
            "authorsId": [author, i64::MAX]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["authorsId.1"].is_array());

    let index = get_json(&client, "/books?include_deleted=true").await;
    assert!(!index["books"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["title"] == title.as_str()));

    let detail = get_json(&client, &format!("/authors/{}", author)).await;
    assert_eq!(detail["booksCount"], 0);
}

#[tokio::test]
#[ignore]
async fn test_update_book_syncs_authors() {
    let client = client();
    let a = create_author(&client, "Jorge Luis", "Borges").await;
    let b = create_author(&client, "Adolfo", "Bioy Casares").await;
    let c = create_author(&client, "Silvina", "Ocampo").await;
    let book = create_book(&client, "Antología de la literatura fantástica", &[a, b]).await;

    let response = client
        .put(format!("{}/books/{}", base_url(), book))
        .json(&json!({
            "title": "Antología de la literatura fantástica",
            "publishedAt": "1940-01-01",
            "authors": [b, c]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let shown = get_json(&client, &format!("/books/{}", book)).await;
    let mut expected = vec![b, c];
    expected.sort_unstable();
    assert_eq!(author_ids(&shown), expected);
    assert_eq!(shown["publishedAt"], "1940-01-01");
}

#[tokio::test]
#[ignore]
async fn test_update_book_with_empty_authors_fails() {
    let client = client();
    let author = create_author(&client, "Juan", "Rulfo").await;
    let book = create_book(&client, "Pedro Páramo", &[author]).await;

    let response = client
        .patch(format!("{}/books/{}", base_url(), book))
        .json(&json!({ "title": "Pedro Páramo", "publishedAt": "1955-03-19", "authors": [] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let shown = get_json(&client, &format!("/books/{}", book)).await;
    assert_eq!(author_ids(&shown), vec![author]);
}

#[tokio::test]
#[ignore]
async fn test_soft_deleted_author_stays_on_books() {
    let client = client();
    let author = create_author(&client, "Julio", "Cortázar").await;
    let book = create_book(&client, "Rayuela", &[author]).await;

    let response = client
        .delete(format!("{}/authors/{}", base_url(), author))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let index = get_json(&client, "/books").await;
    let listed = find(&index["books"], book).expect("Book missing from list");
    assert_eq!(author_ids(listed), vec![author]);
    assert!(find(&index["availableAuthors"], author).is_none());
    assert_eq!(index["authorsExists"], true);

    let response = client
        .get(format!("{}/authors/{}", base_url(), author))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let detail = get_json(&client, &format!("/authors/{}?include_deleted=true", author)).await;
    assert!(detail["deletedAt"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_deleting_author_twice_is_not_found() {
    let client = client();
    let author = create_author(&client, "Mario", "Vargas Llosa").await;

    for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
        let response = client
            .delete(format!("{}/authors/{}", base_url(), author))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_update_author_replaces_all_fields() {
    let client = client();
    let author = create_author(&client, "Gabo", "Márquez").await;
    let before = get_json(&client, &format!("/authors/{}", author)).await;

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let response = client
        .put(format!("{}/authors/{}", base_url(), author))
        .json(&author_payload("Gabriel", "García Márquez", "México", "1927-03-06"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], author);

    let after = get_json(&client, &format!("/authors/{}", author)).await;
    assert_eq!(after["name"], "Gabriel");
    assert_eq!(after["lastName"], "García Márquez");
    assert_eq!(after["fullName"], "Gabriel García Márquez");
    assert_eq!(after["country"], "México");
    assert_eq!(after["formattedBirthDate"], "06/03/1927");
    assert_eq!(after["registrationDate"], before["registrationDate"]);
    assert!(timestamp(&after["updatedAt"]) > timestamp(&before["updatedAt"]));
}

#[tokio::test]
#[ignore]
async fn test_update_missing_author_is_not_found() {
    let client = client();
    let status = status_of(
        client
            .put(format!("{}/authors/{}", base_url(), i64::MAX))
            .json(&author_payload("Nadie", "Ninguno", "Chile", "1900-01-01")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_update_soft_deleted_author_is_not_found() {
    let client = client();
    let author = create_author(&client, "Rómulo", "Gallegos").await;
    let url = format!("{}/authors/{}", base_url(), author);
    assert_eq!(status_of(client.delete(&url)).await, StatusCode::OK);

    let valid = author_payload("Rómulo", "Gallegos", "Venezuela", "1884-08-02");
    assert_eq!(status_of(client.put(&url).json(&valid)).await, StatusCode::NOT_FOUND);

    // Existence is checked before the payload
    let status = status_of(client.patch(&url).json(&json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let detail = get_json(&client, &format!("/authors/{}?include_deleted=true", author)).await;
    assert_eq!(detail["country"], "Colombia");
}

#[tokio::test]
#[ignore]
async fn test_update_missing_book_is_not_found() {
    let client = client();
    let author = create_author(&client, "Ernesto", "Sabato").await;

    let status = status_of(
        client
            .put(format!("{}/books/{}", base_url(), i64::MAX))
            .json(&json!({ "title": "Sobre héroes y tumbas", "publishedAt": "1961-01-01", "authors": [author] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_soft_deleted_book_cannot_be_shown_updated_or_deleted() {
    let client = client();
    let author = create_author(&client, "Horacio", "Quiroga").await;
    let book = create_book(&client, "Cuentos de la selva", &[author]).await;
    let url = format!("{}/books/{}", base_url(), book);

    assert_eq!(status_of(client.delete(&url)).await, StatusCode::SEE_OTHER);

    assert_eq!(status_of(client.get(&url)).await, StatusCode::NOT_FOUND);

    let update = json!({ "title": "Cuentos de la selva", "publishedAt": "1918-01-01", "authors": [author] });
    assert_eq!(status_of(client.put(&url).json(&update)).await, StatusCode::NOT_FOUND);

    assert_eq!(status_of(client.delete(&url)).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_soft_deleted_book_hidden_but_links_kept() {
    let client = client();
    let author = create_author(&client, "Isabel", "Allende").await;
    let book = create_book(&client, "La casa de los espíritus", &[author]).await;

    let response = client
        .delete(format!("{}/books/{}", base_url(), book))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/books");

    let index = get_json(&client, "/books").await;
    assert!(find(&index["books"], book).is_none());

    let all = get_json(&client, "/books?include_deleted=true").await;
    let deleted = find(&all["books"], book).expect("Deleted book missing");
    assert_eq!(author_ids(deleted), vec![author]);

    let detail = get_json(&client, &format!("/authors/{}", author)).await;
    assert_eq!(detail["booksCount"], 1);
}
