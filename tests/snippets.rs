mod common;

use axum::http::{header, Method, StatusCode};
use common::{snippet_styles, TestApp, ALICE, BOB};
use serde_json::{json, Value};
use snippets_api::ApiStyle;

async fn crud_lifecycle(style: ApiStyle, list: &str, detail: &str) {
    let app = TestApp::new(style).await;
    let ctx = format!("{style} {list}");

    let r = app.send(Method::POST, list, None, Some(json!({"code": "x"}))).await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED, "{ctx}: anonymous create");
    assert_eq!(r.headers[header::WWW_AUTHENTICATE], "Basic realm=\"api\"", "{ctx}");
    assert_eq!(r.json()["detail"], "Authentication credentials were not provided.", "{ctx}");

    let r = app
        .send(Method::POST, list, Some(("alice", "wrong")), Some(json!({"code": "x"})))
        .await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED, "{ctx}: bad credentials");
    assert_eq!(r.json()["detail"], "Invalid username/password.", "{ctx}");

    let r = app.post(list, ALICE, json!({"language": "cobol"})).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST, "{ctx}: invalid payload");
    assert_eq!(r.json()["code"], json!(["This field is required."]), "{ctx}");
    assert_eq!(r.json()["language"], json!(["\"cobol\" is not a valid choice."]), "{ctx}");

    let r = app
        .post(
            list,
            ALICE,
            json!({"code": "print('hi')", "language": "python", "owner": "bob", "id": 77}),
        )
        .await;
    assert_eq!(r.status, StatusCode::CREATED, "{ctx}: create");
    let created = r.json();
    assert_eq!(created["owner"], "alice", "{ctx}");
    assert_eq!(created["title"], "", "{ctx}");
    assert_eq!(created["style"], "friendly", "{ctx}");
    assert_eq!(created["linenos"], false, "{ctx}");
    let id = created["id"].as_i64().unwrap();
    assert_ne!(id, 77, "{ctx}: id is store-assigned");
    let url = format!("{detail}{id}/");

    let r = app.get(&url).await;
    assert_eq!(r.status, StatusCode::OK, "{ctx}");
    assert_eq!(r.json(), created, "{ctx}");

    for method in [Method::PUT, Method::PATCH, Method::DELETE] {
        let r = app
            .send(method.clone(), &url, Some(BOB), Some(json!({"code": "hacked"})))
            .await;
        assert_eq!(r.status, StatusCode::FORBIDDEN, "{ctx}: {method} by non-owner");
        assert_eq!(
            r.json()["detail"],
            "You do not have permission to perform this action.",
            "{ctx}"
        );
    }
    let r = app.send(Method::DELETE, &url, None, None).await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED, "{ctx}: anonymous delete");
    assert_eq!(app.get(&url).await.json(), created, "{ctx}: record unchanged");

    let r = app
        .send(Method::PATCH, &url, Some(ALICE), Some(json!({"title": "Greeting"})))
        .await;
    assert_eq!(r.status, StatusCode::OK, "{ctx}: partial update");
    assert_eq!(r.json()["title"], "Greeting", "{ctx}");
    assert_eq!(r.json()["code"], "print('hi')", "{ctx}");

    let r = app
        .send(Method::PUT, &url, Some(ALICE), Some(json!({"linenos": true})))
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST, "{ctx}: PUT needs code");

    let r = app
        .send(
            Method::PUT,
            &url,
            Some(ALICE),
            Some(json!({"code": "x = 1", "linenos": true, "style": "mocha"})),
        )
        .await;
    assert_eq!(r.status, StatusCode::OK, "{ctx}: full update");
    let updated = r.json();
    assert_eq!(updated["code"], "x = 1", "{ctx}");
    assert_eq!(updated["title"], "Greeting", "{ctx}");
    assert_eq!(updated["linenos"], true, "{ctx}");
    assert_eq!(updated["owner"], "alice", "{ctx}");
    assert_eq!(app.get(&url).await.json(), updated, "{ctx}: GET reflects last write");

    let missing = format!("{detail}999/");
    assert_eq!(app.get(&missing).await.status, StatusCode::NOT_FOUND, "{ctx}");
    assert_eq!(app.get(&missing).await.json()["detail"], "Not found.", "{ctx}");
    let r = app
        .send(Method::PUT, &missing, Some(ALICE), Some(json!({"code": "y"})))
        .await;
    assert_eq!(r.status, StatusCode::NOT_FOUND, "{ctx}: PUT unknown");
    let r = app.send(Method::DELETE, &missing, Some(ALICE), None).await;
    assert_eq!(r.status, StatusCode::NOT_FOUND, "{ctx}: DELETE unknown");
    assert_eq!(
        app.get(&format!("{detail}abc/")).await.status,
        StatusCode::NOT_FOUND,
        "{ctx}: non-integer id"
    );

    let r = app.send(Method::DELETE, list, Some(ALICE), None).await;
    assert_eq!(r.status, StatusCode::METHOD_NOT_ALLOWED, "{ctx}");
    assert_eq!(r.json()["detail"], "Method \"DELETE\" not allowed.", "{ctx}");

    for code in ["a = 2", "b = 3"] {
        let r = app.post(list, BOB, json!({"code": code})).await;
        assert_eq!(r.status, StatusCode::CREATED, "{ctx}");
    }
    let listed = app.get(list).await.json();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 3, "{ctx}: list after three creations");
    assert_eq!(listed[0]["id"], json!(id), "{ctx}: creation order");
    assert_eq!(listed[2]["owner"], "bob", "{ctx}");

    let r = app.send(Method::DELETE, &url, Some(ALICE), None).await;
    assert_eq!(r.status, StatusCode::NO_CONTENT, "{ctx}: delete");
    assert!(r.body.is_empty(), "{ctx}");
    assert_eq!(app.get(&url).await.status, StatusCode::NOT_FOUND, "{ctx}");
    assert_eq!(app.get(list).await.json().as_array().unwrap().len(), 2, "{ctx}");
}

#[tokio::test]
async fn every_style_enforces_the_same_lifecycle() {
    for (style, list, detail) in snippet_styles() {
        crud_lifecycle(style, list, detail).await;
    }
}

#[tokio::test]
async fn highlight_round_trip_in_every_canonical_style() {
    for style in ApiStyle::ALL {
        let app = TestApp::new(style).await;
        let r = app
            .post("/snippets/", ALICE, json!({"code": "print('hi')", "language": "python"}))
            .await;
        assert_eq!(r.status, StatusCode::CREATED, "{style}");
        let id = r.json()["id"].as_i64().unwrap();

        let r = app.get(&format!("/snippets/{id}/")).await;
        assert_eq!(r.json()["code"], "print('hi')", "{style}");

        let r = app.get(&format!("/snippets/{id}/highlight/")).await;
        assert_eq!(r.status, StatusCode::OK, "{style}");
        let content_type = r.headers[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"), "{style}: {content_type}");
        let html = r.text();
        assert!(html.contains("<pre"), "{style}");
        assert!(html.contains("print") && html.contains("hi"), "{style}");

        let r = app.get(&format!("/snippets/{id}/highlight.html")).await;
        assert_eq!(r.status, StatusCode::OK, "{style}: .html suffix");
        let r = app.get(&format!("/snippets/{id}/highlight.json")).await;
        assert_eq!(r.status, StatusCode::NOT_FOUND, "{style}: highlight renders HTML only");
        let r = app.get("/snippets/999/highlight/").await;
        assert_eq!(r.status, StatusCode::NOT_FOUND, "{style}");
    }
}

#[tokio::test]
async fn update_rerenders_highlight() {
    let app = TestApp::new(ApiStyle::Router).await;
    let id = app
        .post("/snippets/", ALICE, json!({"code": "first_name = 1"}))
        .await
        .json()["id"]
        .as_i64()
        .unwrap();
    let r = app
        .send(
            Method::PATCH,
            &format!("/snippets/{id}/"),
            Some(ALICE),
            Some(json!({"code": "second_name = 2", "title": "<b>bold</b>"})),
        )
        .await;
    assert_eq!(r.status, StatusCode::OK);
    let html = app.get(&format!("/snippets/{id}/highlight/")).await.text();
    assert!(html.contains("second_name"));
    assert!(!html.contains("first_name"));
    assert!(html.contains("&lt;b&gt;bold&lt;"));
    assert!(!html.contains("<b>"));
}

#[tokio::test]
async fn format_suffixes_select_json_or_404() {
    let app = TestApp::new(ApiStyle::Router).await;
    let id = app.post("/snippets/", ALICE, json!({"code": "x"})).await.json()["id"]
        .as_i64()
        .unwrap();

    let r = app.get(&format!("/snippets/{id}.json")).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json()["id"], json!(id));
    assert_eq!(app.get("/snippets.json").await.json().as_array().unwrap().len(), 1);
    assert_eq!(app.get(&format!("/snippets/{id}.html")).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/snippets_fbv.json").await.status, StatusCode::OK);
    assert_eq!(app.get("/snippets_fbv.html").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pagination_wraps_generic_lists_only() {
    let app = TestApp::new(ApiStyle::Generic).await;
    for n in 0..3 {
        app.post("/snippets/", ALICE, json!({"code": format!("n = {n}")})).await;
    }

    let page = app.get("/snippets/?limit=2").await.json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["next"], "http://testserver/snippets/?limit=2&offset=2");
    assert_eq!(page["previous"], Value::Null);

    let last = app.get("/snippets/?limit=2&offset=2").await.json();
    assert_eq!(last["results"].as_array().unwrap().len(), 1);
    assert_eq!(last["next"], Value::Null);
    assert_eq!(last["previous"], "http://testserver/snippets/?limit=2");

    let plain = app.get("/snippets_fbv/?limit=2").await.json();
    assert_eq!(plain.as_array().unwrap().len(), 3);

    let suffixed = app.get("/snippets.json?format_hint=x&limit=1&offset=1").await.json();
    assert_eq!(suffixed["next"], "http://testserver/snippets.json?format_hint=x&limit=1&offset=2");
    assert_eq!(suffixed["previous"], "http://testserver/snippets.json?format_hint=x&limit=1");
}

#[tokio::test]
async fn malformed_bodies_are_rejected() {
    let app = TestApp::new(ApiStyle::Router).await;

    let r = app.post("/snippets/", ALICE, json!(["code"])).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        r.json()["non_field_errors"],
        json!(["Invalid data. Expected a dictionary, but got array."])
    );

    let r = app.post("/snippets/", ALICE, json!({"code": "   "})).await;
    assert_eq!(r.json()["code"], json!(["This field may not be blank."]));

    let r = app
        .post("/snippets/", ALICE, json!({"code": "x", "title": "t".repeat(101)}))
        .await;
    assert_eq!(
        r.json()["title"],
        json!(["Ensure this field has no more than 100 characters."])
    );

    let r = app.post("/snippets/", ALICE, json!({"code": "x", "linenos": "maybe"})).await;
    assert_eq!(r.json()["linenos"], json!(["Must be a valid boolean."]));

    let r = app.post("/snippets/", ALICE, json!({"body": "aliased"})).await;
    assert_eq!(r.status, StatusCode::CREATED);
    assert_eq!(r.json()["code"], "aliased");
}
