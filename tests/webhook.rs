//! End-to-end tests for the webhook front end.

use std::time::Duration;

use linkhook::dispatch::Invocation;

mod common;

use common::{client, rule, start_server};

#[tokio::test]
async fn test_matching_link_runs_command() {
    let server = start_server(vec![rule(&["*"], &["*.example.com/*"], "echo", &["got"])]).await;

    let res = client()
        .post(server.url())
        .body(r#"{"page":"p","link":"http://a.example.com/x","rule":"","type":"link","extra":""}"#)
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(
        res.headers()["access-control-allow-methods"],
        "GET, POST, PUT, DELETE"
    );
    assert!(res.bytes().await.unwrap().is_empty());

    let calls = server.runner.wait_for(1).await;
    assert_eq!(
        calls,
        vec![Invocation {
            program: "echo".into(),
            args: vec!["got".into(), "http://a.example.com/x".into()],
        }]
    );
}

#[tokio::test]
async fn test_unmatched_link_still_accepted() {
    let server = start_server(vec![rule(&["*"], &["*.example.com/*"], "echo", &["got"])]).await;

    let res = client()
        .post(server.url())
        .json(&serde_json::json!({ "page": "p", "link": "http://other.com/x" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(server.runner.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let server = start_server(vec![rule(&["*"], &["*"], "echo", &[])]).await;

    let res = client()
        .post(format!("{}/hook", server.url()))
        .body("\x00\x01 definitely not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert!(res.headers().get("access-control-allow-origin").is_none());
    assert!(res.bytes().await.unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(server.runner.calls().is_empty());
}

#[tokio::test]
async fn test_first_matching_rule_only() {
    let server = start_server(vec![
        rule(&["https://docs.*"], &["*"], "docs", &[]),
        rule(&["*"], &["*.pdf"], "pdf", &["--view"]),
        rule(&["*"], &["*"], "fallback", &[]),
    ])
    .await;

    let res = client()
        .post(server.url())
        .json(&serde_json::json!({ "page": "https://blog.site/", "link": "http://x/a.pdf" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let calls = server.runner.wait_for(1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.len(), 1);
    assert_eq!(server.runner.calls().len(), 1);
    assert_eq!(calls[0].program, "pdf");
    assert_eq!(calls[0].args, vec!["--view", "http://x/a.pdf"]);
}

#[tokio::test]
async fn test_concurrent_requests_dispatch_independently() {
    let server = start_server(vec![rule(&["*"], &["*"], "open", &[])]).await;
    let client = client();

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = client.clone();
        let url = server.url();
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&serde_json::json!({ "page": "p", "link": format!("l{i}") }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    let mut links: Vec<String> = server
        .runner
        .wait_for(10)
        .await
        .into_iter()
        .map(|c| c.args[0].clone())
        .collect();
    links.sort();
    let mut expected: Vec<String> = (0..10).map(|i| format!("l{i}")).collect();
    expected.sort();
    assert_eq!(links, expected);
}

#[tokio::test]
async fn test_lenient_body_decoding() {
    let server = start_server(vec![rule(&["p"], &["l"], "open", &[])]).await;

    let res = client()
        .post(server.url())
        .body(r#"{"Page":"p","LINK":"ignored","link":"l"} trailing bytes"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let calls = server.runner.wait_for(1).await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec!["l"]);

    let res = client().post(server.url()).body("null").send().await.unwrap();
    assert_eq!(res.status(), 200);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.runner.calls().len(), 1);
}

#[tokio::test]
async fn test_glob_alternatives_and_escapes() {
    let server = start_server(vec![
        rule(&["*"], &["*.{youtube,youtu}.{com,be}/*"], "mpv", &[]),
        rule(&["*"], &["*\\**"], "star", &[]),
    ])
    .await;

    for link in ["http://www.youtu.be/x", "http://a/b*c"] {
        let res = client()
            .post(server.url())
            .json(&serde_json::json!({ "page": "p", "link": link }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let mut programs: Vec<String> = server
        .runner
        .wait_for(2)
        .await
        .into_iter()
        .map(|c| c.program)
        .collect();
    programs.sort();
    assert_eq!(programs, vec!["mpv", "star"]);
}
