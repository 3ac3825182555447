use std::time::Duration;

use checkoutBot::clients::feed_client::{FeedFetcher, HttpFeedFetcher};
use checkoutBot::clients::sms_client::{D7Sender, SmsSender, TwilioSender};
use checkoutBot::errors::CheckError;
use mockito::{Matcher, Server};

#[tokio::test]
async fn fetcher_returns_feed_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/calendar/ical/123.ics")
        .with_status(200)
        .with_header("content-type", "text/calendar")
        .with_body("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
        .create_async()
        .await;

    let fetcher = HttpFeedFetcher::new(Duration::from_secs(5)).unwrap();
    let body = fetcher
        .fetch(&format!("{}/calendar/ical/123.ics", server.url()))
        .await
        .unwrap();

    assert!(body.starts_with("BEGIN:VCALENDAR"));
    mock.assert_async().await;
}

#[tokio::test]
async fn fetcher_treats_error_status_as_fetch_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone.ics")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = HttpFeedFetcher::new(Duration::from_secs(5)).unwrap();
    let err = fetcher
        .fetch(&format!("{}/gone.ics", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::Fetch(msg) if msg.contains("404")));
}

#[tokio::test]
async fn fetcher_gives_up_on_silent_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        // accept and hold the connection open without ever answering
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let fetcher = HttpFeedFetcher::new(Duration::from_secs(1)).unwrap();
    let started = std::time::Instant::now();
    let err = fetcher
        .fetch(&format!("http://{}/listing.ics", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::Fetch(_)));
    assert!(started.elapsed() < Duration::from_secs(10));
    server.abort();
}

#[tokio::test]
async fn fetcher_rejects_non_http_url() {
    let fetcher = HttpFeedFetcher::new(Duration::from_secs(5)).unwrap();
    let err = fetcher.fetch("file:///etc/passwd").await.unwrap_err();
    assert!(matches!(err, CheckError::Configuration(_)));
}

#[tokio::test]
async fn d7_sender_posts_bearer_json() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/messages/v1/send")
        .match_header("authorization", "Bearer tok123")
        .match_body(Matcher::PartialJsonString(
            r#"{"messages":[{"channel":"sms","recipients":["+15550001111"],"content":"Cleaning needed","msg_type":"text","data_coding":"text"}],"message_globals":{"originator":"AirbnbClean"}}"#
                .to_string(),
        ))
        .with_status(202)
        .with_body(r#"{"request_id":"abc","status":"accepted"}"#)
        .create_async()
        .await;

    let sender = D7Sender::new(
        format!("{}/messages/v1/send", server.url()),
        "tok123".to_string(),
        "AirbnbClean".to_string(),
        None,
    );
    sender.send("+15550001111", "Cleaning needed").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn d7_rejection_is_send_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/send")
        .with_status(401)
        .with_body(r#"{"detail":"invalid token"}"#)
        .create_async()
        .await;

    let sender = D7Sender::new(
        format!("{}/send", server.url()),
        "bad".to_string(),
        "AirbnbClean".to_string(),
        None,
    );
    let err = sender.send("+15550001111", "hi").await.unwrap_err();
    assert!(matches!(err, CheckError::Send(msg) if msg.contains("invalid token")));
}

#[tokio::test]
async fn twilio_sender_posts_form_with_basic_auth() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/2010-04-01/Accounts/AC1/Messages.json")
        .match_header("authorization", "Basic QUMxOnNlY3JldA==")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("To".to_string(), "+15550003333".to_string()),
            Matcher::UrlEncoded("From".to_string(), "+15550002222".to_string()),
            Matcher::UrlEncoded("Body".to_string(), "From: +1999\n\nhello".to_string()),
        ]))
        .with_status(201)
        .with_body(r#"{"sid":"SM1"}"#)
        .create_async()
        .await;

    let sender = TwilioSender::new(
        server.url(),
        "AC1".to_string(),
        "secret".to_string(),
        "+15550002222".to_string(),
    );
    sender
        .send("+15550003333", "From: +1999\n\nhello")
        .await
        .unwrap();
    mock.assert_async().await;
}
