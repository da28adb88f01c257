use mockito::{Matcher, Server};

use arxives::{ArxivConfig, ArxivError, HttpTransport, PaginatedRetriever, QuerySpec};

fn feed(total: usize, ids: &[&str]) -> String {
    let entries = ids
        .iter()
        .map(|id| {
            format!(
                concat!(
                    "<entry><id>http://arxiv.org/abs/{id}</id>",
                    "<published>2017-06-12T17:57:34Z</published>",
                    "<title>Paper {id}</title><summary>Abstract of {id}</summary>",
                    "<author><name>A. Author</name></author>",
                    r#"<link href="http://arxiv.org/abs/{id}" rel="alternate" type="text/html"/>"#,
                    r#"<link title="pdf" href="http://arxiv.org/pdf/{id}" rel="related"/>"#,
                    "</entry>"
                ),
                id = id
            )
        })
        .collect::<String>();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<feed xmlns="http://www.w3.org/2005/Atom" "#,
            r#"xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">"#,
            "<opensearch:totalResults>{}</opensearch:totalResults>{}</feed>"
        ),
        total, entries
    )
}

fn window(start: &str, size: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("search_query".into(), "ti:learning".into()),
        Matcher::UrlEncoded("start".into(), start.into()),
        Matcher::UrlEncoded("max_results".into(), size.into()),
    ])
}

fn config(server: &Server) -> ArxivConfig {
    ArxivConfig::with_query_url(&format!("{}/api/query?", server.url()))
}

fn learning(size: usize) -> QuerySpec {
    QuerySpec::builder().title("learning").max_results(size).build().unwrap()
}

#[test]
fn test_paginates_over_http() {
    let mut server = Server::new();
    let first = server
        .mock("GET", "/api/query")
        .match_query(window("0", "2"))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(feed(3, &["2301.00001v1", "2301.00002v2"]))
        .expect(1)
        .create();
    let second = server
        .mock("GET", "/api/query")
        .match_query(window("2", "2"))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(feed(3, &["2301.00003v1"]))
        .expect(1)
        .create();

    let config = config(&server);
    let transport = HttpTransport::new(&config).unwrap();
    let pages = PaginatedRetriever::new(transport, config, learning(2))
        .unwrap()
        .retrieve()
        .unwrap();
    assert_eq!(pages.total_results(), 3);

    let batches = pages.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].cursor, 2);
    let (index, record) = &batches[1].entries[0];
    assert_eq!(*index, 0);
    assert_eq!(record.id, "2301.00003v1");
    assert_eq!(record.title, "Paper 2301.00003v1");
    assert_eq!(record.authors, vec!["A. Author"]);
    assert_eq!(record.pdf_url.as_deref(), Some("http://arxiv.org/pdf/2301.00003v1"));
    assert_eq!(record.published, "2017-06-12T17:57:34Z");

    first.assert();
    second.assert();
}

#[test]
fn test_service_error_over_http() {
    let mut server = Server::new();
    let body = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<feed xmlns="http://www.w3.org/2005/Atom">"#,
        "<entry><id>http://arxiv.org/api/errors#incorrect_id_format_for_bogus</id>",
        "<title>Error</title><summary>Invalid id list</summary></entry></feed>"
    );
    let mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(body)
        .create();

    let config = config(&server);
    let transport = HttpTransport::new(&config).unwrap();
    let query = QuerySpec::builder().id("bogus").build().unwrap();
    let result = PaginatedRetriever::new(transport, config, query).unwrap().retrieve();
    match result {
        Err(ArxivError::ServiceReported { message }) => assert_eq!(message, "Invalid id list"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected a service-reported error"),
    }
    mock.assert();
}

#[test]
fn test_unrecognized_failure_over_http() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create();

    let config = config(&server);
    let transport = HttpTransport::new(&config).unwrap();
    let result = PaginatedRetriever::new(transport, config, learning(10)).unwrap().retrieve();
    assert!(matches!(result, Err(ArxivError::Transport { status: Some(503), .. })));
}

#[test]
fn test_truncated_body_over_http() {
    let mut server = Server::new();
    let full = feed(1, &["2301.00001v1"]);
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(&full[..full.len() / 2])
        .create();

    let config = config(&server);
    let transport = HttpTransport::new(&config).unwrap();
    let result = PaginatedRetriever::new(transport, config, learning(10)).unwrap().retrieve();
    assert!(matches!(result, Err(ArxivError::MalformedResponse(_))));
}
