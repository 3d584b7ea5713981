mod common;

use folio::net::content::ContentClient;

#[test]
fn lists_every_post_in_order() {
    let cms = common::serve(common::sample_posts());
    let posts = ContentClient::new(Some(&cms.base)).fetch_all_posts();

    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["hello-world", "moose-os"]);
    assert_eq!(posts[1].id, 2);
    assert_eq!(posts[0].byline(), "Ethan \u{2014} 1/1/2024");
}

#[test]
fn single_post_is_looked_up_by_slug() {
    let cms = common::serve(common::sample_posts());
    let client = ContentClient::new(Some(&format!("{}/", cms.base)));

    let post = client.fetch_post("moose-os").expect("post should exist");
    assert_eq!(post.title, "Moose OS <notes>");
    assert_eq!(post.display_date(), "3/15/2024");
    assert_eq!(cms.hits(), 1);
}

#[test]
fn unknown_slug_is_none() {
    let cms = common::serve(common::sample_posts());
    assert_eq!(ContentClient::new(Some(&cms.base)).fetch_post("nope"), None);
}

#[test]
fn slug_is_sent_encoded() {
    let cms = common::serve(serde_json::json!([{ "slug": "a b&c", "title": "Odd" }]));
    let post = ContentClient::new(Some(&cms.base)).fetch_post("a b&c");
    assert_eq!(post.map(|p| p.title), Some("Odd".to_string()));
}

#[test]
fn wrong_path_is_a_status_error() {
    let cms = common::serve(common::sample_posts());
    let client = ContentClient::new(Some(&format!("{}/v2", cms.base)));
    let err = client.try_fetch_all_posts().unwrap_err();
    assert!(err.to_string().contains("404"), "{}", err);
    assert!(client.fetch_all_posts().is_empty());
}

#[test]
fn unreachable_server_degrades_to_nothing() {
    let client = ContentClient::new(Some("http://127.0.0.1:9"));
    assert!(client.fetch_all_posts().is_empty());
    assert_eq!(client.fetch_post("hello-world"), None);
}

#[test]
fn every_listed_slug_resolves_to_itself() {
    let cms = common::serve(common::sample_posts());
    let client = ContentClient::new(Some(&cms.base));
    for listed in client.fetch_all_posts() {
        let post = client.fetch_post(&listed.slug).expect("listed post should resolve");
        assert_eq!(post.slug, listed.slug);
    }
}
