use crate::{create_test_config, mount_page, newsletter_page};
use newsletter_hunt::storage::{Dataset, DatasetStore, NewsletterRecord, ParquetStore};
use newsletter_hunt::render_report;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_render_without_dataset_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let config = create_test_config("http://127.0.0.1:9", dir.path());

    let summary = render_report(&config, "http://127.0.0.1:9/newsletters/x", 1..10)
        .await
        .expect("render");

    assert_eq!(summary, None);
    assert!(!Path::new(&config.output.report_path).exists());
    assert!(!Path::new(&config.output.dataset_path).exists());
}

#[tokio::test]
async fn test_render_from_cache_filters_by_sender() {
    let dir = tempdir().expect("tempdir");
    let config = create_test_config("https://newsletterhunt.com", dir.path());
    let money_stuff = "https://newsletterhunt.com/newsletters/money-stuff";

    let cached: Dataset = vec![
        NewsletterRecord {
            id: 1,
            title: "Money Stuff: <Shorts> & Longs".to_string(),
            name: "Money Stuff".to_string(),
            source_url: money_stuff.to_string(),
            date: "January 28, 2021".to_string(),
        },
        NewsletterRecord {
            id: 2,
            title: "The Diff: Inflation".to_string(),
            name: "The Diff".to_string(),
            source_url: "https://newsletterhunt.com/newsletters/the-diff".to_string(),
            date: "January 29, 2021".to_string(),
        },
    ]
    .into_iter()
    .collect();
    ParquetStore::new(Path::new(&config.output.dataset_path))
        .save(&cached)
        .expect("seed cache");

    let summary = render_report(&config, money_stuff, 1..10)
        .await
        .expect("render")
        .expect("report written");
    assert_eq!(summary.rows, 1);

    let html = std::fs::read_to_string(&summary.path).expect("read report");
    assert!(html.contains(
        "<a href=\"https://newsletterhunt.com/emails/1\" rel=\"noopener noreferrer\" \
         target=\"_blank\">Money Stuff: &lt;Shorts&gt; &amp; Longs</a>"
    ));
    assert!(html.contains(
        "<a href=\"https://newsletterhunt.com/newsletters/money-stuff\" \
         rel=\"noopener noreferrer\" target=\"_blank\">Money Stuff</a>"
    ));
    assert!(!html.contains("The Diff"));

    // An unknown sender still renders, with an empty table
    let nobody = "https://newsletterhunt.com/newsletters/nobody";
    let summary = render_report(&config, nobody, 1..10)
        .await
        .expect("render")
        .expect("report written");
    assert_eq!(summary.rows, 0);
    let html = std::fs::read_to_string(&summary.path).expect("read report");
    assert_eq!(html.matches("<tr>").count(), 0);
}

#[tokio::test]
async fn test_fetch_merge_and_rerun_is_idempotent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempdir().expect("tempdir");

    let mut config = create_test_config(&base_url, dir.path());
    config.harvest.fetch_new = true;
    let selection = format!("{}/newsletters/money-stuff", base_url);

    for (id, slug, sender, title) in [
        (1, "money-stuff", "Money Stuff", "Don’t Squeeze the Shorts"),
        (2, "the-diff", "The Diff", "Chips"),
        (4, "money-stuff", "Money Stuff", "Bond Funds"),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/emails/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(newsletter_page(
                &base_url,
                slug,
                sender,
                title,
                "June 1, 2022",
            )))
            .expect(1) // Cached after the first run
            .mount(&mock_server)
            .await;
    }

    let summary = render_report(&config, &selection, 1..6)
        .await
        .expect("first render")
        .expect("report written");
    assert_eq!(summary.rows, 2);

    let html = std::fs::read_to_string(&summary.path).expect("read report");
    assert!(html.contains("Don&#8217;t Squeeze the Shorts</a>"));
    assert!(html.contains(&format!("{}/emails/4", base_url)));

    let store = ParquetStore::new(Path::new(&config.output.dataset_path));
    let cached = store.load().expect("load").expect("dataset saved");
    assert_eq!(cached.ids().len(), 3);

    // Second pass: cached ids are skipped, the new id 5 is merged in
    mount_page(
        &mock_server,
        5,
        newsletter_page(&base_url, "money-stuff", "Money Stuff", "Repo Markets", "June 2, 2022"),
    )
    .await;

    let summary = render_report(&config, &selection, 1..6)
        .await
        .expect("second render")
        .expect("report written");
    assert_eq!(summary.rows, 3);

    let cached = store.load().expect("load").expect("dataset saved");
    let ids: Vec<i64> = cached.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5]);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_repost_replaces_cached_title() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempdir().expect("tempdir");

    let mut config = create_test_config(&base_url, dir.path());
    config.harvest.fetch_new = true;
    let selection = format!("{}/newsletters/money-stuff", base_url);

    let store = ParquetStore::new(Path::new(&config.output.dataset_path));
    let cached: Dataset = vec![NewsletterRecord {
        id: 5,
        title: "A".to_string(),
        name: "Money Stuff".to_string(),
        source_url: selection.clone(),
        date: "May 1, 2022".to_string(),
    }]
    .into_iter()
    .collect();
    store.save(&cached).expect("seed cache");

    mount_page(
        &mock_server,
        9,
        newsletter_page(&base_url, "money-stuff", "Money Stuff", "A", "May 9, 2022"),
    )
    .await;

    render_report(&config, &selection, 1..10)
        .await
        .expect("render")
        .expect("report written");

    let merged = store.load().expect("load").expect("dataset saved");
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.records()[0].id, 9);
    assert_eq!(merged.records()[0].date, "May 9, 2022");
}

#[tokio::test]
async fn test_failed_harvest_leaves_cache_untouched() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().expect("tempdir");

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvest.fetch_new = true;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let summary = render_report(&config, "https://newsletterhunt.com/newsletters/x", 1..4)
        .await
        .expect("render");

    // Nothing cached before, nothing harvested now
    assert_eq!(summary, None);
    assert!(!Path::new(&config.output.dataset_path).exists());
    assert!(!Path::new(&config.output.report_path).exists());
}
