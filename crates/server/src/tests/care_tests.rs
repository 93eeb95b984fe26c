use super::*;

use axum::{extract::Query, routing::get, Json, Router};
use tokio::net::TcpListener;

#[test]
fn keeps_keyword_sentences_and_drops_citations() {
    let text = "Lavender is a genus of flowering plants.[1] It needs full sun[2] and well-drained soil. \
                Its oil is used in perfumes. Water sparingly once established.[13]";
    let tips = extract_care_tips(text, 6);
    assert_eq!(
        tips,
        vec![
            "It needs full sun and well-drained soil".to_string(),
            "Water sparingly once established".to_string(),
        ]
    );
}

#[test]
fn matching_is_case_insensitive_and_substring_based() {
    let tips = extract_care_tips("SUNFLOWERS TURN TOWARD LIGHT. They are tall.", 6);
    assert_eq!(tips, vec!["SUNFLOWERS TURN TOWARD LIGHT".to_string()]);
}

#[test]
fn caps_the_number_of_tips() {
    let text = (0..10)
        .map(|i| format!("Water plant {i} weekly."))
        .collect::<String>();
    assert_eq!(extract_care_tips(&text, 6).len(), 6);
    assert_eq!(extract_care_tips(&text, 2).len(), 2);
}

#[test]
fn falls_back_when_nothing_matches() {
    assert_eq!(
        extract_care_tips("A purely historical note. Nothing else.", 6),
        vec![NO_CARE_INFO.to_string()]
    );
    assert_eq!(extract_care_tips("", 6), vec![NO_CARE_INFO.to_string()]);
}

#[test]
fn section_headings_do_not_leak_into_sentences() {
    let text = "Roses are shrubs.\n\n== Cultivation ==\nRoses prefer moist soil.";
    assert_eq!(
        extract_care_tips(text, 6),
        vec!["Roses prefer moist soil".to_string()]
    );
}

#[test]
fn non_numeric_brackets_are_kept() {
    assert_eq!(strip_citations("a [note] b[4] c[x1]"), "a [note] b c[x1]");
    assert_eq!(strip_citations("trailing ["), "trailing [");
}

#[test]
fn titles_use_underscores() {
    assert_eq!(article_title("Rosa rubiginosa"), "Rosa_rubiginosa");
}

async fn spawn_wiki(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn handle_extract(
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let title = params.get("titles").cloned().unwrap_or_default();
    Json(serde_json::json!({
        "query": {
            "pages": {
                "123": {
                    "title": title,
                    "extract": format!("{title} grows in shade.[7] It is rare.")
                }
            }
        }
    }))
}

#[tokio::test]
async fn fetches_extract_for_underscored_title() {
    let base = spawn_wiki(Router::new().route("/w/api.php", get(handle_extract))).await;
    let guide = WikipediaCareGuide::new(Client::new(), &base, 6).expect("guide");

    let tips = guide.care_tips("Hosta plantaginea").await;
    assert_eq!(tips, vec!["Hosta_plantaginea grows in shade".to_string()]);
}

#[tokio::test]
async fn fetch_failure_becomes_a_single_tip() {
    let base = spawn_wiki(Router::new()).await;
    let guide = WikipediaCareGuide::new(Client::new(), &base, 6).expect("guide");

    let tips = guide.care_tips("Rosa").await;
    assert_eq!(tips.len(), 1);
    assert!(tips[0].starts_with("Error fetching care info: "));
}
