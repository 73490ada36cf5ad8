use axum::response::Html;

const INDEX_PAGE: &str = include_str!("../../assets/index.html");
const SCANNER_PAGE: &str = include_str!("../../assets/scanner.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn scanner_handler() -> Html<&'static str> {
    Html(SCANNER_PAGE)
}
