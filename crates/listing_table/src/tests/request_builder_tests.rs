use super::*;
use crate::query_state::Sorter;

#[test]
fn maps_pagination_and_default_sort() {
    let request = build_list_request(&QueryState::default().with_page(3));
    assert_eq!(
        request.params(),
        &[
            ("page", "3".to_string()),
            ("page_size", "10".to_string()),
            ("sort_by", "published_date".to_string()),
            ("sort_order", "desc".to_string()),
        ]
    );
}

#[test]
fn multi_select_filter_is_forwarded_comma_joined() {
    let state = QueryState::default().with_column_filter(ColumnKey::Pricetype, "FIXED,MIN_BID");
    let request = build_list_request(&state);
    assert_eq!(request.get("col_pricetype"), Some("FIXED,MIN_BID"));
    assert!(request
        .to_query_string()
        .contains("col_pricetype=FIXED%2CMIN_BID"));
}

#[test]
fn cleared_filter_disappears_from_the_request() {
    let state = QueryState::default()
        .with_column_filter(ColumnKey::Pricetype, "FIXED,MIN_BID")
        .with_column_filter(ColumnKey::Pricetype, "");
    let request = build_list_request(&state);
    assert!(!request.contains("col_pricetype"));
    assert!(request
        .params()
        .iter()
        .all(|(key, _)| !key.starts_with("col_") && !key.ends_with("_like")));
}

#[test]
fn title_uses_like_parameter_and_other_columns_use_col_prefix() {
    let state = ColumnKey::ALL
        .into_iter()
        .fold(QueryState::default(), |state, column| {
            state.with_column_filter(column, format!("v-{column}"))
        });
    let request = build_list_request(&state);

    assert_eq!(request.get("title_like"), Some("v-title"));
    assert_eq!(request.get("col_pricetype"), Some("v-pricetype"));
    assert_eq!(request.get("col_price"), Some("v-price"));
    assert_eq!(
        request.get("col_chat_minimale_waarde"),
        Some("v-chat_minimale_waarde")
    );
    assert_eq!(request.get("col_particulier"), Some("v-particulier"));
    assert_eq!(request.get("col_published_date"), Some("v-published_date"));
    assert!(!request.contains("title"));
    assert!(!request.contains("filter_title"));
}

#[test]
fn global_filter_is_omitted_when_empty() {
    let empty = build_list_request(&QueryState::default());
    assert!(!empty.contains("global_filter"));

    let searched = build_list_request(&QueryState::default().with_global_filter("trek"));
    assert_eq!(searched.get("global_filter"), Some("trek"));
}

#[test]
fn sort_parameters_are_omitted_when_unsorted() {
    let state = QueryState::default().with_sorter(Sorter::unsorted());
    let request = build_list_request(&state);
    assert!(!request.contains("sort_by"));
    assert!(!request.contains("sort_order"));

    let ascending = build_list_request(&state.with_sorter(Sorter::ascending(ColumnKey::Price)));
    assert_eq!(ascending.get("sort_by"), Some("price"));
    assert_eq!(ascending.get("sort_order"), Some("asc"));
}

#[test]
fn build_is_deterministic() {
    let state = QueryState::default()
        .with_column_filter(ColumnKey::Particulier, "true")
        .with_column_filter(ColumnKey::Title, "trek")
        .with_global_filter("road");
    assert_eq!(build_list_request(&state), build_list_request(&state.clone()));
}
