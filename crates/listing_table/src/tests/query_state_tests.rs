use super::*;

fn on_page(page: u32) -> QueryState {
    QueryState::default().with_page(page)
}

#[test]
fn default_state_starts_on_first_page_sorted_by_publication_date() {
    let state = QueryState::default();
    assert_eq!(state.page(), 1);
    assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
    assert!(state.column_filters().is_empty());
    assert_eq!(state.global_filter(), "");
    assert_eq!(state.sorter(), Sorter::descending(ColumnKey::PublishedDate));
}

#[test]
fn set_page_is_idempotent() {
    let once = QueryState::default().with_page(4);
    let twice = once.with_page(4);
    assert_eq!(once, twice);
    assert_eq!(twice.page(), 4);
}

#[test]
fn page_zero_is_clamped_to_first_page() {
    assert_eq!(on_page(0).page(), 1);
}

#[test]
fn every_transition_except_set_page_resets_to_first_page() {
    let start = on_page(5);

    assert_eq!(start.with_page_size(25).page(), 1);
    assert_eq!(start.with_column_filter(ColumnKey::Price, "100").page(), 1);
    assert_eq!(
        start
            .with_column_filters(ColumnFilters::from_iter([(
                ColumnKey::Title,
                "trek".to_string()
            )]))
            .page(),
        1
    );
    assert_eq!(start.with_global_filter("trek").page(), 1);
    assert_eq!(start.with_sorter(Sorter::ascending(ColumnKey::Price)).page(), 1);
    assert_eq!(start.with_page(3).page(), 3);
}

#[test]
fn transitions_leave_the_source_state_untouched() {
    let start = on_page(5);
    let _ = start.with_column_filter(ColumnKey::Price, "100");
    let _ = start.with_global_filter("trek");
    assert_eq!(start.page(), 5);
    assert!(start.column_filters().is_empty());
    assert_eq!(start.global_filter(), "");
}

#[test]
fn empty_column_filter_removes_the_key() {
    let filtered = QueryState::default().with_column_filter(ColumnKey::Pricetype, "FIXED,MIN_BID");
    assert_eq!(
        filtered.column_filters().get(ColumnKey::Pricetype),
        Some("FIXED,MIN_BID")
    );

    let cleared = filtered.with_column_filter(ColumnKey::Pricetype, "");
    assert_eq!(cleared.column_filters().get(ColumnKey::Pricetype), None);
    assert!(cleared.column_filters().is_empty());
}

#[test]
fn replacing_filters_drops_empty_values() {
    let filters = ColumnFilters::from_iter([
        (ColumnKey::Title, "trek".to_string()),
        (ColumnKey::Price, String::new()),
    ]);
    let state = QueryState::default().with_column_filters(filters);
    assert_eq!(state.column_filters().len(), 1);
    assert_eq!(state.column_filters().get(ColumnKey::Title), Some("trek"));
}

#[test]
fn filter_values_outside_option_sets_are_accepted() {
    let state = QueryState::default().with_column_filter(ColumnKey::Pricetype, "NOT_A_REAL_TYPE");
    assert_eq!(
        state.column_filters().get(ColumnKey::Pricetype),
        Some("NOT_A_REAL_TYPE")
    );
}

#[test]
fn sorter_without_direction_or_column_is_unsorted() {
    assert_eq!(
        Sorter::new(Some(ColumnKey::Price), SortDirection::None),
        Sorter::unsorted()
    );
    assert_eq!(
        Sorter::new(None, SortDirection::Ascending),
        Sorter::unsorted()
    );

    let cleared = QueryState::default()
        .with_sorter(Sorter::new(Some(ColumnKey::Price), SortDirection::None));
    assert!(!cleared.sorter().is_active());
    assert_eq!(cleared.sorter().column(), None);
}

#[test]
fn sorter_replaces_column_and_direction_together() {
    let state = QueryState::default().with_sorter(Sorter::ascending(ColumnKey::Title));
    assert_eq!(state.sorter().column(), Some(ColumnKey::Title));
    assert_eq!(state.sorter().direction(), SortDirection::Ascending);
}

#[test]
fn apply_matches_the_named_transitions() {
    let start = on_page(2);
    assert_eq!(
        start.apply(Transition::GlobalFilter("trek".into())),
        start.with_global_filter("trek")
    );
    assert_eq!(
        start.apply(Transition::ColumnFilter {
            column: ColumnKey::Particulier,
            value: "true".into(),
        }),
        start.with_column_filter(ColumnKey::Particulier, "true")
    );
    assert_eq!(start.apply(Transition::Page(7)), start.with_page(7));
}

#[test]
fn page_size_is_never_zero() {
    assert_eq!(QueryState::default().with_page_size(0).page_size(), 1);
}

#[test]
fn selection_helpers_split_and_join_comma_lists() {
    assert_eq!(split_selection("FIXED, MIN_BID,,"), vec!["FIXED", "MIN_BID"]);
    assert!(split_selection("").is_empty());
    assert_eq!(join_selection(["FIXED", "MIN_BID"]), "FIXED,MIN_BID");
    assert_eq!(join_selection(["FIXED", "A,B", " "]), "FIXED");
}
