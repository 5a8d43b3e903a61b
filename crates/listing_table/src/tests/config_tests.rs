use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn file_values(raw: &str) -> HashMap<String, String> {
    toml::from_str(raw).expect("toml")
}

#[test]
fn normalizes_api_root_whitespace_and_trailing_slashes() {
    assert_eq!(
        normalize_api_root("  http://host:8000/listings/api//  "),
        "http://host:8000/listings/api"
    );
    assert_eq!(normalize_api_root("   "), TableSettings::default().api_root);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = TableSettings::default();
    apply_file_values(
        &mut settings,
        &file_values(
            r#"
api_root = "http://listings.test/api/"
resource = "/vacancies/"
detail_route_prefix = "/detail/"
default_page_size = "25"
default_sort_column = "price"
default_sort_order = "asc"
"#,
        ),
    );

    assert_eq!(settings.api_root, "http://listings.test/api");
    assert_eq!(settings.resource, "vacancies");
    assert_eq!(settings.detail_route_prefix, "/detail");
    assert_eq!(settings.default_page_size, 25);
    assert_eq!(settings.default_sort_column, Some(ColumnKey::Price));
    assert_eq!(settings.default_sort_order, SortDirection::Ascending);
}

#[test]
fn invalid_file_values_are_ignored() {
    let mut settings = TableSettings::default();
    apply_file_values(
        &mut settings,
        &file_values(
            r#"
default_page_size = "zero"
default_sort_column = "mileage"
default_sort_order = "sideways"
"#,
        ),
    );
    assert_eq!(settings, TableSettings::default());
}

#[test]
fn empty_default_sort_column_disables_default_sorting() {
    let mut settings = TableSettings::default();
    apply_file_values(&mut settings, &file_values(r#"default_sort_column = """#));
    assert_eq!(settings.default_sort_column, None);
    assert_eq!(settings.query_defaults().sorter, Sorter::unsorted());
}

#[test]
fn app_prefixed_environment_wins_over_plain_variables() {
    let env_values: HashMap<&str, &str> = HashMap::from([
        ("LISTINGS_API_ROOT", "http://plain.test/api"),
        ("APP__API_ROOT", "http://app.test/api/"),
        ("APP__DEFAULT_PAGE_SIZE", "50"),
        ("LISTINGS_RESOURCE", "listings"),
    ]);
    let mut settings = TableSettings::default();
    apply_env_values(&mut settings, |key| {
        env_values.get(key).map(|value| value.to_string())
    });

    assert_eq!(settings.api_root, "http://app.test/api");
    assert_eq!(settings.default_page_size, 50);
    assert_eq!(settings.resource, "listings");
    assert_eq!(settings.query_defaults().page_size, 50);
}

#[test]
fn loads_explicit_settings_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("listing_table_settings_{suffix}.toml"));
    fs::write(&path, "resource = \"rentals\"\ndefault_page_size = \"20\"\n").expect("write");

    let settings = load_settings_from(&path).expect("load settings");
    assert_eq!(settings.resource, "rentals");
    assert_eq!(settings.default_page_size, 20);

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn missing_explicit_settings_file_is_an_error() {
    let path = env::temp_dir().join("listing_table_settings_does_not_exist.toml");
    let err = load_settings_from(&path).expect_err("must fail");
    assert!(err.to_string().contains("failed to read settings file"));
}
