use mortality_dash::dashboard::DEFAULT_MANNER;
use mortality_dash::{Dashboard, DashboardConfig, FilterSelection, SexSelector, ViewStatus};

use crate::utils::{KEPT_DEATHS, fixture_dashboard, fixture_sources};

#[test]
fn every_view_renders_for_the_full_selection() {
    let (_dir, dashboard) = fixture_dashboard();
    let snapshot = dashboard.render_all(&FilterSelection::all());
    assert!(snapshot.map.is_ok());
    assert!(snapshot.department_sex.is_ok());
    assert!(snapshot.violent_cities.is_ok());
    assert!(snapshot.lowest_cities.is_ok());
    assert!(snapshot.causes.is_ok());
    assert!(snapshot.age_sex.is_ok());
    assert!(snapshot.monthly.is_ok());

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["map"]["status"], "ok");
    assert_eq!(json["map"]["view"], "department_map");
    assert_eq!(json["selection"]["sex"], "Todos");
    assert_eq!(json["violent_cities"]["data"]["rows"][0]["municipality_name"], "Medellín");
}

#[test]
fn selection_without_matches_is_no_data_everywhere() {
    let (_dir, dashboard) = fixture_dashboard();
    let selection = FilterSelection::all().with_department("Amazonas");
    let snapshot = dashboard.render_all(&selection);
    for status in [
        snapshot.map.status,
        snapshot.department_sex.status,
        snapshot.violent_cities.status,
        snapshot.lowest_cities.status,
        snapshot.causes.status,
        snapshot.age_sex.status,
        snapshot.monthly.status,
    ] {
        assert_eq!(status, ViewStatus::NoData);
    }
}

#[test]
fn views_agree_with_their_direct_calls() {
    let (_dir, dashboard) = fixture_dashboard();
    let selection = FilterSelection::all()
        .with_sex(SexSelector::from_code(1).unwrap())
        .with_department("Antioquia");
    let snapshot = dashboard.render_all(&selection);
    assert_eq!(
        snapshot.violent_cities.data,
        dashboard.violent_cities_view(&selection).unwrap().into_rows()
    );
    assert_eq!(
        snapshot.monthly.data,
        dashboard.monthly_view(&selection, DEFAULT_MANNER).unwrap().into_rows()
    );
    // Antioquia men: two violent deaths in Medellín, no natural ones
    assert_eq!(dashboard.filtered(&selection).unwrap().num_rows(), 2);
    assert_eq!(snapshot.monthly.status, ViewStatus::NoData);
}

#[test]
fn base_table_is_shared_not_copied() {
    let (_dir, dashboard) = fixture_dashboard();
    let _ = dashboard.render_all(&FilterSelection::all().with_age_band("40-44"));
    assert_eq!(dashboard.records().num_rows(), KEPT_DEATHS);
    assert_eq!(dashboard.load_reports().len(), 3);
}

#[test]
fn filter_options_are_sorted() {
    let (_dir, dashboard) = fixture_dashboard();
    let options = dashboard.filter_options().unwrap();
    assert_eq!(
        options.departments,
        vec!["Antioquia", "Bogotá, D.C.", "Cundinamarca", "Valle Del Cauca"]
    );
    assert_eq!(options.cause_codes, vec!["C509", "I219", "J189", "X930", "X954", "X990"]);
    assert_eq!(options.age_bands.len(), 18);
    assert_eq!(options.age_bands[0], "0-4");
    assert_eq!(options.sexes, vec!["Todos", "Hombre", "Mujer", "N/A"]);
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let (_dir, paths) = fixture_sources();
    let mut config = DashboardConfig::default().with_sources(paths);
    config.cause_limit = 0;
    assert!(Dashboard::load(config).is_err());
}

#[tokio::test]
async fn async_dashboard_matches_sync_dashboard() {
    let (_dir, paths) = fixture_sources();
    let config = DashboardConfig::default().with_sources(paths);
    let sync = Dashboard::load(config.clone()).unwrap();
    let concurrent = Dashboard::load_async(config).await.unwrap();
    let selection = FilterSelection::all();
    assert_eq!(sync.render_all(&selection), concurrent.render_all(&selection));
}
