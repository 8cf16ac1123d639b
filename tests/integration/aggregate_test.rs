use arrow::record_batch::RecordBatch;
use mortality_dash::aggregate::{
    ViewResult, age_sex_counts, department_sex_counts, department_totals, lowest_mortality_cities,
    monthly_deaths, top_causes, violent_death_cities,
};
use mortality_dash::models::Sex;
use mortality_dash::models::age_band::{BAND_ORDER, UNKNOWN_BAND};
use mortality_dash::reconcile::CauseIndex;
use mortality_dash::schema::columns::SEXO;
use mortality_dash::schema::death_records_schema;
use mortality_dash::{DashboardError, FilterSelection};

use crate::utils::{KEPT_DEATHS, death, fixture_dashboard, geography_index, records_batch};

fn without_column(batch: &RecordBatch, name: &str) -> RecordBatch {
    let schema = batch.schema();
    let keep: Vec<usize> = (0..schema.fields().len())
        .filter(|&i| schema.field(i).name() != name)
        .collect();
    batch.project(&keep).unwrap()
}

#[test]
fn department_totals_sum_to_record_count() {
    let (_dir, dashboard) = fixture_dashboard();
    let totals = dashboard
        .department_totals(&FilterSelection::all())
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(totals.total(), KEPT_DEATHS);
    assert_eq!(totals.get("05"), Some(4));
    assert_eq!(totals.get("11"), Some(3));
    assert_eq!(totals.get("88"), Some(1));
}

#[test]
fn violent_cities_are_ranked_with_code_tie_break() {
    let records = records_batch(&[
        death("25001", Some(1), Some(10), "X990"),
        death("05002", Some(1), Some(10), "X954"),
        death("05001", Some(1), Some(10), "X95.1"),
        death("05001", Some(2), Some(10), "X930"),
        death("05001", Some(2), Some(10), "X90.0"),
        death("11001", Some(2), Some(10), "I219"),
    ]);
    let table = violent_death_cities(&records, &geography_index(), 5)
        .unwrap()
        .into_rows()
        .unwrap();
    let ranking: Vec<(&str, usize)> = table
        .rows
        .iter()
        .map(|r| (r.municipality_code.as_str(), r.deaths))
        .collect();
    assert_eq!(ranking, vec![("05001", 2), ("05002", 1), ("25001", 1)]);
    assert_eq!(table.rows[0].municipality_name, "Medellín");
}

#[test]
fn violent_ranking_is_truncated_to_limit() {
    let records = records_batch(&[
        death("05001", Some(1), None, "X954"),
        death("05002", Some(1), None, "X954"),
        death("11001", Some(1), None, "X954"),
    ]);
    let table = violent_death_cities(&records, &geography_index(), 2)
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1].municipality_code, "05002");
}

#[test]
fn lowest_cities_exclude_unmatched_municipalities() {
    let (_dir, dashboard) = fixture_dashboard();
    let table = dashboard
        .lowest_cities_view(&FilterSelection::all())
        .unwrap()
        .into_rows()
        .unwrap();
    let ranking: Vec<(&str, usize)> = table
        .rows
        .iter()
        .map(|r| (r.municipality_code.as_str(), r.deaths))
        .collect();
    assert_eq!(
        ranking,
        vec![("05002", 1), ("25001", 1), ("76001", 2), ("05001", 3), ("11001", 3)]
    );
    assert_eq!(table.excluded.unmatched_keys, vec!["88001".to_string()]);
    assert_eq!(table.excluded.excluded_records, 1);
}

#[test]
fn rankings_are_deterministic() {
    let (_dir, dashboard) = fixture_dashboard();
    let selection = FilterSelection::all();
    let first = dashboard.lowest_cities_view(&selection).unwrap();
    for _ in 0..5 {
        assert_eq!(dashboard.lowest_cities_view(&selection).unwrap(), first);
    }
}

#[test]
fn top_causes_drop_codes_without_description() {
    let (_dir, dashboard) = fixture_dashboard();
    let table = dashboard
        .cause_view(&FilterSelection::all())
        .unwrap()
        .into_rows()
        .unwrap();
    let ranking: Vec<(&str, usize)> = table
        .rows
        .iter()
        .map(|r| (r.cause_code.as_str(), r.deaths))
        .collect();
    assert_eq!(
        ranking,
        vec![("I219", 4), ("C509", 2), ("X954", 2), ("X930", 1), ("X990", 1)]
    );
    assert_eq!(
        table.rows[0].description,
        "Infarto agudo del miocardio, sin otra especificación"
    );
    assert_eq!(table.excluded.unmatched_keys, vec!["J189".to_string()]);
}

#[test]
fn age_sex_counts_cover_every_band() {
    let records = records_batch(&[
        death("05001", Some(1), Some(0), "I219"),
        death("05001", Some(2), Some(1), "I219"),
        death("05001", None, Some(30), "I219"),
        death("05001", Some(3), None, "I219"),
    ]);
    let table = age_sex_counts(&records).unwrap().into_rows().unwrap();
    assert_eq!(table.rows.len(), BAND_ORDER.len() * Sex::ALL.len());
    assert_eq!(table.rows[0].band, "0-4");
    assert_eq!(table.band_total("0-4"), 2);
    assert_eq!(table.band_total(UNKNOWN_BAND), 2);
    assert_eq!(table.band_total("85+"), 0);

    let unknown_unknown = table
        .rows
        .iter()
        .find(|r| r.band == UNKNOWN_BAND && r.sex == Sex::Unknown)
        .unwrap();
    assert_eq!(unknown_unknown.deaths, 2);
    assert_eq!(table.populated_bands().collect::<Vec<_>>(), vec!["0-4", UNKNOWN_BAND]);
}

#[test]
fn department_sex_counts_join_names() {
    let records = records_batch(&[
        death("05001", Some(1), None, "I219"),
        death("05002", Some(1), None, "I219"),
        death("05001", Some(2), None, "I219"),
        death("99001", Some(2), None, "I219"),
    ]);
    let table = department_sex_counts(&records, &geography_index())
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].department_name, "Antioquia");
    assert_eq!(table.rows[0].sex, Sex::Male);
    assert_eq!(table.rows[0].deaths, 2);
    assert_eq!(table.rows[1].sex, Sex::Female);
    assert_eq!(table.excluded.unmatched_keys, vec!["99".to_string()]);
    assert_eq!(table.excluded.excluded_records, 1);
}

#[test]
fn monthly_view_reports_all_months() {
    let (_dir, dashboard) = fixture_dashboard();
    let table = dashboard
        .monthly_view(&FilterSelection::all(), "Natural")
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(table.rows.len(), 12);
    let deaths: Vec<usize> = table.rows.iter().map(|r| r.deaths).collect();
    assert_eq!(deaths, vec![0, 1, 2, 1, 1, 0, 0, 1, 0, 0, 0, 0]);
    assert_eq!(table.excluded_invalid_month, 1);
    assert_eq!(table.total(), 6);
}

#[test]
fn empty_input_is_no_data_for_every_aggregator() {
    let empty = RecordBatch::new_empty(death_records_schema());
    let geography = geography_index();
    let causes = CauseIndex::default();

    assert!(department_totals(&empty).unwrap().is_empty());
    assert!(department_sex_counts(&empty, &geography).unwrap().is_empty());
    assert!(violent_death_cities(&empty, &geography, 5).unwrap().is_empty());
    assert!(lowest_mortality_cities(&empty, &geography, 10).unwrap().is_empty());
    assert!(top_causes(&empty, &causes, 10).unwrap().is_empty());
    assert!(age_sex_counts(&empty).unwrap().is_empty());
    assert!(monthly_deaths(&empty, "Natural").unwrap().is_empty());
}

#[test]
fn missing_field_is_schema_mismatch_even_when_empty() {
    let records = records_batch(&[death("05001", Some(1), Some(3), "I219")]);
    for batch in [without_column(&records, SEXO), RecordBatch::new_empty(without_column(&records, SEXO).schema())] {
        let err = age_sex_counts(&batch).unwrap_err();
        match err {
            DashboardError::SchemaMismatch { missing, .. } => assert_eq!(missing, vec![SEXO.to_string()]),
            other => panic!("expected schema mismatch, got {other}"),
        }
    }
    assert!(matches!(
        department_sex_counts(&without_column(&records, SEXO), &geography_index()),
        Err(DashboardError::SchemaMismatch { .. })
    ));
}

#[test]
fn fully_unmatched_keys_are_incomplete_not_empty() {
    let records = records_batch(&[
        death("88001", Some(1), Some(10), "X954"),
        death("88001", Some(2), Some(10), "J189"),
        death("99001", Some(2), Some(10), "X930"),
    ]);
    let geography = geography_index();

    let violent = violent_death_cities(&records, &geography, 5).unwrap();
    assert!(violent.is_incomplete());
    let excluded = violent.exclusions().unwrap();
    assert_eq!(excluded.unmatched_keys, vec!["88001".to_string(), "99001".to_string()]);
    assert_eq!(excluded.excluded_records, 2);

    let lowest = lowest_mortality_cities(&records, &geography, 10).unwrap();
    assert_eq!(lowest.exclusions().unwrap().excluded_records, 3);

    let causes = top_causes(&records, &CauseIndex::default(), 10).unwrap();
    assert_eq!(
        causes.exclusions().unwrap().unmatched_keys,
        vec!["J189".to_string(), "X930".to_string(), "X954".to_string()]
    );

    let by_sex = department_sex_counts(&records, &geography).unwrap();
    assert_eq!(
        by_sex.exclusions().unwrap().unmatched_keys,
        vec!["88".to_string(), "99".to_string()]
    );
}

#[test]
fn no_violent_deaths_is_empty() {
    let records = records_batch(&[death("05001", Some(1), Some(10), "I219")]);
    assert!(violent_death_cities(&records, &geography_index(), 5).unwrap().is_empty());
}

#[test]
fn view_result_maps_rows() {
    let result: ViewResult<usize> = ViewResult::Rows(2);
    assert_eq!(result.map(|n| n * 2).rows(), Some(&4));
    assert!(ViewResult::<usize>::Empty.map(|n| n + 1).is_empty());
    let incomplete: ViewResult<usize> = ViewResult::Incomplete(Default::default());
    assert!(incomplete.map(|n| n + 1).is_incomplete());
}
