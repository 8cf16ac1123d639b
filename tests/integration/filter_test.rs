use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use mortality_dash::filter::{
    AgeBandFilter, AndFilter, BatchFilter, CauseCodeFilter, CausePrefixFilter, SexFilter,
};
use mortality_dash::models::Sex;
use mortality_dash::schema::death_records_schema;
use mortality_dash::{FilterSelection, SexSelector, apply_filters};

use crate::utils::{death, geography_index, records_batch};

fn sample() -> RecordBatch {
    records_batch(&[
        death("05001", Some(1), Some(8), "X954"),
        death("05002", Some(2), Some(9), "I219"),
        death("05001", Some(1), Some(20), "I219"),
        death("11001", Some(1), Some(8), "C509"),
        death("25001", Some(2), Some(8), "X954"),
        death("25001", None, Some(8), "X954"),
    ])
}

#[test]
fn sex_filter_accepts_code_or_label() {
    let records = sample();
    let geography = geography_index();
    let by_label = FilterSelection::all().with_sex("Hombre".parse().unwrap());
    let by_code = FilterSelection::all().with_sex(SexSelector::from_code(1).unwrap());
    let a = apply_filters(&records, &geography, &by_label).unwrap();
    let b = apply_filters(&records, &geography, &by_code).unwrap();
    assert_eq!(a.num_rows(), 3);
    assert_eq!(a, b);
}

#[test]
fn department_resolves_through_municipalities() {
    let records = sample();
    let geography = geography_index();
    let antioquia = FilterSelection::all().with_department("ANTIOQUIA");
    assert_eq!(apply_filters(&records, &geography, &antioquia).unwrap().num_rows(), 3);

    let bogota = FilterSelection::all().with_department("Bogota, D.C.");
    assert_eq!(apply_filters(&records, &geography, &bogota).unwrap().num_rows(), 1);
}

#[test]
fn unknown_department_matches_nothing() {
    let records = sample();
    let selection = FilterSelection::all().with_department("Atlántida");
    let filtered = apply_filters(&records, &geography_index(), &selection).unwrap();
    assert_eq!(filtered.num_rows(), 0);
    assert_eq!(filtered.schema(), records.schema());
}

#[test]
fn age_band_filter_uses_band_labels() {
    let records = sample();
    let selection = FilterSelection::all().with_age_band("20-24");
    let filtered = apply_filters(&records, &geography_index(), &selection).unwrap();
    assert_eq!(filtered.num_rows(), 5);

    let selection = FilterSelection::all().with_age_band("50-54");
    let filtered = apply_filters(&records, &geography_index(), &selection).unwrap();
    assert_eq!(filtered.num_rows(), 1);
}

#[test]
fn null_sex_matches_unknown() {
    let records = sample();
    let selection = FilterSelection::all().with_sex(SexSelector::Only(Sex::Unknown));
    let filtered = apply_filters(&records, &geography_index(), &selection).unwrap();
    assert_eq!(filtered.num_rows(), 1);
}

#[test]
fn conjunction_is_order_independent() {
    let records = sample();
    let geography = geography_index();
    let selection = FilterSelection::all()
        .with_sex(SexSelector::Only(Sex::Male))
        .with_department("Antioquia")
        .with_age_band("20-24");
    let predicates = selection.predicates(&geography);
    assert_eq!(predicates.len(), 3);

    let forward = AndFilter::new(predicates.clone()).filter(&records).unwrap();
    let reversed = AndFilter::new(predicates.iter().rev().cloned().collect())
        .filter(&records)
        .unwrap();
    assert_eq!(forward, reversed);
    assert_eq!(forward.num_rows(), 1);

    // applying the predicates one after another, in either order, agrees too
    let mut stepwise = records.clone();
    for predicate in predicates.iter().rev() {
        stepwise = predicate.filter(&stepwise).unwrap();
    }
    assert_eq!(stepwise, forward);
}

#[test]
fn filtering_leaves_the_base_table_untouched() {
    let records = sample();
    let before = records.clone();
    let selection = FilterSelection::all().with_cause_code("x954");
    let filtered = apply_filters(&records, &geography_index(), &selection).unwrap();
    assert_eq!(filtered.num_rows(), 3);
    assert_eq!(records, before);
}

#[test]
fn explicit_predicates_compose() {
    let records = sample();
    let filter = AndFilter::new(vec![
        Arc::new(CausePrefixFilter::violent()) as Arc<dyn BatchFilter>,
        Arc::new(SexFilter(Sex::Female)),
        Arc::new(AgeBandFilter::new("20-24")),
    ]);
    assert_eq!(filter.filter(&records).unwrap().num_rows(), 1);
    assert_eq!(
        CauseCodeFilter::new("c509").filter(&records).unwrap().num_rows(),
        1
    );
}

#[test]
fn empty_table_filters_to_empty() {
    let empty = RecordBatch::new_empty(death_records_schema());
    let selection = FilterSelection::all().with_sex(SexSelector::Only(Sex::Female));
    assert_eq!(apply_filters(&empty, &geography_index(), &selection).unwrap().num_rows(), 0);
}
