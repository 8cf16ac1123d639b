//! Capital-district consolidation

use crate::aggregate::DepartmentCount;

/// Bogotá, D.C.
pub const CAPITAL_DISTRICT_CODE: &str = "11";
/// Cundinamarca
pub const SURROUNDING_DEPARTMENT_CODE: &str = "25";

/// Fold the capital district's deaths into its surrounding department
///
/// Only when both rows are present: the capital's count is added to the
/// surrounding department, then the capital row is removed. Otherwise the
/// rows are returned unchanged. The second value tells whether the rule fired.
#[must_use]
pub fn consolidate_capital(totals: &[DepartmentCount]) -> (Vec<DepartmentCount>, bool) {
    let capital = totals
        .iter()
        .find(|r| r.department_code == CAPITAL_DISTRICT_CODE)
        .map(|r| r.deaths);
    let has_surrounding = totals
        .iter()
        .any(|r| r.department_code == SURROUNDING_DEPARTMENT_CODE);

    let Some(capital_deaths) = capital.filter(|_| has_surrounding) else {
        return (totals.to_vec(), false);
    };

    let mut rows = totals.to_vec();
    for row in &mut rows {
        if row.department_code == SURROUNDING_DEPARTMENT_CODE {
            row.deaths += capital_deaths;
        }
    }
    rows.retain(|r| r.department_code != CAPITAL_DISTRICT_CODE);
    log::debug!("Folded {capital_deaths} capital-district deaths into department {SURROUNDING_DEPARTMENT_CODE}");
    (rows, true)
}
