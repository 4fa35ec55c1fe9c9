use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::{
    contract::ContractRow,
    error::ExplorerError,
    query::{FetchContractsParams, FilterOperator, InPredicate, PredicateValue, SortDirection},
    source::ContractSource,
};

/// Contracts table held in memory.
///
/// Evaluates requests the way the hosted database does: predicates and the
/// allow-list are conjunctive, a `NULL` column never matches, `contains` is a
/// case-insensitive substring match, and `NULL`s order as the largest value
/// (last ascending, first descending).
///
/// Rows only hold plugin types the crate models, so the allow-list never
/// excludes one here. It is still evaluated, against the database view of
/// each row.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    rows: Vec<ContractRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<ContractRow>) -> Self { Self { rows } }

    pub fn rows(&self) -> &[ContractRow] { &self.rows }

    /// Rows matching the request, ordered and windowed.
    pub fn select(&self, params: &FetchContractsParams) -> Vec<ContractRow> {
        let mut rows: Vec<_> = self.rows.iter().filter(|row| is_match(params, row)).collect();

        if let Some(order) = params.order() {
            rows.sort_by(|a, b| {
                let ord = match (a.column_value(order.column), b.column_value(order.column)) {
                    (Some(a), Some(b)) => compare(&a, &b).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let pagination = params.pagination();
        rows.into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.limit().get() as usize)
            .cloned()
            .collect()
    }
}

impl ContractSource for MemorySource {
    async fn fetch_contracts(
        &self,
        params: &FetchContractsParams,
    ) -> Result<Vec<ContractRow>, ExplorerError> {
        Ok(self.select(params))
    }
}

/// Source whose every fetch fails.
#[derive(Clone, Debug)]
pub struct FailingSource(pub String);

impl ContractSource for FailingSource {
    async fn fetch_contracts(
        &self,
        _params: &FetchContractsParams,
    ) -> Result<Vec<ContractRow>, ExplorerError> {
        Err(ExplorerError::Fetch(self.0.clone()))
    }
}

fn is_match(params: &FetchContractsParams, row: &ContractRow) -> bool {
    let predicates = params.predicates().all(|(op, predicate)| {
        row.column_value(predicate.column)
            .is_some_and(|value| evaluate(op, &value, &predicate.value))
    });
    let allowed = params
        .allow_list()
        .iter()
        .all(|allowed| is_allowed(allowed, row.column_value(allowed.column)));
    predicates && allowed
}

fn is_allowed(allowed: &InPredicate, value: Option<PredicateValue>) -> bool {
    matches!(value, Some(PredicateValue::Text(value)) if allowed.values.contains(&value.as_str()))
}

fn evaluate(op: FilterOperator, lhs: &PredicateValue, rhs: &PredicateValue) -> bool {
    let ordered = |accept: fn(Ordering) -> bool| compare(lhs, rhs).is_some_and(accept);
    match op {
        FilterOperator::Eq => ordered(Ordering::is_eq),
        FilterOperator::Lt => ordered(Ordering::is_lt),
        FilterOperator::Lte => ordered(Ordering::is_le),
        FilterOperator::Gt => ordered(Ordering::is_gt),
        FilterOperator::Gte => ordered(Ordering::is_ge),
        FilterOperator::Contains => match lhs {
            PredicateValue::Text(text) => text
                .to_lowercase()
                .contains(&rhs.to_string().to_lowercase()),
            _ => false,
        },
    }
}

/// Compares values of compatible types. Timestamps also compare against
/// RFC 3339 text and epoch milliseconds.
fn compare(lhs: &PredicateValue, rhs: &PredicateValue) -> Option<Ordering> {
    match (lhs, rhs) {
        (PredicateValue::Bool(a), PredicateValue::Bool(b)) => Some(a.cmp(b)),
        (PredicateValue::Number(a), PredicateValue::Number(b)) => a.partial_cmp(b),
        (PredicateValue::Text(a), PredicateValue::Text(b)) => Some(a.cmp(b)),
        (PredicateValue::Timestamp(a), PredicateValue::Timestamp(b)) => Some(a.cmp(b)),
        (PredicateValue::Timestamp(a), other) => to_timestamp(other).map(|b| a.cmp(&b)),
        (other, PredicateValue::Timestamp(b)) => to_timestamp(other).map(|a| a.cmp(b)),
        _ => None,
    }
}

fn to_timestamp(value: &PredicateValue) -> Option<DateTime<Utc>> {
    match value {
        PredicateValue::Text(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        PredicateValue::Number(millis) => {
            DateTime::from_timestamp_millis(millis.to_string().parse().ok()?)
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use fastnum::dec64;

    use super::*;
    use crate::{query::SortModel, testing::ContractBuilder};

    #[test]
    fn timestamps_compare_with_text_and_millis() {
        let ts = PredicateValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let text = PredicateValue::Text("2024-06-01T00:00:00Z".to_string());
        assert!(evaluate(FilterOperator::Lt, &ts, &text));
        assert!(!evaluate(FilterOperator::Gte, &ts, &text));

        let millis = PredicateValue::Number(fastnum::dec64!(1704067200000));
        assert!(evaluate(FilterOperator::Eq, &ts, &millis));
    }

    #[test]
    fn allow_list_excludes_other_and_missing_types() {
        let params = FetchContractsParams::new(Default::default());
        let rate = &params.allow_list()[1];
        assert!(is_allowed(rate, Some(PredicateValue::Text("pyth".to_string()))));
        assert!(!is_allowed(rate, Some(PredicateValue::Text("chainlink".to_string()))));
        assert!(!is_allowed(rate, Some(PredicateValue::Number(fastnum::dec64!(1)))));
        assert!(!is_allowed(rate, None));
    }

    #[test]
    fn nulls_order_last_ascending_and_first_descending() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let source = MemorySource::new(vec![
            ContractBuilder::new("small", now).forward(dec64!(1), dec64!(1)).build(),
            ContractBuilder::new("digital", now).digital(dec64!(1)).build(),
            ContractBuilder::new("large", now).forward(dec64!(1), dec64!(5)).build(),
        ]);
        let sorted = |direction| {
            let params = FetchContractsParams::new(Default::default()).with_sort(
                &SortModel::new("redeemLogicState.notional", direction).unwrap(),
            );
            source
                .select(&params)
                .into_iter()
                .map(|row| row.publickey)
                .collect::<Vec<_>>()
        };
        assert_eq!(sorted(SortDirection::Asc), vec!["small", "large", "digital"]);
        assert_eq!(sorted(SortDirection::Desc), vec!["digital", "large", "small"]);
    }

    #[test]
    fn incompatible_types_never_match() {
        let number = PredicateValue::Number(fastnum::dec64!(1));
        let text = PredicateValue::Text("1".to_string());
        assert!(!evaluate(FilterOperator::Eq, &number, &text));
        assert!(!evaluate(FilterOperator::Contains, &number, &text));
    }
}
