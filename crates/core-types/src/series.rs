use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation<T> {
    pub date: NaiveDate,
    pub value: T,
}

/// An ordered series of dated values.
///
/// Dates are strictly increasing; every constructor enforces it, so lookups can
/// binary search and consumers never need to re-check ordering. Serialization is
/// one-way for that reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries<T> {
    points: Vec<Observation<T>>,
}

impl<T> TimeSeries<T> {
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Builds a series from `(date, value)` pairs, rejecting unordered or duplicate dates.
    pub fn new(points: Vec<(NaiveDate, T)>) -> Result<Self, CoreError> {
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(CoreError::InvalidInput(format!(
                    "series dates must be strictly increasing: {} is followed by {}",
                    pair[0].0, pair[1].0
                )));
            }
        }

        Ok(Self {
            points: points
                .into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation<T>> {
        self.points.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn first(&self) -> Option<&Observation<T>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation<T>> {
        self.points.last()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&T> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| &self.points[idx].value)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    /// Maps every value while keeping the dates.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> TimeSeries<U> {
        TimeSeries {
            points: self
                .points
                .iter()
                .map(|p| Observation {
                    date: p.date,
                    value: f(&p.value),
                })
                .collect(),
        }
    }
}

impl<T: Clone> TimeSeries<T> {
    pub fn values(&self) -> Vec<T> {
        self.points.iter().map(|p| p.value.clone()).collect()
    }

    /// The prefix of the series up to and including `date`.
    pub fn truncate_to(&self, date: NaiveDate) -> Self {
        let end = self.points.partition_point(|p| p.date <= date);
        Self {
            points: self.points[..end].to_vec(),
        }
    }
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> IntoIterator for &'a TimeSeries<T> {
    type Item = &'a Observation<T>;
    type IntoIter = std::slice::Iter<'a, Observation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn rejects_duplicate_and_unordered_dates() {
        let duplicate = TimeSeries::new(vec![(day(2), 1.0), (day(2), 2.0)]);
        assert!(matches!(duplicate, Err(CoreError::InvalidInput(_))));

        let unordered = TimeSeries::new(vec![(day(3), 1.0), (day(2), 2.0)]);
        assert!(matches!(unordered, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn lookup_and_truncation() {
        let series = TimeSeries::new(vec![(day(2), 1.0), (day(3), 2.0), (day(5), 3.0)]).unwrap();

        assert_eq!(series.get(day(3)), Some(&2.0));
        assert_eq!(series.get(day(4)), None);

        let head = series.truncate_to(day(4));
        assert_eq!(head.len(), 2);
        assert_eq!(head.last().map(|p| p.date), Some(day(3)));
    }
}
