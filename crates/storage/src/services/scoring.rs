//! Results settlement: placements, placement points and record detection.
//!
//! Everything here is pure. [`settle`] takes the raw entries of one event and
//! returns what every result row and the event record should look like
//! afterwards; persisting that is the job of
//! [`settlement`](crate::services::settlement).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{EventKind, EventResult};

/// Placement recorded for disqualified, non-starting and non-finishing entries.
pub const NOT_PLACED: i32 = 0;

/// Points awarded per placement, index 0 being first place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointTable(Vec<i32>);

impl PointTable {
    pub fn new(points: Vec<i32>) -> Result<Self> {
        if points.is_empty() {
            return Err(StorageError::InvalidPointTable(
                "point table is empty".to_string(),
            ));
        }
        if let Some(bad) = points.iter().find(|p| **p <= 0) {
            return Err(StorageError::InvalidPointTable(format!(
                "points must be positive, got {bad}"
            )));
        }
        Ok(Self(points))
    }

    /// Points for a final placement. Zero for [`NOT_PLACED`] and for any
    /// placement past the end of the table.
    pub fn points_for(&self, placement: i32) -> i32 {
        if placement < 1 {
            return 0;
        }
        self.0
            .get((placement - 1) as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }
}

impl FromStr for PointTable {
    type Err = StorageError;

    /// Parses the stored comma separated form, e.g. `"9,7,6,5,4,3,2,1"`.
    fn from_str(s: &str) -> Result<Self> {
        let points = s
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<i32>().map_err(|_| {
                    StorageError::InvalidPointTable(format!("'{token}' is not an integer"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(points)
    }
}

impl fmt::Display for PointTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for points in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{points}")?;
            first = false;
        }
        Ok(())
    }
}

/// Labels that take a result out of the placings entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMark {
    Disqualified,
    DidNotStart,
    DidNotFinish,
}

impl TerminalMark {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "DQ" => Some(Self::Disqualified),
            "DNS" => Some(Self::DidNotStart),
            "DNF" => Some(Self::DidNotFinish),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Disqualified => "DQ",
            Self::DidNotStart => "DNS",
            Self::DidNotFinish => "DNF",
        }
    }
}

/// Raw state of one result row going into settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub result_id: Uuid,
    pub participant_id: Uuid,
    pub placement: Option<i32>,
    pub value: Option<Decimal>,
    pub label: Option<String>,
    pub is_disqualified: bool,
    /// Flag left by a previous pass
    pub is_new_record: bool,
}

impl ResultEntry {
    /// The disqualified flag counts as a `DQ` label.
    pub fn terminal_mark(&self) -> Option<TerminalMark> {
        self.label
            .as_deref()
            .and_then(TerminalMark::from_label)
            .or(self.is_disqualified.then_some(TerminalMark::Disqualified))
    }
}

impl From<&EventResult> for ResultEntry {
    fn from(result: &EventResult) -> Self {
        Self {
            result_id: result.result_id,
            participant_id: result.participant_id,
            placement: result.placement,
            value: result.value,
            label: result.label.clone(),
            is_disqualified: result.is_disqualified,
            is_new_record: result.is_new_record,
        }
    }
}

/// The event's stored record before this pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentRecord {
    pub value: Decimal,
    pub holder_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettledResult {
    pub result_id: Uuid,
    pub participant_id: Uuid,
    pub placement: Option<i32>,
    pub value: Option<Decimal>,
    pub points: i32,
    pub is_new_record: bool,
    pub is_disqualified: bool,
    pub label: Option<String>,
}

impl SettledResult {
    fn unplaced(entry: &ResultEntry) -> Self {
        Self {
            result_id: entry.result_id,
            participant_id: entry.participant_id,
            placement: None,
            value: entry.value,
            points: 0,
            is_new_record: false,
            is_disqualified: false,
            label: entry.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewRecord {
    pub result_id: Uuid,
    pub holder_id: Uuid,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settlement {
    /// Same order as the entries passed in
    pub results: Vec<SettledResult>,
    pub new_record: Option<NewRecord>,
}

impl Settlement {
    pub fn placed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.placement.is_some_and(|p| p >= 1))
            .count()
    }
}

/// Settles one event.
///
/// Entries are split by what drives them, in this precedence: a terminal
/// label, a measured value, a manual placement. Measured entries are ranked
/// best first with ties kept in input order, manual placements are taken as
/// given, terminal entries are not placed. Entries with none of the three stay
/// unplaced with zero points.
///
/// Only the best measured value can set a record, and only when it strictly
/// improves on `record`. A result that already holds the stored record keeps
/// its flag, so settling unchanged input twice gives the same output.
pub fn settle(
    kind: EventKind,
    table: &PointTable,
    record: Option<&CurrentRecord>,
    entries: &[ResultEntry],
) -> Settlement {
    let mut results: Vec<SettledResult> = entries.iter().map(SettledResult::unplaced).collect();
    let mut measured: Vec<(usize, Decimal)> = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        let out = &mut results[idx];

        if let Some(mark) = entry.terminal_mark() {
            out.placement = Some(NOT_PLACED);
            out.value = None;
            out.points = 0;
            out.is_disqualified = mark == TerminalMark::Disqualified;
            out.label = Some(mark.label().to_string());
        } else if let Some(value) = entry.value {
            measured.push((idx, value));
        } else if let Some(placement) = entry.placement {
            out.placement = Some(placement);
            out.points = table.points_for(placement);
        }
    }

    // stable: equal values keep input order
    measured.sort_by(|(_, a), (_, b)| rank_order(kind, *a, *b));

    for (rank, (idx, _)) in measured.iter().enumerate() {
        let placement = rank as i32 + 1;
        results[*idx].placement = Some(placement);
        results[*idx].points = table.points_for(placement);
    }

    let new_record = measured.first().and_then(|&(idx, value)| {
        let beats_record = record.is_none_or(|r| kind.improves_on(value, r.value));
        beats_record.then(|| NewRecord {
            result_id: entries[idx].result_id,
            holder_id: entries[idx].participant_id,
            value,
        })
    });

    for &(idx, value) in &measured {
        let entry = &entries[idx];
        results[idx].is_new_record = match new_record {
            Some(nr) => nr.result_id == entry.result_id,
            None => {
                entry.is_new_record
                    && record.is_some_and(|r| {
                        r.value == value && r.holder_id == Some(entry.participant_id)
                    })
            }
        };
    }

    Settlement {
        results,
        new_record,
    }
}

fn rank_order(kind: EventKind, a: Decimal, b: Decimal) -> Ordering {
    match kind {
        EventKind::Speed => a.cmp(&b),
        EventKind::Distance => b.cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PointTable {
        "9,7,6,5,4,3,2,1".parse().unwrap()
    }

    fn entry() -> ResultEntry {
        ResultEntry {
            result_id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            placement: None,
            value: None,
            label: None,
            is_disqualified: false,
            is_new_record: false,
        }
    }

    fn timed(tenths: i64) -> ResultEntry {
        ResultEntry {
            value: Some(Decimal::new(tenths, 1)),
            ..entry()
        }
    }

    /// Feeds a settlement back in the way the settlement service persists it.
    fn apply(entries: &[ResultEntry], settlement: &Settlement) -> Vec<ResultEntry> {
        entries
            .iter()
            .zip(&settlement.results)
            .map(|(e, s)| ResultEntry {
                result_id: e.result_id,
                participant_id: e.participant_id,
                placement: s.placement,
                value: s.value,
                label: s.label.clone(),
                is_disqualified: s.is_disqualified,
                is_new_record: s.is_new_record,
            })
            .collect()
    }

    fn record_after(before: Option<CurrentRecord>, settlement: &Settlement) -> Option<CurrentRecord> {
        settlement
            .new_record
            .map(|nr| CurrentRecord {
                value: nr.value,
                holder_id: Some(nr.holder_id),
            })
            .or(before)
    }

    #[test]
    fn test_point_table_parse() {
        let table: PointTable = " 9, 7 ,6,5,4,3,2,1 ".parse().unwrap();
        assert_eq!(table.as_slice(), &[9, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(table.to_string(), "9,7,6,5,4,3,2,1");
    }

    #[test]
    fn test_point_table_rejects_non_integer_token() {
        let err = "9,7,six,5".parse::<PointTable>().unwrap_err();
        assert!(matches!(err, StorageError::InvalidPointTable(msg) if msg.contains("six")));
    }

    #[test]
    fn test_point_table_rejects_empty_and_non_positive() {
        assert!("".parse::<PointTable>().is_err());
        assert!(" , ".parse::<PointTable>().is_err());
        assert!("5,0,1".parse::<PointTable>().is_err());
        assert!("5,-1".parse::<PointTable>().is_err());
    }

    #[test]
    fn test_points_for_placement() {
        let table = table();
        for (i, expected) in [9, 7, 6, 5, 4, 3, 2, 1].into_iter().enumerate() {
            assert_eq!(table.points_for(i as i32 + 1), expected);
        }
        assert_eq!(table.points_for(9), 0);
        assert_eq!(table.points_for(40), 0);
        assert_eq!(table.points_for(NOT_PLACED), 0);
    }

    #[test]
    fn test_speed_event_with_prior_record() {
        let entries = vec![timed(123), timed(118), timed(130)];
        let record = CurrentRecord {
            value: Decimal::new(120, 1),
            holder_id: None,
        };

        let settlement = settle(EventKind::Speed, &table(), Some(&record), &entries);

        let placements: Vec<_> = settlement.results.iter().map(|r| r.placement).collect();
        let points: Vec<_> = settlement.results.iter().map(|r| r.points).collect();
        assert_eq!(placements, vec![Some(2), Some(1), Some(3)]);
        assert_eq!(points, vec![7, 9, 6]);
        assert!(settlement.results[1].is_new_record);
        assert!(!settlement.results[0].is_new_record);
        assert!(!settlement.results[2].is_new_record);

        let nr = settlement.new_record.unwrap();
        assert_eq!(nr.value, Decimal::new(118, 1));
        assert_eq!(nr.holder_id, entries[1].participant_id);
    }

    #[test]
    fn test_distance_first_value_becomes_record() {
        let entries = vec![ResultEntry {
            value: Some(Decimal::new(54, 1)),
            ..entry()
        }];

        let settlement = settle(EventKind::Distance, &table(), None, &entries);

        assert_eq!(settlement.results[0].placement, Some(1));
        assert_eq!(settlement.results[0].points, 9);
        assert!(settlement.results[0].is_new_record);
        assert_eq!(settlement.new_record.unwrap().value, Decimal::new(54, 1));
    }

    #[test]
    fn test_distance_ranks_highest_first() {
        let entries = vec![timed(40), timed(55), timed(51)];
        let settlement = settle(EventKind::Distance, &table(), None, &entries);
        let placements: Vec<_> = settlement.results.iter().map(|r| r.placement).collect();
        assert_eq!(placements, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_dns_is_never_placed() {
        let entries = vec![
            ResultEntry {
                value: Some(Decimal::new(99, 1)),
                placement: Some(1),
                label: Some("dns".to_string()),
                ..entry()
            },
            timed(120),
        ];

        let settlement = settle(EventKind::Speed, &table(), None, &entries);
        let dns = &settlement.results[0];

        assert_eq!(dns.placement, Some(NOT_PLACED));
        assert_eq!(dns.points, 0);
        assert_eq!(dns.value, None);
        assert_eq!(dns.label.as_deref(), Some("DNS"));
        assert!(!dns.is_disqualified);
        assert!(!dns.is_new_record);
        assert_eq!(settlement.results[1].placement, Some(1));
        assert!(settlement.results[1].is_new_record);
    }

    #[test]
    fn test_disqualified_flag_acts_as_dq_label() {
        let entries = vec![
            ResultEntry {
                is_disqualified: true,
                ..timed(101)
            },
            timed(130),
        ];

        let settlement = settle(EventKind::Speed, &table(), None, &entries);

        assert_eq!(settlement.results[0].placement, Some(NOT_PLACED));
        assert!(settlement.results[0].is_disqualified);
        assert_eq!(settlement.results[0].label.as_deref(), Some("DQ"));
        assert_eq!(settlement.results[1].placement, Some(1));
        assert_eq!(settlement.new_record.unwrap().value, Decimal::new(130, 1));
    }

    #[test]
    fn test_free_text_label_is_not_terminal() {
        let entries = vec![ResultEntry {
            label: Some("photo finish".to_string()),
            ..timed(110)
        }];

        let settlement = settle(EventKind::Speed, &table(), None, &entries);

        assert_eq!(settlement.results[0].placement, Some(1));
        assert_eq!(settlement.results[0].label.as_deref(), Some("photo finish"));
    }

    #[test]
    fn test_manual_placement_taken_as_given() {
        let entries = vec![
            ResultEntry {
                placement: Some(3),
                ..entry()
            },
            ResultEntry {
                placement: Some(12),
                ..entry()
            },
        ];

        let settlement = settle(EventKind::Distance, &table(), None, &entries);

        assert_eq!(settlement.results[0].placement, Some(3));
        assert_eq!(settlement.results[0].points, 6);
        assert_eq!(settlement.results[1].placement, Some(12));
        assert_eq!(settlement.results[1].points, 0);
        assert!(settlement.new_record.is_none());
    }

    #[test]
    fn test_empty_entries_are_a_no_op() {
        let settlement = settle(EventKind::Speed, &table(), None, &[]);
        assert!(settlement.results.is_empty());
        assert!(settlement.new_record.is_none());
    }

    #[test]
    fn test_untouched_entries_stay_unplaced() {
        let entries = vec![entry(), timed(100)];
        let settlement = settle(EventKind::Speed, &table(), None, &entries);

        assert_eq!(settlement.results[0].placement, None);
        assert_eq!(settlement.results[0].points, 0);
        assert_eq!(settlement.placed_count(), 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let entries = vec![timed(125), timed(120), timed(120), timed(120)];
        let settlement = settle(EventKind::Speed, &table(), None, &entries);

        let placements: Vec<_> = settlement.results.iter().map(|r| r.placement).collect();
        assert_eq!(placements, vec![Some(4), Some(1), Some(2), Some(3)]);
        assert_eq!(settlement.new_record.unwrap().result_id, entries[1].result_id);
        assert_eq!(
            settlement.results.iter().filter(|r| r.is_new_record).count(),
            1
        );
    }

    #[test]
    fn test_distinct_values_get_contiguous_placements() {
        let tenths = [141, 97, 133, 102, 150, 88, 119, 125, 110, 99, 160];
        let entries: Vec<_> = tenths.iter().map(|t| timed(*t)).collect();

        for kind in [EventKind::Speed, EventKind::Distance] {
            let settlement = settle(kind, &table(), None, &entries);

            let mut placements: Vec<i32> = settlement
                .results
                .iter()
                .map(|r| r.placement.unwrap())
                .collect();
            placements.sort();
            assert_eq!(placements, (1..=tenths.len() as i32).collect::<Vec<_>>());

            for a in &settlement.results {
                for b in &settlement.results {
                    if a.placement < b.placement {
                        let (va, vb) = (a.value.unwrap(), b.value.unwrap());
                        assert!(kind.improves_on(va, vb));
                    }
                }
            }
        }
    }

    #[test]
    fn test_equal_to_record_is_not_new_record() {
        let entries = vec![timed(120)];
        let record = CurrentRecord {
            value: Decimal::new(120, 1),
            holder_id: Some(Uuid::new_v4()),
        };

        let settlement = settle(EventKind::Speed, &table(), Some(&record), &entries);

        assert!(settlement.new_record.is_none());
        assert!(!settlement.results[0].is_new_record);
    }

    #[test]
    fn test_settling_twice_is_idempotent() {
        let entries = vec![
            timed(123),
            timed(118),
            ResultEntry {
                label: Some("DNF".to_string()),
                ..timed(100)
            },
            ResultEntry {
                placement: Some(4),
                ..entry()
            },
            entry(),
        ];
        let prior = Some(CurrentRecord {
            value: Decimal::new(120, 1),
            holder_id: None,
        });

        let first = settle(EventKind::Speed, &table(), prior.as_ref(), &entries);
        let record = record_after(prior, &first);
        let second = settle(
            EventKind::Speed,
            &table(),
            record.as_ref(),
            &apply(&entries, &first),
        );

        assert_eq!(first.results, second.results);
        assert!(first.new_record.is_some());
        assert!(second.new_record.is_none());
        assert_eq!(record_after(record, &second), record);
    }

    #[test]
    fn test_record_never_regresses_across_passes() {
        let mut record: Option<CurrentRecord> = None;
        let passes = [vec![126, 131], vec![119, 140], vec![125], vec![119, 121], vec![117]];
        let mut history = Vec::new();

        for pass in passes {
            let entries: Vec<_> = pass.iter().map(|t| timed(*t)).collect();
            let settlement = settle(EventKind::Speed, &table(), record.as_ref(), &entries);
            record = record_after(record, &settlement);
            history.push(record.unwrap().value);
        }

        assert!(history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(history.last(), Some(&Decimal::new(117, 1)));
    }

    #[test]
    fn test_previous_holder_loses_flag_when_beaten() {
        let holder = ResultEntry {
            is_new_record: true,
            ..timed(120)
        };
        let record = CurrentRecord {
            value: Decimal::new(120, 1),
            holder_id: Some(holder.participant_id),
        };
        let challenger = timed(115);
        let entries = vec![holder, challenger];

        let settlement = settle(EventKind::Speed, &table(), Some(&record), &entries);

        assert!(!settlement.results[0].is_new_record);
        assert!(settlement.results[1].is_new_record);
    }
}
