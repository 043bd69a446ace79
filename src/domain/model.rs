use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

/// Milliseconds. Every analytic value is expressed in this unit.
pub type Millis = i64;

pub const DEFAULT_TARGET_PROB: f64 = 0.8;
pub const MIN_PARTICIPANTS: u32 = 1;
pub const MAX_PARTICIPANTS: u32 = 5;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random base-36 id: 8 random characters plus the last 4 digits of the
/// current epoch milliseconds.
pub fn new_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id: String = (0..8)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();

    let stamp = to_base36(Utc::now().timestamp_millis().unsigned_abs());
    id.push_str(&stamp[stamp.len().saturating_sub(4)..]);
    id
}

/// Current time at the millisecond precision used on disk.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ID_ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// How a race's winning time was recorded.
///
/// Older data stored every finisher's raw time in `times`; newer data stores
/// only the first-place time. Both shapes are normalized here so consumers
/// only ever ask [`RaceTiming::first_place_time`].
#[derive(Debug, Clone, PartialEq)]
pub enum RaceTiming {
    NotFinished,
    Recorded(Millis),
    Legacy(Vec<f64>),
}

impl RaceTiming {
    pub fn first_place_time(&self) -> Option<Millis> {
        match self {
            Self::NotFinished => None,
            Self::Recorded(ms) => Some(*ms),
            Self::Legacy(times) => times
                .iter()
                .copied()
                .filter(|t| t.is_finite() && *t >= 0.0)
                .reduce(f64::min)
                .map(|t| t.round() as Millis),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RaceRecord", into = "RaceRecord")]
pub struct Race {
    pub id: String,
    pub participants: u32,
    pub finishes: u32,
    pub timing: RaceTiming,
    pub created_at: DateTime<Utc>,
}

impl Race {
    pub fn new(participants: u32, finishes: u32, first_time_ms: Option<Millis>) -> Self {
        let timing = match first_time_ms {
            Some(ms) if finishes > 0 => RaceTiming::Recorded(ms),
            _ => RaceTiming::NotFinished,
        };
        Self {
            id: new_id(),
            participants,
            finishes,
            timing,
            created_at: now_millis(),
        }
    }

    pub fn first_place_time(&self) -> Option<Millis> {
        self.timing.first_place_time()
    }
}

/// On-disk shape of a race, shared with the original browser storage format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaceRecord {
    id: String,
    #[serde(default)]
    participants: u32,
    #[serde(default)]
    finishes: Option<u32>,
    #[serde(default)]
    first_time_ms: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    times: Option<Vec<Number>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl From<RaceRecord> for Race {
    fn from(record: RaceRecord) -> Self {
        let legacy: Vec<f64> = record
            .times
            .unwrap_or_default()
            .iter()
            .filter_map(Number::as_f64)
            .collect();
        let finishes = record.finishes.unwrap_or(legacy.len() as u32);

        let recorded = record
            .first_time_ms
            .as_ref()
            .and_then(Number::as_f64)
            .filter(|t| t.is_finite() && *t >= 0.0);

        let timing = match recorded {
            Some(ms) => RaceTiming::Recorded(ms.round() as Millis),
            None if !legacy.is_empty() => RaceTiming::Legacy(legacy),
            None => RaceTiming::NotFinished,
        };

        Self {
            id: record.id,
            participants: record.participants,
            finishes,
            timing,
            created_at: record.created_at,
        }
    }
}

impl From<Race> for RaceRecord {
    fn from(race: Race) -> Self {
        let (first_time_ms, times) = match race.timing {
            RaceTiming::NotFinished => (None, None),
            RaceTiming::Recorded(ms) => (Some(Number::from(ms)), None),
            RaceTiming::Legacy(times) => (
                None,
                Some(times.into_iter().filter_map(millis_number).collect()),
            ),
        };
        Self {
            id: race.id,
            participants: race.participants,
            finishes: Some(race.finishes),
            first_time_ms,
            times,
            created_at: race.created_at,
        }
    }
}

fn millis_number(ms: f64) -> Option<Number> {
    if ms.fract() == 0.0 && ms.abs() < i64::MAX as f64 {
        Some(Number::from(ms as i64))
    } else {
        Number::from_f64(ms)
    }
}

fn default_target_prob() -> f64 {
    DEFAULT_TARGET_PROB
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub races: Vec<Race>,
    #[serde(default = "default_target_prob")]
    pub target_prob: f64,
}

impl Group {
    pub fn new(name: impl Into<String>, target_prob: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: Some(now_millis()),
            races: Vec::new(),
            target_prob,
        }
    }

    pub fn race(&self, race_id: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.id == race_id)
    }
}

/// Everything the application persists: groups keyed by id plus their
/// display order (newest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StateRecord")]
pub struct AppState {
    pub groups: BTreeMap<String, Group>,
    pub order: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StateRecord {
    #[serde(default)]
    groups: BTreeMap<String, Group>,
    #[serde(default)]
    order: Option<Vec<String>>,
}

impl From<StateRecord> for AppState {
    fn from(record: StateRecord) -> Self {
        // 舊資料沒有 order 時以 groups 的鍵重建
        let order = record
            .order
            .unwrap_or_else(|| record.groups.keys().cloned().collect());
        Self {
            groups: record.groups,
            order,
        }
    }
}

impl AppState {
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.get_mut(id)
    }

    /// Groups in display order. Ids in `order` with no backing group are skipped.
    pub fn ordered_groups(&self) -> impl Iterator<Item = &Group> {
        self.order.iter().filter_map(|id| self.groups.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
