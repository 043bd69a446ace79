use crate::core::entries::timed_races;
use crate::domain::model::{Millis, Race};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_RANKING_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub position: usize,
    pub time: Millis,
    pub raced_at: DateTime<Utc>,
    pub race_id: String,
}

/// Fastest first-place times, ascending. Equal times keep their insertion order.
pub fn build_ranking(races: &[Race], limit: usize) -> Vec<RankingEntry> {
    let mut entries = timed_races(races);
    entries.sort_by_key(|e| e.time);

    entries
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, e)| RankingEntry {
            position: i + 1,
            time: e.time,
            raced_at: e.raced_at,
            race_id: e.race_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_orders_and_keeps_ties_stable() {
        let races: Vec<Race> = [1_200, 800, 1_500, 800]
            .into_iter()
            .map(|t| Race::new(4, 1, Some(t)))
            .collect();
        let ranking = build_ranking(&races, DEFAULT_RANKING_SIZE);

        let times: Vec<Millis> = ranking.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![800, 800, 1_200, 1_500]);
        assert_eq!(ranking[0].race_id, races[1].id);
        assert_eq!(ranking[1].race_id, races[3].id);
        assert_eq!(ranking[0].position, 1);
        assert_eq!(ranking[3].position, 4);
    }

    #[test]
    fn test_ranking_is_capped() {
        let races: Vec<Race> = (0..15)
            .map(|i| Race::new(3, 1, Some(20_000 - i * 100)))
            .collect();
        let ranking = build_ranking(&races, DEFAULT_RANKING_SIZE);

        assert_eq!(ranking.len(), 10);
        assert_eq!(ranking[0].time, 18_600);
        assert_eq!(ranking[9].time, 19_500);
    }

    #[test]
    fn test_ranking_skips_unfinished_and_handles_empty() {
        assert!(build_ranking(&[], DEFAULT_RANKING_SIZE).is_empty());
        let races = vec![Race::new(2, 0, None)];
        assert!(build_ranking(&races, DEFAULT_RANKING_SIZE).is_empty());
    }
}
