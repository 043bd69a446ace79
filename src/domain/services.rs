//! Group and race lifecycle operations.
//!
//! Every operation takes the application state explicitly and mutates only
//! what it is asked to; persisting the result is the caller's job.

use crate::domain::model::{
    AppState, Group, Millis, Race, RaceTiming, MAX_PARTICIPANTS, MIN_PARTICIPANTS,
};
use crate::utils::error::{RaceError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_target_probability,
};

/// Input for a new race.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceDraft {
    pub participants: u32,
    pub finishes: u32,
    pub first_time_ms: Option<Millis>,
}

/// Partial update of an existing race. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RaceEdit {
    pub participants: Option<u32>,
    pub finishes: Option<u32>,
    pub first_time_ms: Option<Millis>,
}

pub fn create_group(state: &mut AppState, name: &str, target_prob: f64) -> Result<String> {
    validate_non_empty_string("group name", name)?;
    let name = name.trim();
    validate_target_probability("target_prob", target_prob)?;

    let group = Group::new(name, target_prob);
    let id = group.id.clone();
    state.groups.insert(id.clone(), group);
    // 新群組排在最前面
    state.order.insert(0, id.clone());

    tracing::debug!("Created group {} ({})", name, id);
    Ok(id)
}

pub fn delete_group(state: &mut AppState, group_id: &str) -> Result<Group> {
    let group = state
        .groups
        .remove(group_id)
        .ok_or_else(|| RaceError::GroupNotFound {
            query: group_id.to_string(),
        })?;
    state.order.retain(|id| id != group_id);

    tracing::debug!("Deleted group {} with {} races", group.name, group.races.len());
    Ok(group)
}

/// Resolves a group by id first, then by exact name when the name is unique.
pub fn find_group<'a>(state: &'a AppState, query: &str) -> Result<&'a Group> {
    let query = query.trim();
    if let Some(group) = state.group(query) {
        return Ok(group);
    }

    let mut by_name = state.groups.values().filter(|g| g.name == query);
    match (by_name.next(), by_name.next()) {
        (Some(group), None) => Ok(group),
        (Some(_), Some(_)) => Err(RaceError::validation(format!(
            "more than one group is named '{}', use its id instead",
            query
        ))),
        _ => Err(RaceError::GroupNotFound {
            query: query.to_string(),
        }),
    }
}

pub fn list_groups(state: &AppState) -> Vec<&Group> {
    state.ordered_groups().collect()
}

pub fn set_target_prob(state: &mut AppState, group_id: &str, target_prob: f64) -> Result<()> {
    validate_target_probability("target_prob", target_prob)?;
    let group = group_mut(state, group_id)?;
    group.target_prob = target_prob;
    Ok(())
}

pub fn add_race(state: &mut AppState, group_id: &str, draft: RaceDraft) -> Result<String> {
    validate_counts(draft.participants, draft.finishes)?;
    if draft.finishes > 0 && draft.first_time_ms.is_none() {
        return Err(RaceError::validation(
            "a first-place time is required when at least one car finished",
        ));
    }
    if let Some(ms) = draft.first_time_ms {
        validate_time(ms)?;
    }

    let group = group_mut(state, group_id)?;
    let race = Race::new(draft.participants, draft.finishes, draft.first_time_ms);
    let id = race.id.clone();
    group.races.push(race);

    tracing::debug!(
        "Added race {} to group {} ({} races)",
        id,
        group_id,
        group.races.len()
    );
    Ok(id)
}

pub fn edit_race(state: &mut AppState, group_id: &str, race_id: &str, edit: RaceEdit) -> Result<()> {
    let race = race_mut(state, group_id, race_id)?;

    let participants = edit.participants.unwrap_or(race.participants);
    let finishes = edit.finishes.unwrap_or(race.finishes);
    validate_counts(participants, finishes)?;

    let timing = if finishes == 0 {
        RaceTiming::NotFinished
    } else {
        let ms = edit
            .first_time_ms
            .or_else(|| race.first_place_time())
            .ok_or_else(|| {
                RaceError::validation("a first-place time is required when at least one car finished")
            })?;
        validate_time(ms)?;
        RaceTiming::Recorded(ms)
    };

    race.participants = participants;
    race.finishes = finishes;
    race.timing = timing;
    Ok(())
}

pub fn delete_race(state: &mut AppState, group_id: &str, race_id: &str) -> Result<Race> {
    let group = group_mut(state, group_id)?;
    let idx = group
        .races
        .iter()
        .position(|r| r.id == race_id)
        .ok_or_else(|| RaceError::RaceNotFound {
            group_id: group_id.to_string(),
            race_id: race_id.to_string(),
        })?;
    Ok(group.races.remove(idx))
}

/// Races in display order, most recent first.
pub fn races_newest_first(group: &Group) -> Vec<&Race> {
    let mut races: Vec<&Race> = group.races.iter().collect();
    races.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    races
}

fn group_mut<'a>(state: &'a mut AppState, group_id: &str) -> Result<&'a mut Group> {
    state
        .group_mut(group_id)
        .ok_or_else(|| RaceError::GroupNotFound {
            query: group_id.to_string(),
        })
}

fn race_mut<'a>(state: &'a mut AppState, group_id: &str, race_id: &str) -> Result<&'a mut Race> {
    group_mut(state, group_id)?
        .races
        .iter_mut()
        .find(|r| r.id == race_id)
        .ok_or_else(|| RaceError::RaceNotFound {
            group_id: group_id.to_string(),
            race_id: race_id.to_string(),
        })
}

fn validate_counts(participants: u32, finishes: u32) -> Result<()> {
    validate_range("participants", participants, MIN_PARTICIPANTS, MAX_PARTICIPANTS)?;
    if finishes > participants {
        return Err(RaceError::validation(format!(
            "finishers ({}) cannot exceed participants ({})",
            finishes, participants
        )));
    }
    Ok(())
}

fn validate_time(ms: Millis) -> Result<()> {
    if ms < 0 {
        return Err(RaceError::validation("first-place time cannot be negative"));
    }
    Ok(())
}
