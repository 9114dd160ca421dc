// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixture and team models as returned by TheSportsDB.

use super::null_as_empty;
use serde::{Deserialize, Serialize};

/// A scheduled match.
///
/// Field names follow the TheSportsDB wire format. The four searchable text
/// fields are always present (empty when the source omits them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "idEvent")]
    pub id: String,
    #[serde(rename = "strEvent", default, deserialize_with = "null_as_empty")]
    pub event: String,
    #[serde(rename = "strHomeTeam", default, deserialize_with = "null_as_empty")]
    pub home_team: String,
    #[serde(rename = "strHomeTeamBadge", default)]
    pub home_team_badge: Option<String>,
    #[serde(rename = "strAwayTeam", default, deserialize_with = "null_as_empty")]
    pub away_team: String,
    #[serde(rename = "strAwayTeamBadge", default)]
    pub away_team_badge: Option<String>,
    #[serde(rename = "strLeague", default, deserialize_with = "null_as_empty")]
    pub league: String,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(rename = "dateEvent", default, deserialize_with = "null_as_empty")]
    pub date: String,
    /// Kickoff clock time, `HH:MM:SS`
    #[serde(rename = "strTime", default)]
    pub time: Option<String>,
    #[serde(rename = "strThumb", default)]
    pub thumbnail: Option<String>,

    // Populated only by a single-event lookup.
    #[serde(rename = "strVenue", default)]
    pub venue: Option<String>,
    #[serde(rename = "strCity", default)]
    pub city: Option<String>,
    #[serde(rename = "strCountry", default)]
    pub country: Option<String>,
    #[serde(rename = "strDescriptionEN", default)]
    pub description: Option<String>,
}

impl Game {
    /// Case-insensitive match of an already-lowercased needle against the
    /// event name, league, and both team names.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.event, &self.home_team, &self.away_team, &self.league]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Kickoff as a local naive datetime, if the date parses.
    pub fn kickoff(&self) -> Option<chrono::NaiveDateTime> {
        crate::time_utils::kickoff(&self.date, self.time.as_deref())
    }
}

/// Team summary from team lookup and team search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "idTeam")]
    pub id: String,
    #[serde(rename = "strTeam", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "strTeamBadge", alias = "strBadge", default)]
    pub badge: Option<String>,
    #[serde(rename = "strStadium", default)]
    pub stadium: Option<String>,
    #[serde(rename = "strCountry", default)]
    pub country: Option<String>,
    #[serde(rename = "strDescriptionEN", default)]
    pub description: Option<String>,
    #[serde(rename = "intFormedYear", default)]
    pub formed_year: Option<String>,
}
