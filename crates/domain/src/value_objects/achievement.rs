//! Achievement identifiers and their read-only display catalogue.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A one-time-unlockable milestone.
///
/// Discriminants index into the static catalogue, so variant order must
/// match [`CATALOGUE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstGame = 0,
    Veteran = 1,
    Dedicated = 2,
    PerfectScore = 3,
    StreakMaster = 4,
    LevelTen = 5,
    LevelFifty = 6,
    MammalExpert = 7,
    BirdWatcher = 8,
    BugHunter = 9,
    Botanist = 10,
    ExpertMode = 11,
    MasterNaturalist = 12,
}

/// Display information and XP reward for an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementInfo {
    pub id: Achievement,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub xp_reward: u32,
}

const CATALOGUE: [AchievementInfo; 13] = [
    AchievementInfo {
        id: Achievement::FirstGame,
        name: "Premier Pas",
        description: "Completez votre premiere partie",
        icon: "🎮",
        xp_reward: 50,
    },
    AchievementInfo {
        id: Achievement::Veteran,
        name: "Veteran",
        description: "Completez 100 parties",
        icon: "🏆",
        xp_reward: 500,
    },
    AchievementInfo {
        id: Achievement::Dedicated,
        name: "Dedie",
        description: "Jouez 7 jours consecutifs",
        icon: "📅",
        xp_reward: 200,
    },
    AchievementInfo {
        id: Achievement::PerfectScore,
        name: "Sans Faute",
        description: "Obtenez 100% sur au moins 10 questions",
        icon: "💯",
        xp_reward: 300,
    },
    AchievementInfo {
        id: Achievement::StreakMaster,
        name: "Serie Parfaite",
        description: "10 bonnes reponses consecutives",
        icon: "🔥",
        xp_reward: 150,
    },
    AchievementInfo {
        id: Achievement::LevelTen,
        name: "Naturaliste",
        description: "Atteignez le niveau 10",
        icon: "🌿",
        xp_reward: 100,
    },
    AchievementInfo {
        id: Achievement::LevelFifty,
        name: "Expert Nature",
        description: "Atteignez le niveau 50",
        icon: "🌳",
        xp_reward: 1000,
    },
    AchievementInfo {
        id: Achievement::MammalExpert,
        name: "Expert Mammiferes",
        description: "Identifiez 100 mammiferes correctement",
        icon: "🦊",
        xp_reward: 250,
    },
    AchievementInfo {
        id: Achievement::BirdWatcher,
        name: "Ornithologue",
        description: "Identifiez 100 oiseaux correctement",
        icon: "🦅",
        xp_reward: 250,
    },
    AchievementInfo {
        id: Achievement::BugHunter,
        name: "Entomologiste",
        description: "Identifiez 100 insectes correctement",
        icon: "🦋",
        xp_reward: 250,
    },
    AchievementInfo {
        id: Achievement::Botanist,
        name: "Botaniste",
        description: "Identifiez 100 plantes correctement",
        icon: "🌸",
        xp_reward: 250,
    },
    AchievementInfo {
        id: Achievement::ExpertMode,
        name: "Mode Expert",
        description: "Completez un quiz en difficulte Expert",
        icon: "⭐",
        xp_reward: 200,
    },
    AchievementInfo {
        id: Achievement::MasterNaturalist,
        name: "Maitre Naturaliste",
        description: "Completez un quiz Maitre avec 80%+",
        icon: "👑",
        xp_reward: 500,
    },
];

impl Achievement {
    pub const ALL: [Achievement; 13] = [
        Self::FirstGame,
        Self::Veteran,
        Self::Dedicated,
        Self::PerfectScore,
        Self::StreakMaster,
        Self::LevelTen,
        Self::LevelFifty,
        Self::MammalExpert,
        Self::BirdWatcher,
        Self::BugHunter,
        Self::Botanist,
        Self::ExpertMode,
        Self::MasterNaturalist,
    ];

    /// Look up the display information for this achievement.
    pub fn info(self) -> &'static AchievementInfo {
        &CATALOGUE[self as usize]
    }

    #[inline]
    pub fn xp_reward(self) -> u32 {
        self.info().xp_reward
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstGame => "first_game",
            Self::Veteran => "veteran",
            Self::Dedicated => "dedicated",
            Self::PerfectScore => "perfect_score",
            Self::StreakMaster => "streak_master",
            Self::LevelTen => "level_ten",
            Self::LevelFifty => "level_fifty",
            Self::MammalExpert => "mammal_expert",
            Self::BirdWatcher => "bird_watcher",
            Self::BugHunter => "bug_hunter",
            Self::Botanist => "botanist",
            Self::ExpertMode => "expert_mode",
            Self::MasterNaturalist => "master_naturalist",
        }
    }
}

impl std::fmt::Display for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Achievement {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == needle)
            .ok_or_else(|| DomainError::parse(format!("Unknown achievement: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_indexed_by_discriminant() {
        for achievement in Achievement::ALL {
            assert_eq!(achievement.info().id, achievement);
        }
    }

    #[test]
    fn rewards_match_catalogue() {
        assert_eq!(Achievement::FirstGame.xp_reward(), 50);
        assert_eq!(Achievement::Veteran.xp_reward(), 500);
        assert_eq!(Achievement::LevelFifty.xp_reward(), 1000);
    }

    #[test]
    fn parse_round_trips_display() {
        for achievement in Achievement::ALL {
            assert_eq!(
                achievement.to_string().parse::<Achievement>().unwrap(),
                achievement
            );
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Achievement::StreakMaster).unwrap();
        assert_eq!(json, "\"streak_master\"");
    }
}
