//! League-pyramid domain logic: tiers, promotion thresholds, round-robin
//! fixture generation and standings ordering.
//!
//! Everything here is pure so the sweep and the matchday simulator can be
//! exercised without a database.

use rand::Rng;

/// Number of clubs per league table.
pub const CLUBS_PER_LEAGUE: usize = 24;
/// Full double round-robin for 24 clubs.
pub const MATCHDAYS_PER_SEASON: i32 = (CLUBS_PER_LEAGUE as i32 - 1) * 2;
/// Fixtures per matchday.
pub const FIXTURES_PER_MATCHDAY: usize = CLUBS_PER_LEAGUE / 2;

/// The three tiers of the simulated pyramid, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum League {
    LeagueTwo,
    LeagueOne,
    Championship,
}

impl League {
    pub const ALL: [League; 3] = [League::Championship, League::LeagueOne, League::LeagueTwo];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "league_two" => Some(League::LeagueTwo),
            "league_one" => Some(League::LeagueOne),
            "championship" => Some(League::Championship),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            League::LeagueTwo => "league_two",
            League::LeagueOne => "league_one",
            League::Championship => "championship",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            League::LeagueTwo => "League Two",
            League::LeagueOne => "League One",
            League::Championship => "Championship",
        }
    }

    /// Rating a player must reach to move up out of this tier (or, from the
    /// championship, to complete the career).
    pub fn promotion_threshold(&self) -> i32 {
        match self {
            League::LeagueTwo => 70,
            League::LeagueOne => 78,
            League::Championship => 86,
        }
    }

    /// The next tier up, or `None` from the championship.
    pub fn next(&self) -> Option<League> {
        match self {
            League::LeagueTwo => Some(League::LeagueOne),
            League::LeagueOne => Some(League::Championship),
            League::Championship => None,
        }
    }
}

/// Pairings for one matchday of a double round-robin over an even number of
/// clubs, via the circle method: club 0 stays fixed while the rest rotate.
///
/// Rounds `n..2(n-1)` mirror the first half with home and away reversed. The
/// fixed club alternates venue by round parity so it does not play every
/// round at home; the remaining pairings alternate by table position for the
/// same reason.
pub fn round_pairings<T: Copy>(clubs: &[T], matchday: i32) -> Vec<(T, T)> {
    let n = clubs.len();
    assert!(n >= 2 && n % 2 == 0, "club list must be even and non-empty");
    let rounds = (n - 1) as i32;
    assert!(
        matchday >= 1 && matchday <= rounds * 2,
        "matchday out of range"
    );

    let (base_round, mirrored) = if matchday <= rounds {
        (matchday, false)
    } else {
        (matchday - rounds, true)
    };

    let rotation = (base_round - 1) as usize;
    let mut order = Vec::with_capacity(n);
    order.push(clubs[0]);
    for i in 0..n - 1 {
        order.push(clubs[1 + (i + rotation) % (n - 1)]);
    }

    let mut pairings = Vec::with_capacity(n / 2);
    for i in 0..n / 2 {
        let a = order[i];
        let b = order[n - 1 - i];
        let (home, away) = if i == 0 {
            if base_round % 2 == 0 { (a, b) } else { (b, a) }
        } else if i % 2 == 1 {
            (a, b)
        } else {
            (b, a)
        };
        if mirrored {
            pairings.push((away, home));
        } else {
            pairings.push((home, away));
        }
    }
    pairings
}

/// Goal model used when simulating a matchday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEngine {
    /// Independent Poisson draws with a home-advantage lambda, capped.
    Poisson,
    /// Uniform 0..=3 goals for either side.
    Uniform,
}

const HOME_GOALS_LAMBDA: f64 = 1.45;
const AWAY_GOALS_LAMBDA: f64 = 1.15;
const MAX_GOALS: i32 = 7;

/// Draw a final score for one fixture.
pub fn simulate_score<R: Rng + ?Sized>(engine: MatchEngine, rng: &mut R) -> (i32, i32) {
    match engine {
        MatchEngine::Poisson => (
            sample_poisson(HOME_GOALS_LAMBDA, rng),
            sample_poisson(AWAY_GOALS_LAMBDA, rng),
        ),
        MatchEngine::Uniform => (rng.random_range(0..4), rng.random_range(0..4)),
    }
}

/// Knuth's product-of-uniforms Poisson sampler, capped at [`MAX_GOALS`].
/// Fine for the small lambdas used here.
fn sample_poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> i32 {
    let limit = (-lambda).exp();
    let mut k = 0;
    let mut product: f64 = rng.random();
    while product > limit && k < MAX_GOALS {
        k += 1;
        product *= rng.random::<f64>();
    }
    k
}

/// One row of a league table, as presented to clients.
#[derive(Debug, Clone)]
pub struct StandingRow {
    pub club_id: uuid::Uuid,
    pub club_name: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

/// Order a table: points, then goal difference, then goals scored, then name.
pub fn sort_standings(rows: &mut [StandingRow]) {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then(a.club_name.cmp(&b.club_name))
    });
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    fn clubs(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_each_club_appears_once_per_matchday() {
        let clubs = clubs(CLUBS_PER_LEAGUE);
        for matchday in 1..=MATCHDAYS_PER_SEASON {
            let pairings = round_pairings(&clubs, matchday);
            assert_eq!(pairings.len(), FIXTURES_PER_MATCHDAY);
            let mut seen = HashSet::new();
            for (home, away) in pairings {
                assert!(seen.insert(home), "club {home} twice on day {matchday}");
                assert!(seen.insert(away), "club {away} twice on day {matchday}");
            }
            assert_eq!(seen.len(), CLUBS_PER_LEAGUE);
        }
    }

    #[test]
    fn test_every_pair_meets_home_and_away() {
        let clubs = clubs(CLUBS_PER_LEAGUE);
        let mut meetings: HashMap<(usize, usize), u32> = HashMap::new();
        for matchday in 1..=MATCHDAYS_PER_SEASON {
            for (home, away) in round_pairings(&clubs, matchday) {
                *meetings.entry((home, away)).or_default() += 1;
            }
        }
        // 24 clubs x 23 opponents, each ordered pairing exactly once.
        assert_eq!(meetings.len(), CLUBS_PER_LEAGUE * (CLUBS_PER_LEAGUE - 1));
        assert!(meetings.values().all(|&count| count == 1));
    }

    #[test]
    fn test_second_half_mirrors_first() {
        let clubs = clubs(CLUBS_PER_LEAGUE);
        let rounds = CLUBS_PER_LEAGUE as i32 - 1;
        for matchday in 1..=rounds {
            let first: HashSet<_> = round_pairings(&clubs, matchday).into_iter().collect();
            let mirrored: HashSet<_> = round_pairings(&clubs, matchday + rounds)
                .into_iter()
                .map(|(home, away)| (away, home))
                .collect();
            assert_eq!(first, mirrored, "matchday {matchday} not mirrored");
        }
    }

    #[test]
    fn test_fixed_club_alternates_venue() {
        let clubs = clubs(CLUBS_PER_LEAGUE);
        let mut home_days = 0;
        let rounds = CLUBS_PER_LEAGUE as i32 - 1;
        for matchday in 1..=rounds {
            let pairings = round_pairings(&clubs, matchday);
            let (home, away) = pairings
                .iter()
                .find(|(h, a)| *h == 0 || *a == 0)
                .copied()
                .unwrap();
            if home == 0 {
                home_days += 1;
            } else {
                assert_eq!(away, 0);
            }
        }
        // Strict alternation over 23 rounds: 11 or 12 home days.
        assert!((11..=12).contains(&home_days), "got {home_days} home days");
    }

    #[test]
    fn test_promotion_thresholds() {
        assert_eq!(League::LeagueTwo.promotion_threshold(), 70);
        assert_eq!(League::LeagueOne.promotion_threshold(), 78);
        assert_eq!(League::Championship.promotion_threshold(), 86);
        assert_eq!(League::LeagueTwo.next(), Some(League::LeagueOne));
        assert_eq!(League::LeagueOne.next(), Some(League::Championship));
        assert_eq!(League::Championship.next(), None);
    }

    #[test]
    fn test_league_round_trips_strings() {
        for league in League::ALL {
            assert_eq!(League::parse(league.as_str()), Some(league));
        }
        assert_eq!(League::parse("premier"), None);
    }

    #[test]
    fn test_simulated_scores_stay_capped() {
        let mut rng = rand::rng();
        for _ in 0..1_000 {
            let (home, away) = simulate_score(MatchEngine::Poisson, &mut rng);
            assert!((0..=7).contains(&home));
            assert!((0..=7).contains(&away));
            let (home, away) = simulate_score(MatchEngine::Uniform, &mut rng);
            assert!((0..=3).contains(&home));
            assert!((0..=3).contains(&away));
        }
    }

    #[test]
    fn test_standings_sort_order() {
        let row = |name: &str, points, gd, gf| StandingRow {
            club_id: uuid::Uuid::new_v4(),
            club_name: name.to_string(),
            played: 10,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: gf,
            goals_against: gf - gd,
            goal_difference: gd,
            points,
        };
        let mut rows = vec![
            row("Dunsley Park", 20, 5, 18),
            row("Beckton Rovers", 22, 3, 12),
            row("Aldermoor Athletic", 20, 5, 20),
            row("Calderholm Town", 20, 8, 15),
            row("Barrowcliffe United", 20, 5, 18),
        ];
        sort_standings(&mut rows);
        let names: Vec<_> = rows.iter().map(|r| r.club_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Beckton Rovers",      // most points
                "Calderholm Town",     // best goal difference
                "Aldermoor Athletic",  // more goals for
                "Barrowcliffe United", // name beats Dunsley on full tie
                "Dunsley Park",
            ]
        );
    }
}
