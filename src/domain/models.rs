use serde::{Deserialize, Serialize};

/// Kind of match requested for a session or recorded for a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum MatchType {
    Singles,
    Doubles,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Singles => "Singles",
            MatchType::Doubles => "Doubles",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Singles" => Some(MatchType::Singles),
            "Doubles" => Some(MatchType::Doubles),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Who plays whom. The shape is fixed when the match is built.
///
/// `P` is whatever identifies a player at that stage: a [`PlayerRef`] while
/// scheduling, a row id in the match log, a rated competitor while scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Pairing<P> {
    Singles { a: P, b: P },
    Doubles { team_a: (P, P), team_b: (P, P) },
}

impl<P> Pairing<P> {
    pub fn match_type(&self) -> MatchType {
        match self {
            Pairing::Singles { .. } => MatchType::Singles,
            Pairing::Doubles { .. } => MatchType::Doubles,
        }
    }

    pub fn side(&self, side: Side) -> Vec<&P> {
        match (self, side) {
            (Pairing::Singles { a, .. }, Side::A) => vec![a],
            (Pairing::Singles { b, .. }, Side::B) => vec![b],
            (Pairing::Doubles { team_a, .. }, Side::A) => vec![&team_a.0, &team_a.1],
            (Pairing::Doubles { team_b, .. }, Side::B) => vec![&team_b.0, &team_b.1],
        }
    }

    pub fn players(&self) -> Vec<&P> {
        let mut players = self.side(Side::A);
        players.extend(self.side(Side::B));
        players
    }

    pub fn into_players(self) -> Vec<P> {
        match self {
            Pairing::Singles { a, b } => vec![a, b],
            Pairing::Doubles { team_a, team_b } => vec![team_a.0, team_a.1, team_b.0, team_b.1],
        }
    }

    pub fn map<Q, F>(&self, mut f: F) -> Pairing<Q>
    where
        F: FnMut(&P) -> Q,
    {
        match self {
            Pairing::Singles { a, b } => Pairing::Singles { a: f(a), b: f(b) },
            Pairing::Doubles { team_a, team_b } => Pairing::Doubles {
                team_a: (f(&team_a.0), f(&team_a.1)),
                team_b: (f(&team_b.0), f(&team_b.1)),
            },
        }
    }

    pub fn try_map<Q, E, F>(&self, mut f: F) -> Result<Pairing<Q>, E>
    where
        F: FnMut(&P) -> Result<Q, E>,
    {
        Ok(match self {
            Pairing::Singles { a, b } => Pairing::Singles { a: f(a)?, b: f(b)? },
            Pairing::Doubles { team_a, team_b } => Pairing::Doubles {
                team_a: (f(&team_a.0)?, f(&team_a.1)?),
                team_b: (f(&team_b.0)?, f(&team_b.1)?),
            },
        })
    }
}

/// Transient view of a roster entry, held only for one scheduling run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRef {
    pub id: i64,
    pub name: String,
    pub rating: f64,
}

impl PlayerRef {
    pub fn new(id: i64, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_type_round_trips_labels() {
        assert_eq!(MatchType::parse("Singles"), Some(MatchType::Singles));
        assert_eq!(MatchType::parse("Doubles"), Some(MatchType::Doubles));
        assert_eq!(MatchType::parse("doubles"), None);
        assert_eq!(MatchType::Doubles.to_string(), "Doubles");
    }

    #[test]
    fn test_pairing_sides() {
        let doubles = Pairing::Doubles {
            team_a: (1, 2),
            team_b: (3, 4),
        };
        assert_eq!(doubles.side(Side::A), vec![&1, &2]);
        assert_eq!(doubles.side(Side::B), vec![&3, &4]);
        assert_eq!(doubles.players().len(), 4);
        assert_eq!(doubles.match_type(), MatchType::Doubles);

        let singles = Pairing::Singles { a: 10, b: 20 };
        assert_eq!(singles.side(Side::B), vec![&20]);
        assert_eq!(singles.into_players(), vec![10, 20]);
    }

    #[test]
    fn test_try_map_stops_on_first_error() {
        let pairing = Pairing::Doubles {
            team_a: (1, 2),
            team_b: (3, 4),
        };
        let mut seen = Vec::new();
        let result: Result<Pairing<i64>, i64> = pairing.try_map(|&id| {
            seen.push(id);
            if id == 2 { Err(id) } else { Ok(id * 10) }
        });
        assert_eq!(result, Err(2));
        assert_eq!(seen, vec![1, 2]);

        let mapped = pairing.map(|id| id * 10);
        assert_eq!(mapped.side(Side::B), vec![&30, &40]);
    }

    #[test]
    fn test_pairing_serializes_tagged() {
        let pairing = Pairing::Singles { a: "Ana", b: "Ben" };
        let json = serde_json::to_value(&pairing).unwrap();
        assert_eq!(json["type"], "singles");
        assert_eq!(json["a"], "Ana");
    }
}
