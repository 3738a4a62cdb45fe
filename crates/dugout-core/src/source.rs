use std::fmt::{Display, Formatter};

/// Remote data providers the extraction pulls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// Structured sports-data API (teams, rosters, people, schedule).
    StatsApi,
    /// Bulk pitch-level CSV export.
    Statcast,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::StatsApi, Self::Statcast];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatsApi => "statsapi",
            Self::Statcast => "statcast",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
