use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreKind {
    Difficulty,
    Potential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        if score > 70 {
            Self::High
        } else if score > 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self, kind: ScoreKind) -> &'static str {
        match (self, kind) {
            (Self::High, ScoreKind::Difficulty) => "매우 어려움",
            (Self::High, ScoreKind::Potential) => "매우 좋음",
            (Self::Medium, _) => "보통",
            (Self::Low, ScoreKind::Difficulty) => "쉬움",
            (Self::Low, ScoreKind::Potential) => "낮음",
        }
    }
}

impl ScoreKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Difficulty => "SEO 난이도",
            Self::Potential => "성장 잠재력",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Difficulty => "상위 노출 진입 장벽",
            Self::Potential => "향후 트래픽 증가 예상치",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_exclusive() {
        assert_eq!(ScoreBand::of(100), ScoreBand::High);
        assert_eq!(ScoreBand::of(71), ScoreBand::High);
        assert_eq!(ScoreBand::of(70), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(41), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(40), ScoreBand::Low);
        assert_eq!(ScoreBand::of(0), ScoreBand::Low);
    }

    #[test]
    fn labels_depend_on_kind() {
        assert_eq!(ScoreBand::High.label(ScoreKind::Difficulty), "매우 어려움");
        assert_eq!(ScoreBand::High.label(ScoreKind::Potential), "매우 좋음");
        assert_eq!(ScoreBand::Low.label(ScoreKind::Difficulty), "쉬움");
        assert_eq!(ScoreBand::Low.label(ScoreKind::Potential), "낮음");
    }
}
